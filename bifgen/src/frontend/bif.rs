use crate::config::Options;
use crate::config::StanzaMode;
use crate::diag::DiagKind;
use crate::fntype::fntype_id;
use crate::frontend::check_limit;
use crate::frontend::finish_header;
use crate::frontend::finish_line;
use crate::frontend::parse_bif_attrs;
use crate::frontend::parse_prototype;
use crate::frontend::EntryOutcome;
use crate::frontend::Scanner;
use crate::frontend::StanzaFile;
use crate::ir::enable_token;
use crate::ir::BifEntry;
use crate::ir::FnKind;
use crate::ir::Tables;
use anyhow::Result;
use std::io::BufRead;
use tracing::debug;

/// Parser for the builtin definition file.
///
/// ```text
/// [altivec]
///   const vsc __builtin_altivec_abs_v16qi (vsc);
///     ABS_V16QI absv16qi2 {}
/// ```
pub struct BifParser<'a> {
    tables: &'a mut Tables,
    options: &'a Options,
    stanza: usize,
}

impl<'a> BifParser<'a> {
    pub fn new(tables: &'a mut Tables, options: &'a Options) -> Self {
        BifParser {
            tables,
            options,
            stanza: 0,
        }
    }
}

impl StanzaFile for BifParser<'_> {
    fn parse_header<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<()> {
        if !sc.eat('[') {
            return Err(sc.error(DiagKind::Syntax, "ill-formed stanza header"));
        }
        let column = sc.column();
        let text = match sc.match_to_right_bracket() {
            Some(text) => text,
            None => return Err(sc.error_on_line(DiagKind::Syntax, "missing ']'")),
        };
        let name = text.trim();
        if name.is_empty() {
            let msg = "no expression found in stanza header";
            return Err(sc.error_on_line(DiagKind::Syntax, msg));
        }
        let enable = match self.options.stanza_mode {
            StanzaMode::Closed => match enable_token(name) {
                Some(token) => token.to_string(),
                None => {
                    let msg = format!("unknown stanza name '{name}'");
                    return Err(sc.error_at(column, DiagKind::UnknownName, &msg));
                }
            },
            StanzaMode::FreeForm => name.to_string(),
        };
        finish_header(sc)?;
        self.stanza = self.tables.bifs.register_stanza(name, &enable);
        debug!("builtin stanza [{name}] enabled by {enable}");
        Ok(())
    }

    fn parse_entry<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<EntryOutcome> {
        let bifs = &self.tables.bifs;
        let msg = "too many built-in functions";
        check_limit(sc, bifs.entries.len(), self.options.max_builtins, msg)?;

        let start = sc.pos();
        let kind = match sc.match_identifier() {
            Some(token) => match FnKind::from_keyword(&token) {
                Some(kind) => kind,
                None => {
                    sc.set_pos(start);
                    FnKind::None
                }
            },
            None => return Err(sc.error(DiagKind::Syntax, "malformed entry")),
        };
        let proto = parse_prototype(sc, self.options.max_restricted_operands)?;
        let fntype = fntype_id(&proto)?;

        if !sc.advance_line()? {
            return Err(sc.error_on_line(DiagKind::UnexpectedEof, "unexpected EOF"));
        }
        let column = sc.column();
        let id = match sc.match_identifier() {
            Some(id) => id,
            None => return Err(sc.error(DiagKind::Syntax, "missing builtin id")),
        };
        if !self.tables.bifs.ids.insert(&id) {
            let msg = format!("duplicate function ID '{id}'");
            return Err(sc.error_at(column, DiagKind::Duplicate, &msg));
        }
        sc.consume_whitespace();
        let pattern = match sc.match_identifier() {
            Some(pattern) => pattern,
            None => return Err(sc.error(DiagKind::Syntax, "missing pattern name")),
        };
        let attrs = parse_bif_attrs(sc)?;
        finish_line(sc)?;

        debug!("builtin {id}: {proto} ({fntype}) {attrs}");
        self.tables.fntypes.insert(&fntype);
        self.tables.bifs.entries.push(BifEntry {
            stanza: self.stanza,
            kind,
            proto,
            id,
            pattern,
            attrs,
            fntype,
        });
        Ok(EntryOutcome::Parsed)
    }
}
