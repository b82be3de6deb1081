use crate::config::Options;
use crate::config::OverloadEof;
use crate::diag::DiagKind;
use crate::fntype::fntype_id;
use crate::frontend::check_limit;
use crate::frontend::finish_header;
use crate::frontend::finish_line;
use crate::frontend::parse_prototype;
use crate::frontend::EntryOutcome;
use crate::frontend::Scanner;
use crate::frontend::StanzaFile;
use crate::ir::OvldEntry;
use crate::ir::OvldStanza;
use crate::ir::Tables;
use anyhow::Result;
use std::io::BufRead;
use tracing::debug;
use tracing::warn;

/// Parser for the overload definition file.
///
/// ```text
/// [VEC_ABS, vec_abs, __builtin_vec_abs]
///   vsc __builtin_vec_abs (vsc);
///     ABS_V16QI
/// ```
pub struct OvldParser<'a> {
    tables: &'a mut Tables,
    options: &'a Options,
    stanza: usize,
}

impl<'a> OvldParser<'a> {
    pub fn new(tables: &'a mut Tables, options: &'a Options) -> Self {
        OvldParser {
            tables,
            options,
            stanza: 0,
        }
    }
}

fn expect_identifier<R: BufRead>(sc: &mut Scanner<R>, msg: &str) -> Result<String> {
    sc.consume_whitespace();
    match sc.match_identifier() {
        Some(name) => Ok(name),
        None => Err(sc.error(DiagKind::Syntax, msg)),
    }
}

fn expect_comma<R: BufRead>(sc: &mut Scanner<R>) -> Result<()> {
    sc.consume_whitespace();
    if !sc.eat(',') {
        return Err(sc.error(DiagKind::Syntax, "missing comma"));
    }
    Ok(())
}

impl StanzaFile for OvldParser<'_> {
    fn parse_header<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<()> {
        if !sc.eat('[') {
            return Err(sc.error(DiagKind::Syntax, "ill-formed stanza header"));
        }
        sc.consume_whitespace();
        let column = sc.column();
        let id = match sc.match_identifier() {
            Some(id) => id,
            None => {
                let msg = "no identifier found in stanza header";
                return Err(sc.error_on_line(DiagKind::Syntax, msg));
            }
        };
        let ovlds = &self.tables.ovlds;
        if ovlds.has_stanza(&id) {
            let msg = format!("duplicate overload stanza ID '{id}'");
            return Err(sc.error_at(column, DiagKind::Duplicate, &msg));
        }
        let limit = self.options.max_overload_stanzas;
        check_limit(sc, ovlds.stanzas.len(), limit, "too many stanza headers")?;

        expect_comma(sc)?;
        let extern_name = expect_identifier(sc, "missing external name")?;
        expect_comma(sc)?;
        let intern_name = expect_identifier(sc, "missing internal name")?;
        sc.consume_whitespace();
        finish_header(sc)?;

        debug!("overload stanza [{id}, {extern_name}, {intern_name}]");
        self.tables.ovlds.stanzas.push(OvldStanza {
            id,
            extern_name,
            intern_name,
        });
        self.stanza = self.tables.ovlds.stanzas.len() - 1;
        Ok(())
    }

    fn parse_entry<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<EntryOutcome> {
        let count = self.tables.ovlds.entries.len();
        check_limit(sc, count, self.options.max_overloads, "too many overloads")?;

        let proto = parse_prototype(sc, self.options.max_restricted_operands)?;
        let fntype = fntype_id(&proto)?;

        if !sc.advance_line()? {
            return match self.options.overload_eof {
                OverloadEof::Fatal => {
                    Err(sc.error_on_line(DiagKind::UnexpectedEof, "unexpected EOF"))
                }
                OverloadEof::Clean => {
                    warn!(
                        "{}:{}: unexpected EOF, dropping overload '{}'",
                        sc.origin(),
                        sc.line_number(),
                        proto.name
                    );
                    Ok(EntryOutcome::EndOfFile)
                }
            };
        }
        let column = sc.column();
        let id = match sc.match_identifier() {
            Some(id) => id,
            None => return Err(sc.error(DiagKind::Syntax, "missing overload id")),
        };
        if !self.tables.bifs.ids.contains(&id) {
            let msg = format!("builtin ID '{id}' not found in bif file");
            return Err(sc.error_at(column, DiagKind::NotFound, &msg));
        }
        if !self.tables.ovlds.ids.insert(&id) {
            let msg = format!("duplicate function ID '{id}'");
            return Err(sc.error_at(column, DiagKind::Duplicate, &msg));
        }
        finish_line(sc)?;

        debug!("overload {id}: {proto} ({fntype})");
        self.tables.fntypes.insert(&fntype);
        self.tables.ovlds.entries.push(OvldEntry {
            stanza: self.stanza,
            proto,
            id,
            fntype,
        });
        Ok(EntryOutcome::Parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostic;
    use crate::frontend::BifParser;
    use indoc::indoc;
    use std::io::Cursor;

    const BIFS: &str = indoc! {"
        [altivec]
          const vsc __builtin_altivec_abs_v16qi (vsc);
            ABS_V16QI absv16qi2 {}
          const vss __builtin_altivec_abs_v8hi (vss);
            ABS_V8HI absv8hi2 {}
    "};

    fn parse_with(src: &str, options: &Options) -> Result<Tables> {
        let mut tables = Tables::new();
        let mut sc = Scanner::new(Cursor::new(BIFS.to_string()), "bif.def");
        BifParser::new(&mut tables, options).parse(&mut sc)?;
        let mut sc = Scanner::new(Cursor::new(src.to_string()), "ovld.def");
        OvldParser::new(&mut tables, options).parse(&mut sc)?;
        Ok(tables)
    }

    fn parse_err(src: &str) -> (Diagnostic, Tables) {
        let options = Options::default();
        let mut tables = Tables::new();
        let mut sc = Scanner::new(Cursor::new(BIFS.to_string()), "bif.def");
        BifParser::new(&mut tables, &options).parse(&mut sc).unwrap();
        let mut sc = Scanner::new(Cursor::new(src.to_string()), "ovld.def");
        let err = OvldParser::new(&mut tables, &options)
            .parse(&mut sc)
            .unwrap_err();
        (err.downcast::<Diagnostic>().unwrap(), tables)
    }

    #[test]
    fn test_entries() {
        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
              vsc __builtin_vec_abs (vsc);
                ABS_V16QI
              vss __builtin_vec_abs (vss);
                ABS_V8HI
        "};
        let tables = parse_with(src, &Options::default()).unwrap();
        let ovlds = &tables.ovlds;
        assert_eq!(ovlds.stanzas.len(), 1);
        assert_eq!(ovlds.stanzas[0].extern_name, "vec_abs");
        assert_eq!(ovlds.entries.len(), 2);
        assert_eq!(ovlds.entries[1].id, "ABS_V8HI");
        assert_eq!(ovlds.entries[1].fntype, "v8hi_ftype_v8hi");
        assert!(ovlds.ids.contains("ABS_V16QI"));
    }

    #[test]
    fn test_not_found() {
        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
              vsi __builtin_vec_abs (vsi);
                ABS_V4SI
        "};
        let (diag, tables) = parse_err(src);
        assert_eq!(diag.kind, DiagKind::NotFound);
        assert_eq!(diag.msg, "builtin ID 'ABS_V4SI' not found in bif file");
        assert_eq!(diag.line(), 3);
        assert!(tables.ovlds.ids.is_empty());
        assert!(tables.ovlds.entries.is_empty());
    }

    #[test]
    fn test_duplicates() {
        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
              vsc __builtin_vec_abs (vsc);
                ABS_V16QI
            [VEC_ABSS, vec_abss, __builtin_vec_abss]
              vsc __builtin_vec_abss (vsc);
                ABS_V16QI
        "};
        let (diag, _) = parse_err(src);
        assert_eq!(diag.msg, "duplicate function ID 'ABS_V16QI'");
        assert_eq!(diag.line(), 6);

        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
            [VEC_ABS, vec_abs2, __builtin_vec_abs2]
        "};
        let (diag, _) = parse_err(src);
        assert_eq!(diag.kind, DiagKind::Duplicate);
        assert_eq!(diag.line(), 2);
        assert_eq!(diag.column(), Some(2));
    }

    #[test]
    fn test_header_errors() {
        let (diag, _) = parse_err("[VEC_ABS vec_abs, __builtin_vec_abs]\n");
        assert_eq!(diag.msg, "missing comma");
        assert_eq!(diag.column(), Some(10));

        let (diag, _) = parse_err("[VEC_ABS, , __builtin_vec_abs]\n");
        assert_eq!(diag.msg, "missing external name");

        let (diag, _) = parse_err("[VEC_ABS, vec_abs, ]\n");
        assert_eq!(diag.msg, "missing internal name");

        let (diag, _) = parse_err("[VEC_ABS, vec_abs, __builtin_vec_abs, x]\n");
        assert_eq!(diag.msg, "ill-formed stanza header");

        let (diag, _) = parse_err("[, vec_abs, __builtin_vec_abs]\n");
        assert_eq!(diag.msg, "no identifier found in stanza header");
    }

    #[test]
    fn test_entry_errors() {
        let src = "[VEC_ABS, vec_abs, __builtin_vec_abs]\n  vsc __builtin_vec_abs (vsc);\n  (\n";
        let (diag, _) = parse_err(src);
        assert_eq!(diag.msg, "missing overload id");

        let src = "[VEC_ABS, vec_abs, __builtin_vec_abs]\n  vsc __builtin_vec_abs (vsc);\n  ABS_V16QI x\n";
        let (diag, _) = parse_err(src);
        assert_eq!(diag.msg, "garbage at end of line");
    }

    #[test]
    fn test_eof_policy() {
        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
              vsc __builtin_vec_abs (vsc);
                ABS_V16QI
              vss __builtin_vec_abs (vss);
        "};
        let (diag, _) = parse_err(src);
        assert_eq!(diag.kind, DiagKind::UnexpectedEof);
        assert_eq!(diag.to_string(), "ovld.def:4: unexpected EOF.");

        let options = Options {
            overload_eof: OverloadEof::Clean,
            ..Options::default()
        };
        let tables = parse_with(src, &options).unwrap();
        assert_eq!(tables.ovlds.entries.len(), 1);
        assert!(!tables.ovlds.ids.contains("ABS_V8HI"));
    }

    #[test]
    fn test_limits() {
        let src = indoc! {"
            [VEC_ABS, vec_abs, __builtin_vec_abs]
              vsc __builtin_vec_abs (vsc);
                ABS_V16QI
            [VEC_ABSS, vec_abss, __builtin_vec_abss]
        "};
        let options = Options {
            max_overload_stanzas: Some(1),
            ..Options::default()
        };
        let err = parse_with(src, &options).unwrap_err();
        assert!(err.to_string().contains("too many stanza headers"));

        let options = Options {
            max_overloads: Some(0),
            ..Options::default()
        };
        let err = parse_with(src, &options).unwrap_err();
        assert!(err.to_string().contains("too many overloads"));
    }
}
