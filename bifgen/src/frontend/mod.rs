//! Readers for the builtin and overload definition files.
//!
//! Both files are a sequence of stanzas. A stanza starts with a bracketed
//! header on a line of its own and contains entries of exactly two physical
//! lines each. Blank lines and lines starting with `;` may appear anywhere.

mod bif;
mod ovld;
mod prototype;
mod scanner;
mod typ;

pub use bif::BifParser;
pub use ovld::OvldParser;
pub use prototype::parse_bif_attrs;
pub use prototype::parse_prototype;
pub use scanner::Scanner;
pub use typ::parse_type;
pub use typ::VoidStatus;

use crate::config::Options;
use crate::diag::DiagKind;
use crate::ir::Tables;
use anyhow::Result;
use std::io::BufRead;
use tracing::info;

/// Result of parsing one entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntryOutcome {
    Parsed,
    /// The file ended inside an entry and that is not an error.
    EndOfFile,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    AwaitHeader,
    /// The current line is a stanza header.
    AtHeader,
    InStanza,
    Done,
}

/// A definition file made of stanzas with two-line entries.
///
/// Implementors only handle the parts that differ between the files; the
/// stanza state machine is shared.
pub trait StanzaFile {
    /// Parse the stanza header on the current line.
    fn parse_header<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<()>;
    /// Parse an entry whose first line is the current line.
    fn parse_entry<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<EntryOutcome>;
    /// Parse the whole file.
    ///
    /// An empty file is valid. The first error aborts the parse.
    fn parse<R: BufRead>(&mut self, sc: &mut Scanner<R>) -> Result<()> {
        let mut state = State::AwaitHeader;
        loop {
            state = match state {
                State::AwaitHeader => {
                    if sc.advance_line()? {
                        State::AtHeader
                    } else {
                        State::Done
                    }
                }
                State::AtHeader => {
                    self.parse_header(sc)?;
                    State::InStanza
                }
                State::InStanza => {
                    if !sc.advance_line()? {
                        State::Done
                    } else if sc.peek() == Some('[') {
                        State::AtHeader
                    } else {
                        match self.parse_entry(sc)? {
                            EntryOutcome::Parsed => State::InStanza,
                            EntryOutcome::EndOfFile => State::Done,
                        }
                    }
                }
                State::Done => return Ok(()),
            }
        }
    }
}

/// Check that nothing but whitespace follows the closing bracket of a header.
fn finish_header<R: BufRead>(sc: &mut Scanner<R>) -> Result<()> {
    if !sc.eat(']') {
        return Err(sc.error(DiagKind::Syntax, "ill-formed stanza header"));
    }
    sc.consume_whitespace();
    if !sc.at_eol() {
        return Err(sc.error(DiagKind::Syntax, "garbage after stanza header"));
    }
    Ok(())
}

/// Check that nothing but whitespace remains on the current line.
fn finish_line<R: BufRead>(sc: &mut Scanner<R>) -> Result<()> {
    sc.consume_whitespace();
    if !sc.at_eol() {
        return Err(sc.error(DiagKind::Syntax, "garbage at end of line"));
    }
    Ok(())
}

/// Check a configured soft limit before adding one more item.
fn check_limit<R: BufRead>(
    sc: &Scanner<R>,
    count: usize,
    limit: Option<usize>,
    msg: &str,
) -> Result<()> {
    match limit {
        Some(limit) if count >= limit => Err(sc.error_on_line(DiagKind::Limit, msg)),
        _ => Ok(()),
    }
}

/// Read the builtin definition file into `tables`.
pub fn parse_bif<R: BufRead>(
    reader: R,
    origin: &str,
    tables: &mut Tables,
    options: &Options,
) -> Result<()> {
    let mut sc = Scanner::new(reader, origin);
    let mut parser = BifParser::new(tables, options);
    parser.parse(&mut sc)?;
    info!(
        "read {} builtins in {} stanzas from '{origin}'",
        tables.bifs.entries.len(),
        tables.bifs.stanzas.len()
    );
    Ok(())
}

/// Read the overload definition file into `tables`.
///
/// The builtin file must have been read into `tables` first.
pub fn parse_ovld<R: BufRead>(
    reader: R,
    origin: &str,
    tables: &mut Tables,
    options: &Options,
) -> Result<()> {
    let mut sc = Scanner::new(reader, origin);
    let mut parser = OvldParser::new(tables, options);
    parser.parse(&mut sc)?;
    info!(
        "read {} overloads in {} stanzas from '{origin}'",
        tables.ovlds.entries.len(),
        tables.ovlds.stanzas.len()
    );
    Ok(())
}
