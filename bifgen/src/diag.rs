//! Diagnostics reported while reading the definition files.

use std::fmt::Display;
use std::fmt::Formatter;

/// Coarse classification of a user input error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagKind {
    /// Malformed grammar.
    Syntax,
    /// A keyword that is not in the known set (stanza, base type, attribute).
    UnknownName,
    /// An identifier that was already registered.
    Duplicate,
    /// A cross-referenced identifier that was never registered.
    NotFound,
    /// A configured soft limit was exceeded.
    Limit,
    /// The file ended in the middle of a two-line entry.
    UnexpectedEof,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    /// The 1-based line number.
    line: usize,
    /// The 1-based column, if the error points at a position in the line.
    column: Option<usize>,
}

impl Location {
    pub fn new(line: usize, column: Option<usize>) -> Self {
        Self { line, column }
    }
    pub fn line(&self) -> usize {
        self.line
    }
    pub fn column(&self) -> Option<usize> {
        self.column
    }
}

impl Display for Location {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.column {
            Some(column) => write!(f, "{}:{}", self.line, column),
            None => write!(f, "{}", self.line),
        }
    }
}

/// A fatal error in one of the input files.
///
/// The origin is the path of the file that is being read, so that both input
/// files can go through the same scanner with their own prefix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub origin: String,
    pub location: Location,
    pub kind: DiagKind,
    pub msg: String,
}

impl Diagnostic {
    pub fn new(origin: &str, location: Location, kind: DiagKind, msg: &str) -> Self {
        Self {
            origin: origin.to_string(),
            location,
            kind,
            msg: msg.to_string(),
        }
    }
    pub fn line(&self) -> usize {
        self.location.line()
    }
    pub fn column(&self) -> Option<usize> {
        self.location.column()
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}: {}", self.origin, self.location.line(), self.msg)?;
        if let Some(column) = self.location.column() {
            write!(f, " at column {column}")?;
        }
        write!(f, ".")
    }
}

impl std::error::Error for Diagnostic {}

/// A state that the generator should never reach.
///
/// These are bugs in the generator rather than problems in the input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InternalError {
    msg: String,
}

impl InternalError {
    pub fn new(msg: &str) -> Self {
        Self {
            msg: msg.to_string(),
        }
    }
}

impl Display for InternalError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "internal error: {}", self.msg)
    }
}

impl std::error::Error for InternalError {}
