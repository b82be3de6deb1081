use crate::diag::DiagKind;
use crate::diag::Diagnostic;
use crate::diag::Location;
use anyhow::Context;
use anyhow::Result;
use std::io::BufRead;

/// Line-oriented scanner over one definition file.
///
/// Both definition files are read one physical line at a time. The scanner
/// holds the current line (without its newline), a cursor into that line and
/// the line counter. The cursor is a byte offset; columns in diagnostics are
/// the cursor plus one.
pub struct Scanner<R: BufRead> {
    reader: R,
    origin: String,
    line: String,
    line_number: usize,
    pos: usize,
}

fn is_identifier(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

impl<R: BufRead> Scanner<R> {
    pub fn new(reader: R, origin: &str) -> Self {
        Scanner {
            reader,
            origin: origin.to_string(),
            line: String::new(),
            line_number: 0,
            pos: 0,
        }
    }
    pub fn origin(&self) -> &str {
        &self.origin
    }
    pub fn line(&self) -> &str {
        &self.line
    }
    pub fn line_number(&self) -> usize {
        self.line_number
    }
    pub fn pos(&self) -> usize {
        self.pos
    }
    pub fn set_pos(&mut self, pos: usize) {
        self.pos = pos;
    }
    /// The 1-based column of the cursor.
    pub fn column(&self) -> usize {
        self.pos + 1
    }
    pub fn peek(&self) -> Option<char> {
        self.line.as_bytes().get(self.pos).map(|c| *c as char)
    }
    pub fn at_eol(&self) -> bool {
        self.pos >= self.line.len()
    }
    pub fn bump(&mut self) {
        if !self.at_eol() {
            self.pos += 1;
        }
    }
    /// Consume `c` if it is the character at the cursor.
    pub fn eat(&mut self, c: char) -> bool {
        if self.peek() == Some(c) {
            self.bump();
            true
        } else {
            false
        }
    }
    /// Skip whitespace up to the end of the current line.
    pub fn consume_whitespace(&mut self) {
        while let Some(c) = self.line.as_bytes().get(self.pos) {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
    }
    /// Read the next line that is neither blank nor a `;` comment.
    ///
    /// Returns `false` at the end of the file. The cursor is left on the
    /// first non-whitespace character of the new line.
    pub fn advance_line(&mut self) -> Result<bool> {
        loop {
            self.line.clear();
            let n = self
                .reader
                .read_line(&mut self.line)
                .with_context(|| format!("failed to read '{}'", self.origin))?;
            if n == 0 {
                self.pos = 0;
                return Ok(false);
            }
            if self.line.ends_with('\n') {
                self.line.pop();
            }
            self.line_number += 1;
            self.pos = 0;
            self.consume_whitespace();
            if !self.at_eol() && self.peek() != Some(';') {
                return Ok(true);
            }
        }
    }
    /// Match the longest run of identifier characters at the cursor.
    pub fn match_identifier(&mut self) -> Option<String> {
        let bytes = self.line.as_bytes();
        let start = self.pos;
        let mut end = start;
        while end < bytes.len() && is_identifier(bytes[end]) {
            end += 1;
        }
        if end == start {
            return None;
        }
        self.pos = end;
        Some(self.line[start..end].to_string())
    }
    /// Match an optionally negative decimal integer.
    ///
    /// The cursor is left untouched when there is no integer at the cursor
    /// (including a lone `-`) or when the value does not fit in an `i32`.
    pub fn match_integer(&mut self) -> Option<i32> {
        let bytes = self.line.as_bytes();
        let start = self.pos;
        let mut end = start;
        if bytes.get(end) == Some(&b'-') {
            end += 1;
        }
        let digits = end;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
        }
        if end == digits {
            return None;
        }
        let value = self.line[start..end].parse::<i32>().ok()?;
        self.pos = end;
        Some(value)
    }
    /// Match everything up to (not including) the next `]` on this line.
    ///
    /// Returns `None` if the line has no `]` after the cursor.
    pub fn match_to_right_bracket(&mut self) -> Option<String> {
        let rest = &self.line[self.pos..];
        let offset = rest.find(']')?;
        let text = rest[..offset].to_string();
        self.pos += offset;
        Some(text)
    }
    /// Build a diagnostic pointing at the given 1-based column.
    pub fn error_at(&self, column: usize, kind: DiagKind, msg: &str) -> anyhow::Error {
        let location = Location::new(self.line_number, Some(column));
        anyhow::Error::new(Diagnostic::new(&self.origin, location, kind, msg))
    }
    /// Build a diagnostic pointing at the cursor.
    pub fn error(&self, kind: DiagKind, msg: &str) -> anyhow::Error {
        self.error_at(self.column(), kind, msg)
    }
    /// Build a diagnostic that only refers to the current line.
    pub fn error_on_line(&self, kind: DiagKind, msg: &str) -> anyhow::Error {
        let location = Location::new(self.line_number, None);
        anyhow::Error::new(Diagnostic::new(&self.origin, location, kind, msg))
    }
}
