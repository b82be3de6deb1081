//! Line collection for generated C files.

use std::io;
use std::io::Write;

const SHIFTWIDTH: usize = 2;

/// Format a line and add it to a [Formatter].
macro_rules! fmtln {
    ($fmt:expr, $($args:tt)*) => {
        $fmt.line(format!($($args)*))
    };
}
pub(crate) use fmtln;

/// Collect generated source lines and keep track of indentation.
#[derive(Default)]
pub struct Formatter {
    indent: usize,
    lines: Vec<String>,
}

impl Formatter {
    pub fn new() -> Self {
        Self::default()
    }
    /// Start a file with the comment that names the generator and its inputs.
    pub fn with_banner(program: &str, bif_path: &str, ovld_path: &str) -> Self {
        let mut fmt = Self::new();
        fmtln!(fmt, "/* Automatically generated by the program '{program}'");
        fmtln!(fmt, "   from the files '{bif_path}' and '{ovld_path}'.  */");
        fmt.empty_line();
        fmt
    }
    /// Write all lines added by `f` one level deeper.
    pub fn indent<T, F: FnOnce(&mut Formatter) -> T>(&mut self, f: F) -> T {
        self.indent += 1;
        let ret = f(self);
        self.indent -= 1;
        ret
    }
    pub fn line(&mut self, contents: impl AsRef<str>) {
        let indent = " ".repeat(self.indent * SHIFTWIDTH);
        self.lines.push(format!("{indent}{}\n", contents.as_ref()));
    }
    pub fn empty_line(&mut self) {
        self.lines.push("\n".to_string());
    }
    /// Add a `#define` whose value starts at the tab stop after column 32.
    pub fn define(&mut self, name: &str, value: &str) {
        let head = format!("#define {name}");
        let tabs = (32usize.saturating_sub(head.len()) + 7) / 8;
        let tabs = "\t".repeat(tabs.max(1));
        fmtln!(self, "{head}{tabs}{value}");
    }
    /// Add a brace-enclosed enumeration, one enumerator per line.
    pub fn enumeration<'a>(&mut self, head: &str, enumerators: impl IntoIterator<Item = &'a str>) {
        fmtln!(self, "{head}");
        self.line("{");
        let enumerators = enumerators.into_iter().collect::<Vec<&str>>();
        self.indent(|fmt| {
            for (i, enumerator) in enumerators.iter().enumerate() {
                let sep = if i + 1 < enumerators.len() { "," } else { "" };
                fmtln!(fmt, "{enumerator}{sep}");
            }
        });
        self.line("};");
        self.empty_line();
    }
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        for line in &self.lines {
            out.write_all(line.as_bytes())?;
        }
        out.flush()
    }
}

impl std::fmt::Display for Formatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            write!(f, "{line}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_alignment() {
        let mut fmt = Formatter::new();
        fmt.define("bif_init_bit", "(0x00000001)");
        fmt.define("bif_ldstmask_bit", "(0x00004000)");
        fmt.define("bif_is_predicate(x)", "((x).bifattrs & bif_pred_bit)");
        let expected = "#define bif_init_bit\t\t(0x00000001)\n\
                        #define bif_ldstmask_bit\t(0x00004000)\n\
                        #define bif_is_predicate(x)\t((x).bifattrs & bif_pred_bit)\n";
        assert_eq!(fmt.to_string(), expected);
    }

    #[test]
    fn test_enumeration() {
        let mut fmt = Formatter::new();
        fmt.enumeration("enum e", ["A", "B"]);
        assert_eq!(fmt.to_string(), "enum e\n{\n  A,\n  B\n};\n\n");

        let mut out = vec![];
        fmt.write_to(&mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), fmt.to_string());
    }
}
