//! Emitters for the generated C files.
//!
//! Each emitter is a pure function of the finished [Tables](crate::ir::Tables)
//! and writes one file. Enumerations follow the sorted order of the symbol
//! tables, while initialization follows the order of the definition files.

mod defines;
mod formatter;
mod header;
mod init;

pub use defines::write_defines;
pub use formatter::Formatter;
pub use header::write_header;
pub use init::write_init;

/// Headers that the generated header and init file include first.
const INCLUDES: [&str; 6] = [
    "config.h",
    "system.h",
    "coretypes.h",
    "backend.h",
    "rtl.h",
    "tree.h",
];

/// Where the generated files come from.
#[derive(Clone, Debug)]
pub struct Provenance {
    /// Name of the generator as invoked.
    pub program: String,
    pub bif_path: String,
    pub ovld_path: String,
    /// File name under which the init file includes the header.
    pub header_name: String,
}

impl Provenance {
    fn formatter(&self) -> Formatter {
        Formatter::with_banner(&self.program, &self.bif_path, &self.ovld_path)
    }
}
