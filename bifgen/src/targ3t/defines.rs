use crate::ir::OvldTable;
use crate::targ3t::formatter::fmtln;
use crate::targ3t::Formatter;
use anyhow::Result;
use std::io::Write;

/// Write one `#define <external> <internal>` per overload stanza, in file
/// order.
pub fn write_defines<W: Write>(out: &mut W, ovlds: &OvldTable) -> Result<()> {
    let mut fmt = Formatter::new();
    for stanza in &ovlds.stanzas {
        fmtln!(fmt, "#define {} {}", stanza.extern_name, stanza.intern_name);
    }
    fmt.write_to(out)?;
    Ok(())
}
