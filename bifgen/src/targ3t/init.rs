//! The initialization source that fills the builtin and overload tables.

use crate::config::Options;
use crate::config::StanzaMode;
use crate::ir::BifEntry;
use crate::ir::BifTable;
use crate::ir::OvldTable;
use crate::ir::Tables;
use crate::targ3t::formatter::fmtln;
use crate::targ3t::header::bif_enumerator;
use crate::targ3t::header::ovld_enumerator;
use crate::targ3t::Formatter;
use crate::targ3t::Provenance;
use crate::targ3t::INCLUDES;
use anyhow::Result;
use std::io::Write;

fn attr_mask(entry: &BifEntry) -> String {
    if entry.attrs.is_empty() {
        return "0".to_string();
    }
    entry
        .attrs
        .iter()
        .map(|attr| attr.bit_name())
        .collect::<Vec<String>>()
        .join(" | ")
}

fn write_hash_insert(fmt: &mut Formatter, slot: &str, table: &str, key: &str, row: &str) {
    fmtln!(fmt, "{slot} = {table}.find_slot_with_hash (");
    fmtln!(fmt, "         \"{key}\", htab_hash_string (\"{key}\"), INSERT);");
    fmtln!(fmt, "*{slot} = &{row};");
}

/// Builtin rows in file order.
fn write_bif_init(fmt: &mut Formatter, bifs: &BifTable, options: &Options) {
    for entry in &bifs.entries {
        let row = format!("rs6000_builtin_info[{}]", bif_enumerator(&entry.id));
        let stanza = bifs.stanza(entry);
        let enable = match options.stanza_mode {
            StanzaMode::Closed => stanza.enable.clone(),
            StanzaMode::FreeForm => format!("({})", stanza.enable),
        };
        fmtln!(fmt, "{row}.bifname = \"{}\";", entry.proto.name);
        fmtln!(fmt, "{row}.enable = {enable};");
        fmtln!(fmt, "{row}.kind = {};", entry.kind.enumerator());
        fmtln!(fmt, "{row}.fntype = {};", entry.fntype);
        fmtln!(fmt, "{row}.icode = CODE_FOR_{};", entry.pattern);
        fmtln!(fmt, "{row}.nargs = {};", entry.proto.nargs());
        fmtln!(fmt, "{row}.bifattrs = {};", attr_mask(entry));
        for (i, restricted) in entry.proto.restricted.iter().enumerate() {
            let restriction = &restricted.restriction;
            fmtln!(fmt, "{row}.restr_opnd[{i}] = {};", restricted.operand);
            fmtln!(fmt, "{row}.restr[{i}] = {};", restriction.enumerator());
            fmtln!(fmt, "{row}.restr_val1[{i}] = {};", restriction.val1());
            if let Some(val2) = restriction.val2() {
                fmtln!(fmt, "{row}.restr_val2[{i}] = {val2};");
            }
        }
        write_hash_insert(fmt, "slot", "bif_hash", &entry.proto.name, &row);
        fmt.empty_line();
    }
}

fn ovld_row(id: &str) -> String {
    format!("rs6000_overload_info[{} - RS6000_OVLD_NONE]", ovld_enumerator(id))
}

/// Overload rows in file order.
///
/// Rows that share a name are chained through `next` in file order; only the
/// first row of each chain goes into the hash table.
fn write_ovld_init(fmt: &mut Formatter, ovlds: &OvldTable) {
    let links = ovlds.chains();
    for (entry, link) in ovlds.entries.iter().zip(links) {
        let row = ovld_row(&entry.id);
        fmtln!(fmt, "{row}.bifname = \"{}\";", entry.proto.name);
        fmtln!(fmt, "{row}.bifid = {};", bif_enumerator(&entry.id));
        fmtln!(fmt, "{row}.fntype = {};", entry.fntype);
        match link.next {
            Some(next) => {
                let next = ovld_row(&ovlds.entries[next].id);
                fmtln!(fmt, "{row}.next = &{next};");
            }
            None => fmtln!(fmt, "{row}.next = NULL;"),
        }
        if link.head {
            write_hash_insert(fmt, "oslot", "ovld_hash", &entry.proto.name, &row);
        }
        fmt.empty_line();
    }
}

/// Write the source file that defines and fills the tables.
pub fn write_init<W: Write>(
    out: &mut W,
    tables: &Tables,
    options: &Options,
    provenance: &Provenance,
) -> Result<()> {
    let mut fmt = provenance.formatter();
    for include in INCLUDES {
        fmtln!(fmt, "#include \"{include}\"");
    }
    fmtln!(fmt, "#include \"{}\"", provenance.header_name);
    fmt.empty_line();

    fmt.line("bifdata rs6000_builtin_info[RS6000_BIF_MAX];");
    fmt.line("ovlddata rs6000_overload_info[RS6000_OVLD_MAX - RS6000_OVLD_NONE];");
    fmt.empty_line();
    fmt.line("hash_table<rs6000_bif_hasher> bif_hash (1024);");
    fmt.line("hash_table<rs6000_ovld_hasher> ovld_hash (1024);");
    fmt.empty_line();

    for fntype in tables.fntypes.iter() {
        fmtln!(fmt, "tree {fntype};");
    }
    if !tables.fntypes.is_empty() {
        fmt.empty_line();
    }

    fmt.line("void");
    fmt.line("rs6000_autoinit_builtins ()");
    fmt.line("{");
    fmt.indent(|fmt| {
        fmt.line("bifdata **slot;");
        fmt.line("ovlddata **oslot;");
        fmt.empty_line();
        write_bif_init(fmt, &tables.bifs, options);
        write_ovld_init(fmt, &tables.ovlds);
    });
    fmt.line("}");
    fmt.write_to(out)?;
    Ok(())
}
