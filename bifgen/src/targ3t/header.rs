//! The header with the builtin and overload enumerations.

use crate::config::Options;
use crate::config::StanzaMode;
use crate::ir::Attr;
use crate::ir::Tables;
use crate::ir::KNOWN_STANZAS;
use crate::targ3t::formatter::fmtln;
use crate::targ3t::Formatter;
use crate::targ3t::Provenance;
use crate::targ3t::INCLUDES;
use anyhow::Result;
use std::io::Write;

pub(crate) fn bif_enumerator(id: &str) -> String {
    format!("RS6000_BIF_{id}")
}

pub(crate) fn ovld_enumerator(id: &str) -> String {
    format!("RS6000_OVLD_{id}")
}

fn write_hasher(fmt: &mut Formatter, name: &str, data: &str) {
    fmtln!(fmt, "struct {name} : nofree_ptr_hash<{data}>");
    fmt.line("{");
    fmt.indent(|fmt| {
        fmt.line("typedef const char *compare_type;");
        fmt.empty_line();
        fmtln!(fmt, "static hashval_t hash ({data} *);");
        fmtln!(fmt, "static bool equal ({data} *, const char *);");
    });
    fmt.line("};");
    fmt.empty_line();
}

fn write_bif_decls(fmt: &mut Formatter, tables: &Tables, options: &Options) {
    let mut enumerators = vec!["RS6000_BIF_NONE".to_string()];
    enumerators.extend(tables.bifs.ids.iter().map(bif_enumerator));
    enumerators.push("RS6000_BIF_MAX".to_string());
    let enumerators = enumerators.iter().map(|e| e.as_str());
    fmt.enumeration("enum rs6000_gen_builtins", enumerators);

    let restrictions = ["RES_NONE", "RES_BITS", "RES_RANGE", "RES_VAR_RANGE", "RES_VALUES"];
    fmt.enumeration("enum restriction", restrictions);
    let kinds = ["FNK_NONE", "FNK_CONST", "FNK_PURE", "FNK_FPMATH"];
    fmt.enumeration("enum fn_kind", kinds);

    let enable = match options.stanza_mode {
        StanzaMode::Closed => {
            let tokens = KNOWN_STANZAS.iter().map(|(_, token)| *token);
            fmt.enumeration("enum bif_enable", tokens);
            "bif_enable enable;"
        }
        StanzaMode::FreeForm => "int enable;",
    };

    let n = options.max_restricted_operands;
    fmt.line("struct bifdata");
    fmt.line("{");
    fmt.indent(|fmt| {
        fmt.line("const char *bifname;");
        fmt.line(enable);
        fmt.line("fn_kind kind;");
        fmt.line("tree fntype;");
        fmt.line("insn_code icode;");
        fmt.line("int  nargs;");
        fmt.line("int  bifattrs;");
        fmtln!(fmt, "int  restr_opnd[{n}];");
        fmtln!(fmt, "restriction restr[{n}];");
        fmtln!(fmt, "int  restr_val1[{n}];");
        fmtln!(fmt, "int  restr_val2[{n}];");
    });
    fmt.line("};");
    fmt.empty_line();

    for attr in Attr::ALL {
        fmt.define(&attr.bit_name(), &format!("(0x{:08x})", attr.bit()));
    }
    fmt.empty_line();
    for attr in Attr::ALL {
        let test = format!("((x).bifattrs & {})", attr.bit_name());
        fmt.define(&format!("{}(x)", attr.predicate_name()), &test);
    }
    fmt.empty_line();

    fmt.line("extern bifdata rs6000_builtin_info[RS6000_BIF_MAX];");
    fmt.empty_line();
    write_hasher(fmt, "rs6000_bif_hasher", "bifdata");
    fmt.line("extern hash_table<rs6000_bif_hasher> bif_hash;");
    fmt.empty_line();
}

fn write_ovld_decls(fmt: &mut Formatter, tables: &Tables) {
    // The overload numbers continue after the builtin numbers so that both
    // can be told apart.
    let mut enumerators = vec!["RS6000_OVLD_NONE = RS6000_BIF_MAX + 1".to_string()];
    enumerators.extend(tables.ovlds.ids.iter().map(ovld_enumerator));
    enumerators.push("RS6000_OVLD_MAX".to_string());
    let enumerators = enumerators.iter().map(|e| e.as_str());
    fmt.enumeration("enum rs6000_gen_overloads", enumerators);

    fmt.line("struct ovlddata");
    fmt.line("{");
    fmt.indent(|fmt| {
        fmt.line("const char *bifname;");
        fmt.line("rs6000_gen_builtins bifid;");
        fmt.line("tree fntype;");
        fmt.line("ovlddata *next;");
    });
    fmt.line("};");
    fmt.empty_line();

    fmt.line("extern ovlddata rs6000_overload_info[RS6000_OVLD_MAX - RS6000_OVLD_NONE];");
    fmt.empty_line();
    write_hasher(fmt, "rs6000_ovld_hasher", "ovlddata");
    fmt.line("extern hash_table<rs6000_ovld_hasher> ovld_hash;");
    fmt.empty_line();
}

/// Write the declarations header.
///
/// Enumerators are in sorted identifier order and the function type
/// declarations in sorted signature order.
pub fn write_header<W: Write>(
    out: &mut W,
    tables: &Tables,
    options: &Options,
    provenance: &Provenance,
) -> Result<()> {
    let mut fmt = provenance.formatter();
    for include in INCLUDES {
        fmtln!(fmt, "#include \"{include}\"");
    }
    fmt.empty_line();

    write_bif_decls(&mut fmt, tables, options);
    write_ovld_decls(&mut fmt, tables);
    fmt.line("extern void rs6000_autoinit_builtins ();");
    fmt.empty_line();

    for fntype in tables.fntypes.iter() {
        fmtln!(fmt, "extern tree {fntype};");
    }
    fmt.write_to(out)?;
    Ok(())
}
