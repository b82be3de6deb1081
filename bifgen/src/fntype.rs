//! Function type signature identifiers.
//!
//! Every prototype maps to a short identifier such as `v16qi_ftype_v16qi_si`
//! that names the function type in the generated code. Prototypes with the
//! same return and argument modes share an identifier.

use crate::diag::InternalError;
use crate::ir::Prototype;
use crate::ir::TypeInfo;
use anyhow::Result;

fn internal(msg: &str) -> anyhow::Error {
    anyhow::Error::new(InternalError::new(msg))
}

/// Append the vector mode, e.g. `v4si`, `bv16qi` or `vp8hi`.
fn push_vector_mode(typ: &TypeInfo, id: &mut String) -> Result<()> {
    if typ.is_bool {
        id.push('b');
    }
    id.push('v');
    if typ.is_pixel {
        id.push_str("p8hi");
        return Ok(());
    }
    let base = typ
        .base
        .ok_or_else(|| internal("vector type without a base type"))?;
    match base.vector_mode() {
        Some(mode) => id.push_str(mode),
        None => {
            let msg = format!("unhandled vector base type '{}'", base.keyword());
            return Err(internal(&msg));
        }
    }
    Ok(())
}

/// Append the mode of a non-void, non-pointer type.
fn push_mode(typ: &TypeInfo, id: &mut String) -> Result<()> {
    if typ.is_opaque {
        id.push_str("opaque");
        return Ok(());
    }
    if typ.is_unsigned {
        id.push('u');
    }
    if typ.is_vector {
        return push_vector_mode(typ, id);
    }
    match typ.base {
        Some(base) => id.push_str(base.scalar_mode()),
        None => return Err(internal(&format!("type '{typ}' has no mode"))),
    }
    Ok(())
}

/// Upper bound on the length of an identifier for `nargs` arguments.
///
/// Each mode takes at most 6 characters, plus an optional `u` and a
/// separating underscore.
fn max_len(nargs: usize) -> usize {
    if nargs == 0 {
        16
    } else {
        (nargs + 1) * 8 + 6
    }
}

/// Build the type signature identifier of `proto`.
///
/// Failures are [InternalError]s since the parser only produces types that
/// have a mode.
pub fn fntype_id(proto: &Prototype) -> Result<String> {
    let mut id = String::new();
    let ret = &proto.ret;
    if ret.is_pointer {
        if !ret.is_void {
            return Err(internal("pointer return type that is not 'void *'"));
        }
        id.push('p');
    }
    if ret.is_void {
        id.push('v');
    } else {
        push_mode(ret, &mut id)?;
    }

    id.push_str("_ftype");

    if proto.args.is_empty() {
        id.push_str("_v");
    }
    for arg in &proto.args {
        id.push('_');
        if arg.is_pointer {
            id.push_str("pv");
        } else {
            push_mode(arg, &mut id)?;
        }
    }

    // The bound includes room for a terminator, hence `>=`.
    if id.len() >= max_len(proto.nargs()) {
        return Err(internal(&format!("type signature '{id}' is too long")));
    }
    Ok(id)
}
