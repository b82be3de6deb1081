use crate::diag::DiagKind;
use crate::frontend::parse_type;
use crate::frontend::Scanner;
use crate::frontend::VoidStatus;
use crate::ir::Attr;
use crate::ir::Attrs;
use crate::ir::Prototype;
use crate::ir::RestrictedOperand;
use crate::ir::TypeInfo;
use anyhow::Result;
use std::io::BufRead;
use tracing::debug;

/// Parse `<return-type> <name> (<args>);` up to the end of the line.
///
/// This is shared by both definition files. At most `max_restricted`
/// arguments may carry a restriction.
pub fn parse_prototype<R: BufRead>(sc: &mut Scanner<R>, max_restricted: usize) -> Result<Prototype> {
    sc.consume_whitespace();
    let column = sc.column();
    let ret = match parse_type(sc, VoidStatus::Ok)? {
        Some(ret) => ret,
        None => {
            let msg = "missing or badly formed return type";
            return Err(sc.error_at(column, DiagKind::Syntax, msg));
        }
    };
    if ret.is_pointer && !ret.is_void {
        let msg = "pointer return type must be 'void *'";
        return Err(sc.error_at(column, DiagKind::Syntax, msg));
    }

    sc.consume_whitespace();
    let name = match sc.match_identifier() {
        Some(name) => name,
        None => return Err(sc.error(DiagKind::Syntax, "missing function name")),
    };

    let mut proto = Prototype {
        ret,
        name,
        args: vec![],
        restricted: vec![],
    };
    parse_args(sc, &mut proto, max_restricted)?;

    sc.consume_whitespace();
    if !sc.eat(';') {
        return Err(sc.error(DiagKind::Syntax, "missing semicolon"));
    }
    sc.consume_whitespace();
    if !sc.at_eol() {
        return Err(sc.error(DiagKind::Syntax, "garbage at end of line"));
    }
    Ok(proto)
}

fn register_restriction<R: BufRead>(
    sc: &Scanner<R>,
    proto: &mut Prototype,
    arg: &TypeInfo,
    max_restricted: usize,
) -> Result<()> {
    let restriction = match arg.restriction {
        Some(restriction) => restriction,
        None => return Ok(()),
    };
    if proto.restricted.len() >= max_restricted {
        let msg = format!("more than {max_restricted} restricted operands");
        return Err(sc.error_on_line(DiagKind::Limit, &msg));
    }
    let operand = proto.args.len() + 1;
    debug!("operand {operand} of {} restricted to {restriction}", proto.name);
    proto.restricted.push(RestrictedOperand {
        operand,
        restriction,
    });
    Ok(())
}

fn parse_args<R: BufRead>(
    sc: &mut Scanner<R>,
    proto: &mut Prototype,
    max_restricted: usize,
) -> Result<()> {
    sc.consume_whitespace();
    if !sc.eat('(') {
        return Err(sc.error(DiagKind::Syntax, "missing '('"));
    }
    let mut after_comma = false;
    loop {
        sc.consume_whitespace();
        let start = sc.pos();
        match parse_type(sc, VoidStatus::NotOk)? {
            Some(arg) => {
                register_restriction(sc, proto, &arg, max_restricted)?;
                proto.args.push(arg);
                sc.consume_whitespace();
                after_comma = sc.eat(',');
                if !after_comma && sc.peek() != Some(')') {
                    let msg = "arg not followed by ',' or ')'";
                    return Err(sc.error(DiagKind::Syntax, msg));
                }
            }
            None => {
                sc.set_pos(start);
                if after_comma || !sc.eat(')') {
                    let msg = "badly terminated arg list";
                    return Err(sc.error(DiagKind::Syntax, msg));
                }
                return Ok(());
            }
        }
    }
}

/// Parse a brace-delimited, comma-separated set of attribute keywords.
pub fn parse_bif_attrs<R: BufRead>(sc: &mut Scanner<R>) -> Result<Attrs> {
    sc.consume_whitespace();
    if !sc.eat('{') {
        return Err(sc.error(DiagKind::Syntax, "missing attribute set"));
    }
    let mut attrs = Attrs::default();
    let mut after_comma = false;
    loop {
        sc.consume_whitespace();
        let column = sc.column();
        match sc.match_identifier() {
            Some(keyword) => {
                match Attr::from_keyword(&keyword) {
                    Some(attr) => attrs.insert(attr),
                    None => {
                        let msg = "unknown attribute";
                        return Err(sc.error_at(column, DiagKind::UnknownName, msg));
                    }
                }
                sc.consume_whitespace();
                after_comma = sc.eat(',');
                if !after_comma && sc.peek() != Some('}') {
                    let msg = "attr not followed by ',' or '}'";
                    return Err(sc.error(DiagKind::Syntax, msg));
                }
            }
            None => {
                if after_comma || !sc.eat('}') {
                    let msg = "badly terminated attr set";
                    return Err(sc.error(DiagKind::Syntax, msg));
                }
                return Ok(attrs);
            }
        }
    }
}
