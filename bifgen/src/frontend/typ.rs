use crate::diag::DiagKind;
use crate::frontend::Scanner;
use crate::ir::BaseType;
use crate::ir::Restriction;
use crate::ir::TypeInfo;
use anyhow::Result;
use std::io::BufRead;

/// Whether `void` without a pointer suffix is a legal type at this position.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VoidStatus {
    NotOk,
    Ok,
}

#[derive(Clone, Copy)]
enum Element {
    Signed,
    Unsigned,
    Bool,
    Pixel,
    Plain,
}

/// Look up one of the vector shorthand tokens such as `vsc` or `vd`.
fn vector_type(token: &str) -> Option<TypeInfo> {
    let (base, element) = match token {
        "vsc" => (BaseType::Char, Element::Signed),
        "vuc" => (BaseType::Char, Element::Unsigned),
        "vbc" => (BaseType::Char, Element::Bool),
        "vss" => (BaseType::Short, Element::Signed),
        "vus" => (BaseType::Short, Element::Unsigned),
        "vbs" => (BaseType::Short, Element::Bool),
        "vsi" => (BaseType::Int, Element::Signed),
        "vui" => (BaseType::Int, Element::Unsigned),
        "vbi" => (BaseType::Int, Element::Bool),
        "vsll" => (BaseType::LongLong, Element::Signed),
        "vull" => (BaseType::LongLong, Element::Unsigned),
        "vbll" => (BaseType::LongLong, Element::Bool),
        "vsq" => (BaseType::Int128, Element::Signed),
        "vuq" => (BaseType::Int128, Element::Unsigned),
        "vbq" => (BaseType::Int128, Element::Bool),
        "vp" => (BaseType::Short, Element::Pixel),
        "vf" => (BaseType::Float, Element::Plain),
        "vd" => (BaseType::Double, Element::Plain),
        _ => return None,
    };
    let mut typ = TypeInfo::vector(base);
    match element {
        Element::Signed => typ.is_signed = true,
        Element::Unsigned => typ.is_unsigned = true,
        Element::Bool => typ.is_bool = true,
        Element::Pixel => typ.is_pixel = true,
        Element::Plain => (),
    }
    Some(typ)
}

fn handle_pointer<R: BufRead>(sc: &mut Scanner<R>, typ: &mut TypeInfo) {
    sc.consume_whitespace();
    if sc.eat('*') {
        typ.is_pointer = true;
    }
}

/// Parse a type at the cursor.
///
/// Returns `Ok(None)` without consuming anything when there is no type at the
/// cursor, so that callers can check for the token that ends a list. Errors
/// are returned for input that starts like a type but is malformed.
///
/// ```text
/// type := "void" ["*"]
///       | "const" ["signed" | "unsigned"] "int" [restriction]
///       | vector-shorthand ["*"]
///       | ["signed" | "unsigned"] base-type ["*"]
/// ```
pub fn parse_type<R: BufRead>(sc: &mut Scanner<R>, void: VoidStatus) -> Result<Option<TypeInfo>> {
    sc.consume_whitespace();
    let start = sc.pos();
    let token = match sc.match_identifier() {
        Some(token) => token,
        None => return Ok(None),
    };
    let typ = match token.as_str() {
        "void" => {
            let mut typ = TypeInfo::void();
            handle_pointer(sc, &mut typ);
            if !typ.is_pointer && void == VoidStatus::NotOk {
                sc.set_pos(start);
                return Ok(None);
            }
            typ
        }
        "const" => parse_const_int(sc)?,
        "vop" => {
            let mut typ = TypeInfo::opaque();
            handle_pointer(sc, &mut typ);
            typ
        }
        "signed" | "unsigned" => {
            let mut typ = parse_base_type(sc)?;
            if token == "signed" {
                typ.is_signed = true;
            } else {
                typ.is_unsigned = true;
            }
            typ
        }
        _ => match vector_type(&token) {
            Some(mut typ) => {
                handle_pointer(sc, &mut typ);
                typ
            }
            None => {
                sc.set_pos(start);
                parse_base_type(sc)?
            }
        },
    };
    Ok(Some(typ))
}

/// Parse a scalar base type such as `int` or `long long`, followed by an
/// optional pointer suffix.
fn parse_base_type<R: BufRead>(sc: &mut Scanner<R>) -> Result<TypeInfo> {
    sc.consume_whitespace();
    let column = sc.column();
    let token = match sc.match_identifier() {
        Some(token) => token,
        None => return Err(sc.error(DiagKind::Syntax, "missing base type")),
    };
    let base = if token == "long" {
        sc.consume_whitespace();
        match sc.match_identifier() {
            Some(second) if second == "long" => BaseType::LongLong,
            _ => return Err(sc.error_at(column, DiagKind::Syntax, "incomplete 'long long'")),
        }
    } else {
        match BaseType::from_keyword(&token) {
            Some(base) => base,
            None => {
                let msg = "unrecognized base type";
                return Err(sc.error_at(column, DiagKind::UnknownName, msg));
            }
        }
    };
    let mut typ = TypeInfo::scalar(base);
    handle_pointer(sc, &mut typ);
    Ok(typ)
}

/// Parse what follows a leading `const`: an int with an optional restriction.
fn parse_const_int<R: BufRead>(sc: &mut Scanner<R>) -> Result<TypeInfo> {
    let mut typ = TypeInfo::scalar(BaseType::Int);
    typ.is_const = true;
    sc.consume_whitespace();
    let column = sc.column();
    let token = sc.match_identifier();
    match token.as_deref() {
        Some("int") => (),
        Some(sign @ ("signed" | "unsigned")) => {
            if sign == "signed" {
                typ.is_signed = true;
            } else {
                typ.is_unsigned = true;
            }
            sc.consume_whitespace();
            let column = sc.column();
            if sc.match_identifier().as_deref() != Some("int") {
                let msg = format!("'{sign}' not followed by 'int'");
                return Err(sc.error_at(column, DiagKind::Syntax, &msg));
            }
        }
        _ => {
            let msg = "'const' not followed by 'int'";
            return Err(sc.error_at(column, DiagKind::Syntax, msg));
        }
    }
    sc.consume_whitespace();
    if matches!(sc.peek(), Some('<' | '{' | '[')) {
        typ.restriction = Some(parse_restriction(sc)?);
    }
    Ok(typ)
}

fn parse_restriction_integer<R: BufRead>(sc: &mut Scanner<R>) -> Result<i32> {
    sc.consume_whitespace();
    match sc.match_integer() {
        Some(value) => Ok(value),
        None => Err(sc.error(DiagKind::Syntax, "malformed integer")),
    }
}

fn expect_restriction_end<R: BufRead>(sc: &mut Scanner<R>, end: char) -> Result<()> {
    sc.consume_whitespace();
    if !sc.eat(end) {
        return Err(sc.error(DiagKind::Syntax, "malformed restriction"));
    }
    Ok(())
}

/// Parse one of `<x>`, `<x,y>`, `[x,y]` or `{x,y}`.
fn parse_restriction<R: BufRead>(sc: &mut Scanner<R>) -> Result<Restriction> {
    let open = match sc.peek() {
        Some(c) => c,
        None => return Err(sc.error(DiagKind::Syntax, "malformed restriction")),
    };
    sc.bump();
    let x = parse_restriction_integer(sc)?;
    sc.consume_whitespace();
    if open == '<' {
        if sc.eat('>') {
            return Ok(Restriction::Bits(x));
        }
        if !sc.eat(',') {
            return Err(sc.error(DiagKind::Syntax, "malformed restriction"));
        }
        let y = parse_restriction_integer(sc)?;
        expect_restriction_end(sc, '>')?;
        return Ok(Restriction::Range(x, y));
    }
    if !sc.eat(',') {
        return Err(sc.error(DiagKind::Syntax, "missing comma"));
    }
    let y = parse_restriction_integer(sc)?;
    match open {
        '{' => {
            expect_restriction_end(sc, '}')?;
            Ok(Restriction::Values(x, y))
        }
        '[' => {
            expect_restriction_end(sc, ']')?;
            Ok(Restriction::VarRange(x, y))
        }
        _ => Err(sc.error(DiagKind::Syntax, "malformed restriction")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diag::Diagnostic;
    use std::io::Cursor;

    fn parse(src: &str, void: VoidStatus) -> (Result<Option<TypeInfo>>, usize) {
        let mut sc = Scanner::new(Cursor::new(src.to_string()), "test.def");
        assert!(sc.advance_line().unwrap());
        let typ = parse_type(&mut sc, void);
        (typ, sc.pos())
    }

    fn parse_ok(src: &str) -> TypeInfo {
        parse(src, VoidStatus::Ok).0.unwrap().unwrap()
    }

    fn parse_err(src: &str) -> Diagnostic {
        let err = parse(src, VoidStatus::Ok).0.unwrap_err();
        err.downcast::<Diagnostic>().unwrap()
    }

    #[test]
    fn test_vector_shorthands() {
        let typ = parse_ok("vbll");
        assert!(typ.is_vector && typ.is_bool);
        assert_eq!(typ.base, Some(BaseType::LongLong));

        let typ = parse_ok("vp");
        assert!(typ.is_pixel);
        assert_eq!(typ.base, Some(BaseType::Short));

        let typ = parse_ok("vuc *");
        assert!(typ.is_unsigned && typ.is_pointer);

        let typ = parse_ok("vop");
        assert!(typ.is_opaque);
        assert_eq!(typ.to_string(), "vop");
    }

    #[test]
    fn test_scalars() {
        assert_eq!(parse_ok("long long").base, Some(BaseType::LongLong));
        assert_eq!(parse_ok("_Decimal128").base, Some(BaseType::Decimal128));

        let typ = parse_ok("unsigned short *");
        assert!(typ.is_unsigned && typ.is_pointer);
        assert_eq!(typ.base, Some(BaseType::Short));

        let typ = parse_ok("signed char");
        assert_eq!(typ.to_string(), "signed char");
    }

    #[test]
    fn test_void() {
        let typ = parse_ok("void");
        assert!(typ.is_void && !typ.is_pointer);

        let (typ, pos) = parse("void)", VoidStatus::NotOk);
        assert_eq!(typ.unwrap(), None);
        assert_eq!(pos, 0);

        let (typ, _) = parse("void *", VoidStatus::NotOk);
        let typ = typ.unwrap().unwrap();
        assert!(typ.is_void && typ.is_pointer);
    }

    #[test]
    fn test_no_type() {
        let (typ, pos) = parse("  )", VoidStatus::NotOk);
        assert_eq!(typ.unwrap(), None);
        assert_eq!(pos, 2);
    }

    #[test]
    fn test_restrictions() {
        let typ = parse_ok("const int<5>");
        assert_eq!(typ.restriction, Some(Restriction::Bits(5)));

        let typ = parse_ok("const int <-16, 15>");
        assert_eq!(typ.restriction, Some(Restriction::Range(-16, 15)));

        let typ = parse_ok("const unsigned int[0,7]");
        assert!(typ.is_unsigned);
        assert_eq!(typ.restriction, Some(Restriction::VarRange(0, 7)));

        let typ = parse_ok("const int {2, 4}");
        assert_eq!(typ.restriction, Some(Restriction::Values(2, 4)));

        let typ = parse_ok("const int");
        assert!(typ.is_const);
        assert_eq!(typ.restriction, None);
    }

    #[test]
    fn test_errors() {
        let diag = parse_err("long int");
        assert_eq!(diag.msg, "incomplete 'long long'");
        assert_eq!(diag.column(), Some(1));

        let diag = parse_err("unsigned bogus");
        assert_eq!(diag.msg, "unrecognized base type");
        assert_eq!(diag.kind, DiagKind::UnknownName);
        assert_eq!(diag.column(), Some(10));

        let diag = parse_err("const char");
        assert_eq!(diag.msg, "'const' not followed by 'int'");
        assert_eq!(diag.column(), Some(7));

        let diag = parse_err("const signed short");
        assert_eq!(diag.msg, "'signed' not followed by 'int'");

        let diag = parse_err("const int<x>");
        assert_eq!(diag.msg, "malformed integer");
        assert_eq!(diag.column(), Some(11));

        let diag = parse_err("const int{1 2}");
        assert_eq!(diag.msg, "missing comma");

        let diag = parse_err("const int<1,2]");
        assert_eq!(diag.msg, "malformed restriction");
        assert_eq!(diag.column(), Some(14));
    }
}
