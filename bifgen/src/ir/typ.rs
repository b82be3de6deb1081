use std::fmt::Display;
use std::fmt::Formatter;

/// Legal base types for an argument or return type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BaseType {
    Char,
    Short,
    Int,
    LongLong,
    Float,
    Double,
    Int128,
    Float128,
    Decimal32,
    Decimal64,
    Decimal128,
    Ibm128,
}

impl BaseType {
    /// Look up a single-token base type keyword.
    ///
    /// `long long` takes two tokens and is handled by the parser.
    pub fn from_keyword(keyword: &str) -> Option<BaseType> {
        let base = match keyword {
            "char" => BaseType::Char,
            "short" => BaseType::Short,
            "int" => BaseType::Int,
            "float" => BaseType::Float,
            "double" => BaseType::Double,
            "__int128" => BaseType::Int128,
            "_Float128" => BaseType::Float128,
            "_Decimal32" => BaseType::Decimal32,
            "_Decimal64" => BaseType::Decimal64,
            "_Decimal128" => BaseType::Decimal128,
            "__ibm128" => BaseType::Ibm128,
            _ => return None,
        };
        Some(base)
    }
    pub fn keyword(&self) -> &'static str {
        match self {
            BaseType::Char => "char",
            BaseType::Short => "short",
            BaseType::Int => "int",
            BaseType::LongLong => "long long",
            BaseType::Float => "float",
            BaseType::Double => "double",
            BaseType::Int128 => "__int128",
            BaseType::Float128 => "_Float128",
            BaseType::Decimal32 => "_Decimal32",
            BaseType::Decimal64 => "_Decimal64",
            BaseType::Decimal128 => "_Decimal128",
            BaseType::Ibm128 => "__ibm128",
        }
    }
    /// Machine mode suffix of a scalar of this type.
    pub fn scalar_mode(&self) -> &'static str {
        match self {
            BaseType::Char => "qi",
            BaseType::Short => "hi",
            BaseType::Int => "si",
            BaseType::LongLong => "di",
            BaseType::Float => "sf",
            BaseType::Double => "df",
            BaseType::Int128 => "ti",
            BaseType::Float128 => "tf",
            BaseType::Decimal32 => "sd",
            BaseType::Decimal64 => "dd",
            BaseType::Decimal128 => "td",
            BaseType::Ibm128 => "if",
        }
    }
    /// Machine mode suffix (without the leading `v`) of a 128-bit vector with
    /// elements of this type.
    pub fn vector_mode(&self) -> Option<&'static str> {
        let mode = match self {
            BaseType::Char => "16qi",
            BaseType::Short => "8hi",
            BaseType::Int => "4si",
            BaseType::LongLong => "2di",
            BaseType::Float => "4sf",
            BaseType::Double => "2df",
            BaseType::Int128 => "1ti",
            BaseType::Float128 => "1tf",
            _ => return None,
        };
        Some(mode)
    }
}

/// Ways in which a const int argument can be restricted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Restriction {
    /// `<x>`: an unsigned value of at most x bits.
    Bits(i32),
    /// `<x,y>`: a constant in the inclusive range [x,y].
    Range(i32, i32),
    /// `[x,y]`: like `Range`, but the argument may be variable, in which case
    /// nothing is checked.
    VarRange(i32, i32),
    /// `{x,y}`: either x or y.
    Values(i32, i32),
}

impl Restriction {
    /// Name of the matching enumerator in the generated header.
    pub fn enumerator(&self) -> &'static str {
        match self {
            Restriction::Bits(_) => "RES_BITS",
            Restriction::Range(..) => "RES_RANGE",
            Restriction::VarRange(..) => "RES_VAR_RANGE",
            Restriction::Values(..) => "RES_VALUES",
        }
    }
    pub fn val1(&self) -> i32 {
        match self {
            Restriction::Bits(x) => *x,
            Restriction::Range(x, _) | Restriction::VarRange(x, _) | Restriction::Values(x, _) => *x,
        }
    }
    pub fn val2(&self) -> Option<i32> {
        match self {
            Restriction::Bits(_) => None,
            Restriction::Range(_, y) | Restriction::VarRange(_, y) | Restriction::Values(_, y) => {
                Some(*y)
            }
        }
    }
}

impl Display for Restriction {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Restriction::Bits(x) => write!(f, "<{x}>"),
            Restriction::Range(x, y) => write!(f, "<{x},{y}>"),
            Restriction::VarRange(x, y) => write!(f, "[{x},{y}]"),
            Restriction::Values(x, y) => write!(f, "{{{x},{y}}}"),
        }
    }
}

/// Description of one argument or return type.
///
/// At most one of `base` (scalar or vector element), `is_opaque` and
/// `is_void` describes the type itself; the other flags are modifiers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TypeInfo {
    pub is_void: bool,
    pub is_const: bool,
    pub is_vector: bool,
    pub is_signed: bool,
    pub is_unsigned: bool,
    pub is_bool: bool,
    pub is_pixel: bool,
    pub is_pointer: bool,
    pub is_opaque: bool,
    pub base: Option<BaseType>,
    pub restriction: Option<Restriction>,
}

impl TypeInfo {
    pub fn void() -> Self {
        Self {
            is_void: true,
            ..Default::default()
        }
    }
    pub fn opaque() -> Self {
        Self {
            is_opaque: true,
            ..Default::default()
        }
    }
    pub fn scalar(base: BaseType) -> Self {
        Self {
            base: Some(base),
            ..Default::default()
        }
    }
    pub fn vector(base: BaseType) -> Self {
        Self {
            is_vector: true,
            base: Some(base),
            ..Default::default()
        }
    }
    /// The shorthand token used in the definition files for a vector type.
    pub fn vector_shorthand(&self) -> Option<&'static str> {
        if self.is_opaque {
            return Some("vop");
        }
        if !self.is_vector {
            return None;
        }
        if self.is_pixel {
            return Some("vp");
        }
        let shorthand = match (self.base?, self.is_signed, self.is_unsigned, self.is_bool) {
            (BaseType::Char, true, _, _) => "vsc",
            (BaseType::Char, _, true, _) => "vuc",
            (BaseType::Char, _, _, true) => "vbc",
            (BaseType::Short, true, _, _) => "vss",
            (BaseType::Short, _, true, _) => "vus",
            (BaseType::Short, _, _, true) => "vbs",
            (BaseType::Int, true, _, _) => "vsi",
            (BaseType::Int, _, true, _) => "vui",
            (BaseType::Int, _, _, true) => "vbi",
            (BaseType::LongLong, true, _, _) => "vsll",
            (BaseType::LongLong, _, true, _) => "vull",
            (BaseType::LongLong, _, _, true) => "vbll",
            (BaseType::Int128, true, _, _) => "vsq",
            (BaseType::Int128, _, true, _) => "vuq",
            (BaseType::Int128, _, _, true) => "vbq",
            (BaseType::Float, _, _, _) => "vf",
            (BaseType::Double, _, _, _) => "vd",
            _ => return None,
        };
        Some(shorthand)
    }
}

impl Display for TypeInfo {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_const {
            write!(f, "const ")?;
        }
        if self.is_void {
            write!(f, "void")?;
        } else if let Some(shorthand) = self.vector_shorthand() {
            write!(f, "{shorthand}")?;
        } else {
            if self.is_signed {
                write!(f, "signed ")?;
            }
            if self.is_unsigned {
                write!(f, "unsigned ")?;
            }
            match self.base {
                Some(base) => write!(f, "{}", base.keyword())?,
                None => write!(f, "<none>")?,
            }
        }
        if let Some(restriction) = &self.restriction {
            write!(f, "{restriction}")?;
        }
        if self.is_pointer {
            write!(f, " *")?;
        }
        Ok(())
    }
}
