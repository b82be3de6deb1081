use crate::ir::Restriction;
use crate::ir::TypeInfo;
use std::fmt::Display;
use std::fmt::Formatter;

/// A restricted argument of a prototype.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RestrictedOperand {
    /// 1-based index of the argument.
    pub operand: usize,
    pub restriction: Restriction,
}

/// A function prototype, shared by builtins and overloads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Prototype {
    pub ret: TypeInfo,
    pub name: String,
    pub args: Vec<TypeInfo>,
    pub restricted: Vec<RestrictedOperand>,
}

impl Prototype {
    pub fn nargs(&self) -> usize {
        self.args.len()
    }
}

impl Display for Prototype {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let args = self
            .args
            .iter()
            .map(|arg| arg.to_string())
            .collect::<Vec<String>>()
            .join(", ");
        write!(f, "{} {} ({});", self.ret, self.name, args)
    }
}
