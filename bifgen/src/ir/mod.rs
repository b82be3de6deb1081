//! Tables built while reading the definition files.

mod bif;
mod ovld;
mod prototype;
mod symtab;
mod typ;

pub use bif::enable_token;
pub use bif::Attr;
pub use bif::Attrs;
pub use bif::BifEntry;
pub use bif::BifStanza;
pub use bif::BifTable;
pub use bif::FnKind;
pub use bif::KNOWN_STANZAS;
pub use ovld::ChainLink;
pub use ovld::OvldEntry;
pub use ovld::OvldStanza;
pub use ovld::OvldTable;
pub use prototype::Prototype;
pub use prototype::RestrictedOperand;
pub use symtab::SymbolTable;
pub use typ::BaseType;
pub use typ::Restriction;
pub use typ::TypeInfo;

/// Everything the emitters need.
///
/// The builtin table has to be complete before the overload file is read,
/// since every overload refers to a builtin identifier.
#[derive(Clone, Debug, Default)]
pub struct Tables {
    pub bifs: BifTable,
    pub ovlds: OvldTable,
    /// Distinct function type identifiers of both files.
    pub fntypes: SymbolTable,
}

impl Tables {
    pub fn new() -> Self {
        Self::default()
    }
}
