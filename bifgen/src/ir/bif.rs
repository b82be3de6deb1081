use crate::ir::Prototype;
use crate::ir::SymbolTable;
use std::fmt::Display;
use std::fmt::Formatter;

/// Function modifiers for const, pure and fpmath builtins.
///
/// These are mutually exclusive and therefore kept apart from [Attrs].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FnKind {
    #[default]
    None,
    Const,
    Pure,
    Fpmath,
}

impl FnKind {
    pub fn from_keyword(keyword: &str) -> Option<FnKind> {
        match keyword {
            "const" => Some(FnKind::Const),
            "pure" => Some(FnKind::Pure),
            "fpmath" => Some(FnKind::Fpmath),
            _ => None,
        }
    }
    pub fn enumerator(&self) -> &'static str {
        match self {
            FnKind::None => "FNK_NONE",
            FnKind::Const => "FNK_CONST",
            FnKind::Pure => "FNK_PURE",
            FnKind::Fpmath => "FNK_FPMATH",
        }
    }
}

/// A special condition that applies to a builtin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Attr {
    /// Process as a vec_init function.
    Init,
    /// Process as a vec_set function.
    Set,
    /// Process as a vec_extract function.
    Extract,
    /// Not valid with -msoft-float.
    Nosoft,
    /// Needs special handling for vec_ld semantics.
    Ldvec,
    /// Needs special handling for vec_st semantics.
    Stvec,
    /// Needs special handling for element reversal.
    Reve,
    /// Needs special handling for comparison predicates.
    Pred,
    /// Needs special handling for transactional memory.
    Htm,
    /// HTM function using an SPR.
    Htmspr,
    /// HTM function using a CR.
    Htmcr,
    /// Needs special handling for MMA instructions.
    Mma,
    /// Not valid for 32-bit targets.
    No32bit,
    /// A `cpu_is` or `cpu_supports` builtin.
    Cpu,
    /// Altivec mask for load or store.
    Ldstmask,
}

impl Attr {
    /// All attributes in bit order.
    pub const ALL: [Attr; 15] = [
        Attr::Init,
        Attr::Set,
        Attr::Extract,
        Attr::Nosoft,
        Attr::Ldvec,
        Attr::Stvec,
        Attr::Reve,
        Attr::Pred,
        Attr::Htm,
        Attr::Htmspr,
        Attr::Htmcr,
        Attr::Mma,
        Attr::No32bit,
        Attr::Cpu,
        Attr::Ldstmask,
    ];
    pub fn keyword(&self) -> &'static str {
        match self {
            Attr::Init => "init",
            Attr::Set => "set",
            Attr::Extract => "extract",
            Attr::Nosoft => "nosoft",
            Attr::Ldvec => "ldvec",
            Attr::Stvec => "stvec",
            Attr::Reve => "reve",
            Attr::Pred => "pred",
            Attr::Htm => "htm",
            Attr::Htmspr => "htmspr",
            Attr::Htmcr => "htmcr",
            Attr::Mma => "mma",
            Attr::No32bit => "no32bit",
            Attr::Cpu => "cpu",
            Attr::Ldstmask => "ldstmask",
        }
    }
    pub fn from_keyword(keyword: &str) -> Option<Attr> {
        Attr::ALL.into_iter().find(|attr| attr.keyword() == keyword)
    }
    pub fn bit(&self) -> u32 {
        1 << (*self as u32)
    }
    /// Name of the `#define` holding the bit, e.g. `bif_init_bit`.
    pub fn bit_name(&self) -> String {
        format!("bif_{}_bit", self.keyword())
    }
    /// Name of the test macro, e.g. `bif_is_init`.
    pub fn predicate_name(&self) -> String {
        match self {
            Attr::Pred => "bif_is_predicate".to_string(),
            _ => format!("bif_is_{}", self.keyword()),
        }
    }
}

/// The set of attributes of one builtin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Attrs {
    bits: u32,
}

impl Attrs {
    pub fn insert(&mut self, attr: Attr) {
        self.bits |= attr.bit();
    }
    pub fn contains(&self, attr: Attr) -> bool {
        self.bits & attr.bit() != 0
    }
    pub fn bits(&self) -> u32 {
        self.bits
    }
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
    pub fn iter(&self) -> impl Iterator<Item = Attr> {
        let attrs = *self;
        Attr::ALL.into_iter().filter(move |attr| attrs.contains(*attr))
    }
}

impl Display for Attrs {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let attrs = self
            .iter()
            .map(|attr| attr.keyword())
            .collect::<Vec<&str>>()
            .join(", ");
        write!(f, "{{{attrs}}}")
    }
}

/// The stanza names known in closed stanza mode and their enable tokens.
pub const KNOWN_STANZAS: [(&str, &str); 18] = [
    ("always", "ENB_ALWAYS"),
    ("power5", "ENB_P5"),
    ("power6", "ENB_P6"),
    ("altivec", "ENB_ALTIVEC"),
    ("vsx", "ENB_VSX"),
    ("power7", "ENB_P7"),
    ("power7-64", "ENB_P7_64"),
    ("power8", "ENB_P8"),
    ("power8-vector", "ENB_P8V"),
    ("power9", "ENB_P9"),
    ("power9-64", "ENB_P9_64"),
    ("power9-vector", "ENB_P9V"),
    ("ieee128-hw", "ENB_IEEE128_HW"),
    ("dfp", "ENB_DFP"),
    ("crypto", "ENB_CRYPTO"),
    ("htm", "ENB_HTM"),
    ("power10", "ENB_P10"),
    ("mma", "ENB_MMA"),
];

pub fn enable_token(stanza_name: &str) -> Option<&'static str> {
    KNOWN_STANZAS
        .iter()
        .find(|(name, _)| *name == stanza_name)
        .map(|(_, token)| *token)
}

/// The gating condition shared by a group of builtins.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BifStanza {
    /// The text between the brackets of the stanza header.
    pub name: String,
    /// The `ENB_*` token in closed mode or the condition text in free-form
    /// mode.
    pub enable: String,
}

/// One builtin function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BifEntry {
    /// Index into [BifTable::stanzas].
    pub stanza: usize,
    pub kind: FnKind,
    pub proto: Prototype,
    pub id: String,
    pub pattern: String,
    pub attrs: Attrs,
    pub fntype: String,
}

/// All builtins, in file order, plus their identifiers in sorted order.
#[derive(Clone, Debug, Default)]
pub struct BifTable {
    pub stanzas: Vec<BifStanza>,
    pub entries: Vec<BifEntry>,
    pub ids: SymbolTable,
}

impl BifTable {
    pub fn stanza(&self, entry: &BifEntry) -> &BifStanza {
        &self.stanzas[entry.stanza]
    }
    /// Return the index of the stanza named `name`, registering it if needed.
    pub fn register_stanza(&mut self, name: &str, enable: &str) -> usize {
        match self.stanzas.iter().position(|stanza| stanza.name == name) {
            Some(index) => index,
            None => {
                self.stanzas.push(BifStanza {
                    name: name.to_string(),
                    enable: enable.to_string(),
                });
                self.stanzas.len() - 1
            }
        }
    }
    /// Linear lookup by identifier, for tests.
    #[cfg(any(test, feature = "test-utils"))]
    pub fn find(&self, id: &str) -> Option<&BifEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }
}
