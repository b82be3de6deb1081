use crate::ir::Prototype;
use crate::ir::SymbolTable;
use std::collections::HashMap;
use std::collections::HashSet;

/// All overloads that share one overloaded name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvldStanza {
    pub id: String,
    /// The name that users call, defined as a macro.
    pub extern_name: String,
    /// The overloaded name known to the back end.
    pub intern_name: String,
}

/// One instance of an overloaded function.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OvldEntry {
    /// Index into [OvldTable::stanzas].
    pub stanza: usize,
    pub proto: Prototype,
    /// Identifier of the builtin that implements this instance.
    pub id: String,
    pub fntype: String,
}

#[derive(Clone, Debug, Default)]
pub struct OvldTable {
    pub stanzas: Vec<OvldStanza>,
    pub entries: Vec<OvldEntry>,
    pub ids: SymbolTable,
}

/// Position of an overload entry in the chain of entries sharing its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChainLink {
    /// Whether this is the first entry (in file order) with this name.
    pub head: bool,
    /// Index of the next entry with the same name.
    pub next: Option<usize>,
}

impl OvldTable {
    pub fn stanza(&self, entry: &OvldEntry) -> &OvldStanza {
        &self.stanzas[entry.stanza]
    }
    pub fn has_stanza(&self, id: &str) -> bool {
        self.stanzas.iter().any(|stanza| stanza.id == id)
    }
    /// Link the entries that share a call name, in file order.
    ///
    /// The result has one link per entry. Following `next` from a head visits
    /// every entry with that name exactly once and ends in `None`.
    pub fn chains(&self) -> Vec<ChainLink> {
        let mut links = vec![
            ChainLink {
                head: false,
                next: None
            };
            self.entries.len()
        ];
        let mut later: HashMap<&str, usize> = HashMap::new();
        for (i, entry) in self.entries.iter().enumerate().rev() {
            links[i].next = later.insert(entry.proto.name.as_str(), i);
        }
        let mut seen: HashSet<&str> = HashSet::new();
        for (i, entry) in self.entries.iter().enumerate() {
            links[i].head = seen.insert(entry.proto.name.as_str());
        }
        links
    }
}
