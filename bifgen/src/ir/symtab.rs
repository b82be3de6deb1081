use std::collections::BTreeSet;

/// An ordered set of unique identifiers.
///
/// Iteration is in byte-wise lexicographic order. The generated enumerations
/// are numbered in this order, so it has to be stable between runs.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    names: BTreeSet<String>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }
    /// Insert `name`, returning false if it was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if self.names.contains(name) {
            return false;
        }
        self.names.insert(name.to_string())
    }
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }
    pub fn len(&self) -> usize {
        self.names.len()
    }
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(|name| name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert() {
        let mut table = SymbolTable::new();
        assert!(table.insert("VSUBUBM"));
        assert!(table.insert("ABS_V16QI"));
        assert!(table.insert("ABS_V8HI"));
        assert!(!table.insert("ABS_V16QI"));
        assert!(table.contains("VSUBUBM"));
        assert!(!table.contains("VADDUBM"));
        assert_eq!(table.len(), 3);

        let names = table.iter().collect::<Vec<&str>>();
        assert_eq!(names, vec!["ABS_V16QI", "ABS_V8HI", "VSUBUBM"]);
        let again = table.iter().collect::<Vec<&str>>();
        assert_eq!(names, again);
    }

    #[test]
    fn test_order_is_bytewise() {
        let mut table = SymbolTable::new();
        table.insert("v_ftype_v");
        table.insert("V16QI");
        table.insert("_x");
        table.insert("v16qi_ftype_v16qi");
        let names = table.iter().collect::<Vec<&str>>();
        assert_eq!(names, vec!["V16QI", "_x", "v16qi_ftype_v16qi", "v_ftype_v"]);
    }
}
