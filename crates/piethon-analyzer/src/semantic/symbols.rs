use indexmap::IndexMap;
use piethon_common::{Span, Type};

use super::scope::ParamEntry;

/// A registered procedure: its signature and where it was defined.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcedureEntry {
    pub name: String,
    /// Every declared parameter, duplicates included, in declaration order.
    pub params: Vec<ParamEntry>,
    pub return_type: Type,
    pub loc: Span,
}

impl ProcedureEntry {
    pub fn arity(&self) -> usize {
        self.params.len()
    }
}

/// Global table of procedures for one script.
///
/// Keys are unique. The first definition of a name wins; later ones are
/// rejected, never overwritten. Iteration follows registration order.
#[derive(Debug, Default)]
pub struct ProcedureTable {
    entries: IndexMap<String, ProcedureEntry>,
}

impl ProcedureTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a procedure. On a name clash the rejected entry is handed back.
    pub fn register(&mut self, entry: ProcedureEntry) -> Result<(), ProcedureEntry> {
        if self.entries.contains_key(&entry.name) {
            return Err(entry);
        }
        self.entries.insert(entry.name.clone(), entry);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&ProcedureEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcedureEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str, return_type: Type) -> ProcedureEntry {
        ProcedureEntry {
            name: name.to_string(),
            params: Vec::new(),
            return_type,
            loc: Span::dummy(),
        }
    }

    #[test]
    fn first_definition_wins() {
        let mut table = ProcedureTable::new();
        assert!(table.register(entry("foo", Type::Int32)).is_ok());
        let rejected = table.register(entry("foo", Type::Bool)).unwrap_err();
        assert_eq!(rejected.return_type, Type::Bool);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get("foo").unwrap().return_type, Type::Int32);
    }

    #[test]
    fn iterates_in_registration_order() {
        let mut table = ProcedureTable::new();
        for name in ["c", "a", "b"] {
            table.register(entry(name, Type::Void)).unwrap();
        }
        let names: Vec<_> = table.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["c", "a", "b"]);
    }
}
