use std::collections::HashMap;

use piethon_common::{Span, SymbolKind, Type};

/// A formal parameter, as seen from inside its procedure and from call sites.
#[derive(Debug, Clone, PartialEq)]
pub struct ParamEntry {
    pub name: String,
    pub ty: Type,
    pub loc: Span,
}

/// A local variable declared with `var`.
#[derive(Debug, Clone, PartialEq)]
pub struct VarEntry {
    pub name: String,
    pub ty: Type,
    pub loc: Span,
    /// Whether the declaration had an initializer or the variable was assigned since.
    pub initialized: bool,
}

/// What a name is bound to inside a procedure body.
#[derive(Debug, Clone, PartialEq)]
pub enum ScopeEntry {
    Param(ParamEntry),
    Var(VarEntry),
}

impl ScopeEntry {
    pub fn name(&self) -> &str {
        match self {
            ScopeEntry::Param(p) => &p.name,
            ScopeEntry::Var(v) => &v.name,
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            ScopeEntry::Param(p) => p.ty,
            ScopeEntry::Var(v) => v.ty,
        }
    }

    pub fn loc(&self) -> &Span {
        match self {
            ScopeEntry::Param(p) => &p.loc,
            ScopeEntry::Var(v) => &v.loc,
        }
    }

    pub fn symbol_kind(&self) -> SymbolKind {
        match self {
            ScopeEntry::Param(_) => SymbolKind::Parameter,
            ScopeEntry::Var(_) => SymbolKind::Variable,
        }
    }
}

/// The names visible inside one procedure body.
///
/// Flat: declarations inside `if`/`while` blocks land here too, and nothing
/// is inherited from outside the procedure. A fresh scope is created for
/// every procedure definition.
#[derive(Debug, Default)]
pub struct LocalScope {
    entries: HashMap<String, ScopeEntry>,
}

impl LocalScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a name. Returns `Err` with the existing binding's span on duplicate.
    pub fn define(&mut self, entry: ScopeEntry) -> Result<(), Span> {
        if let Some(existing) = self.entries.get(entry.name()) {
            return Err(existing.loc().clone());
        }
        self.entries.insert(entry.name().to_string(), entry);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&ScopeEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Mark a variable as initialized. Parameters and unknown names are ignored.
    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(ScopeEntry::Var(var)) = self.entries.get_mut(name) {
            var.initialized = true;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
