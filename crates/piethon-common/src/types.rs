use serde::Serialize;

/// The closed set of Piethon types.
///
/// `Error` doubles as the sentinel for an expression whose type could not be
/// determined. It compares like any other member, so a mismatch against
/// `Error` is still reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Type {
    Int32,
    Bool,
    Void,
    Error,
}

impl Type {
    /// Resolve a type annotation's text. Anything outside the fixed set is `None`.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Int32" => Some(Type::Int32),
            "Bool" => Some(Type::Bool),
            "Void" => Some(Type::Void),
            "Error" => Some(Type::Error),
            _ => None,
        }
    }

    /// Whether a value of type `self` may be used where `target` is expected.
    ///
    /// Plain equality: no subtyping, no widening, no special case for `Error`.
    pub fn is_compatible_with(self, target: Type) -> bool {
        self == target
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Int32 => "Int32",
            Type::Bool => "Bool",
            Type::Void => "Void",
            Type::Error => "Error",
        }
    }
}

impl std::fmt::Display for Type {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of a declared symbol, as reported by duplicate-symbol diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SymbolKind {
    Procedure,
    Variable,
    Parameter,
}

impl std::fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            SymbolKind::Procedure => "Procedure",
            SymbolKind::Variable => "Variable",
            SymbolKind::Parameter => "Parameter",
        };
        f.write_str(s)
    }
}
