use serde::Serialize;

use crate::span::Span;
use crate::types::{SymbolKind, Type};

/// Why a statement was flagged as unreachable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnreachableReason {
    /// A second (or later) return in the same body.
    AdditionalReturn,
    /// Any other statement following a return.
    CodeAfterReturn,
}

impl std::fmt::Display for UnreachableReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnreachableReason::AdditionalReturn => {
                f.write_str("Additional return statement or code after return.")
            }
            UnreachableReason::CodeAfterReturn => f.write_str("Code after return statement."),
        }
    }
}

/// A parse or semantic problem found in a script.
///
/// The `Display` form is the one-line rendering, e.g.
/// `>> Type mismatch (<test>:2:5) - expected: Int32, but got: Bool`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind")]
pub enum Diagnostic {
    #[error(">> Duplicate {symbol} symbol ({loc}) - {name}")]
    DupSymbol {
        name: String,
        symbol: SymbolKind,
        loc: Span,
    },

    #[error(">> No such symbol ({loc}) - {name}")]
    NoSuchSymbol { name: String, loc: Span },

    #[error(">> Type mismatch ({loc}) - expected: {expected}, but got: {actual}")]
    TypeMismatch {
        expected: Type,
        actual: Type,
        loc: Span,
    },

    #[error(">> Operation call arg count mismatch ({loc}) - expected: {expected}, but got: {actual}")]
    ArgCountMismatch {
        expected: usize,
        actual: usize,
        loc: Span,
    },

    #[error(">> Too many or too few return statements ({loc}) - expected: {expected} return statement")]
    TooFewOrTooManyReturns { expected: usize, loc: Span },

    #[error(">> Unreachable code detected ({loc}): {reason}")]
    UnreachableCode { reason: UnreachableReason, loc: Span },

    #[error(">> Syntax error ({loc}) - {message}")]
    ParseError { message: String, loc: Span },
}

/// Fieldless mirror of [`Diagnostic`]'s variants, for filtering and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    DupSymbol,
    NoSuchSymbol,
    TypeMismatch,
    ArgCountMismatch,
    TooFewOrTooManyReturns,
    UnreachableCode,
    ParseError,
}

impl Diagnostic {
    pub fn kind(&self) -> DiagnosticKind {
        match self {
            Diagnostic::DupSymbol { .. } => DiagnosticKind::DupSymbol,
            Diagnostic::NoSuchSymbol { .. } => DiagnosticKind::NoSuchSymbol,
            Diagnostic::TypeMismatch { .. } => DiagnosticKind::TypeMismatch,
            Diagnostic::ArgCountMismatch { .. } => DiagnosticKind::ArgCountMismatch,
            Diagnostic::TooFewOrTooManyReturns { .. } => DiagnosticKind::TooFewOrTooManyReturns,
            Diagnostic::UnreachableCode { .. } => DiagnosticKind::UnreachableCode,
            Diagnostic::ParseError { .. } => DiagnosticKind::ParseError,
        }
    }

    /// The source location every diagnostic carries.
    pub fn loc(&self) -> &Span {
        match self {
            Diagnostic::DupSymbol { loc, .. }
            | Diagnostic::NoSuchSymbol { loc, .. }
            | Diagnostic::TypeMismatch { loc, .. }
            | Diagnostic::ArgCountMismatch { loc, .. }
            | Diagnostic::TooFewOrTooManyReturns { loc, .. }
            | Diagnostic::UnreachableCode { loc, .. }
            | Diagnostic::ParseError { loc, .. } => loc,
        }
    }

    /// Category label: `"Parse error"` or `"Semantic error"`.
    pub fn kind_label(&self) -> &'static str {
        if self.is_parse_error() {
            "Parse error"
        } else {
            "Semantic error"
        }
    }

    pub fn is_parse_error(&self) -> bool {
        matches!(self, Diagnostic::ParseError { .. })
    }
}

/// Collector for diagnostics, kept in discovery order.
#[derive(Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Record a syntax error at `loc`.
    pub fn parse_error(&mut self, message: impl Into<String>, loc: Span) {
        self.report(Diagnostic::ParseError {
            message: message.into(),
            loc,
        });
    }

    pub fn extend(&mut self, other: DiagnosticBag) {
        self.diagnostics.extend(other.diagnostics);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// `Ok(value)` if nothing was reported, otherwise every diagnostic.
    pub fn into_result<T>(self, value: T) -> Result<T, Vec<Diagnostic>> {
        if self.diagnostics.is_empty() {
            Ok(value)
        } else {
            Err(self.diagnostics)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::span::Position;

    fn loc() -> Span {
        Span::new("<test>", Position::new(2, 5, 12), Position::new(2, 11, 18))
    }

    #[test]
    fn type_mismatch_line() {
        let diag = Diagnostic::TypeMismatch {
            expected: Type::Int32,
            actual: Type::Bool,
            loc: loc(),
        };
        assert_eq!(
            diag.to_string(),
            ">> Type mismatch (<test>:2:5) - expected: Int32, but got: Bool"
        );
        assert_eq!(diag.kind_label(), "Semantic error");
    }

    #[test]
    fn dup_symbol_line_names_the_kind() {
        let diag = Diagnostic::DupSymbol {
            name: "x".into(),
            symbol: SymbolKind::Variable,
            loc: loc(),
        };
        assert_eq!(
            diag.to_string(),
            ">> Duplicate Variable symbol (<test>:2:5) - x"
        );
    }

    #[test]
    fn unreachable_reasons_differ() {
        let extra = Diagnostic::UnreachableCode {
            reason: UnreachableReason::AdditionalReturn,
            loc: loc(),
        };
        let after = Diagnostic::UnreachableCode {
            reason: UnreachableReason::CodeAfterReturn,
            loc: loc(),
        };
        assert_ne!(extra.to_string(), after.to_string());
        assert!(after.to_string().ends_with("Code after return statement."));
    }

    #[test]
    fn parse_error_label() {
        let mut bag = DiagnosticBag::new();
        bag.parse_error("expected ')'", loc());
        let diag = &bag.diagnostics()[0];
        assert!(diag.is_parse_error());
        assert_eq!(diag.kind_label(), "Parse error");
        assert_eq!(diag.kind(), DiagnosticKind::ParseError);
        assert_eq!(diag.loc().start.line, 2);
    }

    #[test]
    fn empty_bag_is_ok() {
        let bag = DiagnosticBag::new();
        assert_eq!(bag.into_result(7), Ok(7));
    }

    #[test]
    fn non_empty_bag_is_err_in_order() {
        let mut bag = DiagnosticBag::new();
        bag.report(Diagnostic::NoSuchSymbol {
            name: "a".into(),
            loc: loc(),
        });
        bag.report(Diagnostic::NoSuchSymbol {
            name: "b".into(),
            loc: loc(),
        });
        let errs = bag.into_result(()).unwrap_err();
        assert_eq!(errs.len(), 2);
        assert!(errs[0].to_string().ends_with("- a"));
        assert!(errs[1].to_string().ends_with("- b"));
    }

    #[test]
    fn serializes_with_kind_tag() {
        let diag = Diagnostic::ArgCountMismatch {
            expected: 2,
            actual: 1,
            loc: loc(),
        };
        let json = serde_json::to_value(&diag).unwrap();
        assert_eq!(json["kind"], "ArgCountMismatch");
        assert_eq!(json["expected"], 2);
        assert_eq!(json["loc"]["start"]["line"], 2);
    }
}
