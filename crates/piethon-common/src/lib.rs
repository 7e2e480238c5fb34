pub mod config;
pub mod errors;
pub mod span;
pub mod types;

pub use config::PiethonConfig;
pub use errors::{Diagnostic, DiagnosticBag, DiagnosticKind, UnreachableReason};
pub use span::{Position, Span};
pub use types::{SymbolKind, Type};
