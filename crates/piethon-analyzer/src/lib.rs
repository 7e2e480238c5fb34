//! Semantic checker and call-graph builder for Piethon scripts.
//!
//! Pipeline: [`lexer`] → [`parser`] → [`semantic`] → [`callgraph`], with
//! [`Analyzer`] wiring the stages together.

pub mod analyzer;
pub mod ast;
pub mod callgraph;
pub mod error;
pub mod graph;
pub mod lexer;
pub mod parser;
pub mod semantic;

pub use analyzer::{Analyzer, AnalyzerOptions};
pub use callgraph::{CallGraph, ProcNode};
pub use error::AnalyzerError;
pub use graph::Digraph;
pub use semantic::{CheckResult, CheckedScript};
