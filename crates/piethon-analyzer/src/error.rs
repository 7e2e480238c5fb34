use piethon_common::Span;

/// Misuse of the analyzer, as opposed to problems found in a script.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error("no script to analyze; call `with_script` first")]
    NoScript,

    #[error("cannot build a call graph: the script has {count} error(s)")]
    ScriptHasErrors { count: usize },

    #[error("unknown type `{name}` at {location}")]
    UnknownType { name: String, location: Span },
}
