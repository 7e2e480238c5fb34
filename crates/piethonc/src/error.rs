use std::io;
use std::path::PathBuf;

use piethon_analyzer::AnalyzerError;
use piethon_common::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not read '{}': {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("could not write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Analyzer(#[from] AnalyzerError),

    #[error("failed to serialize diagnostics: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to render diagnostics: {0}")]
    Render(#[source] io::Error),

    #[error("failed to format call graph")]
    Dot(#[from] std::fmt::Error),

    #[error("{count} error(s) found")]
    ScriptErrors { count: usize },
}
