use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Name of the optional project configuration file.
pub const CONFIG_FILE_NAME: &str = "Piethon.toml";

/// The parsed Piethon.toml configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PiethonConfig {
    pub analyzer: AnalyzerSection,
    pub graph: GraphSection,
    /// The directory containing the Piethon.toml file, if one was loaded.
    pub root_dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalyzerSection {
    /// Suppress eager diagnostic reporting; diagnostics are still returned.
    pub silent: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphSection {
    pub title: String,
    pub rankdir: RankDir,
    pub edge_label: String,
}

impl Default for GraphSection {
    fn default() -> Self {
        Self {
            title: "call graph".to_string(),
            rankdir: RankDir::LeftRight,
            edge_label: "calls".to_string(),
        }
    }
}

/// Graphviz layout direction for exported call graphs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
pub enum RankDir {
    #[default]
    #[serde(rename = "LR")]
    LeftRight,
    #[serde(rename = "RL")]
    RightLeft,
    #[serde(rename = "TB")]
    TopBottom,
    #[serde(rename = "BT")]
    BottomTop,
}

impl RankDir {
    pub fn as_str(self) -> &'static str {
        match self {
            RankDir::LeftRight => "LR",
            RankDir::RightLeft => "RL",
            RankDir::TopBottom => "TB",
            RankDir::BottomTop => "BT",
        }
    }
}

/// Raw TOML structure for deserialization.
#[derive(Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
    analyzer: AnalyzerSection,
    graph: GraphSection,
}

/// Errors that can occur when loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("no Piethon.toml found (searched from {0})")]
    NotFound(String),
    #[error("failed to read Piethon.toml: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("invalid Piethon.toml: {0}")]
    ParseError(String),
}

/// Walk up from `start_dir` looking for `Piethon.toml`.
/// Returns the path to the config file if found.
pub fn find_config(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}

/// Load a Piethon.toml configuration from a file path.
pub fn load_config(path: &Path) -> Result<PiethonConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let root_dir = path
        .parent()
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    let mut config = parse_config(&content)?;
    config.root_dir = Some(root_dir);
    Ok(config)
}

/// Parse a Piethon.toml configuration from a string.
pub fn parse_config(content: &str) -> Result<PiethonConfig, ConfigError> {
    let raw: RawConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    Ok(PiethonConfig {
        analyzer: raw.analyzer,
        graph: raw.graph,
        root_dir: None,
    })
}

/// Find and load the configuration starting from a script's directory.
pub fn find_and_load_config(script: &Path) -> Result<PiethonConfig, ConfigError> {
    let start_dir = script.parent().unwrap_or_else(|| Path::new("."));
    let config_path = find_config(start_dir)
        .ok_or_else(|| ConfigError::NotFound(start_dir.display().to_string()))?;
    load_config(&config_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_uses_defaults() {
        let config = parse_config("").unwrap();
        assert!(!config.analyzer.silent);
        assert_eq!(config.graph.title, "call graph");
        assert_eq!(config.graph.rankdir, RankDir::LeftRight);
        assert_eq!(config.graph.edge_label, "calls");
    }

    #[test]
    fn parse_full_config() {
        let toml = r#"
[analyzer]
silent = true

[graph]
title = "example script graph"
rankdir = "TB"
edge_label = "invokes"
"#;
        let config = parse_config(toml).unwrap();
        assert!(config.analyzer.silent);
        assert_eq!(config.graph.title, "example script graph");
        assert_eq!(config.graph.rankdir, RankDir::TopBottom);
        assert_eq!(config.graph.rankdir.as_str(), "TB");
        assert_eq!(config.graph.edge_label, "invokes");
    }

    #[test]
    fn unknown_rankdir_fails() {
        let err = parse_config("[graph]\nrankdir = \"diagonal\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn unknown_key_fails() {
        let err = parse_config("[analyzer]\nverbose = true\n").unwrap_err();
        assert!(err.to_string().starts_with("invalid Piethon.toml"));
    }

    #[test]
    fn find_config_walks_up() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(tmp.path().join("src/nested")).unwrap();
        std::fs::write(tmp.path().join(CONFIG_FILE_NAME), "[analyzer]\nsilent = true\n").unwrap();

        let found = find_config(&tmp.path().join("src/nested"));
        assert_eq!(found, Some(tmp.path().join(CONFIG_FILE_NAME)));

        let config = find_and_load_config(&tmp.path().join("src/nested/main.pie")).unwrap();
        assert!(config.analyzer.silent);
        assert_eq!(config.root_dir.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn missing_config_is_not_found() {
        let tmp = tempfile::tempdir().unwrap();
        let script = tmp.path().join("main.pie");
        // A Piethon.toml in an ancestor of the temp dir would be picked up;
        // only assert on the error shape when nothing is found.
        if let Err(err) = find_and_load_config(&script) {
            assert!(matches!(err, ConfigError::NotFound(_)));
        }
    }
}
