use log::{debug, error, info};
use piethon_common::Diagnostic;

use crate::callgraph::{self, CallGraph};
use crate::error::AnalyzerError;
use crate::parser;
use crate::semantic::{self, CheckResult};

/// Settings for an [`Analyzer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalyzerOptions {
    /// When false, diagnostics are also logged at error level as they are returned.
    pub silent: bool,
}

impl Default for AnalyzerOptions {
    fn default() -> Self {
        Self { silent: true }
    }
}

#[derive(Debug, Clone)]
struct SourceText {
    name: String,
    text: String,
}

/// Entry point for checking a Piethon script and building its call graph.
///
/// ```
/// use piethon_analyzer::Analyzer;
///
/// let analyzer = Analyzer::new().with_script(
///     "example.pie",
///     "def g() : Void is end\ndef f() : Void is g(); end",
/// );
/// assert!(analyzer.check().unwrap().is_ok());
/// let graph = analyzer.build_graph().unwrap();
/// assert_eq!(graph.edge_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Analyzer {
    source: Option<SourceText>,
    options: AnalyzerOptions,
}

impl Analyzer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the script to analyze, replacing any previous one.
    pub fn with_script(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.source = Some(SourceText {
            name: name.into(),
            text: text.into(),
        });
        self
    }

    pub fn remove_script(mut self) -> Self {
        self.source = None;
        self
    }

    pub fn with_options(mut self, options: AnalyzerOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> AnalyzerOptions {
        self.options
    }

    /// Name and text of the current script, if one is set.
    pub fn script(&self) -> Option<(&str, &str)> {
        self.source
            .as_ref()
            .map(|s| (s.name.as_str(), s.text.as_str()))
    }

    /// Parse and check the current script.
    ///
    /// Syntax errors stop the pipeline before semantic checking. The outer
    /// `Result` carries misuse (no script, unknown type names), the inner one
    /// the diagnostics.
    pub fn check(&self) -> Result<CheckResult, AnalyzerError> {
        let source = self.source.as_ref().ok_or(AnalyzerError::NoScript)?;
        info!("checking {}", source.name);

        let (script, parse_diags) = parser::parse(&source.text, &source.name);
        if parse_diags.has_errors() {
            debug!("{} syntax error(s); skipping semantic checks", parse_diags.len());
            let diagnostics = parse_diags.into_diagnostics();
            self.report(&diagnostics);
            return Ok(Err(diagnostics));
        }

        let result = semantic::check(script)?;
        if let Err(diagnostics) = &result {
            self.report(diagnostics);
        }
        Ok(result)
    }

    /// Check the current script and build its call graph.
    pub fn build_graph(&self) -> Result<CallGraph, AnalyzerError> {
        match self.check()? {
            Ok(checked) => Ok(callgraph::build_graph(&checked)),
            Err(diagnostics) => Err(AnalyzerError::ScriptHasErrors {
                count: diagnostics.len(),
            }),
        }
    }

    fn report(&self, diagnostics: &[Diagnostic]) {
        if self.options.silent {
            return;
        }
        for diagnostic in diagnostics {
            error!("{}", diagnostic);
        }
    }
}
