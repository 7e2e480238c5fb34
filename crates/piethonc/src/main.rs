mod dot;
mod error;
mod render;

use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::str::FromStr;

use clap::{Parser, Subcommand};
use log::{debug, error, info, LevelFilter};

use piethon_analyzer::{callgraph, Analyzer, AnalyzerOptions, CheckedScript};
use piethon_common::config::{self, ConfigError, PiethonConfig};

use crate::error::CliError;

/// Piethon analyzer.
///
/// Checks .pie scripts for semantic errors and exports their call graphs.
#[derive(Parser, Debug)]
#[command(
    name = "piethonc",
    version,
    about,
    long_about = "Piethon analyzer.\n\nChecks .pie scripts for semantic errors and exports call graphs as\nGraphviz DOT.\n\nExamples:\n  piethonc check script.pie              Report every error in the script\n  piethonc check script.pie --json       Print diagnostics as JSON\n  piethonc graph script.pie -o calls.dot Write the call graph to calls.dot"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Do not render diagnostics or log them as they are found.
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log level (off, error, warn, info, debug, trace). Defaults to RUST_LOG or warn.
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Path to a Piethon.toml (default: searched upward from the script).
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse and check a script.
    Check {
        /// Input .pie script.
        input: PathBuf,

        /// Print diagnostics as JSON to stdout.
        #[arg(long)]
        json: bool,
    },

    /// Check a script and export its call graph as DOT.
    Graph {
        /// Input .pie script.
        input: PathBuf,

        /// Output file (default: stdout).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Graph title (default: from Piethon.toml, or "call graph").
        #[arg(long)]
        title: Option<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logger(cli.log_level.as_deref());
    debug!("parsed arguments: {:?}", cli);

    if let Err(err) = run(&cli) {
        error!("{}", err);
        process::exit(1);
    }
}

fn init_logger(level: Option<&str>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if let Some(level) = level {
        let filter = LevelFilter::from_str(level).unwrap_or_else(|_| {
            eprintln!("Invalid log level: {}. Using 'warn' instead.", level);
            LevelFilter::Warn
        });
        builder.filter_level(filter);
    }
    builder.init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Check { input, json } => {
            let loaded = load_script(cli, input)?;
            match loaded.analyzer.check()? {
                Ok(_) if *json => println!("[]"),
                Ok(_) => println!("No errors found."),
                Err(diagnostics) => {
                    if *json {
                        println!("{}", serde_json::to_string_pretty(&diagnostics)?);
                    } else if !cli.quiet {
                        render::print_diagnostics(&diagnostics, &loaded.source, &loaded.file_name)?;
                    }
                    return Err(CliError::ScriptErrors {
                        count: diagnostics.len(),
                    });
                }
            }
            Ok(())
        }
        Command::Graph {
            input,
            output,
            title,
        } => {
            let loaded = load_script(cli, input)?;
            let checked = checked_or_report(cli, &loaded)?;
            let graph = callgraph::build_graph(&checked);

            let settings = &loaded.config.graph;
            let title = title.as_deref().unwrap_or(&settings.title);
            let mut dot = String::new();
            dot::write_dot(&mut dot, &graph, title, settings)?;

            match output {
                Some(path) => {
                    fs::write(path, &dot).map_err(|source| CliError::Write {
                        path: path.clone(),
                        source,
                    })?;
                    info!(
                        "wrote call graph ({} procedures, {} calls) to {}",
                        graph.vertex_count(),
                        graph.edge_count(),
                        path.display()
                    );
                    println!("Graph has been exported to: {}", path.display());
                }
                None => print!("{}", dot),
            }
            Ok(())
        }
    }
}

/// A script read from disk, with its configuration and a ready analyzer.
struct LoadedScript {
    source: String,
    file_name: String,
    config: PiethonConfig,
    analyzer: Analyzer,
}

fn load_script(cli: &Cli, input: &Path) -> Result<LoadedScript, CliError> {
    let source = fs::read_to_string(input).map_err(|source| CliError::Read {
        path: input.to_path_buf(),
        source,
    })?;
    let file_name = input
        .file_name()
        .unwrap_or_default()
        .to_string_lossy()
        .to_string();

    let config = load_config(cli, input)?;
    let options = AnalyzerOptions {
        silent: cli.quiet || config.analyzer.silent,
    };
    let analyzer = Analyzer::new()
        .with_options(options)
        .with_script(file_name.clone(), source.clone());

    Ok(LoadedScript {
        source,
        file_name,
        config,
        analyzer,
    })
}

/// Use `--config` if given, otherwise search upward from the script.
/// A missing Piethon.toml means defaults.
fn load_config(cli: &Cli, input: &Path) -> Result<PiethonConfig, CliError> {
    if let Some(path) = &cli.config {
        return Ok(config::load_config(path)?);
    }
    let abs_input = fs::canonicalize(input).unwrap_or_else(|_| input.to_path_buf());
    match config::find_and_load_config(&abs_input) {
        Ok(config) => {
            debug!("loaded configuration from {:?}", config.root_dir);
            Ok(config)
        }
        Err(ConfigError::NotFound(_)) => Ok(PiethonConfig::default()),
        Err(e) => Err(e.into()),
    }
}

fn checked_or_report(cli: &Cli, loaded: &LoadedScript) -> Result<CheckedScript, CliError> {
    match loaded.analyzer.check()? {
        Ok(checked) => Ok(checked),
        Err(diagnostics) => {
            if !cli.quiet {
                render::print_diagnostics(&diagnostics, &loaded.source, &loaded.file_name)?;
            }
            Err(CliError::ScriptErrors {
                count: diagnostics.len(),
            })
        }
    }
}
