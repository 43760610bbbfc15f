//! CLI argument parsing using clap derive API
//!
//! This module defines the command-line interface structure using clap's derive macros.
//! It is purely declarative with no side effects or I/O.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Sluice -- grok field extraction and event transformation.
///
/// Use `sluice <COMMAND> --help` for subcommand details.
#[derive(Parser, Debug)]
#[command(name = "sluice", version, about, long_about = None)]
pub struct Cli {
    /// Path to the sluice.toml configuration file.
    #[arg(short, long, default_value = "sluice.toml")]
    pub config: PathBuf,

    /// Override log level (trace, debug, info, warn, error).
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Output format.
    #[arg(long, global = true, default_value = "text")]
    pub output: OutputFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table / text output.
    Text,
    /// Machine-readable JSON.
    Json,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Compile a grok expression and match it against input lines.
    Grok(GrokArgs),

    /// List the effective grok pattern library.
    Patterns(PatternsArgs),

    /// Transform JSON-lines events through the configured action chain.
    Run(RunArgs),

    /// Manage configuration.
    Config(ConfigArgs),
}

// ---- grok ----

/// Match input lines against a grok expression.
#[derive(Args, Debug)]
pub struct GrokArgs {
    /// Grok match expression, e.g. '%{IPV4:ip} %{WORD:method}'.
    #[arg(short, long = "match")]
    pub match_expr: String,

    /// Extra pattern source (directory, file or http(s) URL). Repeatable.
    #[arg(long = "pattern-path")]
    pub pattern_paths: Vec<String>,

    /// Inline pattern definition as NAME=FRAGMENT. Repeatable.
    #[arg(long = "pattern")]
    pub patterns: Vec<String>,

    /// Keep captures that matched the empty string.
    #[arg(long)]
    pub keep_blank: bool,

    /// Input lines (default: read lines from stdin).
    pub inputs: Vec<String>,
}

// ---- patterns ----

/// List every pattern name and fragment.
#[derive(Args, Debug)]
pub struct PatternsArgs {
    /// Extra pattern source (directory, file or http(s) URL). Repeatable.
    #[arg(long = "pattern-path")]
    pub pattern_paths: Vec<String>,
}

// ---- run ----

/// Transform events read as JSON lines.
#[derive(Args, Debug)]
pub struct RunArgs {
    /// Actions YAML file (overrides `transformer.actions_file`).
    #[arg(short, long)]
    pub actions: Option<PathBuf>,

    /// Input file of JSON lines (default: stdin).
    pub input: Option<PathBuf>,
}

// ---- config ----

/// Manage sluice configuration.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Validate the configuration file and report errors.
    Validate,
    /// Show the effective configuration (file + env overrides + defaults).
    Show {
        /// Show only a specific section (general, transformer).
        #[arg(long)]
        section: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_verify_structure() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_cli_parse_grok_with_inputs() {
        let cli = Cli::try_parse_from([
            "sluice",
            "grok",
            "--match",
            "%{INT:n}",
            "--pattern-path",
            "/etc/sluice/patterns",
            "--pattern",
            "CODE=[A-Z]{3}",
            "a 1",
            "b 2",
        ])
        .expect("parse succeeded");
        match cli.command {
            Commands::Grok(args) => {
                assert_eq!(args.match_expr, "%{INT:n}");
                assert_eq!(args.pattern_paths, vec!["/etc/sluice/patterns"]);
                assert_eq!(args.patterns, vec!["CODE=[A-Z]{3}"]);
                assert!(!args.keep_blank, "keep_blank should default to false");
                assert_eq!(args.inputs, vec!["a 1", "b 2"]);
            }
            _ => panic!("expected Grok command"),
        }
    }

    #[test]
    fn test_cli_parse_grok_requires_match() {
        let result = Cli::try_parse_from(["sluice", "grok", "line"]);
        assert!(result.is_err(), "grok without --match should fail");
    }

    #[test]
    fn test_cli_parse_patterns() {
        let cli = Cli::try_parse_from(["sluice", "patterns"]).expect("parse succeeded");
        match cli.command {
            Commands::Patterns(args) => assert!(args.pattern_paths.is_empty()),
            _ => panic!("expected Patterns command"),
        }
    }

    #[test]
    fn test_cli_parse_run_with_actions_and_input() {
        let cli = Cli::try_parse_from(["sluice", "run", "-a", "actions.yml", "events.jsonl"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.actions, Some(PathBuf::from("actions.yml")));
                assert_eq!(args.input, Some(PathBuf::from("events.jsonl")));
            }
            _ => panic!("expected Run command"),
        }
    }

    #[test]
    fn test_cli_parse_config_show_section() {
        let cli = Cli::try_parse_from(["sluice", "config", "show", "--section", "general"])
            .expect("parse succeeded");
        match cli.command {
            Commands::Config(args) => match args.action {
                ConfigAction::Show { section } => {
                    assert_eq!(section, Some("general".to_owned()));
                }
                _ => panic!("expected Show action"),
            },
            _ => panic!("expected Config command"),
        }
    }

    #[test]
    fn test_cli_global_flags() {
        let cli = Cli::try_parse_from([
            "sluice",
            "-c",
            "/tmp/custom.toml",
            "patterns",
            "--output",
            "json",
            "--log-level",
            "debug",
        ])
        .expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("/tmp/custom.toml"));
        assert_eq!(cli.output, OutputFormat::Json);
        assert_eq!(cli.log_level, Some("debug".to_owned()));
    }

    #[test]
    fn test_cli_default_config_path() {
        let cli = Cli::try_parse_from(["sluice", "config", "validate"]).expect("parse succeeded");
        assert_eq!(cli.config, PathBuf::from("sluice.toml"));
        assert_eq!(cli.output, OutputFormat::Text);
    }
}
