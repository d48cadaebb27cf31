//! Command-line definition for the `flexform` binary

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Flexform - define forms in YAML, materialize them against entered values
///
/// Configuration is read from ~/.flexform/config.{toml,yaml,yml,json}, then
/// ./.flexform/config.{toml,yaml,yml,json}, then FLEXFORM_ environment
/// variables (for example FLEXFORM_AUTOCOMPLETE__TIMEOUT_MS=5000).
#[derive(Parser, Debug)]
#[command(name = "flexform")]
#[command(version)]
#[command(about = "Define dynamic forms in YAML and materialize them against entered values")]
pub struct Cli {
    /// Log progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log everything, including modifier evaluation, to stderr
    #[arg(short, long, global = true)]
    pub debug: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with_all = ["verbose", "debug"])]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the registered field types
    Types {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check a form definition: field types exist and every modifier evaluates
    Validate {
        /// Path to a YAML form definition
        form: PathBuf,
    },

    /// Materialize a form and print it as JSON
    Materialize {
        /// Path to a YAML form definition
        form: PathBuf,
        /// A submitted value, as NAME=JSON (bare text is taken as a string)
        #[arg(long = "value", value_name = "NAME=JSON")]
        values: Vec<String>,
        /// A JSON object of submitted values; --value entries win
        #[arg(long = "values", value_name = "FILE")]
        values_file: Option<PathBuf>,
        /// A JSON object of previously stored values
        #[arg(long, value_name = "FILE")]
        stored: Option<PathBuf>,
        /// Clean the submitted values instead of printing the field set
        #[arg(long)]
        clean: bool,
    },

    /// Query the search endpoint behind an autocomplete field
    Autocomplete {
        /// Path to a YAML form definition
        form: PathBuf,
        /// Name of the autocomplete field
        field: String,
        /// Search term
        #[arg(long, default_value = "")]
        term: String,
        /// One-based page number
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Results per page, capped by configuration
        #[arg(long)]
        per_page: Option<usize>,
        /// A value of the record being edited, as NAME=JSON
        #[arg(long = "value", value_name = "NAME=JSON")]
        values: Vec<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_materialize_arguments() {
        let cli = Cli::try_parse_from([
            "flexform",
            "materialize",
            "pizza.yaml",
            "--value",
            "crust=\"thin\"",
            "--value",
            "diameter=12",
            "--clean",
        ])
        .unwrap();
        match cli.command {
            Commands::Materialize { values, clean, .. } => {
                assert_eq!(values, vec!["crust=\"thin\"", "diameter=12"]);
                assert!(clean);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_quiet_conflicts_with_debug() {
        assert!(Cli::try_parse_from(["flexform", "-q", "-d", "types"]).is_err());
    }
}
