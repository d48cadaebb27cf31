//! The `flexform` command-line tool
//!
//! - `flexform types`: list the registered field types
//! - `flexform validate <form.yaml>`: check field types and modifiers
//! - `flexform materialize <form.yaml>`: run the two-pass pipeline and
//!   print the field set, or with `--clean` the cleaned values
//! - `flexform autocomplete <form.yaml> <field>`: query an autocomplete
//!   field's search endpoint
//!
//! Exit codes: 0 on success, 1 when a form or its values are invalid or a
//! command fails, 2 when the failure is critical (an unreadable
//! configuration file, a storage backend error).

pub mod cli;
pub mod commands;
pub mod exit;
pub mod input;
pub mod logging;

pub use cli::{Cli, Commands};
pub use exit::report_failure;
pub use logging::configure_logging;

use anyhow::Result;
use commands::autocomplete::AutocompleteArgs;
use commands::materialize::MaterializeArgs;
use flexform_autocomplete::register_autocomplete_types;
use flexform_config::FlexformConfig;
use flexform_expr::Evaluator;
use flexform_fields::FieldTypeRegistry;
use flexform_forms::FormsContext;
use std::process::ExitCode;

/// Built-in and autocomplete field types, with configured expression limits
pub fn build_context(config: &FlexformConfig) -> Result<FormsContext> {
    let mut registry = FieldTypeRegistry::with_builtins()?;
    register_autocomplete_types(&mut registry)?;
    let evaluator = Evaluator::builder().limits(config.expression).build();
    Ok(FormsContext::new(registry, evaluator))
}

/// Run a parsed command line
pub async fn run(cli: Cli) -> Result<ExitCode> {
    let config = FlexformConfig::load()?;
    let context = build_context(&config)?;

    let ok = match cli.command {
        Commands::Types { json } => {
            commands::types::run(&context, json)?;
            true
        }
        Commands::Validate { form } => commands::validate::run(&context, &form)?,
        Commands::Materialize {
            form,
            values,
            values_file,
            stored,
            clean,
        } => commands::materialize::run(
            &context,
            &MaterializeArgs {
                form,
                values,
                values_file,
                stored,
                clean,
            },
        )?,
        Commands::Autocomplete {
            form,
            field,
            term,
            page,
            per_page,
            values,
        } => {
            let args = AutocompleteArgs {
                form,
                field,
                term,
                page,
                per_page,
                values,
            };
            commands::autocomplete::run(&context, &config.autocomplete, &args).await?;
            true
        }
    };

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_knows_autocomplete_types() {
        let context = build_context(&FlexformConfig::default()).unwrap();
        assert!(context.registry().contains("SingleLineTextField"));
        assert!(context.registry().contains("URLAutocompleteSelectField"));
        assert!(!context.registry().contains("BaseAutocompleteSelectField"));
    }
}
