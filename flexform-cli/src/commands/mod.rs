//! One module per subcommand

pub mod autocomplete;
pub mod materialize;
pub mod types;
pub mod validate;

use anyhow::{Context, Result};
use flexform_fields::FormDefinition;
use std::path::Path;

pub(crate) fn load_form(path: &Path) -> Result<FormDefinition> {
    FormDefinition::load(path).with_context(|| format!("failed to load form {}", path.display()))
}
