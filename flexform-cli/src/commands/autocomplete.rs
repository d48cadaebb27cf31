//! `flexform autocomplete`

use super::load_form;
use crate::input::parse_assignments;
use anyhow::{bail, Result};
use flexform_autocomplete::{source_for_field, AutocompleteSettings, AutocompleteSource, SearchQuery};
use flexform_fields::FieldKind;
use flexform_forms::{FormInput, FormsContext, FormsError};
use std::path::PathBuf;

/// Arguments of `flexform autocomplete`
#[derive(Debug)]
pub struct AutocompleteArgs {
    pub form: PathBuf,
    pub field: String,
    pub term: String,
    pub page: usize,
    pub per_page: Option<usize>,
    pub values: Vec<String>,
}

/// Print one page of results in the `{results, pagination}` shape
pub async fn run(
    context: &FormsContext,
    settings: &AutocompleteSettings,
    args: &AutocompleteArgs,
) -> Result<()> {
    let form = load_form(&args.form)?;
    let input = FormInput::new().stored(parse_assignments(&args.values)?);
    let set = context.materialize(&form, &input)?;

    let Some(field) = set.field(&args.field) else {
        return Err(FormsError::UnknownField {
            form: form.name.clone(),
            name: args.field.clone(),
        }
        .into());
    };
    if !matches!(field.kind, FieldKind::Autocomplete | FieldKind::AutocompleteMultiple) {
        bail!(
            "field '{}' is a {}, not an autocomplete field",
            field.name,
            field.field_type
        );
    }

    let source = source_for_field(field, settings)?;
    let query = SearchQuery::new(&args.term, args.page, settings.per_page(args.per_page))
        .with_values(set.values.clone());
    tracing::debug!(field = %field.name, url = %source.url_template(), ?query, "autocomplete search");

    let page = source.search(&query).await?;
    println!("{}", serde_json::to_string_pretty(&page.to_response())?);
    Ok(())
}
