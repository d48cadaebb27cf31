//! `flexform types`

use anyhow::Result;
use flexform_forms::FormsContext;
use serde_json::json;

pub fn run(context: &FormsContext, as_json: bool) -> Result<()> {
    let registry = context.registry();
    if as_json {
        let types: Vec<_> = registry
            .list_types()
            .into_iter()
            .filter_map(|(name, label)| {
                let spec = registry.get(&name)?;
                Some(json!({
                    "name": name,
                    "label": label,
                    "kind": spec.kind(),
                    "storage": spec.storage_kind(),
                }))
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&types)?);
        return Ok(());
    }

    let types = registry.list_types();
    let width = types.iter().map(|(name, _)| name.len()).max().unwrap_or(0);
    for (name, label) in types {
        println!("{:<width$}  {}", name, label, width = width);
    }
    Ok(())
}
