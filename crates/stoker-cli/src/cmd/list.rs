use crate::output::{print_json, print_table};
use crate::root;
use anyhow::Context;
use std::path::Path;
use std::str::FromStr;
use stoker_core::catalog::{Catalog, Namespace};

pub fn run(catalog_path: Option<&Path>, namespace: Option<&str>, json: bool) -> anyhow::Result<()> {
    let path = root::resolve_catalog(catalog_path)?;
    let catalog =
        Catalog::load(&path).with_context(|| format!("failed to load {}", path.display()))?;

    let filter = namespace.map(Namespace::from_str).transpose()?;
    let entries: Vec<_> = catalog
        .actions
        .iter()
        .filter(|a| filter.map_or(true, |ns| a.namespace == ns))
        .collect();

    if json {
        return print_json(&entries);
    }

    if entries.is_empty() {
        println!("No actions in the catalog.");
        return Ok(());
    }

    let rows = entries
        .iter()
        .map(|a| {
            vec![
                a.name.clone(),
                a.mode().to_string(),
                a.namespace.to_string(),
                a.parameters.join(","),
                a.description.clone(),
            ]
        })
        .collect();
    print_table(
        &["NAME", "MODE", "NAMESPACE", "PARAMETERS", "DESCRIPTION"],
        rows,
    );
    Ok(())
}
