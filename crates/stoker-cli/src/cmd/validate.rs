use crate::output::print_json;
use crate::root;
use anyhow::Context;
use std::path::Path;
use stoker_core::catalog::{Catalog, WarnLevel};

pub fn run(catalog_path: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let path = root::resolve_catalog(catalog_path)?;
    // Hard invariant violations (duplicate names, empty chains, a chain flag
    // contradicting the key shape) abort the load itself.
    let catalog =
        Catalog::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let warnings = catalog.validate();

    if json {
        print_json(&serde_json::json!({ "warnings": warnings }))?;
    } else if warnings.is_empty() {
        println!("Catalog is valid. No warnings.");
    } else {
        for w in &warnings {
            let prefix = match w.level {
                WarnLevel::Warning => "warning",
                WarnLevel::Error => "error",
            };
            println!("[{prefix}] {}", w.message);
        }
    }

    let has_errors = warnings.iter().any(|w| w.level == WarnLevel::Error);
    if has_errors {
        anyhow::bail!("catalog validation found errors");
    }

    Ok(())
}
