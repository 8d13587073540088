use crate::output::print_json;
use crate::root;
use anyhow::Context;
use std::path::Path;
use stoker_core::catalog::{ActionKey, Catalog};
use stoker_core::dispatch::Dispatcher;

pub fn run(catalog_path: Option<&Path>, name: &str, json: bool) -> anyhow::Result<()> {
    let path = root::resolve_catalog(catalog_path)?;
    let catalog =
        Catalog::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let action = catalog.find(name)?;
    let endpoint = Dispatcher::endpoint(action.is_chained());

    if json {
        return print_json(&serde_json::json!({
            "action": action,
            "endpoint": endpoint,
        }));
    }

    println!("Name:        {}", action.name);
    println!("Label:       {}", action.label);
    println!("Namespace:   {}", action.namespace);
    println!("Mode:        {}", action.mode());
    println!("Endpoint:    POST {endpoint}");
    if !action.description.is_empty() {
        println!("Description: {}", action.description);
    }

    match &action.key {
        ActionKey::Single(job) => {
            println!("Job:         {job}");
            if let Some(kwargs) = &action.kwargs {
                println!("Defaults:");
                for (k, v) in kwargs {
                    println!("  {k}: {v}");
                }
            }
        }
        ActionKey::Chained(steps) => {
            println!("Steps:");
            for (i, step) in steps.iter().enumerate() {
                println!("  {}. {}", i + 1, step.action);
                if let Some(kwargs) = &step.kwargs {
                    for (k, v) in kwargs {
                        println!("     {k}: {v}");
                    }
                }
            }
        }
    }

    if action.parameters.is_empty() {
        println!("Parameters:  (none)");
    } else {
        println!("Parameters:  {}", action.parameters.join(", "));
    }
    Ok(())
}
