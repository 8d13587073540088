use crate::output::print_json;
use crate::root;
use anyhow::Context;
use std::path::Path;
use stoker_core::catalog::Catalog;
use stoker_core::dispatch::Dispatcher;
use stoker_core::params::ParameterStore;
use stoker_core::payload::build_payload;

pub fn run(
    catalog_path: Option<&Path>,
    name: &str,
    params: &[String],
    backend: Option<&str>,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let path = root::resolve_catalog(catalog_path)?;
    let catalog =
        Catalog::load(&path).with_context(|| format!("failed to load {}", path.display()))?;
    let action = catalog.find(name)?;

    let mut store = ParameterStore::new();
    for pair in params {
        let (key, value) = pair
            .split_once('=')
            .with_context(|| format!("malformed parameter '{pair}': expected KEY=VALUE"))?;
        store.set(&action.name, key, value);
    }

    let snapshot = store.snapshot_for(&action.name);
    let payload = build_payload(action, &snapshot);
    let endpoint = Dispatcher::endpoint(action.is_chained());

    if dry_run {
        if json {
            return print_json(&serde_json::json!({
                "endpoint": endpoint,
                "payload": payload,
            }));
        }
        println!("POST {endpoint}");
        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    let base_url = backend.unwrap_or(&catalog.backend);
    let dispatcher = Dispatcher::new(base_url);
    let chained = action.is_chained();

    // One trigger, one request. The join handle is awaited only so the
    // process outlives the send; the outcome is not inspected, and a failed
    // send surfaces as a warning log, never as a nonzero exit.
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let _ = dispatcher.fire(chained, payload).await;
    });

    if json {
        return print_json(&serde_json::json!({
            "dispatched": action.name,
            "endpoint": endpoint,
            "backend": base_url,
        }));
    }
    println!("dispatched '{}' to {base_url}{endpoint}", action.name);
    Ok(())
}
