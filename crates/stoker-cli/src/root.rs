use std::path::{Path, PathBuf};

/// Catalog file name looked up when no explicit path is given.
pub const CATALOG_FILE: &str = "stoker.yaml";

/// Resolve the catalog file path.
///
/// Priority:
/// 1. `--catalog` flag / `STOKER_CATALOG` env var (passed in as `explicit`)
/// 2. Walk upward from the cwd looking for `stoker.yaml`
pub fn resolve_catalog(explicit: Option<&Path>) -> anyhow::Result<PathBuf> {
    if let Some(p) = explicit {
        return Ok(p.to_path_buf());
    }

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    match search_upward(&cwd) {
        Some(path) => Ok(path),
        None => anyhow::bail!(
            "no {CATALOG_FILE} found here or in any parent directory; run 'stoker init'"
        ),
    }
}

fn search_upward(start: &Path) -> Option<PathBuf> {
    let mut dir = start;
    loop {
        let candidate = dir.join(CATALOG_FILE);
        if candidate.is_file() {
            return Some(candidate);
        }
        dir = dir.parent()?;
    }
}
