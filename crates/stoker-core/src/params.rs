use std::collections::{BTreeMap, HashMap};

/// Session-local store of the latest user-entered value per
/// (action, parameter name) pair.
///
/// Created empty at session start and never persisted; values live until
/// overwritten or the session ends. The payload builder reads an owned
/// snapshot at dispatch time and never mutates the store.
#[derive(Debug, Default)]
pub struct ParameterStore {
    values: HashMap<String, BTreeMap<String, String>>,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for (action, param). Setting the same
    /// value twice is observably a no-op.
    pub fn set(&mut self, action: &str, param: &str, value: &str) {
        self.values
            .entry(action.to_string())
            .or_default()
            .insert(param.to_string(), value.to_string());
    }

    /// Owned copy of the current values for `action`. Unknown actions yield
    /// an empty map; mutating the returned map does not touch the store.
    pub fn snapshot_for(&self, action: &str) -> BTreeMap<String, String> {
        self.values.get(action).cloned().unwrap_or_default()
    }
}
