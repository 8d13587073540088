//! Pure construction of wire payloads from a catalog entry and a parameter
//! snapshot. No I/O happens here; the dispatcher owns the HTTP side.

use crate::catalog::{ActionDescriptor, ActionKey, ArgMap};
use serde::Serialize;
use std::collections::BTreeMap;

/// One entry of the outbound `action_list`.
///
/// `kwargs` is omitted from the wire entirely when `None` — the backend
/// format distinguishes an absent mapping from an empty one.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Step {
    pub action: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<ArgMap>,
}

/// The wire entity POSTed to the backend. Built fresh on every dispatch,
/// never persisted or reused.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DispatchPayload {
    pub action_list: Vec<Step>,
}

/// Copy `defaults`, then overlay every snapshot entry. User input always
/// wins over a declared default of the same name; defaults without an
/// override are preserved unchanged.
pub fn merge_args(defaults: Option<&ArgMap>, overrides: &BTreeMap<String, String>) -> ArgMap {
    let mut merged = defaults.cloned().unwrap_or_default();
    for (name, value) in overrides {
        merged.insert(name.clone(), serde_json::Value::String(value.clone()));
    }
    merged
}

/// Build the payload for one catalog entry from a parameter snapshot.
///
/// Single keys merge defaults with the snapshot; the step carries `kwargs`
/// when the merge is non-empty or the entry declares parameters
/// (parameterized actions always send the snapshot, even empty-valued).
/// Chained keys produce one step per sub-action in catalog order, each with
/// its own declared kwargs only — the parent snapshot is not merged into
/// chained steps.
pub fn build_payload(
    descriptor: &ActionDescriptor,
    snapshot: &BTreeMap<String, String>,
) -> DispatchPayload {
    let action_list = match &descriptor.key {
        ActionKey::Single(job) => {
            let merged = merge_args(descriptor.kwargs.as_ref(), snapshot);
            let kwargs = if merged.is_empty() && descriptor.parameters.is_empty() {
                None
            } else {
                Some(merged)
            };
            vec![Step {
                action: job.clone(),
                kwargs,
            }]
        }
        ActionKey::Chained(steps) => steps
            .iter()
            .map(|sub| Step {
                action: sub.action.clone(),
                kwargs: sub.kwargs.clone(),
            })
            .collect(),
    };

    DispatchPayload { action_list }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn descriptor(yaml: &str) -> ActionDescriptor {
        Catalog::parse(yaml).unwrap().actions.remove(0)
    }

    fn args(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn defaults_sent_when_no_parameters_entered() {
        let desc = descriptor(
            r#"
actions:
  - name: visualize
    label: Visualize
    key: show_me_in_labelstudio
    chain: false
    kwargs: { a: "1" }
"#,
        );
        let payload = build_payload(&desc, &BTreeMap::new());
        assert_eq!(payload.action_list.len(), 1);
        let kwargs = payload.action_list[0].kwargs.as_ref().unwrap();
        assert_eq!(kwargs["a"], serde_json::json!("1"));
    }

    #[test]
    fn user_value_overrides_default_of_same_name() {
        let desc = descriptor(
            r#"
actions:
  - name: visualize
    label: Visualize
    key: show_me_in_labelstudio
    chain: false
    kwargs: { a: "1", keep: "default" }
    parameters: [a]
"#,
        );
        let payload = build_payload(&desc, &args(&[("a", "2")]));
        let kwargs = payload.action_list[0].kwargs.as_ref().unwrap();
        assert_eq!(kwargs["a"], serde_json::json!("2"));
        // Defaults not overridden are preserved unchanged.
        assert_eq!(kwargs["keep"], serde_json::json!("default"));
    }

    #[test]
    fn bare_action_omits_kwargs_entirely() {
        let desc = descriptor(
            r#"
actions:
  - name: start_digest
    label: Digest
    key: start_digest
    chain: false
"#,
        );
        let payload = build_payload(&desc, &BTreeMap::new());
        assert!(payload.action_list[0].kwargs.is_none());
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"action_list":[{"action":"start_digest"}]}"#
        );
    }

    #[test]
    fn parameterized_action_sends_kwargs_even_when_empty() {
        let desc = descriptor(
            r#"
actions:
  - name: upload
    label: Upload
    key: upload_to_labelstudio
    chain: false
    parameters: [jsonl, api]
"#,
        );
        let payload = build_payload(&desc, &BTreeMap::new());
        assert_eq!(payload.action_list[0].kwargs, Some(ArgMap::new()));
    }

    #[test]
    fn empty_string_values_are_forwarded_verbatim() {
        let desc = descriptor(
            r#"
actions:
  - name: upload
    label: Upload
    key: upload_to_labelstudio
    chain: false
    parameters: [jsonl]
"#,
        );
        let payload = build_payload(&desc, &args(&[("jsonl", "")]));
        let kwargs = payload.action_list[0].kwargs.as_ref().unwrap();
        assert_eq!(kwargs["jsonl"], serde_json::json!(""));
    }

    #[test]
    fn chain_preserves_catalog_order() {
        let desc = descriptor(
            r#"
actions:
  - name: pipeline
    label: Pipeline
    key:
      - action: X
      - action: Y
      - action: Z
    chain: true
"#,
        );
        let payload = build_payload(&desc, &BTreeMap::new());
        assert_eq!(
            serde_json::to_string(&payload).unwrap(),
            r#"{"action_list":[{"action":"X"},{"action":"Y"},{"action":"Z"}]}"#
        );
    }

    #[test]
    fn chain_steps_carry_their_own_kwargs_only() {
        let desc = descriptor(
            r#"
actions:
  - name: pipeline
    label: Pipeline
    key:
      - action: X
        kwargs: { batch: "small" }
      - action: Y
    chain: true
"#,
        );
        let payload = build_payload(&desc, &BTreeMap::new());
        let kwargs = payload.action_list[0].kwargs.as_ref().unwrap();
        assert_eq!(kwargs["batch"], serde_json::json!("small"));
        assert!(payload.action_list[1].kwargs.is_none());
    }

    #[test]
    fn chain_ignores_parent_snapshot() {
        // Chained actions carry no user-fillable parameters at dispatch; a
        // snapshot for the parent entry must not leak into the steps.
        let desc = descriptor(
            r#"
actions:
  - name: pipeline
    label: Pipeline
    key:
      - action: X
    chain: true
"#,
        );
        let payload = build_payload(&desc, &args(&[("title", "custom")]));
        assert!(payload.action_list[0].kwargs.is_none());
    }

    #[test]
    fn template_placeholders_pass_through_literally() {
        let desc = descriptor(
            r#"
actions:
  - name: visualize
    label: Visualize
    key: show_me_in_labelstudio
    chain: false
    kwargs:
      title: 'visualize {nodeID}'
    parameters: [nodeID]
"#,
        );
        let payload = build_payload(&desc, &args(&[("nodeID", "n42")]));
        let kwargs = payload.action_list[0].kwargs.as_ref().unwrap();
        // No substitution: the placeholder is a backend concern.
        assert_eq!(kwargs["title"], serde_json::json!("visualize {nodeID}"));
        assert_eq!(kwargs["nodeID"], serde_json::json!("n42"));
    }

    #[test]
    fn build_is_deterministic_and_does_not_mutate_inputs() {
        let desc = descriptor(
            r#"
actions:
  - name: visualize
    label: Visualize
    key: show_me_in_labelstudio
    chain: false
    kwargs: { z: "1", a: "2" }
    parameters: [m]
"#,
        );
        let snapshot = args(&[("m", "v")]);
        let first = build_payload(&desc, &snapshot);
        let second = build_payload(&desc, &snapshot);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        // Defaults on the descriptor are untouched by the merge.
        assert_eq!(desc.kwargs.as_ref().unwrap().len(), 2);
        assert_eq!(snapshot.len(), 1);
    }

    #[test]
    fn merge_args_with_no_defaults() {
        let merged = merge_args(None, &args(&[("a", "1")]));
        assert_eq!(merged.len(), 1);
        assert_eq!(merged["a"], serde_json::json!("1"));
    }
}
