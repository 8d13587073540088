use crate::error::{Result, StokerError};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

/// Argument mapping attached to a job. Values are passthrough JSON — the
/// backend interprets them, including any `{placeholder}` micro-templates
/// embedded in default strings.
pub type ArgMap = serde_json::Map<String, serde_json::Value>;

// ---------------------------------------------------------------------------
// Namespace
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    Images,
    Pdfs,
    MsOffice,
    MsWord,
    Text,
    All,
    #[default]
    None,
}

impl Namespace {
    pub fn as_str(self) -> &'static str {
        match self {
            Namespace::Images => "images",
            Namespace::Pdfs => "pdfs",
            Namespace::MsOffice => "ms_office",
            Namespace::MsWord => "ms_word",
            Namespace::Text => "text",
            Namespace::All => "all",
            Namespace::None => "none",
        }
    }
}

impl fmt::Display for Namespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Namespace {
    type Err = StokerError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "images" => Ok(Namespace::Images),
            "pdfs" => Ok(Namespace::Pdfs),
            "ms_office" => Ok(Namespace::MsOffice),
            "ms_word" => Ok(Namespace::MsWord),
            "text" => Ok(Namespace::Text),
            "all" => Ok(Namespace::All),
            "none" => Ok(Namespace::None),
            _ => Err(StokerError::InvalidNamespace(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// ActionKey / SubAction
// ---------------------------------------------------------------------------

/// One step of a chained action: a job identifier plus that step's own
/// default arguments, if any.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAction {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<ArgMap>,
}

/// The job reference of a catalog entry: either a single job identifier or
/// an ordered list of dependent steps. Deserialized untagged so the catalog
/// file writes a bare string for the common case and a list for chains.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ActionKey {
    Single(String),
    Chained(Vec<SubAction>),
}

// ---------------------------------------------------------------------------
// ActionDescriptor
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    /// Unique entry identity: selects the action on the CLI and keys the
    /// parameter store.
    pub name: String,
    /// Human-facing button text.
    pub label: String,
    #[serde(default)]
    pub namespace: Namespace,
    #[serde(default)]
    pub description: String,
    pub key: ActionKey,
    /// Must agree with the shape of `key`; checked at load time.
    pub chain: bool,
    /// Default arguments, meaningful only for single-key entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kwargs: Option<ArgMap>,
    /// User-fillable parameter names, in display order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<String>,
}

impl ActionDescriptor {
    pub fn is_chained(&self) -> bool {
        self.chain
    }

    pub fn mode(&self) -> &'static str {
        if self.chain {
            "chain"
        } else {
            "concurrent"
        }
    }
}

// ---------------------------------------------------------------------------
// CatalogWarning / WarnLevel
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogWarning {
    pub level: WarnLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarnLevel {
    Warning,
    Error,
}

// ---------------------------------------------------------------------------
// Catalog (top-level)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    /// Base URL of the task-queue HTTP API.
    #[serde(default = "default_backend")]
    pub backend: String,
    #[serde(default)]
    pub actions: Vec<ActionDescriptor>,
}

fn default_backend() -> String {
    "http://localhost:5000".to_string()
}

impl Catalog {
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::parse(&data)
    }

    /// Deserialize a catalog and fail fast on invariant violations — a
    /// malformed entry is a configuration defect and must never surface at
    /// dispatch time.
    pub fn parse(data: &str) -> Result<Self> {
        let catalog: Catalog = serde_yaml::from_str(data)?;
        catalog.check_invariants()?;
        Ok(catalog)
    }

    pub fn find(&self, name: &str) -> Result<&ActionDescriptor> {
        self.actions
            .iter()
            .find(|a| a.name == name)
            .ok_or_else(|| StokerError::ActionNotFound(name.to_string()))
    }

    fn check_invariants(&self) -> Result<()> {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &self.actions {
            if !seen.insert(entry.name.as_str()) {
                return Err(StokerError::DuplicateAction(entry.name.clone()));
            }
            match (&entry.key, entry.chain) {
                (ActionKey::Single(_), true) => {
                    return Err(StokerError::ChainShapeMismatch {
                        name: entry.name.clone(),
                        declared: true,
                        actual: "a single job id",
                    });
                }
                (ActionKey::Chained(_), false) => {
                    return Err(StokerError::ChainShapeMismatch {
                        name: entry.name.clone(),
                        declared: false,
                        actual: "a list of steps",
                    });
                }
                (ActionKey::Chained(steps), true) if steps.is_empty() => {
                    return Err(StokerError::EmptyChain(entry.name.clone()));
                }
                _ => {}
            }
        }
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Validation
    // -----------------------------------------------------------------------

    /// Non-fatal lint over the catalog. Hard invariants are enforced by
    /// [`Catalog::parse`]; everything here loads and dispatches, it just
    /// probably doesn't do what the author meant.
    pub fn validate(&self) -> Vec<CatalogWarning> {
        let mut warnings = Vec::new();

        if !self.backend.starts_with("http://") && !self.backend.starts_with("https://") {
            warnings.push(CatalogWarning {
                level: WarnLevel::Warning,
                message: format!("backend '{}' does not look like an HTTP URL", self.backend),
            });
        }

        for entry in &self.actions {
            // Chained steps never receive user parameters; declaring them is
            // almost certainly a catalog author's mistake.
            if entry.chain && !entry.parameters.is_empty() {
                warnings.push(CatalogWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "parameters [{}] on chained action '{}' are ignored at dispatch",
                        entry.parameters.join(", "),
                        entry.name
                    ),
                });
            }

            // Top-level kwargs apply to single keys only; chains declare
            // kwargs per step.
            if entry.chain && entry.kwargs.is_some() {
                warnings.push(CatalogWarning {
                    level: WarnLevel::Warning,
                    message: format!(
                        "kwargs on chained action '{}' are ignored; declare kwargs per step",
                        entry.name
                    ),
                });
            }

            if entry.parameters.iter().any(|p| p.trim().is_empty()) {
                warnings.push(CatalogWarning {
                    level: WarnLevel::Warning,
                    message: format!("action '{}' declares an empty parameter name", entry.name),
                });
            }

            let mut unique: HashSet<&str> = HashSet::new();
            for param in &entry.parameters {
                if !unique.insert(param.as_str()) {
                    warnings.push(CatalogWarning {
                        level: WarnLevel::Warning,
                        message: format!(
                            "action '{}' declares parameter '{}' more than once",
                            entry.name, param
                        ),
                    });
                }
            }

            match &entry.key {
                ActionKey::Single(job) => {
                    if job.trim().is_empty() {
                        warnings.push(CatalogWarning {
                            level: WarnLevel::Error,
                            message: format!("action '{}' has an empty job id", entry.name),
                        });
                    }
                }
                ActionKey::Chained(steps) => {
                    for (i, step) in steps.iter().enumerate() {
                        if step.action.trim().is_empty() {
                            warnings.push(CatalogWarning {
                                level: WarnLevel::Error,
                                message: format!(
                                    "step {} of chained action '{}' has an empty job id",
                                    i + 1,
                                    entry.name
                                ),
                            });
                        }
                    }
                }
            }
        }

        warnings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
