use thiserror::Error;

#[derive(Debug, Error)]
pub enum StokerError {
    #[error("action not found in catalog: {0}")]
    ActionNotFound(String),

    #[error("duplicate action name '{0}' in catalog")]
    DuplicateAction(String),

    #[error("chained action '{0}' has an empty step list")]
    EmptyChain(String),

    #[error("action '{name}' declares chain={declared} but its key is {actual}")]
    ChainShapeMismatch {
        name: String,
        declared: bool,
        actual: &'static str,
    },

    #[error("invalid namespace '{0}': expected images, pdfs, ms_office, ms_word, text, all, or none")]
    InvalidNamespace(String),

    #[error("backend returned status {status} for {endpoint}")]
    Backend { status: u16, endpoint: &'static str },

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, StokerError>;
