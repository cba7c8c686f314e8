use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoiviewError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP request failed: {0}")]
    Http(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Scope '{scope}' referenced but missing from coordination type '{coordination_type}'")]
    ScopeMismatch {
        coordination_type: String,
        scope: String,
    },

    #[error("Duplicate scope '{scope}' in meta-scope list '{coordination_type}'")]
    DuplicateScope {
        coordination_type: String,
        scope: String,
    },

    #[error("Background load failed: {0}")]
    Worker(String),

    #[error("Invalid heatmap matrix: {0}")]
    InvalidMatrix(String),

    #[error("Invalid color: {0}")]
    InvalidColor(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<ureq::Error> for RoiviewError {
    fn from(err: ureq::Error) -> Self {
        Self::Http(err.to_string())
    }
}

impl From<toml::de::Error> for RoiviewError {
    fn from(err: toml::de::Error) -> Self {
        Self::Config(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoiviewError>;
