use thiserror::Error;

/// Rejections from validated `Alert` construction. These surface at the API
/// boundary as 400s; the engine never sees an invalid alert.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AlertError {
    #[error("threshold must be a positive number")]
    InvalidThreshold,

    #[error("invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("invalid owner handle: {0}")]
    InvalidOwner(String),

    #[error("invalid condition: {0} (expected \"above\" or \"below\")")]
    InvalidCondition(String),
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("store JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error)]
pub enum MessagingError {
    #[error("messaging transport error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("messaging provider rejected the call: {0}")]
    Api(String),
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("handle already registered")]
    AlreadyRegistered,

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Fatal cycle outcomes. Quote and delivery failures are absorbed inside the
/// cycle (retain / log-and-continue); only persistence failures escape.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Store(#[from] StoreError),
}
