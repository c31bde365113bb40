#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid key {0:?}: keys may only contain ASCII letters, digits, '_', '-' and '.'")]
    InvalidKey(String),

    #[error("storage unavailable: {0}")]
    Unavailable(String),
}
