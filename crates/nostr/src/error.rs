use thiserror::Error;

#[derive(Error, Debug)]
pub enum NostrError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway returned {status}: {body}")]
    Server { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid signature: {0}")]
    InvalidSignature(String),

    #[error("Event id mismatch: expected {expected}, got {actual}")]
    IdMismatch { expected: String, actual: String },
}
