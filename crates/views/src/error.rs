use thiserror::Error;

/// Failure talking to the view-count store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("view store request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("view store returned HTTP {status} for '{slug}'")]
    Status { slug: String, status: u16 },

    #[error("invalid view store endpoint {0}")]
    InvalidEndpoint(String),

    #[error("view store unavailable: {0}")]
    Unavailable(String),
}
