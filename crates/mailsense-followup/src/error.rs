use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message store unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Error)]
pub enum FollowUpError {
    #[error("message store error: {0}")]
    Store(#[from] StoreError),
}
