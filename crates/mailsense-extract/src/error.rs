use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("invalid pattern `{name}`: {source}")]
    Pattern {
        name: &'static str,
        #[source]
        source: regex::Error,
    },
    #[error("invalid config: {0}")]
    Config(String),
}

#[derive(Debug, Error)]
pub enum CalendarLinkError {
    #[error("meeting has no resolved date")]
    MissingDate,
    #[error("url error: {0}")]
    Url(#[from] url::ParseError),
}

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("selection index {index} out of range for {len} action items")]
    InvalidSelection { index: usize, len: usize },
    #[error("task sink rejected task: {0}")]
    Rejected(String),
}
