/// Errors raised by the API layer.
///
/// `Response` is what callers see when they ask an `ApiResult` for its body
/// and the server did not return one; its `Display` is the server's message
/// verbatim so it can be shown to a user as-is.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{message}")]
    Response { status: u16, message: String },
    #[error("Request accepted for asynchronous processing (status {status})")]
    Accepted {
        status: u16,
        location: Option<String>,
        retry_after_ms: u64,
    },
    #[error("Invalid value for header {name}")]
    InvalidHeader { name: String },
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ApiError {
    /// Status code carried by the error, 0 when there was no response.
    pub fn status(&self) -> u16 {
        match self {
            Self::Response { status, .. } | Self::Accepted { status, .. } => *status,
            _ => 0,
        }
    }
}
