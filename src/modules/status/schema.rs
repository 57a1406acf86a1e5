use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct VisibilityRequest {
    pub hidden: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VisibilityResponse {
    pub hidden: bool,
    pub poller_running: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub poller: String,
    pub poller_running: bool,
}

#[derive(Debug, Serialize)]
pub struct StatusErrorResponse {
    pub error: String,
}

impl StatusErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self { error: error.into() }
    }
}
