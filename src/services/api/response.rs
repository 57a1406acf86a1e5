use lazy_static::lazy_static;
use regex::Regex;
use reqwest::header::{HeaderMap, ETAG, LOCATION, RETRY_AFTER};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::error::ApiError;

pub const DEFAULT_ERROR_MESSAGE: &str = "There was an unknown error performing the operation.";

lazy_static! {
    static ref ETAG_ENCODING_SUFFIX: Regex = Regex::new(r"--(gzip|deflate)").unwrap();
}

/// Error payload of a failed request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub message: String,
    /// Raw response body, if any was received.
    pub body: Option<String>,
    /// Entity echoed back by the server on validation failures.
    pub data: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            body: None,
            data: None,
        }
    }
}

/// Server accepted the request and wants the client to come back later.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptedResponse {
    pub location: Option<String>,
    pub retry_after_ms: u64,
}

/// Entity paired with the version token it was read at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectWithEtag<T> {
    pub object: T,
    pub etag: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiOutcome<T> {
    Success(T),
    Accepted(AcceptedResponse),
    Failure(ErrorResponse),
}

/// Normalized outcome of one HTTP round-trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResult<T> {
    status: u16,
    etag: Option<String>,
    outcome: ApiOutcome<T>,
}

impl<T> ApiResult<T> {
    pub fn success(body: T, status: u16, etag: Option<String>) -> Self {
        Self {
            status,
            etag,
            outcome: ApiOutcome::Success(body),
        }
    }

    pub fn accepted(location: Option<String>, retry_after_ms: u64, status: u16) -> Self {
        Self {
            status,
            etag: None,
            outcome: ApiOutcome::Accepted(AcceptedResponse {
                location,
                retry_after_ms,
            }),
        }
    }

    pub fn error(error: ErrorResponse, status: u16) -> Self {
        Self {
            status,
            etag: None,
            outcome: ApiOutcome::Failure(error),
        }
    }

    pub fn status_code(&self) -> u16 {
        self.status
    }

    pub fn etag(&self) -> Option<&str> {
        self.etag.as_deref()
    }

    pub fn outcome(&self) -> &ApiOutcome<T> {
        &self.outcome
    }

    pub fn into_outcome(self) -> ApiOutcome<T> {
        self.outcome
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ApiOutcome::Success(_))
    }

    pub fn is_accepted(&self) -> bool {
        matches!(self.outcome, ApiOutcome::Accepted(_))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.outcome, ApiOutcome::Failure(_))
    }

    /// Conditional GET answered with "nothing changed". Reported as an error
    /// outcome, so pollers check this before treating a failure as real.
    pub fn is_not_modified(&self) -> bool {
        self.status == 304
    }

    pub fn body(&self) -> Option<&T> {
        match &self.outcome {
            ApiOutcome::Success(body) => Some(body),
            _ => None,
        }
    }

    pub fn error_response(&self) -> Option<&ErrorResponse> {
        match &self.outcome {
            ApiOutcome::Failure(err) => Some(err),
            _ => None,
        }
    }

    pub fn redirect_url(&self) -> Option<&str> {
        match &self.outcome {
            ApiOutcome::Accepted(accepted) => accepted.location.as_deref(),
            _ => None,
        }
    }

    pub fn retry_after_ms(&self) -> Option<u64> {
        match &self.outcome {
            ApiOutcome::Accepted(accepted) => Some(accepted.retry_after_ms),
            _ => None,
        }
    }

    pub fn retry_after(&self) -> Option<Duration> {
        self.retry_after_ms().map(Duration::from_millis)
    }

    /// Transform the success payload; every other outcome passes through untouched.
    pub fn map<U, F>(self, f: F) -> ApiResult<U>
    where
        F: FnOnce(T) -> U,
    {
        let outcome = match self.outcome {
            ApiOutcome::Success(body) => ApiOutcome::Success(f(body)),
            ApiOutcome::Accepted(accepted) => ApiOutcome::Accepted(accepted),
            ApiOutcome::Failure(err) => ApiOutcome::Failure(err),
        };
        ApiResult {
            status: self.status,
            etag: self.etag,
            outcome,
        }
    }

    pub fn map_err<F>(self, f: F) -> Self
    where
        F: FnOnce(ErrorResponse) -> ErrorResponse,
    {
        let outcome = match self.outcome {
            ApiOutcome::Failure(err) => ApiOutcome::Failure(f(err)),
            other => other,
        };
        Self { outcome, ..self }
    }

    /// Pair the success payload with this response's etag.
    pub fn with_etag(self) -> ApiResult<ObjectWithEtag<T>> {
        let etag = self.etag.clone();
        self.map(|object| ObjectWithEtag { object, etag })
    }

    /// Success body, or the error as an `Err` for `?`-style call sites.
    pub fn into_result(self) -> Result<T, ApiError> {
        match self.outcome {
            ApiOutcome::Success(body) => Ok(body),
            ApiOutcome::Accepted(accepted) => Err(ApiError::Accepted {
                status: self.status,
                location: accepted.location,
                retry_after_ms: accepted.retry_after_ms,
            }),
            ApiOutcome::Failure(err) => Err(ApiError::Response {
                status: self.status,
                message: err.message,
            }),
        }
    }
}

impl ApiResult<String> {
    /// Classify a raw response.
    pub fn from_response(status: u16, status_text: &str, headers: &HeaderMap, body: String) -> Self {
        match status {
            200 | 201 => Self::success(body, status, extract_etag(headers)),
            202 => Self::accepted(
                header_str(headers, LOCATION).map(str::to_string),
                extract_retry_after_ms(headers),
                status,
            ),
            422 | 503 => Self::error(parse_error_body(body), status),
            _ => {
                let mut err = ErrorResponse::new(unknown_error_message(status_text));
                if !body.is_empty() {
                    err.body = Some(body);
                }
                Self::error(err, status)
            }
        }
    }

    /// No response at all: connection refused, DNS failure, timeout.
    pub fn transport_failure(reason: &str) -> Self {
        Self::error(ErrorResponse::new(unknown_error_message(reason)), 0)
    }

    /// Deserialize the success body. A body that does not parse turns the
    /// result into an error carrying the same status code.
    pub fn json<T: DeserializeOwned>(self) -> ApiResult<T> {
        let status = self.status;
        let etag = self.etag;
        match self.outcome {
            ApiOutcome::Success(body) => match serde_json::from_str::<T>(&body) {
                Ok(parsed) => ApiResult::success(parsed, status, etag),
                Err(e) => {
                    let mut err = ErrorResponse::new(format!("Failed to parse response: {}", e));
                    err.body = Some(body);
                    ApiResult::error(err, status)
                }
            },
            ApiOutcome::Accepted(accepted) => ApiResult {
                status,
                etag,
                outcome: ApiOutcome::Accepted(accepted),
            },
            ApiOutcome::Failure(err) => ApiResult::error(err, status),
        }
    }
}

/// ETag header with any transfer-encoding suffix the server appended removed.
pub fn extract_etag(headers: &HeaderMap) -> Option<String> {
    header_str(headers, ETAG).map(|etag| ETAG_ENCODING_SUFFIX.replace(etag, "").into_owned())
}

fn extract_retry_after_ms(headers: &HeaderMap) -> u64 {
    header_str(headers, RETRY_AFTER)
        .and_then(|v| v.trim().parse::<u64>().ok())
        .map(|secs| secs.saturating_mul(1000))
        .unwrap_or(0)
}

fn header_str(headers: &HeaderMap, name: reqwest::header::HeaderName) -> Option<&str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn unknown_error_message(reason: &str) -> String {
    format!("{} Possible reason ({})", DEFAULT_ERROR_MESSAGE, reason)
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    data: Option<serde_json::Value>,
}

fn parse_error_body(body: String) -> ErrorResponse {
    let parsed = serde_json::from_str::<ErrorBody>(&body).ok();
    let (message, data) = match parsed {
        Some(ErrorBody { message, data }) => (message, data),
        None => (None, None),
    };

    ErrorResponse {
        message: message.unwrap_or_else(|| DEFAULT_ERROR_MESSAGE.to_string()),
        body: if body.is_empty() { None } else { Some(body) },
        data,
    }
}
