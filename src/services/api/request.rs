use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE, IF_MATCH, IF_NONE_MATCH};
use reqwest::Method;
use serde::Serialize;

use super::error::ApiError;
use super::version::ApiVersion;

pub const CONFIRM_HEADER: &str = "x-gocd-confirm";
pub const REQUESTED_WITH_HEADER: &str = "x-requested-with";
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

/// A fully built request, ready for `ApiClient::execute`.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<String>,
}

/// Builds requests with the headers every API call needs.
///
/// - `Accept` is always the versioned media type (`Latest` unless told otherwise)
/// - an etag becomes `If-None-Match` on reads and `If-Match` on writes
/// - a mutating call without a payload gets `X-GoCD-Confirm: true`, which the
///   server requires before acting on an empty body
#[derive(Debug, Clone)]
pub struct ApiRequestBuilder {
    method: Method,
    url: String,
    version: ApiVersion,
    etag: Option<String>,
    payload: Option<serde_json::Value>,
    extra_headers: Vec<(String, String)>,
}

impl ApiRequestBuilder {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            version: ApiVersion::default(),
            etag: None,
            payload: None,
            extra_headers: Vec::new(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    pub fn post(url: impl Into<String>) -> Self {
        Self::new(Method::POST, url)
    }

    pub fn put(url: impl Into<String>) -> Self {
        Self::new(Method::PUT, url)
    }

    pub fn patch(url: impl Into<String>) -> Self {
        Self::new(Method::PATCH, url)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(Method::DELETE, url)
    }

    pub fn version(mut self, version: ApiVersion) -> Self {
        self.version = version;
        self
    }

    pub fn etag(mut self, etag: impl Into<String>) -> Self {
        self.etag = Some(etag.into());
        self
    }

    pub fn maybe_etag(mut self, etag: Option<&str>) -> Self {
        self.etag = etag.map(str::to_string);
        self
    }

    pub fn payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = Some(payload);
        self
    }

    pub fn json<T: Serialize>(self, payload: &T) -> Result<Self, ApiError> {
        let value = serde_json::to_value(payload)?;
        Ok(self.payload(value))
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    fn is_read(&self) -> bool {
        self.method == Method::GET || self.method == Method::HEAD
    }

    fn is_mutating(&self) -> bool {
        matches!(
            self.method,
            Method::POST | Method::PUT | Method::PATCH | Method::DELETE
        )
    }

    /// Headers this request will carry.
    pub fn headers(&self) -> Result<HeaderMap, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(self.version.accept_header()));
        headers.insert(
            HeaderName::from_static(REQUESTED_WITH_HEADER),
            HeaderValue::from_static("XMLHttpRequest"),
        );

        if let Some(etag) = &self.etag {
            let name = if self.is_read() { IF_NONE_MATCH } else { IF_MATCH };
            let value = HeaderValue::from_str(etag).map_err(|_| ApiError::InvalidHeader {
                name: name.as_str().to_string(),
            })?;
            headers.insert(name, value);
        }

        if self.payload.is_some() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        } else if self.is_mutating() {
            headers.insert(
                HeaderName::from_static(CONFIRM_HEADER),
                HeaderValue::from_static("true"),
            );
        }

        for (name, value) in &self.extra_headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ApiError::InvalidHeader { name: name.clone() })?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| ApiError::InvalidHeader { name: name.clone() })?;
            headers.insert(header_name, header_value);
        }

        Ok(headers)
    }

    pub fn build(self) -> Result<ApiRequest, ApiError> {
        let headers = self.headers()?;
        let body = self.payload.as_ref().map(serde_json::to_string).transpose()?;

        Ok(ApiRequest {
            method: self.method,
            url: self.url,
            headers,
            body,
        })
    }
}
