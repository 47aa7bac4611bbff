use getset::Getters;
use reqwest::header::HeaderMap;
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;
use url::Url;

use crate::salesforce::SalesforceApiError;
use crate::SalesforceError;

/// Status line and headers of a completed HTTP exchange.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct ResponseMetadata {
    /// The HTTP status returned by Salesforce
    status: StatusCode,

    /// Response headers, e.g. `Sforce-Limit-Info`
    headers: HeaderMap,

    /// The final URL after redirects
    url: Url,
}

impl ResponseMetadata {
    pub fn new(status: StatusCode, headers: HeaderMap, url: Url) -> Self {
        Self { status, headers, url }
    }
}

/// A response body before normalization.
#[derive(Debug, Clone, PartialEq)]
pub enum RawBody {
    /// The body is already a structured value.
    Json(Value),

    /// The body is still text as read from the wire.
    Text(String),
}

/// The uniform result of every network call. Provider level failures (4xx
/// and 5xx) are returned as an [ApiResult] too; check
/// [ApiResult::is_success] or [ResponseMetadata::status].
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct ApiResult {
    response: ResponseMetadata,

    /// Parsed JSON, or an empty object when Salesforce sent no body.
    body: Value,
}

impl ApiResult {
    /// Normalizes `raw` and pairs it with the response metadata.
    pub fn from_raw(response: ResponseMetadata, raw: RawBody) -> Result<Self, SalesforceError> {
        let body = normalize_body(raw).map_err(|(body, source)| SalesforceError::MalformedResponse {
            status: response.status,
            body,
            source,
        })?;
        Ok(Self { response, body })
    }

    pub fn is_success(&self) -> bool {
        self.response.status.is_success()
    }

    pub fn into_body(self) -> Value {
        self.body
    }

    pub fn into_parts(self) -> (ResponseMetadata, Value) {
        (self.response, self.body)
    }

    /// Deserializes the body into a typed value, e.g. a
    /// [crate::TokenResponse].
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T, SalesforceError> {
        T::deserialize(&self.body).map_err(SalesforceError::Decode)
    }

    /// Returns the error entries Salesforce reported, or an empty list when
    /// the body does not carry any.
    pub fn provider_errors(&self) -> Vec<SalesforceApiError> {
        match &self.body {
            Value::Array(entries) => entries
                .iter()
                .filter_map(|entry| SalesforceApiError::deserialize(entry).ok())
                .collect(),
            Value::Object(object) if object.contains_key("error") => {
                SalesforceApiError::deserialize(&self.body).into_iter().collect()
            },
            _ => Vec::new(),
        }
    }
}

/// Turns a raw body into a JSON value. Structured bodies pass through, blank
/// text becomes `{}` and anything else must parse as JSON. On a parse failure
/// the original text is handed back with the error.
pub fn normalize_body(raw: RawBody) -> Result<Value, (String, serde_json::Error)> {
    match raw {
        RawBody::Json(value) => Ok(value),
        RawBody::Text(text) if text.trim().is_empty() => Ok(Value::Object(Map::new())),
        RawBody::Text(text) => serde_json::from_str(&text).map_err(|err| (text, err)),
    }
}

/// Sends `request` once and normalizes whatever comes back.
pub(crate) async fn execute(request: RequestBuilder) -> Result<ApiResult, SalesforceError> {
    let response = request.send().await?;
    let metadata = ResponseMetadata::new(
        response.status(),
        response.headers().clone(),
        response.url().clone(),
    );
    let text = response.text().await?;
    debug!(
        status = %metadata.status,
        url = %metadata.url.path(),
        bytes = text.len(),
        "Salesforce responded"
    );
    ApiResult::from_raw(metadata, RawBody::Text(text))
}
