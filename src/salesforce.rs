use std::fmt::{Debug, Display, Formatter};

use getset::Getters;
use nutype::nutype;
use reqwest::Client as HttpClient;
use serde::Deserialize;
use thiserror::Error;
use url::Url;

pub mod oauth;
pub mod rest;

/// Login host for production and developer orgs.
pub const DEFAULT_LOGIN_URL: &str = "https://login.salesforce.com";

/// Login host for sandbox orgs.
pub const SANDBOX_LOGIN_URL: &str = "https://test.salesforce.com";

/// The consumer key of a Salesforce connected app. The value is kept exactly
/// as given.
#[nutype(
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref, Display, Serialize, Deserialize)
)]
pub struct ClientId(String);

/// The consumer secret of a Salesforce connected app. The value is kept
/// exactly as given and its [Debug] output is redacted.
#[nutype(validate(not_empty), derive(Clone, PartialEq, Eq, AsRef, Deref))]
pub struct ClientSecret(String);

impl Debug for ClientSecret {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ClientSecret(<redacted>)")
    }
}

/// The REST API version segment placed in `/services/data/{version}/`, for
/// example `v59.0`.
#[nutype(
    sanitize(trim),
    validate(not_empty),
    derive(Debug, Clone, PartialEq, Eq, Hash, AsRef, Deref, Display, Serialize, Deserialize)
)]
pub struct ApiVersion(String);

/// Represents an error that can occur while building a [ClientConfig].
#[derive(Error, Debug)]
pub enum ClientConfigError {
    #[error("invalid client id: {0}")]
    ClientId(#[from] ClientIdError),

    #[error("invalid client secret: {0}")]
    ClientSecret(#[from] ClientSecretError),

    #[error("invalid api version: {0}")]
    ApiVersion(#[from] ApiVersionError),

    #[error("invalid login url: {0}")]
    LoginUrl(#[from] url::ParseError),

    #[error("login url cannot be used as a base: {0}")]
    LoginUrlNotBase(String),
}

/// Connected app credentials and the API version used by a
/// [SalesforceClient]. A config is immutable once built and every client owns
/// its own copy.
#[derive(Debug, Clone, Getters)]
#[getset(get = "pub")]
pub struct ClientConfig {
    app_id: ClientId,
    app_secret: ClientSecret,
    api_version: ApiVersion,
    login_url: Url,
}

impl ClientConfig {
    /// Validates the three raw values and builds a config that logs in
    /// through [DEFAULT_LOGIN_URL].
    pub fn new(
        app_id: impl Into<String>,
        app_secret: impl Into<String>,
        api_version: impl Into<String>,
    ) -> Result<Self, ClientConfigError> {
        Self::from_parts(
            ClientId::try_new(app_id.into())?,
            ClientSecret::try_new(app_secret.into())?,
            ApiVersion::try_new(api_version.into())?,
        )
    }

    pub fn from_parts(
        app_id: ClientId,
        app_secret: ClientSecret,
        api_version: ApiVersion,
    ) -> Result<Self, ClientConfigError> {
        Ok(Self {
            app_id,
            app_secret,
            api_version,
            login_url: parse_login_url(DEFAULT_LOGIN_URL)?,
        })
    }

    /// Replaces the OAuth host, e.g. with [SANDBOX_LOGIN_URL] or a My Domain
    /// login URL. Only scheme, host and port are kept.
    pub fn with_login_url(mut self, login_url: &str) -> Result<Self, ClientConfigError> {
        self.login_url = parse_login_url(login_url)?;
        Ok(self)
    }

    pub(crate) fn endpoint(&self, path: &str) -> Url {
        let mut url = self.login_url.clone();
        url.set_path(path);
        url.set_query(None);
        url.set_fragment(None);
        url
    }
}

fn parse_login_url(login_url: &str) -> Result<Url, ClientConfigError> {
    let url = Url::parse(login_url)?;
    if url.cannot_be_a_base() {
        return Err(ClientConfigError::LoginUrlNotBase(login_url.to_string()));
    }
    Ok(url)
}

/// An error entry reported by Salesforce in a response body. OAuth endpoints
/// report `{"error", "error_description"}` while the REST API reports a list
/// of `{"errorCode", "message", "fields"}`; both map onto this type.
#[derive(Default, Debug, Clone, PartialEq, Eq, Deserialize, Getters)]
#[getset(get = "pub")]
pub struct SalesforceApiError {
    #[serde(rename = "errorCode", alias = "error")]
    error_code: String,

    #[serde(default, alias = "error_description")]
    message: String,

    #[serde(default)]
    fields: Vec<String>,
}

impl Display for SalesforceApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code, self.message)
    }
}

/// A client for one Salesforce connected app. Cloning is cheap and clones
/// share the underlying connection pool.
///
/// Timeouts, proxies and TLS settings are taken from the injected
/// [reqwest::Client].
#[derive(Debug, Clone)]
pub struct SalesforceClient {
    config: ClientConfig,
    http_client: HttpClient,
}

impl SalesforceClient {
    /// Creates a new [SalesforceClient] with the given config.
    pub fn new(config: ClientConfig, http_client: HttpClient) -> Self {
        Self { config, http_client }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }
}
