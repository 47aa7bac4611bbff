//! This crate wraps the Salesforce OAuth2 [web server flow] and a handful of
//! REST API resources behind a small async client. Every call maps onto one
//! HTTP request and yields an [ApiResult] holding the response metadata and
//! the body as JSON.
//!
//! Salesforce level failures (expired tokens, malformed SOQL, validation
//! rules) are not turned into errors; inspect [ApiResult::is_success] or
//! [ApiResult::provider_errors]. Only transport failures and bodies that are
//! not JSON produce a [SalesforceError].
//!
//! [web server flow]: https://help.salesforce.com/s/articleView?id=sf.remoteaccess_oauth_web_server_flow.htm
//!
//! # Example
//!
//! ```no_run
//! # use salesforce_oauth_client::{ClientConfig, SalesforceClient, TokenResponse};
//! # use reqwest::Client;
//! #
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("3MVG9...", "consumer-secret", "v59.0")?;
//! let client = SalesforceClient::new(config, Client::new());
//!
//! let url = client.authorization_url("csrf-state", "https://app.example.com/callback");
//! println!("Open this URL in your browser:\n{url}");
//!
//! // ...the browser is redirected to the callback with `code` and `state`.
//! # let code = "aPrxsmIEeqM9";
//! let token: TokenResponse = client
//!     .exchange_code(code, "https://app.example.com/callback")
//!     .await?
//!     .decode()?;
//!
//! let contacts = client
//!     .query("SELECT Id, Name FROM Contact LIMIT 10", token.instance_url(), token.access_token())
//!     .await?;
//! println!("{}", contacts.body());
//! # Ok(())
//! # }
//! ```
use reqwest::StatusCode;
use thiserror::Error;

mod response;
pub mod salesforce;

pub use response::{normalize_body, ApiResult, RawBody, ResponseMetadata};
pub use salesforce::oauth::{AuthorizationDisplay, TokenResponse};
pub use salesforce::{
    ApiVersion, ClientConfig, ClientConfigError, ClientId, ClientSecret, SalesforceApiError,
    SalesforceClient, DEFAULT_LOGIN_URL, SANDBOX_LOGIN_URL,
};

/// Represents an error that can occur when talking to Salesforce.
#[derive(Error, Debug)]
pub enum SalesforceError {
    /// The request never completed: DNS, connection, TLS, timeout or a body
    /// that could not be read.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    /// An instance URL that cannot carry a REST resource path.
    #[error("invalid instance url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Salesforce answered with a non-empty body that is not JSON.
    #[error("malformed response body ({status}): {source}")]
    MalformedResponse {
        status: StatusCode,
        body: String,
        #[source]
        source: serde_json::Error,
    },

    /// The JSON body does not have the shape asked for in [ApiResult::decode].
    #[error("unexpected response shape: {0}")]
    Decode(#[source] serde_json::Error),
}
