use getset::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use url::Url;

use super::SalesforceClient;
use crate::response::{execute, ApiResult};
use crate::SalesforceError;

const SALESFORCE_AUTHORIZE_PATH: &str = "/services/oauth2/authorize";
const SALESFORCE_TOKEN_PATH: &str = "/services/oauth2/token";
const SALESFORCE_CODE_RESPONSE_TYPE: &str = "code";
const SALESFORCE_CODE_GRANT_TYPE: &str = "authorization_code";
const SALESFORCE_REFRESH_GRANT_TYPE: &str = "refresh_token";

/// How Salesforce renders its login and consent pages.
#[derive(Serialize, Deserialize, Debug, Default, Copy, Clone, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationDisplay {
    /// A full-page authorization screen.
    Page,

    /// A compact dialog for a popup window.
    #[default]
    Popup,

    /// A mobile-optimized dialog for touch screens.
    Touch,

    /// A mobile-optimized dialog for devices without touch screens.
    Mobile,
}

impl AuthorizationDisplay {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Popup => "popup",
            Self::Touch => "touch",
            Self::Mobile => "mobile",
        }
    }
}

/// A typed view of a successful token endpoint response. The raw body of
/// [SalesforceClient::exchange_code] is left untouched; decode it with
/// [ApiResult::decode] when a typed value is more convenient.
#[derive(Deserialize, Debug, Getters, Clone)]
#[getset(get = "pub")]
pub struct TokenResponse {
    /// Bearer token for the REST API
    access_token: String,

    /// Only issued by the authorization code flow when the connected app
    /// grants the `refresh_token` scope
    #[serde(default)]
    refresh_token: Option<String>,

    /// Base URL of the org, used as the host of every REST call
    instance_url: String,

    /// Identity URL that can be passed to [SalesforceClient::identity]
    id: String,

    #[serde(default)]
    token_type: Option<String>,

    /// Milliseconds since the Unix epoch, as a string
    #[serde(default)]
    issued_at: Option<String>,

    /// HMAC-SHA256 of `id` and `issued_at`, base64 encoded
    #[serde(default)]
    signature: Option<String>,

    #[serde(default)]
    scope: Option<String>,
}

impl SalesforceClient {
    /// Builds the URL the end user's browser should be sent to in order to
    /// start the web server flow, using the popup display.
    ///
    /// `state` is echoed back to `redirect_uri` together with the code.
    /// Both values are percent-encoded here, callers pass them raw.
    pub fn authorization_url(&self, state: &str, redirect_uri: &str) -> Url {
        self.authorization_url_with_display(state, redirect_uri, AuthorizationDisplay::default())
    }

    pub fn authorization_url_with_display(
        &self,
        state: &str,
        redirect_uri: &str,
        display: AuthorizationDisplay,
    ) -> Url {
        let mut url = self.config.endpoint(SALESFORCE_AUTHORIZE_PATH);
        url.query_pairs_mut()
            .append_pair("client_id", self.config.app_id().as_str())
            .append_pair("response_type", SALESFORCE_CODE_RESPONSE_TYPE)
            .append_pair("redirect_uri", redirect_uri)
            .append_pair("state", state)
            .append_pair("display", display.as_str());
        url
    }

    /// Exchanges the authorization code received on `redirect_uri` for an
    /// access token. `redirect_uri` must be the same value that was used to
    /// build the authorization URL.
    ///
    /// Salesforce rejections such as `invalid_grant` are returned as a normal
    /// [ApiResult] with a 400 status.
    #[instrument(skip_all, level = "debug")]
    pub async fn exchange_code(
        &self,
        code: &str,
        redirect_uri: &str,
    ) -> Result<ApiResult, SalesforceError> {
        self.request_token(
            SALESFORCE_CODE_GRANT_TYPE,
            &[("code", code), ("redirect_uri", redirect_uri)],
        )
        .await
    }

    /// Obtains a new access token with a refresh token from an earlier
    /// [SalesforceClient::exchange_code].
    #[instrument(skip_all, level = "debug")]
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<ApiResult, SalesforceError> {
        self.request_token(
            SALESFORCE_REFRESH_GRANT_TYPE,
            &[("refresh_token", refresh_token)],
        )
        .await
    }

    async fn request_token(
        &self,
        grant_type: &str,
        grant: &[(&str, &str)],
    ) -> Result<ApiResult, SalesforceError> {
        let url = self.config.endpoint(SALESFORCE_TOKEN_PATH);
        debug!(url = %url, grant_type, "Requesting access token");

        let mut form = grant.to_vec();
        form.push(("grant_type", grant_type));
        form.push(("client_id", self.config.app_id().as_str()));
        form.push(("client_secret", self.config.app_secret().as_str()));

        execute(self.http_client.post(url).form(&form)).await
    }
}
