use serde::Serialize;
use tracing::{debug, instrument};
use url::{ParseError, Url};

use super::SalesforceClient;
use crate::response::{execute, ApiResult};
use crate::SalesforceError;

const SALESFORCE_CONTACT_SOBJECT: &str = "Contact";

impl SalesforceClient {
    /// Runs a SOQL query against the org at `instance_url`. Only the first
    /// batch of records is returned; `nextRecordsUrl` is left to the caller.
    #[instrument(skip_all, level = "debug")]
    pub async fn query(
        &self,
        soql: &str,
        instance_url: &str,
        access_token: &str,
    ) -> Result<ApiResult, SalesforceError> {
        let url = self.data_url(instance_url, &["query"])?;
        debug!(url = %url, "Running SOQL query");
        let request = self
            .http_client
            .get(url)
            .query(&[("q", soql)])
            .bearer_auth(access_token);
        execute(request).await
    }

    /// Lists the sObject types available in the org, the `describeGlobal`
    /// resource.
    #[instrument(skip_all, level = "debug")]
    pub async fn list_object_types(
        &self,
        instance_url: &str,
        access_token: &str,
    ) -> Result<ApiResult, SalesforceError> {
        let url = self.data_url(instance_url, &["sobjects"])?;
        debug!(url = %url, "Listing sObject types");
        execute(self.http_client.get(url).bearer_auth(access_token)).await
    }

    /// Fetches the identity of the user the token belongs to. `identity_url`
    /// is the `id` field of the token response.
    #[instrument(skip_all, level = "debug")]
    pub async fn identity(
        &self,
        access_token: &str,
        identity_url: &str,
    ) -> Result<ApiResult, SalesforceError> {
        debug!(url = %identity_url, "Fetching identity");
        execute(self.http_client.get(identity_url).bearer_auth(access_token)).await
    }

    /// Creates a Contact from `fields`, e.g.
    /// `json!({"LastName": "Doe", "Email": "jane@example.com"})`.
    #[instrument(skip_all, level = "debug")]
    pub async fn create_contact<T: Serialize + ?Sized>(
        &self,
        fields: &T,
        access_token: &str,
        instance_url: &str,
    ) -> Result<ApiResult, SalesforceError> {
        let url = self.data_url(instance_url, &["sobjects", SALESFORCE_CONTACT_SOBJECT, ""])?;
        debug!(url = %url, "Creating contact");
        execute(self.http_client.post(url).bearer_auth(access_token).json(fields)).await
    }

    /// Updates the given fields of an existing Contact. Salesforce answers a
    /// successful update with `204 No Content`, which yields an empty body.
    ///
    /// `contact_id` is sent as a single path segment, so `/`, `?` and `#` are
    /// percent-encoded rather than changing the resource.
    #[instrument(skip_all, fields(contact_id = %contact_id), level = "debug")]
    pub async fn update_contact<T: Serialize + ?Sized>(
        &self,
        fields: &T,
        contact_id: &str,
        access_token: &str,
        instance_url: &str,
    ) -> Result<ApiResult, SalesforceError> {
        let url = self.data_url(
            instance_url,
            &["sobjects", SALESFORCE_CONTACT_SOBJECT, contact_id],
        )?;
        debug!(url = %url, "Updating contact");
        execute(self.http_client.patch(url).bearer_auth(access_token).json(fields)).await
    }

    /// `{instance_url}/services/data/{api_version}/` followed by `resource`,
    /// each entry encoded as one path segment.
    fn data_url(&self, instance_url: &str, resource: &[&str]) -> Result<Url, ParseError> {
        let mut url = Url::parse(instance_url)?;
        url.path_segments_mut()
            .map_err(|_| ParseError::RelativeUrlWithCannotBeABaseBase)?
            .pop_if_empty()
            .extend(["services", "data", self.config.api_version().as_str()])
            .extend(resource);
        Ok(url)
    }
}
