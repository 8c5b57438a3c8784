//! Azure DevOps REST client using reqwest

use std::time::Duration;

use reaper_core::RunConfig;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, info};
use url::Url;

use crate::{Error, Result};

/// REST API version pinned for every call
pub const API_VERSION: &str = "7.0";

const USER_AGENT: &str = concat!("branch-reaper/", env!("CARGO_PKG_VERSION"));

/// Envelope Azure DevOps wraps list results in
#[derive(Debug, Deserialize)]
pub(crate) struct ListResponse<T> {
    #[serde(default = "Vec::new")]
    pub value: Vec<T>,
}

/// Azure DevOps client scoped to one organization and project
pub struct AzureDevOpsClient {
    http: reqwest::Client,
    base: Url,
    organization: String,
    project: String,
    token: String,
}

impl AzureDevOpsClient {
    /// Create a client for `{api_url}/{organization}/{project}/_apis`
    pub fn new(
        api_url: &str,
        organization: impl Into<String>,
        project: impl Into<String>,
        token: impl Into<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let organization = organization.into();
        let project = project.into();
        let base = project_api_url(api_url, &organization, &project)?;

        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        info!(organization = %organization, project = %project, "Created Azure DevOps client");

        Ok(Self {
            http,
            base,
            organization,
            project,
            token: token.into(),
        })
    }

    /// Create a client from the run configuration
    pub fn from_run_config(config: &RunConfig) -> Result<Self> {
        Self::new(
            &config.api_url,
            &config.organization,
            &config.project,
            &config.token,
            config.timeout,
        )
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn project(&self) -> &str {
        &self.project
    }

    /// URL of `_apis/<segments...>`
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Other(format!("Cannot extend base URL {}", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Authenticated request carrying the pinned api-version
    pub(crate) fn request(&self, method: Method, url: Url) -> RequestBuilder {
        debug!(%method, %url, "Azure DevOps request");
        self.http
            .request(method, url)
            .basic_auth("", Some(&self.token))
            .query(&[("api-version", API_VERSION)])
    }

    /// Send a GET and decode the `value` list of a successful response
    pub(crate) async fn get_list<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let response = self.request(Method::GET, url).query(query).send().await?;
        let response = ensure_success(response).await?;

        let list: ListResponse<T> = response
            .json()
            .await
            .map_err(|e| Error::Parse(format!("Failed to parse response: {}", e)))?;
        Ok(list.value)
    }
}

impl std::fmt::Debug for AzureDevOpsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AzureDevOpsClient")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("base", &self.base.as_str())
            .finish_non_exhaustive()
    }
}

/// Turn a non-2xx response into [`Error::Status`]
pub(crate) async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Unable to read response".to_string());
    Err(Error::Status {
        status: status.as_u16(),
        body,
    })
}

/// Build `{api_url}/{organization}/{project}/_apis/`
fn project_api_url(api_url: &str, organization: &str, project: &str) -> Result<Url> {
    let mut url = Url::parse(api_url)?;
    url.path_segments_mut()
        .map_err(|_| Error::Other(format!("{} cannot be used as a base URL", api_url)))?
        .pop_if_empty()
        .push(organization)
        .push(project)
        .push("_apis")
        .push("");
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_project_api_url() {
        let url = project_api_url("https://dev.azure.com", "contoso", "Platform").unwrap();
        assert_eq!(url.as_str(), "https://dev.azure.com/contoso/Platform/_apis/");
    }

    #[test]
    fn test_project_api_url_trailing_slash_and_spaces() {
        let url = project_api_url("https://dev.azure.com/", "contoso", "My Project").unwrap();
        assert_eq!(url.as_str(), "https://dev.azure.com/contoso/My%20Project/_apis/");
    }

    #[test]
    fn test_project_api_url_rejects_garbage() {
        assert!(project_api_url("not a url", "o", "p").is_err());
        assert!(project_api_url("mailto:ops@example.com", "o", "p").is_err());
    }

    #[test]
    fn test_endpoint_segments() {
        let client =
            AzureDevOpsClient::new("https://dev.azure.com", "contoso", "Platform", "t", None)
                .unwrap();
        let url = client.endpoint(&["git", "repositories", "abc-123", "refs"]).unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/contoso/Platform/_apis/git/repositories/abc-123/refs"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client =
            AzureDevOpsClient::new("https://dev.azure.com", "contoso", "Platform", "s3cr3t", None)
                .unwrap();
        let debug = format!("{:?}", client);
        assert!(debug.contains("contoso"));
        assert!(!debug.contains("s3cr3t"));
    }

    #[test]
    fn test_list_response_tolerates_missing_value() {
        let list: ListResponse<serde_json::Value> = serde_json::from_str("{\"count\":0}").unwrap();
        assert!(list.value.is_empty());
    }
}
