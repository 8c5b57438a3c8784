//! Branch refs: listing heads and deleting a branch

use reaper_core::{Branch, DeleteOutcome, Repository};
use reqwest::{Method, StatusCode};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{AzureDevOpsClient, Result};

/// Status Azure DevOps answers a successful branch delete with
pub const DELETE_SUCCESS: StatusCode = StatusCode::NO_CONTENT;

#[derive(Debug, Deserialize)]
struct GitRef {
    name: String,
}

impl AzureDevOpsClient {
    /// List the branch heads of a repository
    pub async fn list_branches(&self, repo: &Repository) -> Result<Vec<Branch>> {
        let url = self.endpoint(&["git", "repositories", repo.id.as_str(), "refs"])?;
        let refs: Vec<GitRef> = self.get_list(url, &[("filter", "heads/")]).await?;

        debug!(repo = %repo.name, count = refs.len(), "Fetched branch refs");

        Ok(refs.into_iter().map(|r| Branch::new(r.name)).collect())
    }

    /// Delete a branch by short name
    ///
    /// Only 204 counts as deleted; any other status is returned as
    /// [`DeleteOutcome::Rejected`] with the raw body. Transport failures are
    /// errors.
    pub async fn delete_branch(&self, repo: &Repository, branch: &str) -> Result<DeleteOutcome> {
        let url = self.endpoint(&["git", "repositories", repo.id.as_str(), "refs"])?;
        let filter = format!("heads/{}", branch);

        let response = self
            .request(Method::DELETE, url)
            .query(&[("filter", filter.as_str())])
            .send()
            .await?;

        let status = response.status();
        if status == DELETE_SUCCESS {
            debug!(repo = %repo.name, branch, "Deleted branch");
            return Ok(DeleteOutcome::Deleted);
        }

        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unable to read response".to_string());
        warn!(repo = %repo.name, branch, status = status.as_u16(), "Branch delete rejected");

        Ok(DeleteOutcome::Rejected {
            status: status.as_u16(),
            body,
        })
    }
}
