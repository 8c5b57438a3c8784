//! [`BranchHost`] implementation for Azure DevOps

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};
use reaper_core::{Branch, BranchHost, DeleteOutcome, Repository};

use crate::AzureDevOpsClient;

#[async_trait]
impl BranchHost for AzureDevOpsClient {
    async fn list_repositories(&self) -> reaper_core::Result<Vec<Repository>> {
        Ok(AzureDevOpsClient::list_repositories(self).await?)
    }

    async fn list_branches(&self, repo: &Repository) -> reaper_core::Result<Vec<Branch>> {
        Ok(AzureDevOpsClient::list_branches(self, repo).await?)
    }

    async fn latest_commit_date(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> reaper_core::Result<Option<DateTime<FixedOffset>>> {
        Ok(AzureDevOpsClient::latest_commit_date(self, repo, branch).await?)
    }

    async fn delete_branch(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> reaper_core::Result<DeleteOutcome> {
        Ok(AzureDevOpsClient::delete_branch(self, repo, branch).await?)
    }
}
