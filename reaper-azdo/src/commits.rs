//! Latest commit lookup

use chrono::{DateTime, FixedOffset};
use reaper_core::Repository;
use serde::Deserialize;
use tracing::debug;

use crate::{AzureDevOpsClient, Error, Result};

#[derive(Debug, Deserialize)]
struct GitCommitRef {
    author: GitUserDate,
}

#[derive(Debug, Deserialize)]
struct GitUserDate {
    date: String,
}

/// Parse an Azure DevOps author date (ISO-8601 with offset or `Z`)
pub fn parse_commit_date(raw: &str) -> Result<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(raw)
        .map_err(|e| Error::Parse(format!("Invalid commit date '{}': {}", raw, e)))
}

impl AzureDevOpsClient {
    /// Author date of the newest commit on a branch
    ///
    /// Returns `None` when the service reports no commits.
    pub async fn latest_commit_date(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<DateTime<FixedOffset>>> {
        let url = self.endpoint(&["git", "repositories", repo.id.as_str(), "commits"])?;
        let commits: Vec<GitCommitRef> = self
            .get_list(
                url,
                &[
                    ("searchCriteria.itemVersion.version", branch),
                    ("$top", "1"),
                ],
            )
            .await?;

        let Some(commit) = commits.into_iter().next() else {
            debug!(repo = %repo.name, branch, "No commits on branch");
            return Ok(None);
        };

        parse_commit_date(&commit.author.date).map(Some)
    }
}
