//! Seams to the remote services a sweep talks to

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset};

use crate::model::{Branch, Repository};
use crate::Result;

/// Result of asking the host to delete a branch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The host answered with something other than success
    Rejected { status: u16, body: String },
}

/// A service hosting Git repositories
#[async_trait]
pub trait BranchHost: Send + Sync {
    /// All repositories in the project
    async fn list_repositories(&self) -> Result<Vec<Repository>>;

    /// Branch heads of a repository
    async fn list_branches(&self, repo: &Repository) -> Result<Vec<Branch>>;

    /// Author date of the most recent commit on `branch`, `None` when the
    /// branch has no commits
    async fn latest_commit_date(
        &self,
        repo: &Repository,
        branch: &str,
    ) -> Result<Option<DateTime<FixedOffset>>>;

    /// Delete a branch by short name
    async fn delete_branch(&self, repo: &Repository, branch: &str) -> Result<DeleteOutcome>;
}

/// Destination for the end-of-run message
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, text: &str) -> Result<()>;
}
