//! Repository listing

use reaper_core::Repository;
use serde::Deserialize;
use tracing::info;

use crate::{AzureDevOpsClient, Result};

#[derive(Debug, Deserialize)]
struct GitRepository {
    id: String,
    name: String,
}

impl From<GitRepository> for Repository {
    fn from(repo: GitRepository) -> Self {
        Repository::new(repo.id, repo.name)
    }
}

impl AzureDevOpsClient {
    /// List all Git repositories in the project
    pub async fn list_repositories(&self) -> Result<Vec<Repository>> {
        let url = self.endpoint(&["git", "repositories"])?;
        let repos: Vec<GitRepository> = self.get_list(url, &[]).await?;

        info!(
            project = %self.project(),
            count = repos.len(),
            "Fetched repositories"
        );

        Ok(repos.into_iter().map(Repository::from).collect())
    }
}
