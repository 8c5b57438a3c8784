//! Sweep orchestration
//!
//! Walks every selected repository and branch strictly in order:
//! list repositories → list branches → look up the latest commit → decide →
//! delete (or pretend to). Every outcome goes through the [`Reporter`].

use chrono::{DateTime, Local, Utc};
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::event::{Event, RunSummary};
use crate::host::{BranchHost, DeleteOutcome};
use crate::model::{select_repositories, Repository};
use crate::report::Reporter;
use crate::retention::Decision;
use crate::{Error, Result};

/// Runs one cleanup pass against a [`BranchHost`]
pub struct Sweeper<'a> {
    host: &'a dyn BranchHost,
    config: &'a RunConfig,
    now: DateTime<Utc>,
}

impl<'a> Sweeper<'a> {
    /// Create a sweeper that judges branch age against the current time
    pub fn new(host: &'a dyn BranchHost, config: &'a RunConfig) -> Self {
        Self {
            host,
            config,
            now: Utc::now(),
        }
    }

    /// Judge branch age against a fixed instant
    pub fn at(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Run the sweep
    ///
    /// Fails only when the run cannot proceed at all: the repository list is
    /// unavailable, the repository filter matched nothing, or the transcript
    /// could not be written. Per-repository and per-branch failures are
    /// recorded and counted in the returned summary.
    pub async fn run(&self, reporter: &mut Reporter) -> Result<RunSummary> {
        reporter.record(Event::RunStarted {
            at: Local::now(),
            dry_run: self.config.dry_run,
        })?;

        let all = match self.host.list_repositories().await {
            Ok(all) => all,
            Err(e) => {
                reporter.record(Event::RepositoryListFailed {
                    error: e.to_string(),
                })?;
                return Err(e);
            }
        };
        debug!(count = all.len(), "Fetched repositories");

        let filter = self.config.repo_filter.as_deref();
        let repos = select_repositories(all, filter);

        if let Some(name) = filter {
            if repos.is_empty() {
                reporter.record(Event::RepositoryNotFound {
                    repository: name.to_string(),
                    project: self.config.project.clone(),
                })?;
                return Err(Error::RepositoryNotFound {
                    repository: name.to_string(),
                    project: self.config.project.clone(),
                });
            }
        }

        let mut summary = RunSummary::default();
        for repo in &repos {
            self.sweep_repository(repo, reporter, &mut summary).await?;
        }

        info!(
            repositories = summary.repositories,
            deleted = summary.deleted,
            would_delete = summary.would_delete,
            kept = summary.kept,
            failed = summary.failed,
            "Sweep finished"
        );
        reporter.record(Event::Finished(summary.clone()))?;

        Ok(summary)
    }

    async fn sweep_repository(
        &self,
        repo: &Repository,
        reporter: &mut Reporter,
        summary: &mut RunSummary,
    ) -> Result<()> {
        summary.repositories += 1;
        reporter.record(Event::Repository {
            name: repo.name.clone(),
        })?;

        let branches = match self.host.list_branches(repo).await {
            Ok(branches) => branches,
            Err(e) => {
                summary.failed_repositories.push(repo.name.clone());
                return reporter.record(Event::BranchListFailed {
                    repository: repo.name.clone(),
                    error: e.to_string(),
                });
            }
        };
        debug!(repo = %repo.name, count = branches.len(), "Fetched branches");

        for branch in &branches {
            let name = branch.short_name();

            // Excluded branches never reach the host
            if self.config.retention.is_excluded(name) {
                summary.excluded += 1;
                continue;
            }

            let last_commit = match self.host.latest_commit_date(repo, name).await {
                Ok(date) => date,
                Err(e) => {
                    summary.skipped += 1;
                    reporter.record(Event::CommitLookupFailed {
                        branch: name.to_string(),
                        error: e.to_string(),
                    })?;
                    continue;
                }
            };

            match self.config.retention.evaluate(name, last_commit, self.now) {
                Decision::Excluded => summary.excluded += 1,
                Decision::NoHistory => {
                    summary.skipped += 1;
                    reporter.record(Event::NoHistory {
                        branch: name.to_string(),
                    })?;
                }
                Decision::Retained { last_commit } => {
                    summary.kept += 1;
                    reporter.record(Event::Kept {
                        branch: name.to_string(),
                        last_commit,
                    })?;
                }
                Decision::Stale { last_commit } => {
                    reporter.record(Event::Deleting {
                        branch: name.to_string(),
                        last_commit,
                        dry_run: self.config.dry_run,
                    })?;

                    if self.config.dry_run {
                        summary.would_delete += 1;
                    } else {
                        self.delete(repo, name, reporter, summary).await?;
                    }
                }
            }
        }

        Ok(())
    }

    async fn delete(
        &self,
        repo: &Repository,
        branch: &str,
        reporter: &mut Reporter,
        summary: &mut RunSummary,
    ) -> Result<()> {
        let event = match self.host.delete_branch(repo, branch).await {
            Ok(DeleteOutcome::Deleted) => {
                summary.deleted += 1;
                Event::Deleted {
                    branch: branch.to_string(),
                }
            }
            Ok(DeleteOutcome::Rejected { status, body }) => {
                summary.failed += 1;
                Event::DeleteFailed {
                    branch: branch.to_string(),
                    detail: format!("{} {}", status, body),
                }
            }
            Err(e) => {
                summary.failed += 1;
                Event::DeleteFailed {
                    branch: branch.to_string(),
                    detail: e.to_string(),
                }
            }
        };
        reporter.record(event)
    }
}
