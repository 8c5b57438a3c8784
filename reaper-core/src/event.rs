//! Events emitted during a sweep
//!
//! Each event knows its severity, its console message and the line(s) it
//! contributes to the transcript. Some events are console-only.

use chrono::{DateTime, FixedOffset, Local};

use crate::console::Severity;

/// Timestamp layout used for commit dates in transcript lines
const COMMIT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S%:z";

/// Width of the separator under the run banner
pub const SEPARATOR_WIDTH: usize = 50;

/// Counters for a finished sweep
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub repositories: usize,
    pub deleted: usize,
    pub would_delete: usize,
    pub kept: usize,
    pub excluded: usize,
    /// No history or commit lookup failed
    pub skipped: usize,
    /// Deletions that did not succeed
    pub failed: usize,
    /// Repositories whose branches could not be listed
    pub failed_repositories: Vec<String>,
}

impl RunSummary {
    /// Whether any repository could not be enumerated
    pub fn has_enumeration_failures(&self) -> bool {
        !self.failed_repositories.is_empty()
    }
}

/// Something worth telling the operator about
#[derive(Debug, Clone)]
pub enum Event {
    RunStarted {
        at: DateTime<Local>,
        dry_run: bool,
    },
    RepositoryListFailed {
        error: String,
    },
    RepositoryNotFound {
        repository: String,
        project: String,
    },
    Repository {
        name: String,
    },
    BranchListFailed {
        repository: String,
        error: String,
    },
    CommitLookupFailed {
        branch: String,
        error: String,
    },
    NoHistory {
        branch: String,
    },
    Kept {
        branch: String,
        last_commit: DateTime<FixedOffset>,
    },
    Deleting {
        branch: String,
        last_commit: DateTime<FixedOffset>,
        dry_run: bool,
    },
    Deleted {
        branch: String,
    },
    DeleteFailed {
        branch: String,
        detail: String,
    },
    Finished(RunSummary),
    NotificationSent,
    NotificationFailed {
        error: String,
    },
}

impl Event {
    pub fn severity(&self) -> Severity {
        match self {
            Event::RunStarted { .. } | Event::Repository { .. } => Severity::Section,
            Event::Deleted { .. } => Severity::Command,
            Event::RepositoryListFailed { .. }
            | Event::RepositoryNotFound { .. }
            | Event::BranchListFailed { .. }
            | Event::DeleteFailed { .. }
            | Event::NotificationFailed { .. } => Severity::Error,
            Event::CommitLookupFailed { .. } => Severity::Warning,
            Event::NoHistory { .. }
            | Event::Kept { .. }
            | Event::Deleting { .. }
            | Event::Finished(_)
            | Event::NotificationSent => Severity::Info,
        }
    }

    /// Text shown on the console
    pub fn console_message(&self) -> String {
        match self {
            Event::RunStarted { at, dry_run } => {
                let banner = banner(at);
                if *dry_run {
                    format!("{} (dry run)", banner)
                } else {
                    banner
                }
            }
            Event::RepositoryListFailed { error } => {
                format!("Failed to list repositories: {}", error)
            }
            Event::RepositoryNotFound {
                repository,
                project,
            } => format!(
                "Repository '{}' not found in project '{}'",
                repository, project
            ),
            Event::Repository { name } => format!("Repository: {}", name),
            Event::BranchListFailed { repository, error } => {
                format!("Failed to list branches of '{}': {}", repository, error)
            }
            Event::CommitLookupFailed { branch, error } => {
                format!("Failed to read commits for '{}': {}", branch, error)
            }
            Event::NoHistory { branch } => no_history(branch),
            Event::Kept {
                branch,
                last_commit,
            } => kept(branch, last_commit),
            Event::Deleting {
                branch,
                last_commit,
                dry_run,
            } => deleting(branch, last_commit, *dry_run),
            Event::Deleted { branch } => format!("Deleted branch '{}' successfully.", branch),
            Event::DeleteFailed { branch, detail } => {
                format!("Failed to delete branch '{}': {}", branch, detail)
            }
            Event::Finished(summary) => summary_line(summary),
            Event::NotificationSent => "Notification sent to Microsoft Teams.".to_string(),
            Event::NotificationFailed { error } => {
                format!("Failed to send Teams notification: {}", error)
            }
        }
    }

    /// Lines appended to the transcript, in order
    pub fn transcript_lines(&self) -> Vec<String> {
        match self {
            Event::RunStarted { at, .. } => vec![banner(at), "=".repeat(SEPARATOR_WIDTH)],
            Event::RepositoryListFailed { .. } | Event::RepositoryNotFound { .. } => {
                vec![self.console_message()]
            }
            Event::Repository { name } => vec![String::new(), format!("Repository: {}", name)],
            Event::BranchListFailed { error, .. } => {
                vec![format!("  Failed to list branches: {}", error)]
            }
            Event::CommitLookupFailed { .. }
            | Event::NoHistory { .. }
            | Event::Kept { .. }
            | Event::Deleting { .. } => vec![format!("  {}", self.console_message())],
            Event::Deleted { .. } => vec!["    Deleted successfully".to_string()],
            Event::DeleteFailed { detail, .. } => vec![format!("    Failed to delete: {}", detail)],
            Event::Finished(summary) => vec![String::new(), summary_line(summary)],
            Event::NotificationSent | Event::NotificationFailed { .. } => Vec::new(),
        }
    }
}

fn banner(at: &DateTime<Local>) -> String {
    format!(
        "Branch cleanup started: {}",
        at.format("%Y-%m-%d %H:%M:%S%.6f")
    )
}

fn no_history(branch: &str) -> String {
    format!("Skipping '{}' (no commits found)", branch)
}

fn kept(branch: &str, last_commit: &DateTime<FixedOffset>) -> String {
    format!(
        "Keeping '{}' - last commit: {}",
        branch,
        last_commit.format(COMMIT_DATE_FORMAT)
    )
}

fn deleting(branch: &str, last_commit: &DateTime<FixedOffset>, dry_run: bool) -> String {
    let action = if dry_run {
        format!("[DRY RUN] Would delete '{}'", branch)
    } else {
        format!("Deleting '{}'", branch)
    };
    format!(
        "{} - last commit: {}",
        action,
        last_commit.format(COMMIT_DATE_FORMAT)
    )
}

fn summary_line(summary: &RunSummary) -> String {
    let mut line = format!(
        "Summary: {} deleted, {} would delete, {} kept, {} skipped, {} failed",
        summary.deleted, summary.would_delete, summary.kept, summary.skipped, summary.failed
    );
    if summary.has_enumeration_failures() {
        line.push_str(&format!(
            " ({} repositories could not be read: {})",
            summary.failed_repositories.len(),
            summary.failed_repositories.join(", ")
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn commit_date() -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339("2024-05-01T09:30:00+02:00").unwrap()
    }

    #[test]
    fn test_dry_run_line() {
        let event = Event::Deleting {
            branch: "feature-x".to_string(),
            last_commit: commit_date(),
            dry_run: true,
        };
        assert_eq!(
            event.transcript_lines(),
            vec!["  [DRY RUN] Would delete 'feature-x' - last commit: 2024-05-01 09:30:00+02:00"]
        );
        assert_eq!(event.severity(), Severity::Info);
    }

    #[test]
    fn test_deleting_and_result_lines() {
        let deleting = Event::Deleting {
            branch: "feature-x".to_string(),
            last_commit: commit_date(),
            dry_run: false,
        };
        assert_eq!(
            deleting.transcript_lines(),
            vec!["  Deleting 'feature-x' - last commit: 2024-05-01 09:30:00+02:00"]
        );

        let deleted = Event::Deleted {
            branch: "feature-x".to_string(),
        };
        assert_eq!(deleted.transcript_lines(), vec!["    Deleted successfully"]);
        assert_eq!(deleted.console_message(), "Deleted branch 'feature-x' successfully.");
        assert_eq!(deleted.severity(), Severity::Command);

        let failed = Event::DeleteFailed {
            branch: "feature-x".to_string(),
            detail: "403 Forbidden".to_string(),
        };
        assert_eq!(failed.transcript_lines(), vec!["    Failed to delete: 403 Forbidden"]);
        assert_eq!(failed.severity(), Severity::Error);
    }

    #[test]
    fn test_kept_and_skipped_lines() {
        let kept = Event::Kept {
            branch: "release-1".to_string(),
            last_commit: commit_date(),
        };
        assert_eq!(
            kept.transcript_lines(),
            vec!["  Keeping 'release-1' - last commit: 2024-05-01 09:30:00+02:00"]
        );

        let skipped = Event::NoHistory {
            branch: "empty".to_string(),
        };
        assert_eq!(
            skipped.transcript_lines(),
            vec!["  Skipping 'empty' (no commits found)"]
        );
    }

    #[test]
    fn test_banner_and_repository_lines() {
        let started = Event::RunStarted {
            at: Local::now(),
            dry_run: false,
        };
        let lines = started.transcript_lines();
        assert!(lines[0].starts_with("Branch cleanup started: "));
        assert_eq!(lines[1], "=".repeat(50));

        let repo = Event::Repository {
            name: "web".to_string(),
        };
        assert_eq!(repo.transcript_lines(), vec!["", "Repository: web"]);
    }

    #[test]
    fn test_notification_events_stay_off_transcript() {
        assert!(Event::NotificationSent.transcript_lines().is_empty());
        assert!(Event::NotificationFailed {
            error: "500".to_string()
        }
        .transcript_lines()
        .is_empty());
    }

    #[test]
    fn test_summary_line_mentions_failed_repositories() {
        let summary = RunSummary {
            deleted: 2,
            kept: 1,
            failed_repositories: vec!["infra".to_string()],
            ..Default::default()
        };
        let line = summary_line(&summary);
        assert!(line
            .starts_with("Summary: 2 deleted, 0 would delete, 1 kept, 0 skipped, 0 failed"));
        assert!(line.contains("infra"));
    }
}
