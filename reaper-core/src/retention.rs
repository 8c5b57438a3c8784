//! Branch retention decisions
//!
//! The only place where a branch is judged. Everything else in the sweep is
//! plumbing around [`RetentionPolicy::evaluate`].

use std::collections::HashSet;

use chrono::{DateTime, Duration, FixedOffset, Utc};

/// Branches that are never considered for deletion
pub const DEFAULT_EXCLUDED_BRANCHES: [&str; 3] = ["main", "master", "develop"];

/// Default age, in days, after which a branch is stale
pub const DEFAULT_THRESHOLD_DAYS: i64 = 30;

/// Outcome of evaluating a single branch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Name is on the exclusion list; skipped without a transcript entry
    Excluded,
    /// No commit could be found for the branch
    NoHistory,
    /// Last commit is older than the threshold
    Stale {
        last_commit: DateTime<FixedOffset>,
    },
    /// Last commit is within the threshold
    Retained {
        last_commit: DateTime<FixedOffset>,
    },
}

impl Decision {
    /// Whether the branch should be deleted
    pub fn is_stale(&self) -> bool {
        matches!(self, Decision::Stale { .. })
    }
}

/// Exclusion set and age threshold for a run
#[derive(Debug, Clone)]
pub struct RetentionPolicy {
    excluded: HashSet<String>,
    threshold: Duration,
}

impl Default for RetentionPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_EXCLUDED_BRANCHES.iter().map(|b| b.to_string()),
            Duration::days(DEFAULT_THRESHOLD_DAYS),
        )
    }
}

impl RetentionPolicy {
    pub fn new(excluded: impl IntoIterator<Item = String>, threshold: Duration) -> Self {
        Self {
            excluded: excluded.into_iter().collect(),
            threshold,
        }
    }

    /// Whether a short branch name is on the exclusion list
    pub fn is_excluded(&self, short_name: &str) -> bool {
        self.excluded.contains(short_name)
    }

    pub fn threshold(&self) -> Duration {
        self.threshold
    }

    /// Decide what to do with a branch
    ///
    /// A branch is stale only when its age is strictly greater than the
    /// threshold; a branch exactly at the threshold is retained.
    pub fn evaluate(
        &self,
        short_name: &str,
        last_commit: Option<DateTime<FixedOffset>>,
        now: DateTime<Utc>,
    ) -> Decision {
        if self.is_excluded(short_name) {
            return Decision::Excluded;
        }

        let Some(last_commit) = last_commit else {
            return Decision::NoHistory;
        };

        let age = now.signed_duration_since(last_commit);
        if age > self.threshold {
            Decision::Stale { last_commit }
        } else {
            Decision::Retained { last_commit }
        }
    }
}
