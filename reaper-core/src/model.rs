//! Repositories and branches as reported by the hosting service

/// Prefix carried by fully-qualified branch refs
pub const HEADS_PREFIX: &str = "refs/heads/";

/// A Git repository within a project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Opaque repository id
    pub id: String,
    /// Display name
    pub name: String,
}

impl Repository {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Case-insensitive exact comparison against a requested name
    pub fn matches_name(&self, filter: &str) -> bool {
        self.name.to_lowercase() == filter.to_lowercase()
    }
}

/// A branch head belonging to a repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Branch {
    /// Fully-qualified ref name, e.g. `refs/heads/feature/login`
    pub ref_name: String,
}

impl Branch {
    pub fn new(ref_name: impl Into<String>) -> Self {
        Self {
            ref_name: ref_name.into(),
        }
    }

    /// Branch name with the `refs/heads/` prefix stripped
    pub fn short_name(&self) -> &str {
        short_branch_name(&self.ref_name)
    }
}

/// Strip the `refs/heads/` prefix from a ref name, if present
pub fn short_branch_name(ref_name: &str) -> &str {
    ref_name.strip_prefix(HEADS_PREFIX).unwrap_or(ref_name)
}

/// Select the repositories to process
///
/// With no filter every repository is returned. With a filter, only
/// case-insensitive exact matches are kept; an empty result is for the
/// caller to treat as fatal.
pub fn select_repositories(all: Vec<Repository>, filter: Option<&str>) -> Vec<Repository> {
    match filter {
        Some(name) => all.into_iter().filter(|r| r.matches_name(name)).collect(),
        None => all,
    }
}
