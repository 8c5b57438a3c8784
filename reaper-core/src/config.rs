//! Configuration management for Branch Reaper
//!
//! Configuration is loaded with the following priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (ORGANIZATION, PROJECT, PAT, ...)
//! 3. Config file (~/.config/reaper/config.toml)
//! 4. Default values
//!
//! The file only carries settings that are stable across runs. Everything
//! identifying a single run is assembled into an immutable [`RunConfig`].

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::console::ConsoleFormat;
use crate::retention::{RetentionPolicy, DEFAULT_EXCLUDED_BRANCHES, DEFAULT_THRESHOLD_DAYS};
use crate::{Error, Result};

/// Default Azure DevOps service root
pub const DEFAULT_API_URL: &str = "https://dev.azure.com";

/// Default transcript location, relative to the working directory
pub const DEFAULT_TRANSCRIPT_PATH: &str = "deleted_branches.log";

/// Retention settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Age in days after which a branch is stale
    pub threshold_days: i64,

    /// Branch short names that are never deleted
    pub excluded_branches: Vec<String>,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            threshold_days: DEFAULT_THRESHOLD_DAYS,
            excluded_branches: DEFAULT_EXCLUDED_BRANCHES
                .iter()
                .map(|b| b.to_string())
                .collect(),
        }
    }
}

/// Transcript settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TranscriptConfig {
    /// Where the run transcript is written
    pub path: PathBuf,
}

impl Default for TranscriptConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_TRANSCRIPT_PATH),
        }
    }
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Service root, without organization or project
    pub api_url: String,

    /// Per-request timeout; unset means wait indefinitely
    #[serde(with = "humantime_serde")]
    pub timeout: Option<Duration>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            timeout: None,
        }
    }
}

/// Console output settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct ConsoleConfig {
    pub format: ConsoleFormat,
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub retention: RetentionConfig,
    pub transcript: TranscriptConfig,
    pub http: HttpConfig,
    pub console: ConsoleConfig,
}

impl Config {
    /// Load configuration from the default config file location
    ///
    /// Returns default config if file doesn't exist
    pub fn load() -> Result<Self> {
        if let Some(path) = Self::default_config_path() {
            if path.exists() {
                return Self::load_from_file(&path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(Error::Io)?;
        toml::from_str(&contents)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))
    }

    /// Get the default config file path
    ///
    /// Returns `~/.config/reaper/config.toml` on Unix
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("reaper").join("config.toml"))
    }

    /// Apply CLI flag overrides
    pub fn with_cli_overrides(
        mut self,
        transcript: Option<PathBuf>,
        api_url: Option<String>,
        format: Option<ConsoleFormat>,
    ) -> Self {
        if let Some(path) = transcript {
            self.transcript.path = path;
        }

        if let Some(url) = api_url {
            self.http.api_url = url;
        }

        if let Some(f) = format {
            self.console.format = f;
        }

        self
    }

    /// Build the retention policy described by this configuration
    pub fn retention_policy(&self) -> Result<RetentionPolicy> {
        if self.retention.threshold_days < 0 {
            return Err(Error::Config(format!(
                "retention.threshold_days must not be negative, got {}",
                self.retention.threshold_days
            )));
        }

        Ok(RetentionPolicy::new(
            self.retention.excluded_branches.iter().cloned(),
            chrono::Duration::days(self.retention.threshold_days),
        ))
    }
}

/// Everything one sweep needs, fixed for the duration of the run
#[derive(Clone)]
pub struct RunConfig {
    pub organization: String,
    pub project: String,
    pub token: String,
    /// Only process the repository with this name (case-insensitive)
    pub repo_filter: Option<String>,
    /// Teams incoming webhook to notify at the end of the run
    pub webhook_url: Option<String>,
    /// Report decisions without deleting anything
    pub dry_run: bool,
    pub retention: RetentionPolicy,
    pub transcript_path: PathBuf,
    pub api_url: String,
    pub timeout: Option<Duration>,
    pub console: ConsoleFormat,
}

impl RunConfig {
    /// Validate the required run inputs and combine them with file settings
    pub fn new(
        config: &Config,
        organization: Option<String>,
        project: Option<String>,
        token: Option<String>,
        repo_filter: Option<String>,
        webhook_url: Option<String>,
        dry_run: bool,
    ) -> Result<Self> {
        let organization = require("ORGANIZATION", organization)?;
        let project = require("PROJECT", project)?;
        let token = require("PAT", token)?;

        url::Url::parse(&config.http.api_url).map_err(|e| {
            Error::Config(format!("Invalid api_url '{}': {}", config.http.api_url, e))
        })?;

        if let Some(ref hook) = webhook_url {
            url::Url::parse(hook)
                .map_err(|e| Error::Config(format!("Invalid webhook URL: {}", e)))?;
        }

        Ok(Self {
            organization,
            project,
            token,
            repo_filter: repo_filter.filter(|r| !r.trim().is_empty()),
            webhook_url: webhook_url.filter(|w| !w.trim().is_empty()),
            dry_run,
            retention: config.retention_policy()?,
            transcript_path: config.transcript.path.clone(),
            api_url: config.http.api_url.clone(),
            timeout: config.http.timeout,
            console: config.console.format,
        })
    }
}

impl std::fmt::Debug for RunConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunConfig")
            .field("organization", &self.organization)
            .field("project", &self.project)
            .field("repo_filter", &self.repo_filter)
            .field("webhook", &self.webhook_url.is_some())
            .field("dry_run", &self.dry_run)
            .field("retention", &self.retention)
            .field("transcript_path", &self.transcript_path)
            .field("api_url", &self.api_url)
            .finish_non_exhaustive()
    }
}

fn require(name: &str, value: Option<String>) -> Result<String> {
    match value.map(|v| v.trim().to_string()) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(Error::Config(format!("{} is required", name))),
    }
}
