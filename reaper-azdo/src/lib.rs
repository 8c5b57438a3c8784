//! Reaper AzDO - Azure DevOps integration for Branch Reaper
//!
//! This crate talks to the Azure DevOps Git REST API (repositories, refs,
//! commits) and to Microsoft Teams incoming webhooks, and plugs both into
//! the seams defined by `reaper-core`.

mod client;
mod commits;
mod error;
mod host;
mod refs;
mod repos;
mod teams;

pub use client::{AzureDevOpsClient, API_VERSION};
pub use commits::parse_commit_date;
pub use error::{Error, Result};
pub use refs::DELETE_SUCCESS;
pub use teams::TeamsNotifier;
