//! Reaper Core - Core library for Branch Reaper
//!
//! This crate decides which branches of a project have gone stale and drives
//! their removal through a [`BranchHost`], recording every decision in a
//! transcript.

pub mod config;
pub mod console;
pub mod error;
pub mod event;
pub mod host;
pub mod model;
pub mod notify;
pub mod report;
pub mod retention;
pub mod secrets;
pub mod sweep;
pub mod transcript;

pub use config::{Config, RunConfig};
pub use console::{ConsoleFormat, Severity};
pub use error::{Error, Result};
pub use event::{Event, RunSummary};
pub use host::{BranchHost, DeleteOutcome, Notifier};
pub use model::{Branch, Repository};
pub use notify::{notification_text, send_notification, transcript_tail};
pub use report::Reporter;
pub use retention::{Decision, RetentionPolicy};
pub use secrets::Secrets;
pub use sweep::Sweeper;
pub use transcript::Transcript;
