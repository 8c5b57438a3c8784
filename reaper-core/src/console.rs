//! Console rendering of run events
//!
//! Events carry a [`Severity`]; how a severity is shown depends on where the
//! tool runs. Azure Pipelines understands `##[...]` logging commands, a
//! terminal gets plain text.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Severity of a reported event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Start of a logical block (run, repository)
    Section,
    Info,
    /// A mutating action that was carried out
    Command,
    Warning,
    Error,
}

/// How events are rendered on stdout
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConsoleFormat {
    /// Azure Pipelines when `TF_BUILD` is set, plain otherwise
    #[default]
    Auto,
    Plain,
    AzurePipelines,
}

impl ConsoleFormat {
    /// Resolve `Auto` against the current environment
    pub fn resolve(self) -> Self {
        self.resolve_with(std::env::var_os("TF_BUILD").is_some())
    }

    fn resolve_with(self, in_pipeline: bool) -> Self {
        match self {
            ConsoleFormat::Auto if in_pipeline => ConsoleFormat::AzurePipelines,
            ConsoleFormat::Auto => ConsoleFormat::Plain,
            other => other,
        }
    }

    /// Render a message for this console
    ///
    /// `Auto` renders as plain; callers resolve it once up front.
    pub fn render(self, severity: Severity, message: &str) -> String {
        match self {
            ConsoleFormat::AzurePipelines => match severity {
                Severity::Section => format!("##[section]{}", message),
                Severity::Command => format!("##[command]{}", message),
                Severity::Warning => format!("##[warning]{}", message),
                Severity::Error => format!("##[error]{}", message),
                Severity::Info => message.to_string(),
            },
            _ => match severity {
                Severity::Warning => format!("warning: {}", message),
                Severity::Error => format!("error: {}", message),
                _ => message.to_string(),
            },
        }
    }
}

impl fmt::Display for ConsoleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleFormat::Auto => "auto",
            ConsoleFormat::Plain => "plain",
            ConsoleFormat::AzurePipelines => "azure-pipelines",
        };
        f.write_str(name)
    }
}

impl FromStr for ConsoleFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ConsoleFormat::Auto),
            "plain" => Ok(ConsoleFormat::Plain),
            "azure-pipelines" | "azure" => Ok(ConsoleFormat::AzurePipelines),
            other => Err(format!(
                "unknown console format '{}', expected auto, plain or azure-pipelines",
                other
            )),
        }
    }
}
