//! Sweep command - delete stale branches in an Azure DevOps project

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::Args;
use reaper_azdo::{AzureDevOpsClient, TeamsNotifier};
use reaper_core::{
    send_notification, Config, ConsoleFormat, Event, Reporter, RunConfig, Secrets, Sweeper,
    Transcript,
};

/// Arguments for the sweep command
#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Azure DevOps organization
    #[arg(long, env = "ORGANIZATION")]
    pub organization: Option<String>,

    /// Project within the organization
    #[arg(long, env = "PROJECT")]
    pub project: Option<String>,

    /// Personal access token (falls back to ~/.config/reaper/secrets.toml)
    #[arg(long, env = "PAT", hide_env_values = true)]
    pub pat: Option<String>,

    /// Only sweep the repository with this name (case-insensitive)
    #[arg(long = "repo", env = "REPO_NAME")]
    pub repo_name: Option<String>,

    /// Microsoft Teams incoming webhook to notify when done
    #[arg(long, env = "TEAMS_WEBHOOK_URL", hide_env_values = true)]
    pub teams_webhook_url: Option<String>,

    /// Report what would be deleted without deleting anything
    #[arg(long, env = "DRY_RUN", value_parser = FalseyValueParser::new())]
    pub dry_run: bool,

    /// Transcript file (overrides config)
    #[arg(long)]
    pub transcript: Option<PathBuf>,

    /// Azure DevOps service root (overrides config)
    #[arg(long)]
    pub api_url: Option<String>,

    /// Console format: auto, plain or azure-pipelines (overrides config)
    #[arg(long)]
    pub console: Option<ConsoleFormat>,
}

impl SweepArgs {
    /// Execute the sweep command
    pub async fn execute(self, verbose: bool, config: Config) -> anyhow::Result<()> {
        let config = config.with_cli_overrides(self.transcript, self.api_url, self.console);
        let token = Secrets::resolve_token(self.pat)?;

        let run = RunConfig::new(
            &config,
            self.organization,
            self.project,
            token,
            self.repo_name,
            self.teams_webhook_url,
            self.dry_run,
        )?;

        if verbose {
            tracing::info!(config = ?run, "Starting sweep");
        }

        let transcript = Transcript::create(&run.transcript_path)?;
        let mut reporter = Reporter::new(transcript, run.console);
        let client = AzureDevOpsClient::from_run_config(&run)?;

        // Fatal outcomes return here, before any notification
        let summary = Sweeper::new(&client, &run).run(&mut reporter).await?;

        if let Some(ref url) = run.webhook_url {
            match TeamsNotifier::new(url, run.timeout) {
                Ok(notifier) => send_notification(&notifier, &mut reporter).await?,
                Err(e) => reporter.record(Event::NotificationFailed {
                    error: e.to_string(),
                })?,
            }
        }

        println!();
        println!("Transcript written to {}", run.transcript_path.display());

        if summary.has_enumeration_failures() {
            anyhow::bail!(
                "Branches of {} repositories could not be listed: {}",
                summary.failed_repositories.len(),
                summary.failed_repositories.join(", ")
            );
        }

        Ok(())
    }
}
