//! Full sweeps against a mocked Azure DevOps project

use chrono::{Duration, Utc};
use reaper_azdo::{AzureDevOpsClient, TeamsNotifier};
use reaper_core::{
    send_notification, Config, Error, Reporter, RunConfig, Sweeper, Transcript,
};
use serde_json::json;
use wiremock::{
    matchers::{method, path, query_param},
    Mock, MockServer, ResponseTemplate,
};

const REPOS: &str = "/contoso/Platform/_apis/git/repositories";
const REFS: &str = "/contoso/Platform/_apis/git/repositories/repo-1/refs";
const COMMITS: &str = "/contoso/Platform/_apis/git/repositories/repo-1/commits";

fn run_config(server: &MockServer, repo_filter: Option<&str>, dry_run: bool) -> RunConfig {
    let mut config = Config::default();
    config.http.api_url = server.uri();
    RunConfig::new(
        &config,
        Some("contoso".to_string()),
        Some("Platform".to_string()),
        Some("token".to_string()),
        repo_filter.map(str::to_string),
        None,
        dry_run,
    )
    .unwrap()
}

fn iso_days_ago(days: i64) -> String {
    (Utc::now() - Duration::days(days)).to_rfc3339()
}

async fn mount_project(server: &MockServer, branches: &[(&str, i64)]) {
    Mock::given(method("GET"))
        .and(path(REPOS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "repo-1", "name": "web"}]
        })))
        .mount(server)
        .await;

    let refs: Vec<_> = std::iter::once("main")
        .chain(branches.iter().map(|(b, _)| *b))
        .map(|b| json!({"name": format!("refs/heads/{}", b)}))
        .collect();
    Mock::given(method("GET"))
        .and(path(REFS))
        .and(query_param("filter", "heads/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "value": refs })))
        .mount(server)
        .await;

    for (branch, age) in branches {
        Mock::given(method("GET"))
            .and(path(COMMITS))
            .and(query_param("searchCriteria.itemVersion.version", *branch))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "value": [{"author": {"date": iso_days_ago(*age)}}]
            })))
            .mount(server)
            .await;
    }
}

#[tokio::test]
async fn test_stale_branch_deleted_and_recorded() {
    let server = MockServer::start().await;
    mount_project(&server, &[("feature-x", 45)]).await;

    Mock::given(method("DELETE"))
        .and(path(REFS))
        .and(query_param("filter", "heads/feature-x"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("deleted_branches.log");
    let config = run_config(&server, None, false);
    let client = AzureDevOpsClient::from_run_config(&config).unwrap();
    let mut reporter = Reporter::silent(Transcript::create(&log).unwrap());

    let summary = Sweeper::new(&client, &config)
        .run(&mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.deleted, 1);
    assert_eq!(summary.excluded, 1);

    let on_disk = std::fs::read_to_string(&log).unwrap();
    assert!(on_disk.contains("\nRepository: web\n"));
    assert!(on_disk.contains("  Deleting 'feature-x' - last commit: "));
    assert!(on_disk.contains("    Deleted successfully\n"));
    assert!(!on_disk.contains("'main'"));
}

#[tokio::test]
async fn test_dry_run_issues_no_delete() {
    let server = MockServer::start().await;
    mount_project(&server, &[("feature-x", 45)]).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = run_config(&server, None, true);
    let client = AzureDevOpsClient::from_run_config(&config).unwrap();
    let mut reporter = Reporter::silent(Transcript::in_memory());

    let summary = Sweeper::new(&client, &config)
        .run(&mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.would_delete, 1);
    assert!(reporter
        .transcript()
        .contents()
        .contains("[DRY RUN] Would delete 'feature-x'"));
}

#[tokio::test]
async fn test_recent_branch_kept() {
    let server = MockServer::start().await;
    mount_project(&server, &[("release-1", 10)]).await;

    Mock::given(method("DELETE"))
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let config = run_config(&server, None, false);
    let client = AzureDevOpsClient::from_run_config(&config).unwrap();
    let mut reporter = Reporter::silent(Transcript::in_memory());

    let summary = Sweeper::new(&client, &config)
        .run(&mut reporter)
        .await
        .unwrap();

    assert_eq!(summary.kept, 1);
    assert!(reporter
        .transcript()
        .contents()
        .contains("  Keeping 'release-1' - last commit: "));
}

#[tokio::test]
async fn test_missing_repository_aborts_without_branch_calls() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(REPOS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "value": [{"id": "repo-1", "name": "web"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(REFS))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"value": []})))
        .expect(0)
        .mount(&server)
        .await;

    let config = run_config(&server, Some("payments"), false);
    let client = AzureDevOpsClient::from_run_config(&config).unwrap();
    let mut reporter = Reporter::silent(Transcript::in_memory());

    let err = Sweeper::new(&client, &config)
        .run(&mut reporter)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::RepositoryNotFound { .. }));
}

#[tokio::test]
async fn test_notification_carries_transcript_tail() {
    let server = MockServer::start().await;
    mount_project(&server, &[("release-1", 10)]).await;

    let hook = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&hook)
        .await;

    let config = run_config(&server, None, false);
    let client = AzureDevOpsClient::from_run_config(&config).unwrap();
    let notifier = TeamsNotifier::new(hook.uri(), None).unwrap();
    let mut reporter = Reporter::silent(Transcript::in_memory());

    Sweeper::new(&client, &config)
        .run(&mut reporter)
        .await
        .unwrap();
    send_notification(&notifier, &mut reporter).await.unwrap();

    let requests = hook.received_requests().await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let text = body["text"].as_str().unwrap();
    assert!(text.starts_with("**Azure DevOps Branch Cleanup Completed:**\n```\n"));
    assert!(text.contains("Keeping 'release-1'"));
    assert!(text.ends_with("\n```"));
}
