//! Integration tests for the creation orchestrator
//!
//! These tests drive `create_project` end to end with injected generators,
//! reporters and signal sources, so no real process state is touched.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio::sync::Notify;

use strapi_generate_new::cancel::{CancelState, CancelWatcher, SignalSource};
use strapi_generate_new::database::DatabaseArgs;
use strapi_generate_new::generator::{AppGenerator, Generator};
use strapi_generate_new::scope::CreateOptions;
use strapi_generate_new::usage::{UsageEvent, UsageReporter};
use strapi_generate_new::{create_project, Error, Outcome, Result, Scope};

/// Generator that succeeds without touching the filesystem
struct OkGenerator;

#[async_trait]
impl Generator for OkGenerator {
    async fn generate(&self, _scope: &Scope) -> Result<()> {
        Ok(())
    }
}

/// Generator that always fails
struct FailingGenerator;

#[async_trait]
impl Generator for FailingGenerator {
    async fn generate(&self, _scope: &Scope) -> Result<()> {
        Err(Error::generation("disk full"))
    }
}

/// Generator that never completes, standing in for a long generation
struct PendingGenerator;

#[async_trait]
impl Generator for PendingGenerator {
    async fn generate(&self, _scope: &Scope) -> Result<()> {
        std::future::pending::<()>().await;
        Ok(())
    }
}

/// Reporter that records every tracked event
#[derive(Default)]
struct RecordingReporter {
    events: Mutex<Vec<(UsageEvent, Option<String>)>>,
}

impl RecordingReporter {
    fn events(&self) -> Vec<(UsageEvent, Option<String>)> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait]
impl UsageReporter for RecordingReporter {
    async fn track(&self, event: UsageEvent, _scope: &Scope, error: Option<&str>) -> Result<()> {
        self.events
            .lock()
            .unwrap()
            .push((event, error.map(String::from)));
        Ok(())
    }
}

/// Signal source triggered manually from the test body
struct ManualSignal(Arc<Notify>);

#[async_trait]
impl SignalSource for ManualSignal {
    async fn interrupted(&self) {
        self.0.notified().await;
    }
}

#[tokio::test]
async fn test_defaults_end_to_end() {
    let reporter = RecordingReporter::default();
    let report = create_project(
        "my-app",
        &CreateOptions::default(),
        &OkGenerator,
        &reporter,
        &CancelWatcher::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, Outcome::Created);
    assert_eq!(report.outcome.exit_code(), 0);
    assert_eq!(report.scope.name, "my-app");
    assert!(report.scope.root_path.is_absolute());
    assert!(!report.scope.debug);
    assert!(!report.scope.quick);
    assert!(report.scope.run_quickstart_app);
    assert!(reporter.events().is_empty());
}

#[tokio::test]
async fn test_two_invocations_get_distinct_identifiers() {
    let reporter = RecordingReporter::default();
    let options = CreateOptions::default();

    let first = create_project("app-one", &options, &OkGenerator, &reporter, &CancelWatcher::new())
        .await
        .unwrap();
    let second =
        create_project("app-two", &options, &OkGenerator, &reporter, &CancelWatcher::new())
            .await
            .unwrap();

    assert_ne!(first.scope.uuid, second.scope.uuid);
    assert_ne!(first.scope.tmp_path, second.scope.tmp_path);
}

#[tokio::test]
async fn test_generation_failure_is_logged_and_tracked() {
    let reporter = RecordingReporter::default();
    let report = create_project(
        "doomed-app",
        &CreateOptions::default(),
        &FailingGenerator,
        &reporter,
        &CancelWatcher::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, Outcome::Failed);
    assert_eq!(report.outcome.exit_code(), 1);

    let events = reporter.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, UsageEvent::ErrorOccurred);
    assert!(events[0].1.as_deref().unwrap().contains("disk full"));
}

#[tokio::test]
async fn test_interrupt_during_generation_cancels_cleanly() {
    let notify = Arc::new(Notify::new());
    let watcher = CancelWatcher::new();
    watcher.arm(ManualSignal(Arc::clone(&notify)));

    let reporter = Arc::new(RecordingReporter::default());
    let task = {
        let watcher = watcher.clone();
        let reporter = Arc::clone(&reporter);
        tokio::spawn(async move {
            create_project(
                "interrupted-app",
                &CreateOptions::default(),
                &PendingGenerator,
                reporter.as_ref(),
                &watcher,
            )
            .await
        })
    };

    // Let the orchestrator reach the generation race, then interrupt.
    tokio::task::yield_now().await;
    notify.notify_one();

    let report = task.await.unwrap().unwrap();
    assert_eq!(report.outcome, Outcome::Cancelled);
    assert_eq!(report.outcome.exit_code(), 0);
    assert_eq!(watcher.state(), CancelState::Terminated);

    // Only the stop event; the failure path never ran.
    let events = reporter.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].0, UsageEvent::StopRequested);
    assert_eq!(events[0].1, None);
}

#[tokio::test]
async fn test_invalid_database_arguments_are_fatal() {
    let options = CreateOptions {
        database: DatabaseArgs {
            host: Some("localhost".into()),
            ..Default::default()
        },
        ..Default::default()
    };

    let err = create_project(
        "my-app",
        &options,
        &OkGenerator,
        &RecordingReporter::default(),
        &CancelWatcher::new(),
    )
    .await
    .unwrap_err();

    assert!(matches!(err, Error::InvalidDatabaseArguments { .. }));
}

#[tokio::test]
async fn test_database_arguments_extend_scope_dependencies() {
    let options = CreateOptions {
        database: DatabaseArgs {
            client: Some("sqlite".into()),
            name: Some("strapi".into()),
            ..Default::default()
        },
        ..Default::default()
    };

    let report = create_project(
        "sqlite-app",
        &options,
        &OkGenerator,
        &RecordingReporter::default(),
        &CancelWatcher::new(),
    )
    .await
    .unwrap();

    assert!(report.scope.database.is_some());
    assert!(report.scope.additional_dependencies.contains_key("sqlite3"));
}

#[tokio::test]
async fn test_filesystem_generator_creates_the_application() {
    let tmp = tempfile::tempdir().unwrap();
    let target = tmp.path().join("real-app");

    let report = create_project(
        target.to_str().unwrap(),
        &CreateOptions::default(),
        &AppGenerator::new(),
        &RecordingReporter::default(),
        &CancelWatcher::new(),
    )
    .await
    .unwrap();

    assert_eq!(report.outcome, Outcome::Created);
    assert!(target.join("package.json").exists());
}
