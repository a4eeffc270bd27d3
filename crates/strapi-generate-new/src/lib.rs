//! # strapi-generate-new
//!
//! Scaffolding library for `create-strapi-app` providing:
//! - Scope construction (one immutable-once record per invocation)
//! - Database-argument parsing and dependency resolution
//! - Cancellation tracking with an explicit token and state machine
//! - Usage telemetry with a bounded settle on every exit path
//!
//! # Examples
//!
//! ```no_run
//! use strapi_generate_new::cancel::{CancelWatcher, OsSignals};
//! use strapi_generate_new::generator::AppGenerator;
//! use strapi_generate_new::scope::CreateOptions;
//! use strapi_generate_new::usage::HttpReporter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let watcher = CancelWatcher::new();
//! watcher.arm(OsSignals);
//!
//! let report = strapi_generate_new::create_project(
//!     "my-app",
//!     &CreateOptions::default(),
//!     &AppGenerator::new(),
//!     &HttpReporter::new(),
//!     &watcher,
//! )
//! .await?;
//!
//! std::process::exit(report.outcome.exit_code() as i32);
//! # }
//! ```

pub mod cancel;
pub mod database;
pub mod error;
pub mod generator;
mod machine;
mod package_manager;
pub mod scope;
pub mod usage;

pub use error::{Error, Result};
pub use scope::{CreateOptions, Scope};

use cancel::CancelWatcher;
use generator::Generator;
use usage::{UsageEvent, UsageReporter};

/// How a creation invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Generation completed
    Created,
    /// User interrupted the creation; tracking settled before winding down
    Cancelled,
    /// Generation failed; the error was logged and tracked
    Failed,
}

impl Outcome {
    /// Process exit code this outcome maps to
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Created | Self::Cancelled => 0,
            Self::Failed => 1,
        }
    }
}

/// Result of [`create_project`]: the outcome plus the scope it ran with
#[derive(Debug, Clone)]
pub struct CreateReport {
    pub outcome: Outcome,
    pub scope: Scope,
}

/// Create a new application in `directory`.
///
/// Builds the scope, folds in the database arguments (validation failures
/// are fatal and propagate as errors), then races the generator against
/// the cancel watcher:
///
/// - generation succeeds: [`Outcome::Created`];
/// - generation fails: the error is logged, an `error-occurred` event is
///   tracked until it settles, [`Outcome::Failed`];
/// - interrupt first: "Cancelling" is logged, a `stop-requested` event is
///   tracked until it settles, [`Outcome::Cancelled`] — the failure path
///   never runs.
///
/// The caller arms `watcher` with a signal source and applies the exit
/// code; this function never terminates the process itself.
pub async fn create_project(
    directory: &str,
    options: &CreateOptions,
    generator: &dyn Generator,
    reporter: &dyn UsageReporter,
    watcher: &CancelWatcher,
) -> Result<CreateReport> {
    let mut scope = Scope::new(directory, options)?;
    database::parse_database_arguments(&mut scope, &options.database)?;

    tracing::info!("Creating a new Strapi application in {}.", scope.root_path);

    let outcome = tokio::select! {
        _ = watcher.cancelled() => {
            tracing::info!("Cancelling");
            usage::track_settled(reporter, UsageEvent::StopRequested, &scope, None).await;
            watcher.terminated();
            Outcome::Cancelled
        }
        result = generator.generate(&scope) => match result {
            Ok(()) => Outcome::Created,
            Err(error) => {
                tracing::error!("{error}");
                usage::track_settled(
                    reporter,
                    UsageEvent::ErrorOccurred,
                    &scope,
                    Some(&error.to_string()),
                )
                .await;
                Outcome::Failed
            }
        }
    };

    Ok(CreateReport { outcome, scope })
}
