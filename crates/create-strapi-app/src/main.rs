//! create-strapi-app - Scaffold a new Strapi application
//!
//! This is the main entry point for the create-strapi-app command line
//! interface.

mod cli;
mod output;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use strapi_generate_new::cancel::{CancelWatcher, OsSignals};
use strapi_generate_new::generator::AppGenerator;
use strapi_generate_new::usage::HttpReporter;
use strapi_generate_new::{create_project, Outcome};

use cli::Cli;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI args
    let cli = Cli::parse();

    // Initialize tracing
    init_tracing(cli.verbose, cli.quiet);

    let options = cli.create_options();

    let generator = AppGenerator::new();
    let reporter = HttpReporter::new();
    let watcher = CancelWatcher::new();
    watcher.arm(OsSignals);

    let spinner = output::spinner("Creating your application...");
    let report = create_project(&cli.directory, &options, &generator, &reporter, &watcher).await;
    spinner.finish_and_clear();

    let report = report?;
    match report.outcome {
        Outcome::Created => {
            output::success(&format!("Application created in {}", report.scope.root_path));
            let package_manager = if report.scope.has_yarn { "yarn" } else { "npm" };
            if report.scope.run_quickstart_app && report.scope.quick {
                output::info(&format!(
                    "To start your application, run: cd {} && {package_manager} run develop",
                    report.scope.root_path,
                ));
            } else {
                output::info(&format!(
                    "To get started, run: cd {} && {package_manager} install",
                    report.scope.root_path,
                ));
            }
        }
        Outcome::Cancelled => {}
        Outcome::Failed => {
            output::error("The application could not be created");
        }
    }

    Ok(ExitCode::from(report.outcome.exit_code()))
}

/// Initialize tracing with appropriate verbosity
fn init_tracing(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            // Info by default so creation progress is visible
            0 => EnvFilter::new("info"),
            1 => EnvFilter::new("debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter)
        .init();
}
