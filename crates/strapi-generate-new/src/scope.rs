//! Scope construction for a single project-generation invocation

use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::Serialize;
use uuid::Uuid;

use crate::database::{DatabaseArgs, DatabaseConfig};
use crate::error::{Error, Result};
use crate::{machine, package_manager};

/// Framework packages every generated application depends on, in install order.
pub const STRAPI_DEPENDENCIES: [&str; 9] = [
    "strapi",
    "strapi-admin",
    "strapi-utils",
    "strapi-plugin-settings-manager",
    "strapi-plugin-content-type-builder",
    "strapi-plugin-content-manager",
    "strapi-plugin-users-permissions",
    "strapi-plugin-email",
    "strapi-plugin-upload",
];

/// CLI options consumed by scope construction and database-argument parsing
#[derive(Debug, Clone, Default)]
pub struct CreateOptions {
    /// Whether to run the quickstart application after creation.
    /// Only an explicit `Some(false)` disables the run.
    pub run: Option<bool>,

    /// Debug mode requested on the command line
    pub debug: bool,

    /// Quickstart mode requested on the command line
    pub quickstart: bool,

    /// Database-related options, resolved by the database-argument parser
    pub database: DatabaseArgs,
}

/// Configuration record describing one project-generation invocation.
///
/// Constructed once per invocation and never reconstructed; only the
/// database-argument parser mutates it afterwards (adding dependencies).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Scope {
    /// Absolute filesystem path of the new project
    pub root_path: Utf8PathBuf,

    /// Project name, derived from the final path segment
    pub name: String,

    /// Run the generated application after a quickstart creation
    pub run_quickstart_app: bool,

    /// Version of the scaffolding tool itself
    pub strapi_version: String,

    /// Debug mode
    pub debug: bool,

    /// Quickstart mode
    pub quick: bool,

    /// Random per-invocation identifier for telemetry correlation
    pub uuid: Uuid,

    /// Stable machine identifier for telemetry correlation
    pub device_id: String,

    /// Unique temp-directory path for this invocation
    pub tmp_path: Utf8PathBuf,

    /// Whether yarn was detected on the PATH
    pub has_yarn: bool,

    /// Fixed ordered list of required framework packages
    pub strapi_dependencies: Vec<&'static str>,

    /// Extra packages resolved from the database arguments
    pub additional_dependencies: BTreeMap<String, String>,

    /// Database configuration resolved from the database arguments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database: Option<DatabaseConfig>,
}

impl Scope {
    /// Build the scope for a new invocation.
    ///
    /// `directory` may be relative; it is resolved against the current
    /// working directory so `root_path` is always absolute.
    pub fn new(directory: &str, options: &CreateOptions) -> Result<Self> {
        let root_path = resolve_root(directory)?;
        let name = root_path
            .file_name()
            .unwrap_or(root_path.as_str())
            .to_string();

        Ok(Self {
            root_path,
            name,
            run_quickstart_app: options.run != Some(false),
            strapi_version: env!("CARGO_PKG_VERSION").to_string(),
            debug: options.debug,
            quick: options.quickstart,
            uuid: Uuid::new_v4(),
            device_id: machine::device_id(),
            tmp_path: tmp_path()?,
            has_yarn: package_manager::has_yarn(),
            strapi_dependencies: STRAPI_DEPENDENCIES.to_vec(),
            additional_dependencies: BTreeMap::new(),
            database: None,
        })
    }
}

/// Resolve the project directory to an absolute UTF-8 path.
///
/// The directory does not have to exist yet, so no canonicalization
/// happens here.
fn resolve_root(directory: &str) -> Result<Utf8PathBuf> {
    let path = std::path::Path::new(directory);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()?.join(path)
    };

    Utf8PathBuf::from_path_buf(absolute)
        .map_err(|p| Error::non_utf8_path(p.to_string_lossy().to_string()))
}

/// Unique temp-directory path, rooted in the OS temp directory.
///
/// A random hex suffix keeps concurrent invocations from colliding.
fn tmp_path() -> Result<Utf8PathBuf> {
    let suffix: [u8; 6] = rand::random();
    let dir = std::env::temp_dir().join(format!("strapi{}", hex::encode(suffix)));

    Utf8PathBuf::from_path_buf(dir).map_err(|p| Error::non_utf8_path(p.to_string_lossy().to_string()))
}
