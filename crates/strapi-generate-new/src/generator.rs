//! Generation seam and the filesystem generator.
//!
//! [`Generator`] is the call contract the orchestrator delegates to.
//! [`AppGenerator`] is the built-in implementation: it lays down the
//! project directory, the dependency manifest and the database
//! configuration. Anything template-driven stays out of this crate.

use async_trait::async_trait;
use serde_json::json;

use crate::error::{Error, Result};
use crate::scope::Scope;

/// External generation contract
#[async_trait]
pub trait Generator: Send + Sync {
    /// Generate the application described by `scope`
    async fn generate(&self, scope: &Scope) -> Result<()>;
}

/// Filesystem generator writing the minimal application skeleton
#[derive(Debug, Default)]
pub struct AppGenerator;

impl AppGenerator {
    pub fn new() -> Self {
        Self
    }

    fn manifest(scope: &Scope) -> serde_json::Value {
        let mut dependencies = serde_json::Map::new();
        for package in &scope.strapi_dependencies {
            dependencies.insert(package.to_string(), json!(scope.strapi_version));
        }
        for (package, version) in &scope.additional_dependencies {
            dependencies.insert(package.clone(), json!(version));
        }

        json!({
            "name": scope.name,
            "private": true,
            "version": "0.1.0",
            "description": "A Strapi application",
            "scripts": {
                "develop": "strapi develop",
                "start": "strapi start",
                "build": "strapi build",
                "strapi": "strapi",
            },
            "dependencies": serde_json::Value::Object(dependencies),
            "strapi": {
                "uuid": scope.uuid,
            },
            "engines": {
                "node": ">=10.0.0",
            },
            "license": "MIT",
        })
    }
}

#[async_trait]
impl Generator for AppGenerator {
    async fn generate(&self, scope: &Scope) -> Result<()> {
        let root = &scope.root_path;

        if root.exists() {
            let mut entries = tokio::fs::read_dir(root).await?;
            if entries.next_entry().await?.is_some() {
                return Err(Error::directory_not_empty(root.as_str()));
            }
        }
        tokio::fs::create_dir_all(root).await?;

        tracing::debug!(path = %root, "writing package.json");
        let manifest = serde_json::to_string_pretty(&Self::manifest(scope))?;
        tokio::fs::write(root.join("package.json"), manifest).await?;

        tokio::fs::write(root.join(".gitignore"), GITIGNORE).await?;

        if let Some(database) = &scope.database {
            let config_dir = root.join("config");
            tokio::fs::create_dir_all(&config_dir).await?;
            let config = serde_json::to_string_pretty(database)?;
            tokio::fs::write(config_dir.join("database.json"), config).await?;
        }

        Ok(())
    }
}

const GITIGNORE: &str = "node_modules/\n.tmp/\n.cache/\nbuild/\n.env\n";
