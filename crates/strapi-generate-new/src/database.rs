//! Database-argument parsing
//!
//! Resolves the `--db*` CLI options into a [`DatabaseConfig`] and appends the
//! client's package map to the scope's additional dependencies. Validation
//! failures are fatal: they propagate uncaught to the top of the call chain.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::scope::Scope;

/// Raw database options as supplied on the command line
#[derive(Debug, Clone, Default)]
pub struct DatabaseArgs {
    /// Database client (`--dbclient`)
    pub client: Option<String>,

    /// Database host (`--dbhost`)
    pub host: Option<String>,

    /// Database port (`--dbport`)
    pub port: Option<String>,

    /// Database name (`--dbname`)
    pub name: Option<String>,

    /// Database username (`--dbusername`)
    pub username: Option<String>,

    /// Database password (`--dbpassword`)
    pub password: Option<String>,

    /// Database file path, for sqlite (`--dbfile`)
    pub file: Option<String>,

    /// Authentication database, for mongo (`--dbauth`)
    pub auth: Option<String>,

    /// Enable SSL for the connection (`--dbssl`)
    pub ssl: Option<bool>,

    /// Overwrite an existing database configuration (`--dbforce`)
    pub force: bool,
}

impl DatabaseArgs {
    /// True when no database option was supplied at all
    pub fn is_empty(&self) -> bool {
        self.client.is_none()
            && self.host.is_none()
            && self.port.is_none()
            && self.name.is_none()
            && self.username.is_none()
            && self.password.is_none()
            && self.file.is_none()
            && self.auth.is_none()
            && self.ssl.is_none()
            && !self.force
    }
}

/// Supported database clients
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseClient {
    /// SQLite file database (quickstart default)
    Sqlite,
    /// PostgreSQL
    Postgres,
    /// MySQL
    Mysql,
    /// MongoDB
    Mongo,
}

impl DatabaseClient {
    /// Get all supported clients
    pub fn all() -> Vec<Self> {
        vec![Self::Sqlite, Self::Postgres, Self::Mysql, Self::Mongo]
    }

    /// Get the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sqlite => "sqlite",
            Self::Postgres => "postgres",
            Self::Mysql => "mysql",
            Self::Mongo => "mongo",
        }
    }

    /// Get aliases for this client
    pub fn aliases(&self) -> Vec<&'static str> {
        match self {
            Self::Sqlite => vec![],
            Self::Postgres => vec!["postgresql", "pg"],
            Self::Mysql => vec![],
            Self::Mongo => vec!["mongodb"],
        }
    }

    /// Connector package family used for this client
    pub fn connector(&self) -> &'static str {
        match self {
            Self::Mongo => "mongoose",
            _ => "bookshelf",
        }
    }

    /// Parse from string, checking aliases
    pub fn from_str_with_aliases(s: &str) -> Option<Self> {
        let s_lower = s.to_lowercase();

        for client in Self::all() {
            if client.as_str() == s_lower || client.aliases().contains(&s_lower.as_str()) {
                return Some(client);
            }
        }

        None
    }

    /// Packages this client adds to the generated application.
    ///
    /// Connector hooks are pinned to the scaffolding tool's own version;
    /// third-party drivers carry their known-good versions.
    pub fn dependencies(&self, strapi_version: &str) -> BTreeMap<String, String> {
        let mut deps = BTreeMap::new();

        match self {
            Self::Mongo => {
                deps.insert("strapi-hook-mongoose".to_string(), strapi_version.to_string());
                deps.insert("mongoose".to_string(), "5.10.15".to_string());
            }
            _ => {
                deps.insert(
                    "strapi-hook-bookshelf".to_string(),
                    strapi_version.to_string(),
                );
                deps.insert("strapi-hook-knex".to_string(), strapi_version.to_string());
                deps.insert("knex".to_string(), "0.20.13".to_string());

                let driver = match self {
                    Self::Sqlite => ("sqlite3", "4.1.1"),
                    Self::Postgres => ("pg", "8.5.1"),
                    Self::Mysql => ("mysql", "2.18.1"),
                    Self::Mongo => unreachable!(),
                };
                deps.insert(driver.0.to_string(), driver.1.to_string());
            }
        }

        deps
    }
}

impl std::fmt::Display for DatabaseClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for DatabaseClient {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_str_with_aliases(s).ok_or_else(|| {
            Error::unknown_database_client(
                s,
                Self::all()
                    .iter()
                    .map(|c| c.as_str())
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        })
    }
}

/// Resolved database configuration, written into the generated application
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Database client
    pub client: DatabaseClient,

    /// Connector package family
    pub connector: &'static str,

    /// Connection settings
    pub settings: DatabaseSettings,

    /// Connector-specific options
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, serde_json::Value>,

    /// Overwrite an existing database configuration in the target directory
    #[serde(skip)]
    pub force: bool,
}

/// Connection settings for the generated database configuration
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseSettings {
    pub client: DatabaseClient,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,

    pub database: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssl: Option<bool>,
}

/// Parse the database options and fold the result into the scope.
///
/// No-op when no database option was supplied. Otherwise `--dbclient` and
/// `--dbname` are required, and clients other than sqlite additionally
/// require host, port, username and password.
pub fn parse_database_arguments(scope: &mut Scope, args: &DatabaseArgs) -> Result<()> {
    if args.is_empty() {
        return Ok(());
    }

    let client: DatabaseClient = args
        .client
        .as_deref()
        .ok_or_else(|| {
            Error::invalid_database_arguments(
                "--dbclient is required when any database option is set",
            )
        })?
        .parse()?;

    let database = args.name.clone().ok_or_else(|| {
        Error::invalid_database_arguments("--dbname is required when any database option is set")
    })?;

    if client != DatabaseClient::Sqlite {
        let missing: Vec<&str> = [
            ("--dbhost", args.host.is_none()),
            ("--dbport", args.port.is_none()),
            ("--dbusername", args.username.is_none()),
            ("--dbpassword", args.password.is_none()),
        ]
        .iter()
        .filter(|(_, absent)| *absent)
        .map(|(flag, _)| *flag)
        .collect();

        if !missing.is_empty() {
            return Err(Error::invalid_database_arguments(format!(
                "{} required for client '{}'",
                missing.join(", "),
                client
            )));
        }
    }

    let port = match &args.port {
        Some(raw) => Some(raw.parse::<u16>().map_err(|_| {
            Error::invalid_database_arguments(format!("invalid --dbport value: {raw}"))
        })?),
        None => None,
    };

    let mut options = BTreeMap::new();
    if let Some(auth) = &args.auth {
        options.insert(
            "authenticationDatabase".to_string(),
            serde_json::Value::String(auth.clone()),
        );
    }

    let config = DatabaseConfig {
        client,
        connector: client.connector(),
        settings: DatabaseSettings {
            client,
            host: args.host.clone(),
            port,
            database,
            username: args.username.clone(),
            password: args.password.clone(),
            filename: match client {
                DatabaseClient::Sqlite => args.file.clone().or_else(|| Some(".tmp/data.db".into())),
                _ => None,
            },
            ssl: args.ssl,
        },
        options,
        force: args.force,
    };

    scope
        .additional_dependencies
        .extend(client.dependencies(&scope.strapi_version));
    scope.database = Some(config);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::CreateOptions;

    fn scope() -> Scope {
        Scope::new("db-test-app", &CreateOptions::default()).unwrap()
    }

    #[test]
    fn test_client_from_str() {
        assert_eq!(
            "postgres".parse::<DatabaseClient>().unwrap(),
            DatabaseClient::Postgres
        );
        assert_eq!(
            "postgresql".parse::<DatabaseClient>().unwrap(),
            DatabaseClient::Postgres
        );
        assert_eq!(
            "mongodb".parse::<DatabaseClient>().unwrap(),
            DatabaseClient::Mongo
        );
        assert!("oracle".parse::<DatabaseClient>().is_err());
    }

    #[test]
    fn test_no_arguments_is_noop() {
        let mut scope = scope();
        parse_database_arguments(&mut scope, &DatabaseArgs::default()).unwrap();
        assert!(scope.database.is_none());
        assert!(scope.additional_dependencies.is_empty());
    }

    #[test]
    fn test_client_required_when_any_option_set() {
        let mut scope = scope();
        let args = DatabaseArgs {
            host: Some("localhost".into()),
            ..Default::default()
        };

        let err = parse_database_arguments(&mut scope, &args).unwrap_err();
        assert!(matches!(err, Error::InvalidDatabaseArguments { .. }));
    }

    #[test]
    fn test_incomplete_postgres_arguments_rejected() {
        let mut scope = scope();
        let args = DatabaseArgs {
            client: Some("postgres".into()),
            name: Some("strapi".into()),
            host: Some("localhost".into()),
            ..Default::default()
        };

        let err = parse_database_arguments(&mut scope, &args).unwrap_err();
        assert!(err.to_string().contains("--dbport"));
    }

    #[test]
    fn test_sqlite_needs_only_client_and_name() {
        let mut scope = scope();
        let args = DatabaseArgs {
            client: Some("sqlite".into()),
            name: Some("strapi".into()),
            ..Default::default()
        };

        parse_database_arguments(&mut scope, &args).unwrap();
        let config = scope.database.unwrap();
        assert_eq!(config.client, DatabaseClient::Sqlite);
        assert_eq!(config.settings.filename.as_deref(), Some(".tmp/data.db"));
        assert!(scope.additional_dependencies.contains_key("sqlite3"));
        assert!(scope.additional_dependencies.contains_key("knex"));
    }

    #[test]
    fn test_postgres_appends_driver_dependencies() {
        let mut scope = scope();
        let args = DatabaseArgs {
            client: Some("postgres".into()),
            host: Some("localhost".into()),
            port: Some("5432".into()),
            name: Some("strapi".into()),
            username: Some("strapi".into()),
            password: Some("secret".into()),
            ssl: Some(true),
            ..Default::default()
        };

        parse_database_arguments(&mut scope, &args).unwrap();
        let config = scope.database.as_ref().unwrap();
        assert_eq!(config.connector, "bookshelf");
        assert_eq!(config.settings.port, Some(5432));
        assert_eq!(config.settings.ssl, Some(true));
        assert!(scope.additional_dependencies.contains_key("pg"));
        assert_eq!(
            scope.additional_dependencies.get("strapi-hook-knex"),
            Some(&scope.strapi_version)
        );
    }

    #[test]
    fn test_mongo_uses_mongoose_connector_and_auth_option() {
        let mut scope = scope();
        let args = DatabaseArgs {
            client: Some("mongo".into()),
            host: Some("localhost".into()),
            port: Some("27017".into()),
            name: Some("strapi".into()),
            username: Some("strapi".into()),
            password: Some("secret".into()),
            auth: Some("admin".into()),
            ..Default::default()
        };

        parse_database_arguments(&mut scope, &args).unwrap();
        let config = scope.database.as_ref().unwrap();
        assert_eq!(config.connector, "mongoose");
        assert_eq!(
            config.options.get("authenticationDatabase"),
            Some(&serde_json::Value::String("admin".into()))
        );
        assert!(scope.additional_dependencies.contains_key("mongoose"));
        assert!(!scope.additional_dependencies.contains_key("knex"));
    }

    #[test]
    fn test_invalid_port_rejected() {
        let mut scope = scope();
        let args = DatabaseArgs {
            client: Some("postgres".into()),
            host: Some("localhost".into()),
            port: Some("not-a-port".into()),
            name: Some("strapi".into()),
            username: Some("strapi".into()),
            password: Some("secret".into()),
            ..Default::default()
        };

        let err = parse_database_arguments(&mut scope, &args).unwrap_err();
        assert!(err.to_string().contains("dbport"));
    }
}
