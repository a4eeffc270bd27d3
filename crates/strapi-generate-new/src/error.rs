//! Error types for strapi-generate-new

use thiserror::Error;

/// Result type alias using strapi-generate-new's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Scaffolding error types
#[derive(Error, Debug)]
pub enum Error {
    /// Database arguments failed validation
    #[error("Invalid database arguments: {message}")]
    InvalidDatabaseArguments { message: String },

    /// Unknown database client
    #[error("Unknown database client: {client}. Available clients: {available}")]
    UnknownDatabaseClient { client: String, available: String },

    /// Target directory already contains files
    #[error("Directory is not empty: {path}")]
    DirectoryNotEmpty { path: String },

    /// Project path contains non-UTF-8 components
    #[error("Project path is not valid UTF-8: {path}")]
    NonUtf8Path { path: String },

    /// Application generation failed
    #[error("Generation failed: {message}")]
    Generation { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Usage telemetry transport error
    #[error("Usage tracking request failed: {0}")]
    Tracking(#[from] reqwest::Error),
}

impl Error {
    /// Create an invalid database arguments error
    pub fn invalid_database_arguments(message: impl Into<String>) -> Self {
        Self::InvalidDatabaseArguments {
            message: message.into(),
        }
    }

    /// Create an unknown database client error
    pub fn unknown_database_client(
        client: impl Into<String>,
        available: impl Into<String>,
    ) -> Self {
        Self::UnknownDatabaseClient {
            client: client.into(),
            available: available.into(),
        }
    }

    /// Create a directory not empty error
    pub fn directory_not_empty(path: impl Into<String>) -> Self {
        Self::DirectoryNotEmpty { path: path.into() }
    }

    /// Create a non-UTF-8 path error
    pub fn non_utf8_path(path: impl Into<String>) -> Self {
        Self::NonUtf8Path { path: path.into() }
    }

    /// Create a generation error
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }
}
