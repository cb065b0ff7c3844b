//! Error types for the development server.
//!
//! Every failure the server can hit during startup is a variant of [`Error`].
//! Whether it stops the process is a property of the variant itself, exposed
//! through [`Error::severity`], not of the place where it happens to surface.
//!
//! ```text
//! Fatal       → reported on stderr, process exits with status 1
//! Degradable  → logged as a warning, the feature or item is left out
//! ```

use std::path::PathBuf;

use crate::config::ValidationError;

/// How an error affects startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The server cannot produce a meaningful response; abort.
    Fatal,
    /// The affected feature or script is omitted; continue.
    Degradable,
}

/// Result alias used across the crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid configuration: {}", join(.0))]
    Validation(Vec<ValidationError>),

    #[error("Cannot read config file {}: {source}", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse config file {}: {source}", path.display())]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Cannot read server base {}: {source}", path.display())]
    BaseUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not read manifest {}: {source}", path.display())]
    ManifestUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed reading manifest {}: {source}", path.display())]
    ManifestReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IBAZEL_LIVERELOAD_URL is not of the form scheme://host:port: {0:?}")]
    LiveReloadMalformed(String),

    #[error("Cannot determine livereload port from IBAZEL_LIVERELOAD_URL: {0:?}")]
    LiveReloadPort(String),

    #[error("livereload script not available")]
    LiveReloadScriptNotConfigured,

    #[error("Failed to read livereload script {}: {source}", path.display())]
    LiveReloadScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read script {}: {source}", path.display())]
    ScriptUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot read server root package at {}: {source}", path.display())]
    RootPackageUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[source] std::io::Error),
}

impl Error {
    /// Classify this error as fatal or degradable.
    pub fn severity(&self) -> Severity {
        match self {
            Error::LiveReloadMalformed(_)
            | Error::LiveReloadPort(_)
            | Error::LiveReloadScriptNotConfigured
            | Error::LiveReloadScriptUnreadable { .. }
            | Error::ScriptUnreadable { .. }
            | Error::RootPackageUnreadable { .. } => Severity::Degradable,

            Error::Validation(_)
            | Error::ConfigUnreadable { .. }
            | Error::ConfigParse { .. }
            | Error::BaseUnreadable { .. }
            | Error::ManifestUnreadable { .. }
            | Error::ManifestReadFailure { .. }
            | Error::Bind { .. }
            | Error::Serve(_) => Severity::Fatal,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

fn join(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}
