//! Development server for concatenated scripts.
//!
//! Serves the sources listed in a manifest as one JS document, wrapped in
//! user pre-scripts, an optional live-reload client and an optional
//! entry-module bootstrap, next to plain file serving for root packages.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod scripts;

pub use config::ServerConfig;
pub use error::{Error, Result, Severity};
pub use http::DevServer;
pub use lifecycle::Shutdown;
