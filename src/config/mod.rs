//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! --config file (TOML, optional) ─┐
//!                                 ├─▶ PartialConfig::merge (flags win)
//! command-line flags ─────────────┘
//!     → validation.rs (required values, defaults, serving path shape)
//!     → loader.rs (base directory must exist, canonicalised)
//!     → ServerConfig (validated, immutable)
//!     → shared via Arc with the HTTP handlers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - Validation separates syntactic (clap/serde) from semantic checks
//! - Every config problem is fatal

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::load_config;
pub use schema::{Cli, PartialConfig, ServerConfig, DEFAULT_PORT, DEFAULT_SERVING_PATH};
pub use validation::ValidationError;
