//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! startup + request handling
//!     → tracing events and spans (request id on every request span)
//!     → logging.rs subscriber (EnvFilter + fmt, stderr)
//! ```

pub mod logging;
