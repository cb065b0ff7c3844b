//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request id)
//!     → GET <serving path> → concat.rs (pre-scripts + sources + post-scripts)
//!     → anything else      → files.rs (root packages, base, index fallback)
//! ```

pub mod concat;
pub mod files;
pub mod request;
pub mod server;

pub use concat::ScriptBundle;
pub use files::FileHandler;
pub use request::{MakeRequestUuid, X_REQUEST_ID};
pub use server::{display_hostname, AppState, DevServer};
