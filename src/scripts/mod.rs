//! Script preparation subsystem.
//!
//! # Data Flow
//! ```text
//! scripts manifest ──▶ manifest.rs ──▶ user script paths ─┐
//!                                                         ├──▶ composer.rs ──▶ ComposedScripts
//! IBAZEL_LIVERELOAD_URL ──▶ livereload.rs ──▶ descriptor ─┘        (pre / post, immutable)
//! ```
//!
//! Everything here runs once during startup, before any listener exists.

pub mod composer;
pub mod livereload;
pub mod manifest;

pub use composer::{
    compose_scripts, ComposedScripts, Composition, CompositionInputs, ScriptSnippet, SnippetOrigin,
};
pub use livereload::{parse_live_reload, LiveReloadDescriptor, LIVERELOAD_ENV};
pub use manifest::read_manifest;
