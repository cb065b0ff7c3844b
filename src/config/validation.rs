//! Configuration validation.
//!
//! # Responsibilities
//! - Check required values are present
//! - Apply defaults for optional values
//! - Reject serving paths the router cannot register
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: PartialConfig → Result<ServerConfig, Vec<ValidationError>>
//! - Filesystem checks (base directory) live in the loader

use std::path::PathBuf;

use crate::config::schema::{PartialConfig, ServerConfig, DEFAULT_PORT, DEFAULT_SERVING_PATH};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("required argument not set: {0}")]
    Missing(&'static str),

    #[error("invalid serving path {path:?}: {reason}")]
    ServingPath { path: String, reason: &'static str },
}

/// Validate merged configuration and fill in defaults.
pub fn validate_config(partial: PartialConfig) -> Result<ServerConfig, Vec<ValidationError>> {
    let mut errors = Vec::new();

    let base = required_path(partial.base, "base", &mut errors);
    let packages = partial.packages.unwrap_or_default();
    if packages.iter().all(|p| p.is_empty()) {
        errors.push(ValidationError::Missing("packages"));
    }
    let manifest = required_path(partial.manifest, "manifest", &mut errors);
    let scripts_manifest = required_path(partial.scripts_manifest, "scripts_manifest", &mut errors);

    let serving_path = partial
        .serving_path
        .unwrap_or_else(|| DEFAULT_SERVING_PATH.to_string());
    if let Err(reason) = check_serving_path(&serving_path) {
        errors.push(ValidationError::ServingPath {
            path: serving_path.clone(),
            reason,
        });
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    Ok(ServerConfig {
        port: partial.port.unwrap_or(DEFAULT_PORT),
        base,
        packages: packages.into_iter().filter(|p| !p.is_empty()).collect(),
        manifest,
        scripts_manifest,
        livereload_script: partial
            .livereload_script
            .filter(|p| !p.as_os_str().is_empty()),
        serving_path,
        entry_module: partial.entry_module.filter(|m| !m.is_empty()),
    })
}

fn required_path(
    value: Option<PathBuf>,
    name: &'static str,
    errors: &mut Vec<ValidationError>,
) -> PathBuf {
    match value {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => {
            errors.push(ValidationError::Missing(name));
            PathBuf::new()
        }
    }
}

/// The serving path becomes a literal axum route.
fn check_serving_path(path: &str) -> Result<(), &'static str> {
    if !path.starts_with('/') {
        return Err("must start with '/'");
    }
    if path.contains('{') || path.contains('}') {
        return Err("must not contain '{' or '}'");
    }
    if path
        .split('/')
        .any(|segment| segment.starts_with(':') || segment.starts_with('*'))
    {
        return Err("segments must not start with ':' or '*'");
    }
    Ok(())
}
