//! Concatenated-script endpoint.
//!
//! # Responsibilities
//! - Re-read the primary-sources manifest on every request
//! - Emit pre-scripts, every manifest source, then post-scripts
//! - Keep going when a single source cannot be read
//!
//! # Design Decisions
//! - Each source is wrapped in `eval` with a `sourceURL` so devtools list
//!   the files separately instead of one giant script
//! - No caching: a browser refresh always sees the files on disk
//! - Unreadable manifest → 500; unreadable source → `console.error` in place

use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::http::server::AppState;
use crate::scripts::manifest::{read_manifest_from, resolve_in_base};
use crate::scripts::ComposedScripts;

pub const CONTENT_TYPE_JS: &str = "text/javascript; charset=utf-8";

/// Everything needed to render the combined script.
#[derive(Debug)]
pub struct ScriptBundle {
    base: PathBuf,
    manifest: PathBuf,
    scripts: Arc<ComposedScripts>,
}

impl ScriptBundle {
    pub fn new(config: &ServerConfig, scripts: Arc<ComposedScripts>) -> Self {
        Self {
            base: config.base.clone(),
            manifest: config.manifest_path(),
            scripts,
        }
    }

    /// Render the combined document.
    pub async fn render(&self) -> Result<String> {
        let sources = self.sources().await?;

        let mut out = String::new();
        for snippet in &self.scripts.pre {
            out.push_str(&snippet.source);
            out.push('\n');
        }
        for rel in &sources {
            match tokio::fs::read(resolve_in_base(&self.base, rel)).await {
                Ok(bytes) => write_source(&mut out, rel, &String::from_utf8_lossy(&bytes)),
                Err(e) => {
                    tracing::warn!(path = %rel, error = %e, "Failed to read source");
                    write_read_error(&mut out, rel, &e);
                }
            }
        }
        for snippet in &self.scripts.post {
            out.push_str(&snippet.source);
            out.push('\n');
        }
        Ok(out)
    }

    async fn sources(&self) -> Result<Vec<String>> {
        let bytes = tokio::fs::read(&self.manifest)
            .await
            .map_err(|source| Error::ManifestUnreadable {
                path: self.manifest.clone(),
                source,
            })?;
        read_manifest_from(bytes.as_slice()).map_err(|source| Error::ManifestReadFailure {
            path: self.manifest.clone(),
            source,
        })
    }

    pub fn manifest(&self) -> &Path {
        &self.manifest
    }
}

/// `GET <serving path>`
pub async fn handle_scripts(State(state): State<AppState>) -> Response {
    match state.bundle.render().await {
        Ok(js) => Response::builder()
            .status(StatusCode::OK)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JS)
            .header(header::CACHE_CONTROL, "no-cache")
            .body(Body::from(js))
            .unwrap_or_else(|_| StatusCode::INTERNAL_SERVER_ERROR.into_response()),
        Err(e) => {
            tracing::error!(error = %e, "Cannot render concatenated scripts");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}

fn write_source(out: &mut String, rel: &str, content: &str) {
    out.push_str("eval('");
    escape_js_into(out, content);
    out.push_str("\\n//# sourceURL=' + location.origin + '/");
    escape_js_into(out, rel.trim_start_matches('/'));
    out.push_str("');\n");
}

fn write_read_error(out: &mut String, rel: &str, err: &std::io::Error) {
    out.push_str("console.error('devserver: failed to read ");
    escape_js_into(out, rel);
    out.push_str(": ");
    escape_js_into(out, &err.to_string());
    out.push_str("');\n");
}

/// Escape `s` for a single- or double-quoted JS string literal.
pub(crate) fn escape_js_into(out: &mut String, s: &str) {
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{2028}' => out.push_str("\\u2028"),
            '\u{2029}' => out.push_str("\\u2029"),
            c => out.push(c),
        }
    }
}
