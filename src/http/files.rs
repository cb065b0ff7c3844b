//! Package and static file serving.
//!
//! # Responsibilities
//! - Resolve request paths against every root package, then the base
//! - Serve `index.html` for directories that have one
//! - Fall back to an index page for extension-less paths (client-side routing)
//!
//! # Design Decisions
//! - Search order is fixed: `base/<pkg>` in declared order, then `base`
//! - `..` components are rejected before touching the filesystem; symlinks
//!   are followed since build output trees are commonly symlink farms
//! - The index page is looked up per request so edits show up immediately

use std::path::{Component, Path, PathBuf};

use axum::{
    body::Body,
    extract::State,
    http::{header, Request, StatusCode},
    response::{Html, IntoResponse, Response},
};
use percent_encoding::percent_decode_str;
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::error::Error;
use crate::http::server::AppState;

const INDEX_HTML: &str = "index.html";

/// Serves files from the base directory and its root packages.
#[derive(Debug, Clone)]
pub struct FileHandler {
    /// Existing `base/<pkg>` directories, in declared order.
    packages: Vec<PathBuf>,
    /// Search roots: `packages` followed by the base itself.
    roots: Vec<PathBuf>,
    /// Primary-sources manifest; never served.
    manifest: PathBuf,
    /// Generated page used when no package provides an index.html.
    default_page: String,
}

impl FileHandler {
    /// Build a handler. Root packages that cannot be read are returned as
    /// diagnostics and left out of the search.
    pub fn new(
        serving_path: &str,
        manifest: &Path,
        packages: &[String],
        base: &Path,
    ) -> (Self, Vec<Error>) {
        let mut diagnostics = Vec::new();
        let mut dirs = Vec::with_capacity(packages.len());

        for pkg in packages {
            let dir = base.join(pkg);
            match std::fs::metadata(&dir) {
                Ok(_) => dirs.push(dir),
                Err(source) => diagnostics.push(Error::RootPackageUnreadable { path: dir, source }),
            }
        }

        let mut roots = dirs.clone();
        roots.push(base.to_path_buf());

        let handler = Self {
            packages: dirs,
            roots,
            manifest: base.join(manifest),
            default_page: default_page(serving_path),
        };
        (handler, diagnostics)
    }

    /// Map a URL path to a file on disk.
    pub async fn resolve(&self, url_path: &str) -> Option<PathBuf> {
        let rel = relative_path(url_path)?;
        for root in &self.roots {
            let candidate = root.join(&rel);
            if candidate == self.manifest {
                continue;
            }
            match tokio::fs::metadata(&candidate).await {
                Ok(meta) if meta.is_file() => return Some(candidate),
                Ok(meta) if meta.is_dir() => {
                    let index = candidate.join(INDEX_HTML);
                    if is_file(&index).await {
                        return Some(index);
                    }
                }
                _ => {}
            }
        }
        None
    }

    /// First `index.html` provided by a root package.
    pub async fn package_index(&self) -> Option<PathBuf> {
        for dir in &self.packages {
            let index = dir.join(INDEX_HTML);
            if is_file(&index).await {
                return Some(index);
            }
        }
        None
    }

    pub async fn serve(&self, req: Request<Body>) -> Response {
        let path = req.uri().path().to_string();

        if let Some(file) = self.resolve(&path).await {
            tracing::debug!(path = %path, file = %file.display(), "Serving file");
            return serve_file(file, req).await;
        }

        if !wants_index(&path) {
            tracing::debug!(path = %path, "File not found");
            return (StatusCode::NOT_FOUND, format!("File not found: {}", path)).into_response();
        }

        match self.package_index().await {
            Some(index) => serve_file(index, req).await,
            None => (
                [(header::CACHE_CONTROL, "no-cache")],
                Html(self.default_page.clone()),
            )
                .into_response(),
        }
    }
}

/// Fallback handler for everything that is not the scripts endpoint.
pub async fn handle_files(State(state): State<AppState>, req: Request<Body>) -> Response {
    state.files.serve(req).await
}

async fn is_file(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false)
}

async fn serve_file(path: PathBuf, req: Request<Body>) -> Response {
    match ServeFile::new(path).oneshot(req).await {
        Ok(res) => res.map(Body::new).into_response(),
        Err(never) => match never {},
    }
}

/// Decode a URL path into a relative filesystem path. `None` if it tries to
/// leave the roots.
fn relative_path(url_path: &str) -> Option<PathBuf> {
    let decoded = percent_decode_str(url_path).decode_utf8().ok()?;
    let trimmed = decoded.trim_start_matches('/');

    let mut rel = PathBuf::new();
    for component in Path::new(trimmed).components() {
        match component {
            Component::Normal(part) => rel.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }
    Some(rel)
}

/// Paths without an extension are treated as client-side routes.
fn wants_index(url_path: &str) -> bool {
    Path::new(url_path).extension().is_none()
}

fn default_page(serving_path: &str) -> String {
    format!(
        r#"<!doctype html>
<html>
  <head>
    <title>Development Server</title>
  </head>
  <body>
    <script src="{}"></script>
  </body>
</html>
"#,
        serving_path
    )
}
