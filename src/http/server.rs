//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum Router: scripts endpoint at the serving path, file
//!   handler for everything else
//! - Wire up middleware (request id, tracing, no-cache)
//! - Bind the listener and serve until shutdown

use axum::{
    body::Body,
    http::{header, HeaderValue, Request},
    routing::get,
    Router,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::config::ServerConfig;
use crate::error::{Error, Result};
use crate::http::concat::{handle_scripts, ScriptBundle};
use crate::http::files::{handle_files, FileHandler};
use crate::http::request::{request_id, MakeRequestUuid};
use crate::scripts::ComposedScripts;

/// Hostname shown when the real one cannot be determined.
pub const FALLBACK_HOSTNAME: &str = "localhost";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub bundle: Arc<ScriptBundle>,
    pub files: Arc<FileHandler>,
}

/// HTTP server for the development endpoints.
pub struct DevServer {
    router: Router,
    config: Arc<ServerConfig>,
}

impl DevServer {
    /// Create a server from the validated config and the composed scripts.
    pub fn new(config: Arc<ServerConfig>, scripts: ComposedScripts) -> Self {
        let bundle = Arc::new(ScriptBundle::new(&config, Arc::new(scripts)));

        let (files, diagnostics) = FileHandler::new(
            &config.serving_path,
            bundle.manifest(),
            &config.packages,
            &config.base,
        );
        for e in &diagnostics {
            tracing::warn!(error = %e, "Root package skipped");
        }

        let state = AppState {
            bundle,
            files: Arc::new(files),
        };

        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .route(&config.serving_path, get(handle_scripts))
            .fallback(handle_files)
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                    .layer(TraceLayer::new_for_http().make_span_with(
                        |req: &Request<Body>| {
                            tracing::info_span!(
                                "request",
                                method = %req.method(),
                                path = %req.uri().path(),
                                request_id = %request_id(req),
                            )
                        },
                    ))
                    .layer(PropagateRequestIdLayer::x_request_id())
                    .layer(SetResponseHeaderLayer::if_not_present(
                        header::CACHE_CONTROL,
                        HeaderValue::from_static("no-cache"),
                    )),
            )
    }

    /// Bind the configured port on all interfaces.
    pub async fn bind(&self) -> Result<TcpListener> {
        let addr = self.config.bind_address();
        TcpListener::bind(&addr)
            .await
            .map_err(|source| Error::Bind { addr, source })
    }

    /// Serve requests until `shutdown` fires.
    pub async fn run(self, listener: TcpListener, mut shutdown: broadcast::Receiver<()>) -> Result<()> {
        let addr = listener.local_addr().map_err(Error::Serve)?;
        tracing::info!(
            address = %addr,
            serving_path = %self.config.serving_path,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received");
            })
            .await
            .map_err(Error::Serve)?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// The router, for driving requests without a listener.
    pub fn router(&self) -> Router {
        self.router.clone()
    }
}

/// Hostname used in the "listening" message.
pub fn display_hostname() -> String {
    hostname::get()
        .ok()
        .and_then(|h| h.into_string().ok())
        .filter(|h| !h.is_empty())
        .unwrap_or_else(|| FALLBACK_HOSTNAME.to_string())
}
