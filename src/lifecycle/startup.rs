//! Startup orchestration.
//!
//! # Responsibilities
//! - Load and validate configuration
//! - Read the scripts manifest and compose pre/post scripts
//! - Bind the listener and begin serving
//!
//! # Design Decisions
//! - Fail fast on fatal errors; log and continue on degradable ones
//! - Everything before `bind` is synchronous and runs exactly once
//! - Listener starts last (traffic only when ready)

use std::sync::Arc;

use crate::config::{load_config, Cli, ServerConfig};
use crate::error::Result;
use crate::http::{display_hostname, DevServer};
use crate::lifecycle::{signals, Shutdown};
use crate::scripts::{
    compose_scripts, parse_live_reload, read_manifest, ComposedScripts, CompositionInputs,
    LiveReloadDescriptor, LIVERELOAD_ENV,
};

/// Result of the synchronous startup phase.
#[derive(Debug)]
pub struct Prepared {
    pub config: Arc<ServerConfig>,
    pub scripts: ComposedScripts,
    pub live_reload: Option<LiveReloadDescriptor>,
}

/// Build configuration and scripts. `live_reload_value` is the raw value of
/// the live-reload environment variable.
pub fn prepare(cli: &Cli, live_reload_value: Option<&str>) -> Result<Prepared> {
    let config = load_config(cli)?;
    tracing::info!(
        base = %config.base.display(),
        port = config.port,
        serving_path = %config.serving_path,
        packages = ?config.packages,
        "Configuration loaded"
    );

    let user_scripts = read_manifest(&config.scripts_manifest_path())?;

    let live_reload = parse_live_reload(live_reload_value);
    let composition = compose_scripts(&CompositionInputs {
        base: &config.base,
        live_reload: live_reload.as_ref(),
        live_reload_script: config.livereload_script(),
        user_scripts: &user_scripts,
        entry_module: config.entry_module(),
    });

    for e in &composition.diagnostics {
        tracing::warn!(error = %e, severity = ?e.severity(), "Continuing without it");
    }

    let scripts = composition.scripts;
    if let Some(descriptor) = live_reload.as_ref().filter(|_| scripts.live_reload_active()) {
        println!("Serving livereload script for port {}", descriptor);
    }

    tracing::debug!(
        pre_scripts = scripts.pre.len(),
        post_scripts = scripts.post.len(),
        "Scripts composed"
    );

    Ok(Prepared {
        config: Arc::new(config),
        scripts,
        live_reload,
    })
}

/// Run the server until Ctrl+C or a fatal error.
pub async fn run(cli: Cli) -> Result<()> {
    let live_reload_value = std::env::var(LIVERELOAD_ENV).ok();
    let prepared = prepare(&cli, live_reload_value.as_deref())?;

    let server = DevServer::new(prepared.config.clone(), prepared.scripts);
    let listener = server.bind().await?;

    println!(
        "Server listening on http://{}:{}/",
        display_hostname(),
        prepared.config.port
    );

    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    signals::shutdown_on_ctrl_c(shutdown);

    server.run(listener, stop).await
}
