//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::fs;
use std::net::SocketAddr;
use std::path::Path;

use clap::Parser;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use devserver::config::Cli;
use devserver::lifecycle::Prepared;
use devserver::{DevServer, Shutdown};

/// A throwaway base directory.
pub struct Workspace {
    dir: TempDir,
}

impl Workspace {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    /// Write `content` to `rel`, creating parent directories.
    pub fn file(&self, rel: &str, content: &str) -> &Self {
        let path = self.dir.path().join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
        self
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Flags pointing at this workspace plus `extra`.
    pub fn cli(&self, extra: &[&str]) -> Cli {
        let base = format!("--base={}", self.path().display());
        let mut argv = vec![
            "devserver",
            base.as_str(),
            "--packages=app",
            "--manifest=sources.MF",
            "--scripts_manifest=scripts.MF",
        ];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv).unwrap()
    }
}

pub struct Running {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<devserver::Result<()>>,
}

impl Running {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start a server on an ephemeral port.
pub async fn start(prepared: Prepared) -> Running {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = DevServer::new(prepared.config, prepared.scripts);
    let shutdown = Shutdown::new();
    let stop = shutdown.subscribe();
    let handle = tokio::spawn(async move { server.run(listener, stop).await });

    Running {
        addr,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
