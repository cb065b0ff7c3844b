//! Configuration schema definitions.
//!
//! Configuration arrives from three places: command-line flags, an optional
//! TOML file, and built-in defaults. [`PartialConfig`] is the shape shared by
//! the flags and the file; after merging and validation it becomes the
//! immutable [`ServerConfig`].

use std::path::{Path, PathBuf};

use clap::Parser;
use serde::Deserialize;

use crate::scripts::manifest::resolve_in_base;

/// Default port the server listens on.
pub const DEFAULT_PORT: u16 = 5432;

/// Default URL path of the concatenated-script endpoint.
pub const DEFAULT_SERVING_PATH: &str = "/_/ts_scripts.js";

/// Command-line flags.
#[derive(Debug, Clone, Default, Parser)]
#[command(name = "devserver")]
#[command(about = "Development server for concatenated scripts", long_about = None)]
pub struct Cli {
    /// server port to listen on [default: 5432]
    #[arg(long)]
    pub port: Option<u16>,

    /// server base (required, runfiles of the binary)
    #[arg(long)]
    pub base: Option<PathBuf>,

    /// root package(s) to serve, comma-separated
    #[arg(long)]
    pub packages: Option<String>,

    /// sources manifest (.MF)
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    /// preScripts manifest (.MF)
    #[arg(long = "scripts_manifest")]
    pub scripts_manifest: Option<PathBuf>,

    /// path to live reload script
    #[arg(long = "livereload_script")]
    pub livereload_script: Option<PathBuf>,

    /// path to serve the combined sources at [default: /_/ts_scripts.js]
    #[arg(long = "serving_path")]
    pub serving_path: Option<String>,

    /// entry module name
    #[arg(long = "entry_module")]
    pub entry_module: Option<String>,

    /// TOML file with default values for the flags above
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log level when RUST_LOG is not set
    #[arg(long = "log-level", default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// The flag values that take part in configuration merging.
    pub fn overrides(&self) -> PartialConfig {
        PartialConfig {
            port: self.port,
            base: self.base.clone(),
            packages: self.packages.as_deref().map(split_packages),
            manifest: self.manifest.clone(),
            scripts_manifest: self.scripts_manifest.clone(),
            livereload_script: self.livereload_script.clone(),
            serving_path: self.serving_path.clone(),
            entry_module: self.entry_module.clone(),
        }
    }
}

/// Split a comma-separated package list, dropping empty entries.
pub fn split_packages(list: &str) -> Vec<String> {
    list.split(',')
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

/// Unvalidated configuration, as read from the file or the flags.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct PartialConfig {
    pub port: Option<u16>,
    pub base: Option<PathBuf>,
    pub packages: Option<Vec<String>>,
    pub manifest: Option<PathBuf>,
    pub scripts_manifest: Option<PathBuf>,
    pub livereload_script: Option<PathBuf>,
    pub serving_path: Option<String>,
    pub entry_module: Option<String>,
}

impl PartialConfig {
    /// Layer `over` on top of `self`; values present in `over` win.
    pub fn merge(self, over: PartialConfig) -> PartialConfig {
        PartialConfig {
            port: over.port.or(self.port),
            base: over.base.or(self.base),
            packages: over.packages.or(self.packages),
            manifest: over.manifest.or(self.manifest),
            scripts_manifest: over.scripts_manifest.or(self.scripts_manifest),
            livereload_script: over.livereload_script.or(self.livereload_script),
            serving_path: over.serving_path.or(self.serving_path),
            entry_module: over.entry_module.or(self.entry_module),
        }
    }
}

/// Validated server configuration. Built once at startup, read-only after.
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    /// TCP port for the HTTP listener.
    pub port: u16,

    /// Root every relative path resolves against.
    pub base: PathBuf,

    /// Root packages handed to the file handler.
    pub packages: Vec<String>,

    /// Primary-sources manifest, relative to `base`.
    pub manifest: PathBuf,

    /// Pre-scripts manifest, relative to `base`.
    pub scripts_manifest: PathBuf,

    /// Live-reload client script, relative to `base`.
    pub livereload_script: Option<PathBuf>,

    /// URL path of the concatenated-script endpoint.
    pub serving_path: String,

    /// Module bootstrapped after the sources load.
    pub entry_module: Option<String>,
}

impl ServerConfig {
    pub fn manifest_path(&self) -> PathBuf {
        resolve_in_base(&self.base, &self.manifest)
    }

    pub fn scripts_manifest_path(&self) -> PathBuf {
        resolve_in_base(&self.base, &self.scripts_manifest)
    }

    pub fn livereload_script(&self) -> Option<&Path> {
        self.livereload_script.as_deref()
    }

    pub fn entry_module(&self) -> Option<&str> {
        self.entry_module.as_deref().filter(|m| !m.is_empty())
    }

    /// Address the listener binds to.
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_packages() {
        assert_eq!(split_packages("a,b/c"), vec!["a", "b/c"]);
        assert_eq!(split_packages("a,,b,"), vec!["a", "b"]);
        assert!(split_packages("").is_empty());
    }

    #[test]
    fn test_cli_flag_names() {
        let cli = Cli::try_parse_from([
            "devserver",
            "--port=8080",
            "--base=/srv",
            "--packages=app,lib",
            "--manifest=sources.MF",
            "--scripts_manifest=scripts.MF",
            "--livereload_script=lr.js",
            "--serving_path=/bundle.js",
            "--entry_module=app/main",
        ])
        .unwrap();

        let p = cli.overrides();
        assert_eq!(p.port, Some(8080));
        assert_eq!(p.packages, Some(vec!["app".to_string(), "lib".to_string()]));
        assert_eq!(p.scripts_manifest, Some(PathBuf::from("scripts.MF")));
        assert_eq!(p.serving_path.as_deref(), Some("/bundle.js"));
        assert_eq!(p.entry_module.as_deref(), Some("app/main"));
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_merge_prefers_override() {
        let file = PartialConfig {
            port: Some(1000),
            base: Some("/file".into()),
            entry_module: Some("from_file".into()),
            ..Default::default()
        };
        let flags = PartialConfig {
            port: Some(2000),
            ..Default::default()
        };
        let merged = file.merge(flags);
        assert_eq!(merged.port, Some(2000));
        assert_eq!(merged.base, Some(PathBuf::from("/file")));
        assert_eq!(merged.entry_module.as_deref(), Some("from_file"));
    }

    #[test]
    fn test_partial_config_from_toml() {
        let parsed: PartialConfig = toml::from_str(
            r#"
            port = 9000
            base = "/srv/app"
            packages = ["web", "shared"]
            serving_path = "/_/app.js"
            "#,
        )
        .unwrap();
        assert_eq!(parsed.port, Some(9000));
        assert_eq!(parsed.packages.unwrap(), vec!["web", "shared"]);
        assert_eq!(parsed.manifest, None);
    }

    #[test]
    fn test_unknown_toml_keys_are_rejected() {
        assert!(toml::from_str::<PartialConfig>("prot = 1").is_err());
    }
}
