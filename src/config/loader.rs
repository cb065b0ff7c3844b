//! Configuration loading.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::schema::{Cli, PartialConfig, ServerConfig};
use crate::config::validation::validate_config;
use crate::error::{Error, Result};

/// Build the server configuration from flags and the optional config file.
pub fn load_config(cli: &Cli) -> Result<ServerConfig> {
    let file = match &cli.config {
        Some(path) => read_config_file(path)?,
        None => PartialConfig::default(),
    };

    let mut config = validate_config(file.merge(cli.overrides())).map_err(Error::Validation)?;
    config.base = resolve_base(&config.base)?;
    Ok(config)
}

/// Parse a TOML config file.
pub fn read_config_file(path: &Path) -> Result<PartialConfig> {
    let content = fs::read_to_string(path).map_err(|source| Error::ConfigUnreadable {
        path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| Error::ConfigParse {
        path: path.to_path_buf(),
        source,
    })
}

/// The base directory must exist; it is canonicalised so later joins are stable.
pub fn resolve_base(base: &Path) -> Result<PathBuf> {
    fs::metadata(base)
        .and_then(|_| fs::canonicalize(base))
        .map_err(|source| Error::BaseUnreadable {
            path: base.to_path_buf(),
            source,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["devserver"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_flags_only() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("--base={}", dir.path().display());
        let config = load_config(&cli(&[
            base.as_str(),
            "--packages=app",
            "--manifest=m.MF",
            "--scripts_manifest=s.MF",
            "--port=7000",
        ]))
        .unwrap();

        assert_eq!(config.port, 7000);
        assert_eq!(config.base, dir.path().canonicalize().unwrap());
        assert_eq!(config.packages, vec!["app"]);
    }

    #[test]
    fn test_missing_base_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let base = format!("--base={}", dir.path().join("nope").display());
        let err = load_config(&cli(&[
            base.as_str(),
            "--packages=app",
            "--manifest=m.MF",
            "--scripts_manifest=s.MF",
        ]))
        .unwrap_err();

        assert!(matches!(err, Error::BaseUnreadable { .. }));
        assert!(err.is_fatal());
    }

    #[test]
    fn test_missing_required_flags() {
        let err = load_config(&cli(&["--packages=app"])).unwrap_err();
        match err {
            Error::Validation(errors) => assert_eq!(errors.len(), 3),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_file_values_with_flag_override() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("devserver.toml");
        fs::write(
            &file,
            format!(
                "port = 6000\nbase = {:?}\npackages = [\"web\"]\nmanifest = \"m.MF\"\nscripts_manifest = \"s.MF\"\nentry_module = \"web/main\"\n",
                dir.path().display().to_string()
            ),
        )
        .unwrap();

        let config_flag = format!("--config={}", file.display());
        let config = load_config(&cli(&[config_flag.as_str(), "--port=6001"])).unwrap();
        assert_eq!(config.port, 6001);
        assert_eq!(config.packages, vec!["web"]);
        assert_eq!(config.entry_module(), Some("web/main"));
    }

    #[test]
    fn test_bad_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("broken.toml");
        fs::write(&file, "port = \"not a number\"").unwrap();
        assert!(matches!(
            read_config_file(&file),
            Err(Error::ConfigParse { .. })
        ));
        assert!(matches!(
            read_config_file(&dir.path().join("absent.toml")),
            Err(Error::ConfigUnreadable { .. })
        ));
    }
}
