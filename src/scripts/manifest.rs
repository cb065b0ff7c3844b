//! Manifest reading.
//!
//! A manifest is a text file with one relative source path per line. Blank
//! lines are skipped; every other line is kept verbatim and in file order,
//! duplicates included.

use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::{Component, Path, PathBuf};

use crate::error::{Error, Result};

/// Read the manifest at `path` and return its entries in file order.
pub fn read_manifest(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|source| Error::ManifestUnreadable {
        path: path.to_path_buf(),
        source,
    })?;

    read_manifest_from(file).map_err(|source| Error::ManifestReadFailure {
        path: path.to_path_buf(),
        source,
    })
}

/// Parse manifest entries from any reader. Split out so the line handling can
/// be exercised without touching the filesystem.
pub fn read_manifest_from<R: Read>(reader: R) -> std::io::Result<Vec<String>> {
    let mut entries = Vec::new();
    for line in BufReader::new(reader).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        entries.push(line);
    }
    Ok(entries)
}

/// Join a manifest entry onto `base`. Leading `/` and drive prefixes are
/// dropped so an entry never replaces the base.
pub fn resolve_in_base(base: &Path, rel: impl AsRef<Path>) -> PathBuf {
    let mut path = base.to_path_buf();
    for component in rel.as_ref().components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => path.push(other),
        }
    }
    path
}
