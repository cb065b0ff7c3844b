//! Live-reload endpoint descriptor.
//!
//! The live-reload notification server announces itself through the
//! `IBAZEL_LIVERELOAD_URL` environment variable. Only the leading
//! `scheme://host:port` is looked at; anything after it is ignored.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{Error, Result};

/// Environment variable holding the live-reload endpoint.
pub const LIVERELOAD_ENV: &str = "IBAZEL_LIVERELOAD_URL";

/// Global the live-reload client reads its connection options from.
pub const OPTIONS_GLOBAL: &str = "window.LiveReloadOptions";

/// Scheme token that marks the endpoint as secure. Compared literally.
const SECURE_SCHEME: &str = "https";

static DESCRIPTOR: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([a-zA-Z0-9]+)://([a-zA-Z0-9.]+):([0-9]+)").expect("valid descriptor pattern")
});

/// Where the browser should connect for reload notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiveReloadDescriptor {
    pub scheme: String,
    pub host: String,
    pub port: u16,
}

impl LiveReloadDescriptor {
    /// Parse the prefix of `value`, reporting why it was rejected.
    pub fn try_parse(value: &str) -> Result<Self> {
        let caps = DESCRIPTOR
            .captures(value)
            .ok_or_else(|| Error::LiveReloadMalformed(value.to_string()))?;

        let port = caps[3]
            .parse::<u16>()
            .map_err(|_| Error::LiveReloadPort(value.to_string()))?;

        Ok(Self {
            scheme: caps[1].to_string(),
            host: caps[2].to_string(),
            port,
        })
    }

    /// JS statement that publishes the connection options to the client.
    pub fn options_snippet(&self) -> String {
        format!(
            "{} = {{ https: \"{}\" === \"{}\", host: \"{}\", port: {} }};",
            OPTIONS_GLOBAL, self.scheme, SECURE_SCHEME, self.host, self.port
        )
    }
}

impl fmt::Display for LiveReloadDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}:{}", self.scheme, self.host, self.port)
    }
}

/// Parse the live-reload value, degrading to `None` on any problem.
///
/// Unset or empty means live reload is simply off. A value that cannot be
/// parsed is logged and otherwise treated the same way.
pub fn parse_live_reload(value: Option<&str>) -> Option<LiveReloadDescriptor> {
    let value = value.filter(|v| !v.is_empty())?;
    match LiveReloadDescriptor::try_parse(value) {
        Ok(descriptor) => Some(descriptor),
        Err(e) => {
            tracing::warn!(error = %e, "Live reload disabled");
            None
        }
    }
}
