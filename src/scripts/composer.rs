//! Script composition.
//!
//! Builds the snippets that wrap the concatenated sources. Load order is
//! fixed:
//!
//! ```text
//! pre:  live-reload options → live-reload client → user scripts (manifest order)
//! post: entry-module bootstrap
//! ```
//!
//! Problems that only cost a feature or a single script are collected as
//! diagnostics next to the result instead of aborting composition.

use std::path::{Path, PathBuf};

use crate::error::Error;
use crate::http::concat::escape_js_into;
use crate::scripts::livereload::LiveReloadDescriptor;
use crate::scripts::manifest::resolve_in_base;

/// Where a snippet came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetOrigin {
    LiveReloadConfig,
    LiveReloadClient,
    UserScript(String),
    EntryBootstrap,
}

/// A piece of JS emitted verbatim into the combined response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSnippet {
    pub origin: SnippetOrigin,
    pub source: String,
}

impl ScriptSnippet {
    fn new(origin: SnippetOrigin, source: impl Into<String>) -> Self {
        Self {
            origin,
            source: source.into(),
        }
    }
}

/// Snippets placed before and after the concatenated sources.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComposedScripts {
    pub pre: Vec<ScriptSnippet>,
    pub post: Vec<ScriptSnippet>,
}

impl ComposedScripts {
    /// True when the live-reload client made it into the pre-scripts.
    pub fn live_reload_active(&self) -> bool {
        self.pre
            .iter()
            .any(|s| s.origin == SnippetOrigin::LiveReloadClient)
    }
}

/// Inputs for [`compose_scripts`]. Relative paths resolve against `base`.
#[derive(Debug, Clone, Copy)]
pub struct CompositionInputs<'a> {
    pub base: &'a Path,
    pub live_reload: Option<&'a LiveReloadDescriptor>,
    pub live_reload_script: Option<&'a Path>,
    pub user_scripts: &'a [String],
    pub entry_module: Option<&'a str>,
}

/// Composed scripts plus every degradable problem hit along the way.
#[derive(Debug)]
pub struct Composition {
    pub scripts: ComposedScripts,
    pub diagnostics: Vec<Error>,
}

/// Assemble pre- and post-scripts. Only performs reads; never fails.
pub fn compose_scripts(inputs: &CompositionInputs<'_>) -> Composition {
    let mut scripts = ComposedScripts {
        pre: Vec::with_capacity(inputs.user_scripts.len() + 2),
        post: Vec::with_capacity(1),
    };
    let mut diagnostics = Vec::new();

    if let Some(descriptor) = inputs.live_reload {
        match inputs.live_reload_script {
            Some(rel) => {
                let path = resolve_in_base(inputs.base, rel);
                match load_script(&path) {
                    Ok(client) => {
                        scripts.pre.push(ScriptSnippet::new(
                            SnippetOrigin::LiveReloadConfig,
                            descriptor.options_snippet(),
                        ));
                        scripts
                            .pre
                            .push(ScriptSnippet::new(SnippetOrigin::LiveReloadClient, client));
                    }
                    Err(source) => {
                        diagnostics.push(Error::LiveReloadScriptUnreadable { path, source })
                    }
                }
            }
            None => diagnostics.push(Error::LiveReloadScriptNotConfigured),
        }
    }

    for rel in inputs.user_scripts {
        let path = resolve_in_base(inputs.base, rel);
        match load_script(&path) {
            Ok(source) => scripts
                .pre
                .push(ScriptSnippet::new(SnippetOrigin::UserScript(rel.clone()), source)),
            Err(source) => diagnostics.push(Error::ScriptUnreadable {
                path: PathBuf::from(rel),
                source,
            }),
        }
    }

    if let Some(module) = inputs.entry_module.filter(|m| !m.is_empty()) {
        scripts.post.push(ScriptSnippet::new(
            SnippetOrigin::EntryBootstrap,
            entry_bootstrap(module),
        ));
    }

    Composition {
        scripts,
        diagnostics,
    }
}

/// Snippet asking the module loader to start `module`.
pub fn entry_bootstrap(module: &str) -> String {
    let mut out = String::from("require([\"");
    escape_js_into(&mut out, module);
    out.push_str("\"]);");
    out
}

fn load_script(path: &Path) -> std::io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
