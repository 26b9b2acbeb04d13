// src/config/model.rs

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::types::{Capabilities, Spec};

/// Top-level configuration as read from a TOML file.
///
/// ```toml
/// [watch]
/// files_to_watch = ["src/**/*.js"]
///
/// [runner]
/// cmd = "npx mocha"
/// specs = ["tests/a.js", ["tests/b.js", "tests/c.js"]]
/// capabilities = [{ browserName = "chrome" }]
/// ```
///
/// This is the unvalidated shape; use [`ConfigFile`] everywhere else.
#[derive(Debug, Clone, Deserialize)]
pub struct RawConfigFile {
    /// `[watch]` section.
    #[serde(default)]
    pub watch: WatchSection,

    /// `[runner]` section.
    pub runner: RunnerSection,
}

/// `[watch]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WatchSection {
    /// Files whose change re-runs every worker.
    #[serde(default)]
    pub files_to_watch: Vec<String>,
}

/// `[runner]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct RunnerSection {
    /// Command run by each worker; spec files are appended as arguments.
    pub cmd: String,

    /// Spec files and spec groups to distribute over workers.
    #[serde(default)]
    pub specs: Vec<Spec>,

    /// One worker is created per capability × spec.
    #[serde(default = "default_capabilities")]
    pub capabilities: Vec<Capabilities>,
}

fn default_capabilities() -> Vec<Capabilities> {
    vec![BTreeMap::new()]
}

/// A validated configuration.
///
/// Only constructible through `TryFrom<RawConfigFile>` (see
/// [`crate::config::validate`]).
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub watch: WatchSection,
    pub runner: RunnerSection,
}

impl ConfigFile {
    pub(crate) fn new_unchecked(watch: WatchSection, runner: RunnerSection) -> Self {
        Self { watch, runner }
    }

    pub fn specs(&self) -> &[Spec] {
        &self.runner.specs
    }

    pub fn capabilities(&self) -> &[Capabilities] {
        &self.runner.capabilities
    }
}

/// Source of the watch-related configuration the scheduler consumes.
pub trait ConfigProvider {
    /// The auxiliary watch list. May be empty.
    fn files_to_watch(&self) -> Vec<String>;
}

impl ConfigProvider for ConfigFile {
    fn files_to_watch(&self) -> Vec<String> {
        self.watch.files_to_watch.clone()
    }
}
