use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;

use specwatch::config::{ConfigFile, RawConfigFile, RunnerSection, WatchSection};
use specwatch::pool::Worker;
use specwatch::types::{Capabilities, Spec};

use crate::fake_worker::RecordingChannel;

/// Builder for a pool [`Worker`] wired to a [`RecordingChannel`].
///
/// Workers get a session id (`session-<cid>`) unless `no_session` is used,
/// and a `browserName = chrome` capability.
pub struct WorkerBuilder {
    cid: String,
    specs: Vec<Spec>,
    session_id: Option<String>,
    is_busy: bool,
    caps: Capabilities,
}

impl WorkerBuilder {
    pub fn new(cid: &str) -> Self {
        let mut caps = BTreeMap::new();
        caps.insert("browserName".to_string(), "chrome".to_string());
        Self {
            cid: cid.to_string(),
            specs: Vec::new(),
            session_id: Some(format!("session-{cid}")),
            is_busy: false,
            caps,
        }
    }

    pub fn spec(mut self, path: &str) -> Self {
        self.specs.push(Spec::File(PathBuf::from(path)));
        self
    }

    pub fn group(mut self, paths: &[&str]) -> Self {
        self.specs
            .push(Spec::Group(paths.iter().map(PathBuf::from).collect()));
        self
    }

    pub fn session(mut self, session_id: &str) -> Self {
        self.session_id = Some(session_id.to_string());
        self
    }

    pub fn no_session(mut self) -> Self {
        self.session_id = None;
        self
    }

    pub fn busy(mut self, val: bool) -> Self {
        self.is_busy = val;
        self
    }

    pub fn capability(mut self, key: &str, value: &str) -> Self {
        self.caps.insert(key.to_string(), value.to_string());
        self
    }

    pub fn build(self) -> (Worker, Arc<RecordingChannel>) {
        let channel = RecordingChannel::new(&self.cid);
        let mut worker = Worker::new(self.cid, self.specs, self.caps, channel.clone());
        worker.session_id = self.session_id;
        worker.is_busy = self.is_busy;
        (worker, channel)
    }
}

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            config: RawConfigFile {
                watch: WatchSection::default(),
                runner: RunnerSection {
                    cmd: cmd.to_string(),
                    specs: Vec::new(),
                    capabilities: vec![BTreeMap::new()],
                },
            },
        }
    }

    pub fn spec(mut self, path: &str) -> Self {
        self.config.runner.specs.push(Spec::File(PathBuf::from(path)));
        self
    }

    pub fn group(mut self, paths: &[&str]) -> Self {
        self.config
            .runner
            .specs
            .push(Spec::Group(paths.iter().map(PathBuf::from).collect()));
        self
    }

    pub fn file_to_watch(mut self, pattern: &str) -> Self {
        self.config.watch.files_to_watch.push(pattern.to_string());
        self
    }

    pub fn capabilities(mut self, caps: Vec<Capabilities>) -> Self {
        self.config.runner.capabilities = caps;
        self
    }

    pub fn raw(self) -> RawConfigFile {
        self.config
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}
