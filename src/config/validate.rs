// src/config/validate.rs

use globset::Glob;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{Result, SpecwatchError};
use crate::types::Spec;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = SpecwatchError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.watch, raw.runner))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_runner(cfg)?;
    validate_specs(cfg)?;
    validate_files_to_watch(cfg)?;
    Ok(())
}

fn validate_runner(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.cmd.trim().is_empty() {
        return Err(SpecwatchError::ConfigError(
            "[runner].cmd must not be empty".to_string(),
        ));
    }
    if cfg.runner.capabilities.is_empty() {
        return Err(SpecwatchError::ConfigError(
            "[runner].capabilities must contain at least one entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_specs(cfg: &RawConfigFile) -> Result<()> {
    if cfg.runner.specs.is_empty() {
        return Err(SpecwatchError::ConfigError(
            "[runner].specs must contain at least one spec".to_string(),
        ));
    }
    for (index, spec) in cfg.runner.specs.iter().enumerate() {
        if let Spec::Group(files) = spec {
            if files.is_empty() {
                return Err(SpecwatchError::ConfigError(format!(
                    "[runner].specs[{index}] is an empty spec group"
                )));
            }
        }
    }
    Ok(())
}

fn validate_files_to_watch(cfg: &RawConfigFile) -> Result<()> {
    for pattern in &cfg.watch.files_to_watch {
        Glob::new(pattern).map_err(|err| {
            SpecwatchError::ConfigError(format!(
                "[watch].files_to_watch entry '{pattern}' is not a valid glob: {err}"
            ))
        })?;
    }
    Ok(())
}
