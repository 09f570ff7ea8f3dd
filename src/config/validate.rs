// src/config/validate.rs

use regex::Regex;

use crate::config::model::{ConfigFile, RawConfigFile};
use crate::errors::{AtomizerError, Result};

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = AtomizerError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        validate_raw_config(&raw)?;
        Ok(ConfigFile::new_unchecked(raw.scan, raw.generator, raw.output))
    }
}

fn validate_raw_config(cfg: &RawConfigFile) -> Result<()> {
    validate_generator(cfg)?;
    validate_token_pattern(cfg)?;
    Ok(())
}

fn validate_generator(cfg: &RawConfigFile) -> Result<()> {
    match cfg.generator.cmd.as_deref().map(str::trim) {
        None | Some("") => {
            return Err(AtomizerError::ConfigError(
                "[generator].cmd must name the stylesheet generator command".to_string(),
            ));
        }
        Some(_) => {}
    }

    if let Some(rules) = &cfg.generator.rules {
        if !rules.is_file() {
            return Err(AtomizerError::ConfigError(format!(
                "[generator].rules file {:?} does not exist",
                rules
            )));
        }
    }

    Ok(())
}

fn validate_token_pattern(cfg: &RawConfigFile) -> Result<()> {
    if let Some(pattern) = &cfg.scan.token_pattern {
        Regex::new(pattern).map_err(|e| {
            AtomizerError::ConfigError(format!(
                "[scan].token_pattern {pattern:?} is not a valid regex: {e}"
            ))
        })?;
    }
    Ok(())
}
