//! Runtime settings read from the environment.

use crate::storage::DEFAULT_TASKS_FILE;
use std::{env, path::PathBuf};

/// Overrides the data file location.
pub const FILE_VAR: &str = "TASKTRACK_FILE";
/// `0`, `false`, `off` or `no` turns off cosmetic delays.
pub const PACING_VAR: &str = "TASKTRACK_PACING";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tasks_file: PathBuf,
    pub pacing: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tasks_file: PathBuf::from(DEFAULT_TASKS_FILE),
            pacing: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from any key lookup; unset or blank keys keep defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(path) = lookup(FILE_VAR).filter(|v| !v.trim().is_empty()) {
            config.tasks_file = PathBuf::from(path.trim());
        }
        if let Some(pacing) = lookup(PACING_VAR) {
            config.pacing = !matches!(
                pacing.trim().to_ascii_lowercase().as_str(),
                "0" | "false" | "off" | "no"
            );
        }
        config
    }
}
