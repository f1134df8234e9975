use std::path::PathBuf;

use crate::error::{EngineError, EngineResult};

pub const DATA_DIR_VAR: &str = "GLYPHCRAWL_DATA_DIR";
pub const SEED_VAR: &str = "GLYPHCRAWL_SEED";
pub const SCRIPT_VAR: &str = "GLYPHCRAWL_SCRIPT";
pub const LOG_VAR: &str = "GLYPHCRAWL_LOG";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameConfig {
    /// Holds `game.json` and the `maps/` directory.
    pub data_dir: PathBuf,
    /// Fixed RNG seed; a fresh one is drawn (and logged) when absent.
    pub seed: Option<u64>,
    /// Replay keys from this file instead of reading the keyboard.
    pub script: Option<PathBuf>,
    pub log_file: PathBuf,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            seed: None,
            script: None,
            log_file: PathBuf::from("glyphcrawl.log"),
        }
    }
}

impl GameConfig {
    pub fn from_env() -> EngineResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> EngineResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let seed = match lookup(SEED_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|err| {
                EngineError::config(SEED_VAR, format!("`{raw}` is not a seed: {err}"))
            })?),
            None => None,
        };

        Ok(Self {
            data_dir: lookup(DATA_DIR_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.data_dir),
            seed,
            script: lookup(SCRIPT_VAR).map(PathBuf::from),
            log_file: lookup(LOG_VAR)
                .map(PathBuf::from)
                .unwrap_or(defaults.log_file),
        })
    }
}
