use std::path::PathBuf;

use thiserror::Error;

use crate::ecs::components::ComponentKind;

/// Everything that can stop a run. None of these are retried: they travel up
/// to the frame loop, which tears the systems down and hands the error back.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Missing or unreadable game/map file, or a bad configuration value.
    #[error("{}: {reason}", path.display())]
    Config { path: PathBuf, reason: String },

    #[error("malformed map {map}: {reason}")]
    MalformedMap { map: String, reason: String },

    #[error("entity has no {kind} component")]
    MissingComponent { kind: ComponentKind },

    #[error("not sure how to make a monster of type `{0}`")]
    UnknownMonsterType(String),

    #[error("{system} system was asked to act before init")]
    SystemNotReady { system: &'static str },

    #[error("{system} system holds entity view {held} but the live set is {live}")]
    StaleView {
        system: &'static str,
        held: u64,
        live: u64,
    },

    #[error("input source ran out of keys")]
    InputExhausted,

    #[error("terminal i/o failed: {0}")]
    Terminal(#[from] std::io::Error),
}

impl EngineError {
    pub fn config<P: Into<PathBuf>, S: Into<String>>(path: P, reason: S) -> Self {
        EngineError::Config {
            path: path.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed_map<M: Into<String>, S: Into<String>>(map: M, reason: S) -> Self {
        EngineError::MalformedMap {
            map: map.into(),
            reason: reason.into(),
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
