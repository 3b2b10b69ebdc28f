// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::MachineId;

#[derive(Error, Debug)]
pub enum ProdlineError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Parse error on line {line}: {msg}")]
    ParseError { line: usize, msg: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Channel closed: {0}")]
    ChannelClosed(String),

    #[error("Protocol violation: {0}")]
    ProtocolViolation(String),

    #[error("Worker for machine {machine} failed: {reason}")]
    WorkerFailed { machine: MachineId, reason: String },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, ProdlineError>;
