// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

use crate::flags::FlagKind;

#[derive(Error, Debug)]
pub enum JsonfigError {
    #[error("argument list must not be empty (expected at least a program name)")]
    ArgumentsEmpty,

    #[error("model is empty or not a struct-like record")]
    InvalidConfigModel,

    #[error("config file path is empty")]
    EmptyConfigFilePath,

    #[error("unable to generate skeleton: config file already exists")]
    ConfigFileExist,

    #[error("unknown flag type: {0:?} (expected string, int, bool or duration)")]
    UnknownFlagType(String),

    #[error("invalid default {value:?} for {kind} flag '{name}'")]
    InvalidFlagDefault {
        name: String,
        kind: FlagKind,
        value: String,
    },

    #[error("invalid flag name: {0:?}")]
    InvalidFlagName(String),

    #[error("flag '{0}' is defined more than once")]
    DuplicateFlag(String),

    #[error("flag parsing error: {0}")]
    FlagParse(#[from] clap::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, JsonfigError>;
