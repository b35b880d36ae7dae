//! Error handling for the costctl binary.

use std::{io, result};

use thiserror::Error;

/// Convenient result type for costctl operations.
pub type Result<T> = result::Result<T, Error>;

/// Errors that can occur while running costctl.
#[derive(Debug, Error)]
pub enum Error {
    /// Wrapper for standard I/O errors.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    /// The settings file could not be loaded.
    #[error("Settings store error: {0}")]
    Store(#[from] settings_store::Error),
    /// Screen declaration parsing or resolution errors.
    #[error("{}", .0.pretty())]
    Config(#[from] config::Error),
    /// Binding or interaction errors from the engine.
    #[error("{0}")]
    Engine(#[from] settings_engine::Error),
    /// Failed to serialize output.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
