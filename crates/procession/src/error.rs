//! Error types for Procession operations.
//!
//! This module provides the main error type [`ProcessionError`]. Layout itself
//! never fails on data-quality problems (it skips the offending item and logs
//! a warning); errors are reserved for unreadable input, invalid
//! configuration and contract violations of the drag protocol.

use std::io;

use thiserror::Error;

use crate::solver::SolverError;

/// The main error type for Procession operations.
///
/// # Diagnostic Variants
///
/// The `Input` variant keeps the offending source text next to the JSON
/// error so front ends can point at the failing line and column.
#[derive(Debug, Error)]
pub enum ProcessionError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid diagram input: {err}")]
    Input {
        err: serde_json::Error,
        src: String,
    },

    #[error("Output error: {0}")]
    Output(serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Style error: {0}")]
    Style(String),

    #[error("Solver error: {0}")]
    Solver(#[from] SolverError),
}

impl ProcessionError {
    /// Create a new `Input` error with the associated source text.
    pub fn new_input_error(err: serde_json::Error, src: impl Into<String>) -> Self {
        Self::Input {
            err,
            src: src.into(),
        }
    }
}
