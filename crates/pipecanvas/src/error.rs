//! Error types for pipecanvas operations.
//!
//! This module provides the main error type [`CanvasError`]. Most editing
//! failures are recoverable by design: layout failures are caught inside the
//! engine and surface only as a logged [`CanvasError::LayoutComputationFailed`]
//! attached to the returned [`crate::layout::Layout`].

use std::io;

use thiserror::Error;

use pipecanvas_core::model::ParseDirectionError;

/// The main error type for pipecanvas operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid drop event: {0}")]
    InvalidDropEvent(String),

    #[error("Layout computation failed: {0}")]
    LayoutComputationFailed(String),

    #[error("Graph error: {0}")]
    Graph(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<ParseDirectionError> for CanvasError {
    fn from(err: ParseDirectionError) -> Self {
        CanvasError::InvalidInput(err.to_string())
    }
}
