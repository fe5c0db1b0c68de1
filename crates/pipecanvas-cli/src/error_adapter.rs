//! Error adapter for converting [`CanvasError`] to miette diagnostics.
//!
//! The library error type carries no source spans, so every error renders
//! as a single report with a diagnostic code and, where one applies, a hint
//! on how to fix the input.

use std::fmt;

use miette::{Diagnostic, LabeledSpan};

use pipecanvas::CanvasError;

/// Adapter giving a [`CanvasError`] miette's rich formatting.
pub struct ErrorAdapter<'a>(pub &'a CanvasError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        std::error::Error::source(self.0)
    }
}

impl Diagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match &self.0 {
            CanvasError::InvalidInput(_) => "pipecanvas::invalid_input",
            CanvasError::InvalidDropEvent(_) => "pipecanvas::invalid_drop_event",
            CanvasError::LayoutComputationFailed(_) => "pipecanvas::layout",
            CanvasError::Graph(_) => "pipecanvas::graph",
            CanvasError::Config(_) => "pipecanvas::config",
            CanvasError::Io(_) => "pipecanvas::io",
            CanvasError::Json(_) => "pipecanvas::json",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match &self.0 {
            CanvasError::InvalidInput(_) => {
                "the input document must be an object with a `nodes` array and an optional `edges` array"
            }
            CanvasError::Config(_) => "check the [layout] and [style] sections of the configuration file",
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        None
    }
}
