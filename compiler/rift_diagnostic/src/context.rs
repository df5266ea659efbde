//! Diagnostics shared by every stage of a compile run.

use std::fmt;

use crate::CompileConfig;

/// One recorded, human-readable compile failure.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CompileError {
    message: String,
}

impl CompileError {
    pub fn new(message: impl Into<String>) -> Self {
        CompileError {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for CompileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Mutable record threaded through a compile run.
#[derive(Clone, Debug)]
pub struct CompileContext {
    config: CompileConfig,
    errors: Vec<CompileError>,
}

impl CompileContext {
    pub fn new(config: CompileConfig) -> Self {
        CompileContext {
            config,
            errors: Vec::new(),
        }
    }

    pub fn config(&self) -> &CompileConfig {
        &self.config
    }

    /// Record a diagnostic and log it.
    ///
    /// Never halts the run by itself; the next stage boundary does that.
    pub fn add_error(&mut self, message: impl Into<String>) {
        let error = CompileError::new(message);
        tracing::error!("{error}");
        self.errors.push(error);
    }

    /// Check if at least one diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    /// Diagnostics in the order they were recorded.
    pub fn errors(&self) -> &[CompileError] {
        &self.errors
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }
}
