//! Error types for Menagerie operations.
//!
//! This module provides the main error type [`MenagerieError`] which wraps
//! the error conditions that can occur while loading and assembling models.

use std::io;

use thiserror::Error;

use menagerie_assembler::{AssembleError, error::Diagnostic};

/// The main error type for Menagerie operations.
///
/// # Diagnostic Variants
///
/// The `Assembly` variant carries every diagnostic collected before assembly
/// stopped, so callers can report the problems that led to the failure and
/// not just the failure itself.
#[derive(Debug, Error)]
pub enum MenagerieError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid syntax bundle: {0}")]
    Bundle(String),

    #[error("{err}")]
    Assembly {
        err: AssembleError,
        diagnostics: Vec<Diagnostic>,
    },
}

impl MenagerieError {
    /// Create a new `Assembly` error with the diagnostics collected so far.
    pub fn new_assembly_error(err: AssembleError, diagnostics: Vec<Diagnostic>) -> Self {
        Self::Assembly { err, diagnostics }
    }

    /// Diagnostics collected before the failure; empty for other variants.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        match self {
            Self::Assembly { diagnostics, .. } => diagnostics,
            Self::Io(_) | Self::Bundle(_) => &[],
        }
    }
}
