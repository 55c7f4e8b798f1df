//! Error and diagnostic system for the Menagerie assembler.
//!
//! This module provides an error handling system with:
//! - Error codes for documentation and searchability
//! - Labels pointing at the provenance of the offending declarations
//! - Severity levels
//! - A [`DiagnosticSink`] trait the assembler reports through, with a
//!   filtering [`DiagnosticCollector`] implementation
//!
//! # Overview
//!
//! Most problems found while assembling a model are *recorded* as
//! [`Diagnostic`]s and assembly continues. The few fatal ones also make
//! [`Assembler::assemble`](crate::Assembler::assemble) return an
//! [`AssembleError`].
//!
//! # Example
//!
//! ```
//! # use menagerie_assembler::error::{Diagnostic, ErrorCode};
//! # use menagerie_core::syntax::Provenance;
//!
//! let here = Provenance::new("predator.gaml", Some(12));
//! let first = Provenance::new("predator.gaml", Some(4));
//!
//! let diag = Diagnostic::error("species `wolf` is declared twice")
//!     .with_code(ErrorCode::E100)
//!     .with_label(here, "duplicate declaration")
//!     .with_secondary_label(first, "first declared here")
//!     .with_help("rename one of the species or remove the duplicate");
//! ```

mod assemble_error;
mod collector;
mod diagnostic;
mod error_code;
mod label;
mod severity;

pub use assemble_error::AssembleError;
pub use collector::{DiagnosticCollector, DiagnosticFilter, DiagnosticSink};
pub use diagnostic::Diagnostic;
pub use error_code::ErrorCode;
pub use label::Label;
pub use severity::Severity;
