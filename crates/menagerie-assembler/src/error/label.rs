//! Labeled locations for diagnostic messages.
//!
//! Syntax trees reach the assembler already parsed, so a label points at the
//! [`Provenance`] of a declaration (file and line) rather than at a byte span.

use menagerie_core::syntax::Provenance;

/// A labeled location in a model file.
///
/// # Primary vs Secondary Labels
///
/// - **Primary labels** mark the main location of a diagnostic.
/// - **Secondary labels** provide additional context, such as
///   "first declared here".
#[derive(Debug, Clone, PartialEq)]
pub struct Label {
    provenance: Provenance,
    message: String,
    is_primary: bool,
}

impl Label {
    /// Create a new primary label.
    pub fn primary(provenance: Provenance, message: impl Into<String>) -> Self {
        Self {
            provenance,
            message: message.into(),
            is_primary: true,
        }
    }

    /// Create a new secondary label.
    pub fn secondary(provenance: Provenance, message: impl Into<String>) -> Self {
        Self {
            provenance,
            message: message.into(),
            is_primary: false,
        }
    }

    /// Get the location this label applies to.
    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// Get the label message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Check if this is a primary label.
    pub fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Check if this is a secondary label.
    pub fn is_secondary(&self) -> bool {
        !self.is_primary
    }
}
