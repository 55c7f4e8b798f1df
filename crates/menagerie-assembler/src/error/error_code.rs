//! Error codes for the Menagerie diagnostic system.
//!
//! Error codes are organized by assembly phase:
//! - `E0xx` - Pragma errors
//! - `E1xx` - Structural errors (declarations and hierarchy)
//! - `E3xx` - Finalization errors

use std::fmt;

/// Error codes for categorizing diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // =========================================================================
    // Pragma Errors (E0xx)
    // =========================================================================
    /// Required plugin unavailable.
    ///
    /// The primary model lists a plugin in its `requires` pragma that is not
    /// among the available plugins.
    E001,

    // =========================================================================
    // Structural Errors (E1xx)
    // =========================================================================
    /// Duplicate species declaration.
    ///
    /// Two top-level species of the same file share a name.
    E100,

    /// Duplicate experiment declaration.
    ///
    /// Two experiments of the same file share a name.
    E101,

    /// Declaration supersedes an imported one.
    ///
    /// A species or experiment redeclares one of an imported model. The
    /// declaration of the importing model wins.
    E102,

    /// Inconsistent hierarchy.
    ///
    /// Following `parent` facets from a species or experiment leads back to
    /// itself. The offending link is replaced by the generic base.
    E103,

    /// Duplicate micro-species declaration.
    ///
    /// Two species nested in the same macro-species share a name.
    E104,

    /// Duplicate member.
    ///
    /// A species, experiment or the global section declares two members of
    /// the same role and name.
    E105,

    // =========================================================================
    // Finalization Errors (E3xx)
    // =========================================================================
    /// Abstract action in a concrete description.
    ///
    /// A description that is not `virtual` declares or inherits an action
    /// marked `virtual: true` without redefining it.
    E301,

    /// Species inherits from an experiment.
    E302,

    /// Invalid experiment type.
    ///
    /// The `type` facet of an experiment is not one of `gui`, `batch`,
    /// `test`, `memorize` or `headless`.
    E303,
}

impl ErrorCode {
    /// Returns the numeric code as a string (e.g., "E001").
    pub fn as_str(&self) -> &'static str {
        match self {
            // Pragma errors
            ErrorCode::E001 => "E001",
            // Structural errors
            ErrorCode::E100 => "E100",
            ErrorCode::E101 => "E101",
            ErrorCode::E102 => "E102",
            ErrorCode::E103 => "E103",
            ErrorCode::E104 => "E104",
            ErrorCode::E105 => "E105",
            // Finalization errors
            ErrorCode::E301 => "E301",
            ErrorCode::E302 => "E302",
            ErrorCode::E303 => "E303",
        }
    }

    /// Returns a short description of what this error code means.
    pub fn description(&self) -> &'static str {
        match self {
            // Pragma errors
            ErrorCode::E001 => "required plugin unavailable",
            // Structural errors
            ErrorCode::E100 => "duplicate species declaration",
            ErrorCode::E101 => "duplicate experiment declaration",
            ErrorCode::E102 => "declaration supersedes an imported one",
            ErrorCode::E103 => "inconsistent hierarchy",
            ErrorCode::E104 => "duplicate micro-species declaration",
            ErrorCode::E105 => "duplicate member",
            // Finalization errors
            ErrorCode::E301 => "abstract action in concrete description",
            ErrorCode::E302 => "species inherits from an experiment",
            ErrorCode::E303 => "invalid experiment type",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
