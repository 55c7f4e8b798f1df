//! Configuration types for Menagerie model assembly.
//!
//! This module provides configuration structures that control how models are
//! assembled. All types implement [`serde::Deserialize`] for loading from
//! external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`PragmaConfig`] - Controls how `@requires` pragmas are enforced.
//! - [`AssemblyOptions`] - Toggles optional assembly rewrites.
//!
//! # Example
//!
//! ```
//! # use menagerie::config::AppConfig;
//! let config = AppConfig::default();
//! assert!(!config.pragmas().enforce_required_plugins());
//! assert!(config.assembly().legacy_scheduling());
//! ```

use indexmap::IndexSet;
use serde::Deserialize;

use menagerie_assembler::AssemblyConfig;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Pragma handling section.
    #[serde(default)]
    pragmas: PragmaConfig,

    /// Assembly options section.
    #[serde(default)]
    assembly: AssemblyOptions,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    pub fn new(pragmas: PragmaConfig, assembly: AssemblyOptions) -> Self {
        Self { pragmas, assembly }
    }

    /// Returns the pragma configuration.
    pub fn pragmas(&self) -> &PragmaConfig {
        &self.pragmas
    }

    /// Returns the assembly options.
    pub fn assembly(&self) -> &AssemblyOptions {
        &self.assembly
    }

    /// The assembler configuration described by this application configuration.
    pub fn assembly_config(&self) -> AssemblyConfig {
        AssemblyConfig {
            enforce_required_plugins: self.pragmas.enforce_required_plugins,
            available_plugins: self.pragmas.available_plugins.clone(),
            legacy_scheduling: self.assembly.legacy_scheduling,
        }
    }
}

/// Handling of the `requires` pragma.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PragmaConfig {
    /// Fail assembly when a required plugin is not available.
    #[serde(default)]
    enforce_required_plugins: bool,

    /// Plugins available to assembled models.
    #[serde(default)]
    available_plugins: IndexSet<String>,
}

impl PragmaConfig {
    /// Creates a new [`PragmaConfig`].
    ///
    /// # Arguments
    ///
    /// * `enforce_required_plugins` - Whether unmet `requires` pragmas are fatal.
    /// * `available_plugins` - Names of the available plugins.
    pub fn new(
        enforce_required_plugins: bool,
        available_plugins: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            enforce_required_plugins,
            available_plugins: available_plugins.into_iter().map(Into::into).collect(),
        }
    }

    pub fn enforce_required_plugins(&self) -> bool {
        self.enforce_required_plugins
    }

    pub fn available_plugins(&self) -> &IndexSet<String> {
        &self.available_plugins
    }
}

/// Optional assembly rewrites.
#[derive(Debug, Clone, Deserialize)]
pub struct AssemblyOptions {
    /// Move global `schedules:` and `frequency:` facets onto a synthetic
    /// scheduler species. Enabled by default.
    #[serde(default = "default_legacy_scheduling")]
    legacy_scheduling: bool,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            legacy_scheduling: default_legacy_scheduling(),
        }
    }
}

impl AssemblyOptions {
    pub fn new(legacy_scheduling: bool) -> Self {
        Self { legacy_scheduling }
    }

    pub fn legacy_scheduling(&self) -> bool {
        self.legacy_scheduling
    }
}

fn default_legacy_scheduling() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_matches_assembler_default() {
        let config = AppConfig::default().assembly_config();
        let expected = AssemblyConfig::default();

        assert_eq!(config.enforce_required_plugins, expected.enforce_required_plugins);
        assert_eq!(config.available_plugins, expected.available_plugins);
        assert_eq!(config.legacy_scheduling, expected.legacy_scheduling);
    }

    #[test]
    fn test_assembly_config_carries_sections() {
        let config = AppConfig::new(
            PragmaConfig::new(true, ["physics", "network"]),
            AssemblyOptions::new(false),
        )
        .assembly_config();

        assert!(config.enforce_required_plugins);
        assert!(config.available_plugins.contains("physics"));
        assert_eq!(config.available_plugins.len(), 2);
        assert!(!config.legacy_scheduling);
    }
}
