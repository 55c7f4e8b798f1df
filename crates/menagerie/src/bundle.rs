//! Syntax bundles: serialized syntax trees produced by a parser front end.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use menagerie_core::syntax::SyntacticElement;

/// The already-parsed input of one assembly.
///
/// `models[0]` is the primary model and the rest are its imports in import
/// order. Each entry of `grafts` is assembled on its own first and grafted
/// under the primary model with its key as alias.
///
/// # Example
///
/// A bundle in TOML:
///
/// ```toml
/// primary = "predator_prey"
///
/// [[models]]
/// kind = "model"
/// name = "predator_prey"
/// provenance = { file = "predator_prey.gaml" }
///
/// [[models.children]]
/// kind = "species"
/// name = "wolf"
/// facets = { parent = "animal" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SyntaxBundle {
    pub primary: String,
    #[serde(default)]
    pub project_path: String,
    #[serde(default)]
    pub model_path: String,
    #[serde(default)]
    pub models: Vec<SyntacticElement>,
    #[serde(default)]
    pub grafts: IndexMap<String, SyntaxBundle>,
}

impl SyntaxBundle {
    pub fn new(primary: impl Into<String>, models: Vec<SyntacticElement>) -> Self {
        Self {
            primary: primary.into(),
            models,
            ..Self::default()
        }
    }

    pub fn with_paths(mut self, project_path: impl Into<String>, model_path: impl Into<String>) -> Self {
        self.project_path = project_path.into();
        self.model_path = model_path.into();
        self
    }

    pub fn with_graft(mut self, alias: impl Into<String>, bundle: SyntaxBundle) -> Self {
        self.grafts.insert(alias.into(), bundle);
        self
    }

    /// The syntax trees of the bundle, with each file propagated down its tree.
    pub(crate) fn trees(&self) -> Vec<SyntacticElement> {
        self.models
            .iter()
            .cloned()
            .map(SyntacticElement::inherit_provenance)
            .collect()
    }
}
