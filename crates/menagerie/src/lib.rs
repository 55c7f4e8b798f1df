//! Menagerie - model assembly for an agent-based simulation language.
//!
//! Links the syntax trees of a model and everything it imports into one
//! resolved description tree: species, micro-species and experiments, each
//! attached to its parent and carrying the members it inherits. Parsing
//! model source is left to a front end, which hands its trees over as a
//! [`SyntaxBundle`].

pub mod config;

mod bundle;
mod error;
mod outline;

pub use menagerie_assembler::error::{Diagnostic, ErrorCode, Severity};
pub use menagerie_core::{description, identifier, model, syntax};

pub use bundle::SyntaxBundle;
pub use error::MenagerieError;

use log::{debug, info, trace};

use menagerie_assembler::{
    AssembleError, Assembler, AssemblyRequest,
    error::{DiagnosticCollector, DiagnosticSink},
};
use menagerie_core::model::ModelDescription;

use config::AppConfig;

/// An assembled model with the diagnostics reported while assembling it.
#[derive(Debug, Clone)]
pub struct Assembled {
    model: ModelDescription,
    diagnostics: Vec<Diagnostic>,
}

impl Assembled {
    pub fn model(&self) -> &ModelDescription {
        &self.model
    }

    /// Non-fatal problems: overridden imports, inheritance cycles, species
    /// that failed validation.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_parts(self) -> (ModelDescription, Vec<Diagnostic>) {
        (self.model, self.diagnostics)
    }
}

/// Builder for assembling Menagerie models.
///
/// # Examples
///
/// ```
/// use menagerie::{ModelBuilder, SyntaxBundle, config::AppConfig, syntax::SyntacticElement};
///
/// let tree = SyntacticElement::model("flock")
///     .with_child(SyntacticElement::species("bird").with_child(SyntacticElement::variable("speed")));
/// let bundle = SyntaxBundle::new("flock", vec![tree]);
///
/// let builder = ModelBuilder::new(AppConfig::default());
/// let assembled = builder.assemble(&bundle).expect("Failed to assemble");
///
/// let outline = builder.outline(assembled.model());
/// assert!(outline.contains("species bird : agent"));
/// ```
#[derive(Default)]
pub struct ModelBuilder {
    config: AppConfig,
}

impl ModelBuilder {
    /// Create a new model builder with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including pragma and assembly settings
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Assemble a syntax bundle into a model description.
    ///
    /// Grafted bundles are assembled first, each on its own, then spliced
    /// under the primary model.
    ///
    /// # Errors
    ///
    /// Returns `MenagerieError::Assembly` when an unmet `requires` pragma,
    /// an invalid experiment or an invalid model stops assembly. The error
    /// carries every diagnostic collected up to that point.
    pub fn assemble(&self, bundle: &SyntaxBundle) -> Result<Assembled, MenagerieError> {
        info!(primary = bundle.primary.as_str(), models = bundle.models.len(); "Assembling bundle");

        let mut collector = DiagnosticCollector::new();
        match self.assemble_into(bundle, &mut collector) {
            Ok(model) => {
                debug!(diagnostics = collector.diagnostics().len(); "Bundle assembled");
                trace!(model:?; "Assembled model");
                Ok(Assembled {
                    model,
                    diagnostics: collector.into_diagnostics(),
                })
            }
            Err(err) => Err(MenagerieError::new_assembly_error(
                err,
                collector.into_diagnostics(),
            )),
        }
    }

    /// Render an assembled model as an indented outline.
    pub fn outline(&self, model: &ModelDescription) -> String {
        outline::render(model)
    }

    fn assemble_into(
        &self,
        bundle: &SyntaxBundle,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ModelDescription, AssembleError> {
        let mut request = AssemblyRequest::new(bundle.primary.as_str(), bundle.trees())
            .with_paths(bundle.project_path.as_str(), bundle.model_path.as_str());
        for (alias, graft) in &bundle.grafts {
            debug!(alias = alias.as_str(); "Assembling graft");
            let model = self.assemble_into(graft, sink)?;
            request = request.with_graft(alias, model);
        }

        Assembler::new(self.config.assembly_config()).assemble(request, sink)
    }
}
