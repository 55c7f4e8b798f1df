//! The assembler entry point.

use indexmap::{IndexMap, IndexSet};
use log::{debug, info};
use menagerie_core::{
    builtin::{self, BuiltInRegistry},
    description::{Description, DescriptionError, DescriptionKind},
    identifier::Id,
    keyword,
    model::ModelDescription,
    syntax::{ElementKind, SyntacticElement},
};

use crate::{
    collect::{self, model_id},
    complement,
    context::AssemblyContext,
    error::{AssembleError, DiagnosticSink},
    finalize, hierarchy, inherit, instantiate, pragma, resolve, scheduler,
};

/// Configuration of the assembler.
#[derive(Debug, Clone)]
pub struct AssemblyConfig {
    /// Fail when the primary model `requires` a plugin not in
    /// `available_plugins`.
    pub enforce_required_plugins: bool,
    pub available_plugins: IndexSet<String>,
    /// Move global `schedules:` and `frequency:` facets onto a synthetic
    /// scheduler species.
    pub legacy_scheduling: bool,
}

impl Default for AssemblyConfig {
    fn default() -> Self {
        Self {
            enforce_required_plugins: false,
            available_plugins: IndexSet::new(),
            legacy_scheduling: true,
        }
    }
}

/// Everything one assembly needs besides configuration.
#[derive(Debug, Clone)]
pub struct AssemblyRequest {
    /// Alias of the assembled model.
    pub primary_name: String,
    pub project_path: String,
    pub model_path: String,
    /// Parsed trees; index 0 is the primary model, the rest its imports in
    /// import order.
    pub trees: Vec<SyntacticElement>,
    /// Finalized models to graft under the primary model, by alias.
    pub grafts: IndexMap<Id, ModelDescription>,
}

impl AssemblyRequest {
    pub fn new(primary_name: impl Into<String>, trees: Vec<SyntacticElement>) -> Self {
        Self {
            primary_name: primary_name.into(),
            project_path: String::new(),
            model_path: String::new(),
            trees,
            grafts: IndexMap::new(),
        }
    }

    pub fn with_paths(mut self, project_path: impl Into<String>, model_path: impl Into<String>) -> Self {
        self.project_path = project_path.into();
        self.model_path = model_path.into();
        self
    }

    pub fn with_graft(mut self, alias: &str, model: ModelDescription) -> Self {
        self.grafts.insert(Id::new(alias), model);
        self
    }
}

/// Links parsed syntax trees into a single resolved model description.
///
/// The assembler holds only configuration and a reference to the built-in
/// registry; every call builds its own caches and hierarchy graph, so one
/// assembler can be reused for any number of models.
///
/// # Example
///
/// ```
/// use menagerie_assembler::{Assembler, AssemblyConfig, AssemblyRequest, error::DiagnosticCollector};
/// use menagerie_core::syntax::SyntacticElement;
///
/// let tree = SyntacticElement::model("predator prey")
///     .with_child(SyntacticElement::species("animal"))
///     .with_child(SyntacticElement::species("wolf").with_parent("animal"));
///
/// let assembler = Assembler::new(AssemblyConfig::default());
/// let mut diagnostics = DiagnosticCollector::new();
/// let model = assembler
///     .assemble(AssemblyRequest::new("predator prey", vec![tree]), &mut diagnostics)
///     .unwrap();
///
/// assert_eq!(model.name(), "predator_prey_model");
/// let wolf = model.find("wolf").unwrap();
/// assert_eq!(model.parent_name(wolf).unwrap(), "animal");
/// ```
#[derive(Debug, Clone)]
pub struct Assembler {
    config: AssemblyConfig,
    registry: &'static BuiltInRegistry,
}

impl Assembler {
    /// Creates an assembler using the process-wide built-in registry.
    pub fn new(config: AssemblyConfig) -> Self {
        Self::with_registry(config, builtin::registry())
    }

    pub fn with_registry(config: AssemblyConfig, registry: &'static BuiltInRegistry) -> Self {
        Self { config, registry }
    }

    pub fn config(&self) -> &AssemblyConfig {
        &self.config
    }

    /// Assembles `request` into a model description, reporting problems to
    /// `sink`.
    ///
    /// # Errors
    ///
    /// Assembly stops early when the primary model requires an unavailable
    /// plugin, when an experiment fails to finalize, and when the model
    /// itself fails to finalize. Other problems, such as duplicate
    /// declarations, inheritance cycles or species that fail validation,
    /// are only reported.
    pub fn assemble(
        &self,
        request: AssemblyRequest,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<ModelDescription, AssembleError> {
        let AssemblyRequest {
            primary_name,
            project_path,
            model_path,
            trees,
            grafts,
        } = request;
        let primary = trees.first().ok_or(AssembleError::EmptyInput)?;
        info!(model = primary_name.as_str(), trees = trees.len(); "Assembling model");

        pragma::apply(primary, &self.config, sink)?;

        let mut ctx = AssemblyContext::new();
        collect::collect(&mut ctx, &trees, sink);

        let mut model = self.primary_model(primary, &trees, &ctx)?;
        model = model.with_paths(project_path, model_path);
        model.set_alias(Id::new(&primary_name));
        for (alias, sub_model) in grafts {
            let sub_name = sub_model.name();
            model
                .graft(alias, sub_model)
                .map_err(|source| AssembleError::Graft {
                    alias,
                    model: sub_name,
                    source,
                })?;
        }

        instantiate::instantiate(&mut ctx, &mut model, sink)?;
        resolve::resolve_parents(&ctx, &mut model)?;
        complement::complement(&ctx, &mut model, sink)?;

        let root = model.root();
        inherit::inherit(&mut model, root)?;
        for id in hierarchy::linearize(&mut model, DescriptionKind::Species, sink)? {
            inherit::inherit(&mut model, id)?;
        }
        for id in hierarchy::linearize(&mut model, DescriptionKind::Experiment, sink)? {
            inherit::inherit(&mut model, id)?;
            if !finalize::finalize(&mut model, id, sink) {
                return Err(AssembleError::ExperimentFinalization(
                    model.description(id).name(),
                ));
            }
        }

        if self.config.legacy_scheduling {
            scheduler::synthesize(&mut model)?;
        }

        model.build_types();
        debug!(types = model.types().len(); "Types built");

        if !finalize::finalize_model(&mut model, sink) {
            return Err(AssembleError::ModelFinalization(model.name()));
        }
        info!(
            model = model.name().to_string(),
            descriptions = model.len();
            "Model assembled"
        );
        Ok(model)
    }

    /// The member-less model description of the primary tree, carrying the
    /// merged global facets.
    fn primary_model(
        &self,
        primary: &SyntacticElement,
        trees: &[SyntacticElement],
        ctx: &AssemblyContext<'_>,
    ) -> Result<ModelDescription, DescriptionError> {
        let name = model_id(primary);
        let mut root = Description::new(
            DescriptionKind::Model,
            ElementKind::Model,
            name,
            ctx.global_facets.clone(),
        );
        root.set_parent(resolve::model_parent(
            self.registry,
            ctx.global_facets.label(keyword::PARENT),
        ))?;
        root.set_origin(name)?;
        root.set_provenance(primary.provenance().clone())?;

        let mut model = ModelDescription::new(root, self.registry);
        model.set_imported_models(trees.iter().skip(1).map(model_id));
        model.add_alternate_paths(
            trees
                .iter()
                .rev()
                .filter_map(|tree| tree.provenance().file.clone()),
        );
        Ok(model)
    }
}
