//! Reserved facet names, built-in names and pragmas of the modeling language.

/// Facet naming the parent of a species, experiment or model.
pub const PARENT: &str = "parent";
/// Facet marking a species, experiment or action as abstract.
pub const VIRTUAL: &str = "virtual";
/// Legacy top-level scheduling facet.
pub const SCHEDULES: &str = "schedules";
/// Legacy top-level scheduling frequency facet.
pub const FREQUENCY: &str = "frequency";
/// Facet stamped on global members, naming the model they were declared in.
pub const ORIGIN: &str = "origin";
/// Facet holding an experiment's type (`gui`, `batch`, ...).
pub const TYPE: &str = "type";

/// Name of the generic base species.
pub const AGENT: &str = "agent";
/// Name of the generic base experiment.
pub const EXPERIMENT: &str = "experiment";
/// Name of the root built-in model.
pub const MODEL: &str = "model";

/// Name of the species synthesized to host top-level scheduling facets.
pub const SCHEDULER_SPECIES: &str = "_internal_global_scheduler";
/// Suffix appended to a syntax tree name to build its model name.
pub const MODEL_SUFFIX: &str = "_model";

/// Pragma suppressing informational diagnostics.
pub const PRAGMA_NO_INFO: &str = "no_info";
/// Pragma suppressing warnings.
pub const PRAGMA_NO_WARNING: &str = "no_warning";
/// Pragma suppressing non-error diagnostics raised on experiments.
pub const PRAGMA_NO_EXPERIMENT: &str = "no_experiment";
/// Pragma listing the plugins a model requires.
pub const PRAGMA_REQUIRES: &str = "requires";

/// Experiment types accepted by the `type` facet.
pub const EXPERIMENT_TYPES: &[&str] = &["gui", "batch", "test", "memorize", "headless"];

/// Builds the model name of a syntax tree: spaces become underscores and the
/// [`MODEL_SUFFIX`] is appended.
///
/// # Examples
///
/// ```
/// use menagerie_core::keyword::model_name;
///
/// assert_eq!(model_name("Predator Prey"), "Predator_Prey_model");
/// ```
pub fn model_name(source: &str) -> String {
    format!("{}{MODEL_SUFFIX}", source.replace(' ', "_"))
}
