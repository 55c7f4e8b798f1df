//! Finalization: deferred validation, then locking.

use log::{debug, warn};
use menagerie_core::{
    description::{DescriptionId, DescriptionKind},
    keyword,
    model::ModelDescription,
};

use crate::error::{Diagnostic, DiagnosticSink, ErrorCode};

/// Validates and closes `id`.
///
/// Returns whether the description's own validation passed. A description
/// that is already finalized is left untouched and passes.
pub(crate) fn finalize(
    model: &mut ModelDescription,
    id: DescriptionId,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    if model.description(id).is_finalized() {
        return true;
    }
    let errors = validate(model, id);
    let passed = errors.is_empty();
    for error in errors {
        sink.emit(error);
    }
    model.description_mut(id).close();
    passed
}

/// Finalizes every description of the model that is still open, then the
/// model itself.
///
/// Only the model's own validation decides the result; a species that fails
/// is reported and closed like the others.
pub(crate) fn finalize_model(model: &mut ModelDescription, sink: &mut dyn DiagnosticSink) -> bool {
    let root = model.root();
    for id in model.walk(root).into_iter().skip(1) {
        if !finalize(model, id, sink) {
            let description = model.description(id);
            warn!(
                kind:% = description.kind(),
                name = description.name().to_string();
                "Description failed to finalize"
            );
        }
    }
    let passed = finalize(model, root, sink);
    debug!(model = model.name().to_string(), passed; "Model finalized");
    passed
}

fn validate(model: &ModelDescription, id: DescriptionId) -> Vec<Diagnostic> {
    let description = model.description(id);
    let name = description.name();
    let kind = description.kind();
    let mut errors = Vec::new();

    if kind == DescriptionKind::Species
        && model
            .resolve_parent(id)
            .is_some_and(|parent| parent.is_experiment())
    {
        errors.push(
            Diagnostic::error(format!(
                "species `{name}` cannot extend experiment `{}`",
                model.parent_name(id).map(|p| p.to_string()).unwrap_or_default()
            ))
            .with_code(ErrorCode::E302)
            .with_label(description.provenance().clone(), "declared here")
            .with_help("species may only extend other species"),
        );
    }

    if !description.is_abstract() {
        for action in description.members().filter(|member| member.is_abstract()) {
            let declared_in = action.inherited_from().unwrap_or(name);
            errors.push(
                Diagnostic::error(format!(
                    "{kind} `{name}` must redefine abstract action `{}`",
                    action.name()
                ))
                .with_code(ErrorCode::E301)
                .with_label(description.provenance().clone(), "declared here")
                .with_secondary_label(
                    action.provenance().clone(),
                    format!("abstract action declared in `{declared_in}`"),
                )
                .with_help(format!("redefine `{}` or mark `{name}` as `virtual: true`", action.name())),
            );
        }
    }

    if kind == DescriptionKind::Experiment {
        if let Some(experiment_type) = description.label(keyword::TYPE) {
            if !keyword::EXPERIMENT_TYPES.contains(&experiment_type) {
                errors.push(
                    Diagnostic::error(format!(
                        "experiment `{name}` has unknown type `{experiment_type}`"
                    ))
                    .with_code(ErrorCode::E303)
                    .with_label(description.provenance().clone(), "declared here")
                    .with_help(format!(
                        "use one of: {}",
                        keyword::EXPERIMENT_TYPES.join(", ")
                    )),
                );
            }
        }
    }

    if description.is_experiment() {
        errors.into_iter().map(Diagnostic::on_experiment).collect()
    } else {
        errors
    }
}
