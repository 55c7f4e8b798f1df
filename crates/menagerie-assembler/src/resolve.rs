//! Parent resolution.
//!
//! Runs once every shell exists, so a `parent` facet may name a species
//! declared anywhere in the model, before or after the child.

use log::debug;
use menagerie_core::{
    builtin::BuiltInRegistry,
    description::{Description, DescriptionError, ParentRef},
    identifier::Id,
    keyword,
    model::ModelDescription,
};

use crate::context::AssemblyContext;

/// Attaches every instantiated description to its parent.
pub(crate) fn resolve_parents(
    ctx: &AssemblyContext<'_>,
    model: &mut ModelDescription,
) -> Result<(), DescriptionError> {
    let registry = model.registry();
    for &id in ctx.nodes.keys() {
        let description = model.description(id);
        let parent = if description.is_experiment() {
            experiment_parent(ctx, model, registry, description)
        } else {
            species_parent(ctx, registry, description)
        };
        model.description_mut(id).set_parent(parent)?;
    }
    Ok(())
}

/// The built-in model a primary model extends: the one named by the global
/// `parent` facet when registered, the root model otherwise.
pub(crate) fn model_parent(registry: &BuiltInRegistry, requested: Option<&str>) -> ParentRef {
    let name = requested
        .map(Id::new)
        .filter(|name| registry.model(*name).is_some())
        .unwrap_or_else(|| registry.root_model());
    ParentRef::BuiltIn(name)
}

fn species_parent(
    ctx: &AssemblyContext<'_>,
    registry: &BuiltInRegistry,
    description: &Description,
) -> ParentRef {
    let Some(requested) = description.label(keyword::PARENT) else {
        return ParentRef::BuiltIn(registry.default_species());
    };
    let requested = Id::new(requested);
    if let Some(&parent) = ctx.cache.get(&requested) {
        return ParentRef::Declared(parent);
    }
    if registry.species(requested).is_some() {
        return ParentRef::BuiltIn(requested);
    }
    debug!(
        species = description.name().to_string(),
        parent = requested.to_string();
        "Unresolved parent, using the generic base species"
    );
    ParentRef::BuiltIn(registry.default_species())
}

fn experiment_parent(
    ctx: &AssemblyContext<'_>,
    model: &ModelDescription,
    registry: &BuiltInRegistry,
    description: &Description,
) -> ParentRef {
    description
        .label(keyword::PARENT)
        .and_then(|requested| ctx.cache.get(&Id::new(requested)).copied())
        .filter(|parent| model.description(*parent).is_experiment())
        .map(ParentRef::Declared)
        .unwrap_or_else(|| ParentRef::BuiltIn(registry.default_experiment()))
}
