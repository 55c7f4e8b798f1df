//! Legacy scheduling rewrite.
//!
//! Older models put `schedules:` and `frequency:` on the global section. Those
//! facets are moved onto a synthetic species appended to the model, which the
//! runtime schedules like any other.

use log::info;
use menagerie_core::{
    description::{Description, DescriptionError, DescriptionId, DescriptionKind, ParentRef},
    facet::Facets,
    identifier::Id,
    keyword,
    model::ModelDescription,
    syntax::ElementKind,
};

const RELOCATED_FACETS: [&str; 2] = [keyword::SCHEDULES, keyword::FREQUENCY];

/// Moves top-level scheduling facets onto a synthetic scheduler species.
///
/// Returns the id of the new species, or `None` when the model declares
/// neither facet.
pub(crate) fn synthesize(model: &mut ModelDescription) -> Result<Option<DescriptionId>, DescriptionError> {
    let root = model.root();
    if !RELOCATED_FACETS
        .iter()
        .any(|facet| model.root_description().facets().contains(facet))
    {
        return Ok(None);
    }

    let registry = model.registry();
    let base = registry.default_species();
    let mut scheduler = Description::new(
        DescriptionKind::Species,
        ElementKind::Species,
        Id::new(keyword::SCHEDULER_SPECIES),
        Facets::new(),
    );
    scheduler.set_parent(ParentRef::BuiltIn(base))?;
    scheduler.set_origin(model.name())?;
    scheduler.set_provenance(model.root_description().provenance().clone())?;
    for facet in RELOCATED_FACETS {
        if let Some(expression) = model.description_mut(root).remove_facet(facet)? {
            scheduler.set_facet(facet, expression)?;
        }
    }
    if let Some(agent) = registry.species(base) {
        scheduler.inherit_members(agent.name(), agent.members())?;
    }

    let id = model.add_description(root, scheduler)?;
    info!(model = model.name().to_string(); "Relocated global scheduling facets to a scheduler species");
    Ok(Some(id))
}
