//! Member merge-down from parents.

use log::trace;
use menagerie_core::{
    description::{DescriptionError, DescriptionId, Member},
    model::ModelDescription,
};

/// Copies down every member of the parent of `id` that `id` does not shadow.
///
/// Must run after the parent's own merge. Returns the number of members copied.
pub(crate) fn inherit(
    model: &mut ModelDescription,
    id: DescriptionId,
) -> Result<usize, DescriptionError> {
    let Some(parent) = model.resolve_parent(id) else {
        return Ok(0);
    };
    let parent_name = parent.name();
    let members: Vec<Member> = parent.members().cloned().collect();

    let description = model.description_mut(id);
    let copied = description.inherit_members(parent_name, &members)?;
    trace!(
        description = description.name().to_string(),
        parent = parent_name.to_string(),
        copied;
        "Inherited members"
    );
    Ok(copied)
}
