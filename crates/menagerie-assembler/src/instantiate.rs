//! Instantiation of member-less description shells.

use indexmap::IndexMap;
use log::{debug, trace};
use menagerie_core::{
    description::{Description, DescriptionError, DescriptionId},
    identifier::Id,
    model::ModelDescription,
    syntax::SyntacticElement,
};

use crate::{
    context::AssemblyContext,
    error::{Diagnostic, DiagnosticSink, ErrorCode},
};

/// Creates a shell for every collected species and experiment, recursing into
/// nested declarations, and registers each in the name cache.
pub(crate) fn instantiate<'a>(
    ctx: &mut AssemblyContext<'a>,
    model: &mut ModelDescription,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), DescriptionError> {
    let root = model.root();
    let declarations: Vec<_> = ctx
        .species
        .values()
        .chain(ctx.experiments.values())
        .copied()
        .collect();
    for declaration in declarations {
        add_micro(ctx, model, root, declaration.element, declaration.origin, sink)?;
    }

    model.set_micro_species_names(ctx.cache.keys().copied());
    debug!(descriptions = ctx.cache.len(); "Description shells instantiated");
    Ok(())
}

fn add_micro<'a>(
    ctx: &mut AssemblyContext<'a>,
    model: &mut ModelDescription,
    owner: DescriptionId,
    element: &'a SyntacticElement,
    origin: Id,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), DescriptionError> {
    let Some(mut shell) = Description::shell(element) else {
        return Ok(());
    };
    shell.set_origin(origin)?;
    let name = shell.name();
    let id = model.add_description(owner, shell)?;
    trace!(name = name.to_string(), id:% = id, owner:% = owner; "Instantiated description");

    ctx.cache.insert(name, id);
    ctx.nodes.insert(id, element);

    for nested in nested_declarations(element, sink) {
        add_micro(ctx, model, id, nested, origin, sink)?;
    }
    Ok(())
}

/// Species and experiments declared inside `macro_species`, one per name.
fn nested_declarations<'a>(
    macro_species: &'a SyntacticElement,
    sink: &mut dyn DiagnosticSink,
) -> Vec<&'a SyntacticElement> {
    let mut nested: IndexMap<Id, &'a SyntacticElement> = IndexMap::new();
    for element in macro_species.species_declarations().chain(macro_species.experiments()) {
        let name = element.name_or_keyword();
        if let Some(previous) = nested.insert(name, element) {
            sink.emit(
                Diagnostic::error(format!(
                    "`{name}` is declared twice in `{}`",
                    macro_species.name_or_keyword()
                ))
                .with_code(ErrorCode::E104)
                .with_label(element.provenance().clone(), "duplicate declaration")
                .with_secondary_label(previous.provenance().clone(), "first declared here"),
            );
        }
    }
    nested.into_values().collect()
}
