//! Indented text outline of an assembled model.
//!
//! One line per description, nested by containment, followed by its
//! members. Members inherited from built-in descriptions are left out.

use std::fmt::{self, Write};

use menagerie_core::{description::DescriptionId, model::ModelDescription};

const INDENT: &str = "  ";

pub(crate) fn render(model: &ModelDescription) -> String {
    let mut out = String::new();
    write_description(model, model.root(), 0, &mut out)
        .expect("Writing to String buffer is infallible");
    out
}

fn write_description(
    model: &ModelDescription,
    id: DescriptionId,
    depth: usize,
    out: &mut String,
) -> fmt::Result {
    let description = model.description(id);
    let indent = INDENT.repeat(depth);

    write!(out, "{indent}{} {}", description.declared_as().keyword(), description.name())?;
    if let Some(parent) = model.parent_name(id) {
        write!(out, " : {parent}")?;
    }
    if description.is_model() {
        if let Some(alias) = description.grafted_from() {
            write!(out, " as {alias}")?;
        }
    }
    if description.is_abstract() {
        write!(out, " [virtual]")?;
    }
    writeln!(out)?;

    let registry = model.registry();
    for member in description.members() {
        let inherited_from = member.inherited_from();
        if inherited_from.is_some_and(|from| registry.lookup(from).is_some()) {
            continue;
        }
        write!(out, "{indent}{INDENT}{} {}", member.role(), member.name())?;
        if let Some(from) = inherited_from {
            write!(out, " (from {from})")?;
        }
        if member.is_abstract() {
            write!(out, " [virtual]")?;
        }
        writeln!(out)?;
    }

    for &child in description.micro() {
        write_description(model, child, depth + 1, out)?;
    }
    Ok(())
}
