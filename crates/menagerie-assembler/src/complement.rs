//! Member complementing: copies the variables, actions, behaviors and other
//! members parsed under each declaration into its description.

use log::{debug, trace};
use menagerie_core::{
    description::{DescriptionError, DescriptionId, Member},
    model::ModelDescription,
};

use crate::{
    context::AssemblyContext,
    error::{Diagnostic, DiagnosticSink, ErrorCode},
};

/// Adds the global members to the model and each declaration's own members
/// to its description. Parents are not consulted.
pub(crate) fn complement(
    ctx: &AssemblyContext<'_>,
    model: &mut ModelDescription,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), DescriptionError> {
    let root = model.root();
    for member in &ctx.global_members {
        add_member(model, root, member.clone(), sink)?;
    }

    for (&id, element) in &ctx.nodes {
        for child in element.members() {
            if let Some(member) = Member::from_element(child) {
                add_member(model, id, member, sink)?;
            }
        }
    }

    debug!(descriptions = ctx.nodes.len() + 1; "Members complemented");
    Ok(())
}

/// Adds `member`, replacing any member of the same role and name.
///
/// Replacing one declared in the same place is reported; replacing one that
/// came from another model is how the primary model overrides its imports.
fn add_member(
    model: &mut ModelDescription,
    id: DescriptionId,
    member: Member,
    sink: &mut dyn DiagnosticSink,
) -> Result<(), DescriptionError> {
    let origin = member.origin().map(str::to_owned);
    let provenance = member.provenance().clone();
    let (role, name) = (member.role(), member.name());

    let description = model.description_mut(id);
    let Some(previous) = description.add_member(member)? else {
        return Ok(());
    };

    if previous.origin() == origin.as_deref() {
        let diagnostic = Diagnostic::error(format!(
            "{role} `{name}` is declared twice in {} `{}`",
            description.kind(),
            description.name()
        ))
        .with_code(ErrorCode::E105)
        .with_label(provenance, "duplicate declaration")
        .with_secondary_label(previous.provenance().clone(), "first declared here");
        sink.emit(if description.is_experiment() {
            diagnostic.on_experiment()
        } else {
            diagnostic
        });
    } else {
        trace!(
            member = name.to_string(),
            replaced_from = previous.origin().unwrap_or_default();
            "Member overridden by importing model"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{collect, error::DiagnosticCollector, instantiate};
    use menagerie_core::{
        builtin,
        description::{Description, DescriptionKind, MemberRole},
        facet::Facets,
        identifier::Id,
        syntax::{ElementKind, SyntacticElement},
    };

    fn complemented(trees: &[SyntacticElement]) -> (ModelDescription, DiagnosticCollector) {
        let mut ctx = AssemblyContext::new();
        let mut sink = DiagnosticCollector::new();
        collect::collect(&mut ctx, trees, &mut sink);
        let root = Description::new(
            DescriptionKind::Model,
            ElementKind::Model,
            Id::new("main_model"),
            Facets::new(),
        );
        let mut model = ModelDescription::new(root, builtin::registry());
        instantiate::instantiate(&mut ctx, &mut model, &mut sink).unwrap();
        complement(&ctx, &mut model, &mut sink).unwrap();
        (model, sink)
    }

    #[test]
    fn test_members_attached_recursively() {
        let trees = vec![
            SyntacticElement::model("main").with_child(
                SyntacticElement::species("city")
                    .with_child(SyntacticElement::variable("population"))
                    .with_child(
                        SyntacticElement::species("building")
                            .with_child(SyntacticElement::variable("height"))
                            .with_child(SyntacticElement::aspect("base")),
                    ),
            ),
        ];
        let (model, sink) = complemented(&trees);

        let city = model.description(model.find("city").unwrap());
        let building = model.description(model.find("building").unwrap());
        assert_eq!(city.members().count(), 1);
        assert!(building.member(MemberRole::Variable, "height").is_some());
        assert!(building.member(MemberRole::Aspect, "base").is_some());
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_primary_global_member_overrides_import() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(SyntacticElement::variable("speed").with_facet("init", "2")),
            SyntacticElement::model("lib")
                .with_child(SyntacticElement::variable("speed").with_facet("init", "1")),
        ];
        let (model, sink) = complemented(&trees);

        let speed = model.root_description().member(MemberRole::Variable, "speed").unwrap();
        assert_eq!(speed.facets().label("init"), Some("2"));
        assert_eq!(speed.origin(), Some("main_model"));
        assert!(sink.diagnostics().is_empty());
    }

    #[test]
    fn test_duplicate_member_in_one_species() {
        let trees = vec![
            SyntacticElement::model("main").with_child(
                SyntacticElement::species("wolf")
                    .with_child(SyntacticElement::action("hunt"))
                    .with_child(SyntacticElement::action("hunt").with_facet("type", "bool")),
            ),
        ];
        let (model, sink) = complemented(&trees);

        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code(), Some(ErrorCode::E105));
        assert_eq!(
            sink.diagnostics()[0].message(),
            "action `hunt` is declared twice in species `wolf`"
        );
        let wolf = model.description(model.find("wolf").unwrap());
        assert_eq!(
            wolf.member(MemberRole::Action, "hunt").unwrap().facets().label("type"),
            Some("bool")
        );
    }
}
