//! Declaration collection across the primary model and its imports.
//!
//! Trees are walked in reverse import order so that, with a plain
//! "later wins" rule, the primary model (index 0) overrides its imports and
//! within one file a later declaration overrides an earlier one.

use log::{debug, trace};
use menagerie_core::{
    description::{DescriptionKind, Member},
    facet::Expression,
    identifier::Id,
    keyword,
    syntax::SyntacticElement,
};

use crate::{
    context::{AssemblyContext, Declaration},
    error::{Diagnostic, DiagnosticSink, ErrorCode},
};

/// Name of the model a syntax tree declares.
pub(crate) fn model_id(tree: &SyntacticElement) -> Id {
    Id::new(&keyword::model_name(&tree.name_or_keyword().as_string()))
}

/// Merges global facets and gathers species, experiments and global members
/// of every tree into `ctx`.
pub(crate) fn collect<'a>(
    ctx: &mut AssemblyContext<'a>,
    trees: &'a [SyntacticElement],
    sink: &mut dyn DiagnosticSink,
) {
    for tree in trees.iter().rev() {
        let origin = model_id(tree);
        trace!(origin = origin.to_string(); "Collecting declarations");
        collect_scope(ctx, tree, origin, sink);
        for global in tree.globals() {
            collect_scope(ctx, global, origin, sink);
        }
    }
    debug!(
        species = ctx.species.len(),
        experiments = ctx.experiments.len(),
        global_members = ctx.global_members.len();
        "Declarations collected"
    );
}

fn collect_scope<'a>(
    ctx: &mut AssemblyContext<'a>,
    scope: &'a SyntacticElement,
    origin: Id,
    sink: &mut dyn DiagnosticSink,
) {
    ctx.global_facets.merge(scope.facets());

    for element in scope.members() {
        if let Some(member) = Member::from_element(element) {
            let member = member.with_facet(keyword::ORIGIN, Expression::new(origin.to_string()));
            ctx.global_members.push(member);
        }
    }

    for element in scope.species_declarations() {
        let name = element.name_or_keyword();
        if let Some(previous) = ctx.species.get(&name) {
            report_duplicate(DescriptionKind::Species, name, previous, element, origin, sink);
        }
        ctx.species.insert(name, Declaration { element, origin });
    }

    for element in scope.experiments() {
        let name = element.name_or_keyword();
        if let Some(previous) = ctx.experiments.get(&name) {
            report_duplicate(DescriptionKind::Experiment, name, previous, element, origin, sink);
        }
        ctx.experiments.insert(name, Declaration { element, origin });
    }
}

/// One diagnostic per collision: an error within one model, an informational
/// note when a declaration overrides one of an imported model.
///
/// Models are told apart by the tree a declaration came from; files only
/// feed the message, since trees may carry no file at all.
fn report_duplicate(
    kind: DescriptionKind,
    name: Id,
    previous: &Declaration<'_>,
    current: &SyntacticElement,
    origin: Id,
    sink: &mut dyn DiagnosticSink,
) {
    let diagnostic = if previous.origin == origin {
        let previous = previous.element;
        let code = match kind {
            DescriptionKind::Experiment => ErrorCode::E101,
            _ => ErrorCode::E100,
        };
        Diagnostic::error(format!("{kind} `{name}` is declared twice"))
            .with_code(code)
            .with_label(current.provenance().clone(), "duplicate declaration")
            .with_secondary_label(previous.provenance().clone(), "first declared here")
            .with_help("remove the duplicate or use a different name")
    } else {
        let superseded = previous.element.provenance();
        let source = superseded
            .file
            .clone()
            .unwrap_or_else(|| previous.origin.to_string());
        Diagnostic::info(format!("{kind} `{name}` supersedes the one declared in {source}"))
            .with_code(ErrorCode::E102)
            .with_label(current.provenance().clone(), "this declaration wins")
            .with_secondary_label(superseded.clone(), "superseded declaration")
    };
    let diagnostic = match kind {
        DescriptionKind::Experiment => diagnostic.on_experiment(),
        _ => diagnostic,
    };
    sink.emit(diagnostic);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DiagnosticCollector;

    fn run(trees: &[SyntacticElement]) -> (AssemblyContext<'_>, DiagnosticCollector) {
        let mut ctx = AssemblyContext::new();
        let mut sink = DiagnosticCollector::new();
        collect(&mut ctx, trees, &mut sink);
        (ctx, sink)
    }

    #[test]
    fn test_primary_facets_win() {
        let trees = vec![
            SyntacticElement::model("main").with_facet("torus", "true"),
            SyntacticElement::model("lib")
                .with_facet("torus", "false")
                .with_facet("seed", "3"),
        ];
        let (ctx, _) = run(&trees);

        assert_eq!(ctx.global_facets.label("torus"), Some("true"));
        assert_eq!(ctx.global_facets.label("seed"), Some("3"));
    }

    #[test]
    fn test_nested_global_is_inlined() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(
                    SyntacticElement::global()
                        .with_facet("schedules", "[]")
                        .with_child(SyntacticElement::variable("counter")),
                )
                .with_child(SyntacticElement::species("wolf")),
        ];
        let (ctx, _) = run(&trees);

        assert_eq!(ctx.global_facets.label("schedules"), Some("[]"));
        assert_eq!(ctx.global_members.len(), 1);
        assert_eq!(ctx.global_members[0].origin(), Some("main_model"));
        assert!(ctx.species.contains_key(&Id::new("wolf")));
    }

    #[test]
    fn test_grids_come_last() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(SyntacticElement::grid("cell"))
                .with_child(SyntacticElement::species("sheep")),
        ];
        let (ctx, _) = run(&trees);

        let names: Vec<String> = ctx.species.keys().map(Id::to_string).collect();
        assert_eq!(names, vec!["sheep", "cell"]);
    }

    #[test]
    fn test_same_file_duplicate_is_error() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(SyntacticElement::species("y").with_line(2))
                .with_child(SyntacticElement::species("y").with_line(5).with_facet("size", "2"))
                .with_file("main.gaml"),
        ];
        let (ctx, sink) = run(&trees);

        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code(), Some(ErrorCode::E100));
        assert!(sink.has_errors());
        let survivor = ctx.species[&Id::new("y")].element;
        assert_eq!(survivor.facets().label("size"), Some("2"));
    }

    #[test]
    fn test_duplicate_without_file_is_error() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(SyntacticElement::species("y"))
                .with_child(SyntacticElement::species("y").with_facet("size", "2")),
        ];
        let (ctx, sink) = run(&trees);

        assert_eq!(sink.diagnostics().len(), 1);
        assert_eq!(sink.diagnostics()[0].code(), Some(ErrorCode::E100));
        assert!(sink.has_errors());
        assert_eq!(ctx.species.len(), 1);
    }

    #[test]
    fn test_override_without_file_names_the_model() {
        let trees = vec![
            SyntacticElement::model("main").with_child(SyntacticElement::species("y")),
            SyntacticElement::model("lib").with_child(SyntacticElement::species("y")),
        ];
        let (_, sink) = run(&trees);

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
        assert!(diagnostics[0].message().contains("lib_model"));
    }

    #[test]
    fn test_cross_file_override_is_info() {
        let trees = vec![
            SyntacticElement::model("main")
                .with_child(SyntacticElement::experiment("run").with_facet("type", "gui"))
                .with_file("main.gaml"),
            SyntacticElement::model("lib")
                .with_child(SyntacticElement::experiment("run").with_facet("type", "batch"))
                .with_file("lib.gaml"),
        ];
        let (ctx, sink) = run(&trees);

        let diagnostics = sink.diagnostics();
        assert_eq!(diagnostics.len(), 1);
        assert!(diagnostics[0].severity().is_info());
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E102));
        assert!(diagnostics[0].message().contains("lib.gaml"));

        let run = ctx.experiments[&Id::new("run")];
        assert_eq!(run.element.facets().label("type"), Some("gui"));
        assert_eq!(run.origin, "main_model");
    }
}
