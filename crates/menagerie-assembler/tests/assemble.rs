use menagerie_assembler::{
    AssembleError, Assembler, AssemblyConfig, AssemblyRequest,
    error::{DiagnosticCollector, ErrorCode},
};
use menagerie_core::{
    builtin::BuiltInRegistry,
    description::{Description, DescriptionKind, Member, MemberRole},
    facet::Facets,
    identifier::Id,
    model::ModelDescription,
    syntax::{ElementKind, SyntacticElement},
};

fn assemble(
    trees: Vec<SyntacticElement>,
) -> (Result<ModelDescription, AssembleError>, DiagnosticCollector) {
    assemble_with(AssemblyConfig::default(), AssemblyRequest::new("main", trees))
}

fn assemble_with(
    config: AssemblyConfig,
    request: AssemblyRequest,
) -> (Result<ModelDescription, AssembleError>, DiagnosticCollector) {
    let mut diagnostics = DiagnosticCollector::new();
    let result = Assembler::new(config).assemble(request, &mut diagnostics);
    (result, diagnostics)
}

fn codes(diagnostics: &DiagnosticCollector) -> Vec<ErrorCode> {
    diagnostics
        .diagnostics()
        .iter()
        .filter_map(|d| d.code())
        .collect()
}

fn described<'m>(model: &'m ModelDescription, name: &str) -> &'m Description {
    model.description(
        model
            .find(name)
            .unwrap_or_else(|| panic!("`{name}` should be in the model")),
    )
}

#[test]
fn test_import_scenario() {
    let lib = SyntacticElement::model("A")
        .with_child(
            SyntacticElement::species("X")
                .with_parent("agent")
                .with_child(SyntacticElement::variable("from_import")),
        )
        .with_file("A.gaml")
        .inherit_provenance();
    let main = SyntacticElement::model("M")
        .with_child(
            SyntacticElement::species("Y")
                .with_parent("agent")
                .with_child(SyntacticElement::variable("only_y"))
                .with_child(SyntacticElement::variable("shared").with_facet("init", "1")),
        )
        .with_child(
            SyntacticElement::species("X")
                .with_parent("Y")
                .with_child(SyntacticElement::variable("shared").with_facet("init", "2")),
        )
        .with_file("M.gaml")
        .inherit_provenance();

    let (result, diagnostics) = assemble(vec![main, lib]);
    let model = result.unwrap();

    let x = model.find("X").unwrap();
    assert_eq!(model.parent_name(x), Some(Id::new("Y")));
    assert_eq!(model.parent_name(model.find("Y").unwrap()), Some(Id::new("agent")));

    let x = model.description(x);
    let only_y = x.member(MemberRole::Variable, "only_y").unwrap();
    assert_eq!(only_y.inherited_from(), Some(Id::new("Y")));
    let shared = x.member(MemberRole::Variable, "shared").unwrap();
    assert_eq!(shared.facets().label("init"), Some("2"));
    assert!(shared.inherited_from().is_none());
    assert!(x.member(MemberRole::Variable, "from_import").is_none());
    assert!(x.member(MemberRole::Action, "die").is_some());

    assert_eq!(codes(&diagnostics), vec![ErrorCode::E102]);
    assert!(!diagnostics.has_errors());
    assert_eq!(model.imported_models().len(), 1);
    assert!(model.imported_models().contains(&Id::new("A_model")));
    let paths: Vec<&str> = model.alternate_paths().iter().map(String::as_str).collect();
    assert_eq!(paths, vec!["A.gaml", "M.gaml"]);
}

#[test]
fn test_cycle_terminates_with_one_error() {
    let main = SyntacticElement::model("m")
        .with_child(
            SyntacticElement::species("a")
                .with_parent("c")
                .with_child(SyntacticElement::variable("va")),
        )
        .with_child(
            SyntacticElement::species("b")
                .with_parent("a")
                .with_child(SyntacticElement::variable("vb")),
        )
        .with_child(
            SyntacticElement::species("c")
                .with_parent("b")
                .with_child(SyntacticElement::variable("vc")),
        );

    let (result, diagnostics) = assemble(vec![main]);
    let model = result.unwrap();

    assert_eq!(codes(&diagnostics), vec![ErrorCode::E103]);
    assert_eq!(model.parent_name(model.find("c").unwrap()), Some(Id::new("agent")));
    // Surviving edges c -> a -> b were merged in order.
    let b = described(&model, "b");
    assert!(b.member(MemberRole::Variable, "va").is_some());
    assert!(b.member(MemberRole::Variable, "vc").is_some());
    assert!(model.iter().all(|(_, d)| d.is_finalized()));
}

#[test]
fn test_sequential_assemblies_are_equivalent() {
    let trees = || {
        vec![
            SyntacticElement::model("m")
                .with_child(SyntacticElement::species("animal"))
                .with_child(SyntacticElement::species("wolf").with_parent("animal"))
                .with_child(SyntacticElement::species("loop").with_parent("loop"))
                .with_child(SyntacticElement::experiment("run")),
        ]
    };
    let assembler = Assembler::new(AssemblyConfig::default());

    let mut first_diagnostics = DiagnosticCollector::new();
    let first = assembler
        .assemble(AssemblyRequest::new("m", trees()), &mut first_diagnostics)
        .unwrap();
    let mut second_diagnostics = DiagnosticCollector::new();
    let second = assembler
        .assemble(AssemblyRequest::new("m", trees()), &mut second_diagnostics)
        .unwrap();

    assert_eq!(first, second);
    assert_eq!(first_diagnostics.diagnostics(), second_diagnostics.diagnostics());
}

#[test]
fn test_default_parent_is_generic_base() {
    let main = SyntacticElement::model("m").with_child(SyntacticElement::species("plain"));

    let (result, _) = assemble(vec![main]);
    let model = result.unwrap();

    let plain = model.find("plain").unwrap();
    assert_eq!(model.parent_name(plain), Some(Id::new("agent")));
    assert!(
        model
            .description(plain)
            .member(MemberRole::Variable, "location")
            .is_some()
    );
}

#[test]
fn test_duplicate_collapses_to_one() {
    let main = SyntacticElement::model("m")
        .with_child(SyntacticElement::species("Y").with_line(1))
        .with_child(SyntacticElement::species("Y").with_line(4))
        .with_file("m.gaml")
        .inherit_provenance();

    let (result, diagnostics) = assemble(vec![main]);
    let model = result.unwrap();

    assert_eq!(diagnostics.diagnostics().len(), 1);
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E100]);
    let ys = model.iter().filter(|(_, d)| d.name() == "Y").count();
    assert_eq!(ys, 1);
    assert_eq!(described(&model, "Y").provenance().line, Some(4));
}

#[test]
fn test_scheduler_rewrite() {
    let tree = || {
        SyntacticElement::model("m")
            .with_facet("torus", "true")
            .with_child(SyntacticElement::global().with_facet("schedules", "shuffle(wolf)"))
            .with_child(SyntacticElement::species("animal").with_child(SyntacticElement::variable("energy")))
            .with_child(SyntacticElement::species("wolf").with_parent("animal"))
            .with_child(SyntacticElement::experiment("run"))
    };
    let legacy_off = AssemblyConfig {
        legacy_scheduling: false,
        ..AssemblyConfig::default()
    };

    let (with, _) = assemble(vec![tree()]);
    let (without, _) = assemble_with(legacy_off, AssemblyRequest::new("main", vec![tree()]));
    let with = with.unwrap();
    let without = without.unwrap();

    assert_eq!(with.len(), without.len() + 1);
    let scheduler = described(&with, "_internal_global_scheduler");
    assert_eq!(scheduler.label("schedules"), Some("shuffle(wolf)"));
    assert!(!with.root_description().facets().contains("schedules"));
    assert_eq!(
        without.root_description().label("schedules"),
        Some("shuffle(wolf)")
    );
    assert!(without.find("_internal_global_scheduler").is_none());

    // Everything but the scheduler and the relocated facet is untouched.
    for (id, description) in without.iter().skip(1) {
        assert_eq!(with.description(id), description);
    }
    let (root_with, root_without) = (with.root_description(), without.root_description());
    let mut relocated = root_without.facets().clone();
    relocated.remove("schedules");
    assert_eq!(root_with.facets(), &relocated);
    assert_eq!(root_with.parent(), root_without.parent());
    assert!(root_with.members().eq(root_without.members()));
    let scheduler_id = with.find("_internal_global_scheduler").unwrap();
    let micro_with: Vec<_> = root_with
        .micro()
        .iter()
        .copied()
        .filter(|id| *id != scheduler_id)
        .collect();
    assert_eq!(micro_with, root_without.micro());
}

#[test]
fn test_unmet_required_plugin_aborts() {
    let main = SyntacticElement::model("m")
        .with_pragma("requires", &["physics"])
        .with_child(SyntacticElement::species("wolf"));
    let config = AssemblyConfig {
        enforce_required_plugins: true,
        ..AssemblyConfig::default()
    };

    let (result, diagnostics) = assemble_with(config, AssemblyRequest::new("m", vec![main]));

    assert!(matches!(result, Err(AssembleError::Pragma { .. })));
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E001]);
}

#[test]
fn test_experiment_failure_aborts_species_failure_does_not() {
    let concrete_with_abstract_action = |element: SyntacticElement| {
        element.with_child(SyntacticElement::action("step").with_facet("virtual", "true"))
    };

    let species_only = SyntacticElement::model("m")
        .with_child(concrete_with_abstract_action(SyntacticElement::species("wolf")));
    let (result, diagnostics) = assemble(vec![species_only]);
    assert!(result.is_ok());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E301]);

    let with_experiment = SyntacticElement::model("m")
        .with_child(SyntacticElement::experiment("run").with_facet("type", "interactive"));
    let (result, diagnostics) = assemble(vec![with_experiment]);
    assert!(matches!(
        result,
        Err(AssembleError::ExperimentFinalization(name)) if name == "run"
    ));
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E303]);
}

#[test]
fn test_model_failure_aborts() {
    let main = SyntacticElement::model("m")
        .with_child(SyntacticElement::action("go").with_facet("virtual", "true"));

    let (result, diagnostics) = assemble(vec![main]);

    assert!(matches!(result, Err(AssembleError::ModelFinalization(_))));
    assert!(diagnostics.has_errors());
}

#[test]
fn test_experiment_inheritance() {
    let main = SyntacticElement::model("m")
        .with_child(
            SyntacticElement::experiment("explore")
                .with_parent("base")
                .with_facet("type", "batch"),
        )
        .with_child(
            SyntacticElement::experiment("base")
                .with_child(SyntacticElement::variable("replications")),
        )
        .with_child(SyntacticElement::experiment("left").with_parent("right"))
        .with_child(SyntacticElement::experiment("right").with_parent("left"));

    let (result, diagnostics) = assemble(vec![main]);
    let model = result.unwrap();

    let explore = described(&model, "explore");
    assert_eq!(
        explore
            .member(MemberRole::Variable, "replications")
            .unwrap()
            .inherited_from(),
        Some(Id::new("base"))
    );
    assert!(explore.member(MemberRole::Variable, "seed").is_some());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E103]);
    assert_eq!(model.experiments().count(), 4);
}

#[test]
fn test_no_experiment_pragma_hides_experiment_notes() {
    let main = SyntacticElement::model("m")
        .with_pragma("no_experiment", &[])
        .with_child(SyntacticElement::experiment("run"))
        .with_file("m.gaml");
    let lib = SyntacticElement::model("lib")
        .with_child(SyntacticElement::experiment("run"))
        .with_file("lib.gaml");

    let (result, diagnostics) = assemble(vec![main, lib]);

    assert!(result.is_ok());
    assert!(diagnostics.diagnostics().is_empty());
}

#[test]
fn test_graft_registers_alias() {
    let (sub, _) = assemble(vec![
        SyntacticElement::model("ecosystem")
            .with_child(SyntacticElement::species("tree"))
            .with_file("ecosystem.gaml"),
    ]);
    let sub = sub.unwrap();

    let main = SyntacticElement::model("city")
        .with_child(SyntacticElement::species("citizen"))
        .with_file("city.gaml");
    let request = AssemblyRequest::new("city", vec![main]).with_graft("eco", sub);
    let (result, diagnostics) = assemble_with(AssemblyConfig::default(), request);
    let model = result.unwrap();

    assert!(diagnostics.diagnostics().is_empty());
    let (alias, grafted) = model.grafts().next().unwrap();
    assert_eq!(alias, "eco");
    assert_eq!(model.description(grafted).owner(), Some(model.root()));
    assert_eq!(model.types().get(Id::new("eco")).unwrap().name, "ecosystem_model");
    assert!(model.types().contains(Id::new("tree")));
    assert!(model.types().contains(Id::new("citizen")));
    assert!(model.alternate_paths().contains("ecosystem.gaml"));
}

#[test]
fn test_graft_is_shadowed_by_own_species() {
    let (sub, _) = assemble(vec![
        SyntacticElement::model("eco")
            .with_child(SyntacticElement::species("wolf").with_child(SyntacticElement::variable("pack")))
            .with_child(SyntacticElement::species("deer")),
    ]);
    let main = SyntacticElement::model("city")
        .with_child(SyntacticElement::species("wolf").with_child(SyntacticElement::variable("owner")));
    let request = AssemblyRequest::new("city", vec![main]).with_graft("eco", sub.unwrap());

    let (result, _) = assemble_with(AssemblyConfig::default(), request);
    let model = result.unwrap();

    let wolf = model.find("wolf").unwrap();
    assert!(model.description(wolf).grafted_from().is_none());
    assert!(model.description(wolf).member(MemberRole::Variable, "owner").is_some());
    assert_eq!(model.types().get(Id::new("wolf")).unwrap().description, wolf);
    let deer = model.find("deer").unwrap();
    assert_eq!(model.description(deer).grafted_from(), Some(Id::new("eco")));
}

#[test]
fn test_duplicate_without_file_is_error() {
    let main = SyntacticElement::model("m")
        .with_child(SyntacticElement::species("Y"))
        .with_child(SyntacticElement::species("Y").with_child(SyntacticElement::variable("kept")));

    let (result, diagnostics) = assemble(vec![main]);
    let model = result.unwrap();

    assert_eq!(codes(&diagnostics), vec![ErrorCode::E100]);
    assert!(diagnostics.has_errors());
    assert_eq!(model.iter().filter(|(_, d)| d.name() == "Y").count(), 1);
    assert!(described(&model, "Y").member(MemberRole::Variable, "kept").is_some());
}

#[test]
fn test_graft_requires_finalized_model() {
    let root = Description::new(
        DescriptionKind::Model,
        ElementKind::Model,
        Id::new("draft_model"),
        Facets::new(),
    );
    let draft = ModelDescription::new(root, menagerie_core::builtin::registry());
    let request = AssemblyRequest::new("m", vec![SyntacticElement::model("m")])
        .with_graft("draft", draft);

    let (result, _) = assemble_with(AssemblyConfig::default(), request);

    assert!(matches!(result, Err(AssembleError::Graft { .. })));
}

#[test]
fn test_empty_input() {
    let (result, _) = assemble(Vec::new());
    assert!(matches!(result, Err(AssembleError::EmptyInput)));
}

#[test]
fn test_custom_built_in_model_parent() {
    let mut physics = Description::built_in(
        DescriptionKind::Model,
        ElementKind::Model,
        "physical_world",
        Some("model"),
    );
    physics
        .add_member(Member::new(MemberRole::Variable, "gravity"))
        .unwrap();
    let registry: &'static BuiltInRegistry =
        Box::leak(Box::new(BuiltInRegistry::defaults().with_model(physics).unwrap()));
    let main = SyntacticElement::model("m")
        .with_child(SyntacticElement::global().with_facet("parent", "physical_world"));

    let mut diagnostics = DiagnosticCollector::new();
    let model = Assembler::with_registry(AssemblyConfig::default(), registry)
        .assemble(AssemblyRequest::new("m", vec![main]), &mut diagnostics)
        .unwrap();

    let root = model.root_description();
    assert_eq!(model.parent_name(model.root()), Some(Id::new("physical_world")));
    assert!(root.member(MemberRole::Variable, "gravity").is_some());
    assert!(root.member(MemberRole::Variable, "cycle").is_some());
}

#[test]
fn test_species_cannot_extend_experiment() {
    let main = SyntacticElement::model("m")
        .with_child(SyntacticElement::experiment("run"))
        .with_child(SyntacticElement::species("odd").with_parent("run"));

    let (result, diagnostics) = assemble(vec![main]);

    assert!(result.is_ok());
    assert_eq!(codes(&diagnostics), vec![ErrorCode::E302]);
}
