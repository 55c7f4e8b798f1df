//! Syntax trees handed over by the external parser.
//!
//! A [`SyntacticElement`] is the loosely-typed input of the assembler: a
//! declaration kind, an optional name, its facets, its children and where it
//! came from. Trees are read-only once built; the builder methods below exist
//! for the parser front end and for tests.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{
    description::MemberRole,
    facet::{Expression, Facets},
    identifier::Id,
};

/// The declaration kind of a syntax element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    Model,
    Global,
    Species,
    Grid,
    Experiment,
    Variable,
    Action,
    /// Reflexes, init blocks, states and other scheduled behaviors.
    Behavior,
    Aspect,
    Parameter,
    Output,
}

impl ElementKind {
    /// Whether this kind declares a species (plain or grid).
    pub fn is_species(&self) -> bool {
        matches!(self, ElementKind::Species | ElementKind::Grid)
    }

    pub fn is_experiment(&self) -> bool {
        matches!(self, ElementKind::Experiment)
    }

    /// The member role of this kind, or `None` for declarations and containers.
    pub fn member_role(&self) -> Option<MemberRole> {
        match self {
            ElementKind::Variable => Some(MemberRole::Variable),
            ElementKind::Action => Some(MemberRole::Action),
            ElementKind::Behavior => Some(MemberRole::Behavior),
            ElementKind::Aspect => Some(MemberRole::Aspect),
            ElementKind::Parameter => Some(MemberRole::Parameter),
            ElementKind::Output => Some(MemberRole::Output),
            ElementKind::Model
            | ElementKind::Global
            | ElementKind::Species
            | ElementKind::Grid
            | ElementKind::Experiment => None,
        }
    }

    /// The keyword of this kind as written in the modeling language.
    pub fn keyword(&self) -> &'static str {
        match self {
            ElementKind::Model => "model",
            ElementKind::Global => "global",
            ElementKind::Species => "species",
            ElementKind::Grid => "grid",
            ElementKind::Experiment => "experiment",
            ElementKind::Variable => "var",
            ElementKind::Action => "action",
            ElementKind::Behavior => "reflex",
            ElementKind::Aspect => "aspect",
            ElementKind::Parameter => "parameter",
            ElementKind::Output => "output",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Where a syntax element was parsed from.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Provenance {
    #[serde(default)]
    pub file: Option<String>,
    #[serde(default)]
    pub line: Option<u32>,
}

impl Provenance {
    pub fn new(file: impl Into<String>, line: Option<u32>) -> Self {
        Self {
            file: Some(file.into()),
            line,
        }
    }
}

impl fmt::Display for Provenance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => write!(f, "{file}:{line}"),
            (Some(file), None) => write!(f, "{file}"),
            (None, Some(line)) => write!(f, "<unknown>:{line}"),
            (None, None) => write!(f, "<unknown>"),
        }
    }
}

/// A node of a parsed syntax tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntacticElement {
    kind: ElementKind,
    #[serde(default)]
    name: Option<Id>,
    #[serde(default)]
    facets: Facets,
    #[serde(default)]
    children: Vec<SyntacticElement>,
    #[serde(default)]
    provenance: Provenance,
    #[serde(default)]
    pragmas: IndexMap<String, Vec<String>>,
}

impl SyntacticElement {
    pub fn new(kind: ElementKind, name: Option<&str>) -> Self {
        Self {
            kind,
            name: name.map(Id::new),
            facets: Facets::new(),
            children: Vec::new(),
            provenance: Provenance::default(),
            pragmas: IndexMap::new(),
        }
    }

    pub fn model(name: &str) -> Self {
        Self::new(ElementKind::Model, Some(name))
    }

    pub fn global() -> Self {
        Self::new(ElementKind::Global, None)
    }

    pub fn species(name: &str) -> Self {
        Self::new(ElementKind::Species, Some(name))
    }

    pub fn grid(name: &str) -> Self {
        Self::new(ElementKind::Grid, Some(name))
    }

    pub fn experiment(name: &str) -> Self {
        Self::new(ElementKind::Experiment, Some(name))
    }

    pub fn variable(name: &str) -> Self {
        Self::new(ElementKind::Variable, Some(name))
    }

    pub fn action(name: &str) -> Self {
        Self::new(ElementKind::Action, Some(name))
    }

    pub fn behavior(name: &str) -> Self {
        Self::new(ElementKind::Behavior, Some(name))
    }

    pub fn aspect(name: &str) -> Self {
        Self::new(ElementKind::Aspect, Some(name))
    }

    /// Adds a facet.
    pub fn with_facet(mut self, key: &str, expression: impl Into<Expression>) -> Self {
        self.facets.insert(key, expression);
        self
    }

    /// Shorthand for `with_facet("parent", parent)`.
    pub fn with_parent(self, parent: &str) -> Self {
        self.with_facet(crate::keyword::PARENT, parent)
    }

    pub fn with_child(mut self, child: SyntacticElement) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = SyntacticElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Sets the file this element (and every child without a file) came from.
    pub fn with_file(mut self, file: &str) -> Self {
        self.provenance.file = Some(file.to_owned());
        self.inherit_provenance()
    }

    pub fn with_line(mut self, line: u32) -> Self {
        self.provenance.line = Some(line);
        self
    }

    pub fn with_pragma(mut self, name: &str, arguments: &[&str]) -> Self {
        self.pragmas.insert(
            name.to_owned(),
            arguments.iter().map(|arg| (*arg).to_owned()).collect(),
        );
        self
    }

    /// Propagates this element's file to every descendant that has none.
    ///
    /// Parsers that stamp only the root of each tree rely on this before
    /// handing trees to the assembler.
    pub fn inherit_provenance(mut self) -> Self {
        let file = self.provenance.file.clone();
        self.children = self
            .children
            .into_iter()
            .map(|mut child| {
                if child.provenance.file.is_none() {
                    child.provenance.file.clone_from(&file);
                }
                child.inherit_provenance()
            })
            .collect();
        self
    }

    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    pub fn name(&self) -> Option<Id> {
        self.name
    }

    /// The element's name, or its keyword for anonymous elements.
    pub fn name_or_keyword(&self) -> Id {
        self.name.unwrap_or_else(|| Id::new(self.kind.keyword()))
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn children(&self) -> &[SyntacticElement] {
        &self.children
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    pub fn pragmas(&self) -> &IndexMap<String, Vec<String>> {
        &self.pragmas
    }

    /// Species declared directly under this element, plain species first and
    /// grids last.
    pub fn species_declarations(&self) -> impl Iterator<Item = &SyntacticElement> {
        let plain = self
            .children
            .iter()
            .filter(|child| child.kind == ElementKind::Species);
        let grids = self
            .children
            .iter()
            .filter(|child| child.kind == ElementKind::Grid);
        plain.chain(grids)
    }

    /// Experiments declared directly under this element.
    pub fn experiments(&self) -> impl Iterator<Item = &SyntacticElement> {
        self.children
            .iter()
            .filter(|child| child.kind.is_experiment())
    }

    /// Nested `global` blocks directly under this element.
    pub fn globals(&self) -> impl Iterator<Item = &SyntacticElement> {
        self.children
            .iter()
            .filter(|child| child.kind == ElementKind::Global)
    }

    /// Children that become members (variables, actions, behaviors, ...).
    pub fn members(&self) -> impl Iterator<Item = &SyntacticElement> {
        self.children
            .iter()
            .filter(|child| child.kind.member_role().is_some())
    }
}
