//! Descriptions: the resolved semantic nodes produced by model assembly.
//!
//! A [`Description`] represents the model itself, a species or an experiment.
//! It carries two independent relations:
//!
//! - **containment** ([`Description::owner`] and [`Description::micro`]): the
//!   macro/micro nesting, a strict tree fixed at creation;
//! - **inheritance** ([`Description::parent`]): the description members are
//!   merged down from.
//!
//! Descriptions live in the arena of a
//! [`ModelDescription`](crate::model::ModelDescription) and refer to each
//! other through [`DescriptionId`] indices, so neither relation needs
//! reference cycles.

mod member;

pub use member::{Member, MemberKey, MemberRole};

use std::fmt;

use indexmap::IndexMap;
use thiserror::Error;

use crate::{
    facet::{Expression, Facets},
    identifier::Id,
    keyword,
    syntax::{ElementKind, Provenance, SyntacticElement},
};

/// Index of a description inside its model's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DescriptionId(usize);

impl DescriptionId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    /// Position of the description in the arena.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for DescriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// The kind of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DescriptionKind {
    Model,
    Species,
    Experiment,
}

impl DescriptionKind {
    /// The description kind a declaration produces, if it produces one.
    pub fn of(kind: ElementKind) -> Option<Self> {
        match kind {
            ElementKind::Model => Some(DescriptionKind::Model),
            ElementKind::Species | ElementKind::Grid => Some(DescriptionKind::Species),
            ElementKind::Experiment => Some(DescriptionKind::Experiment),
            _ => None,
        }
    }
}

impl fmt::Display for DescriptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionKind::Model => write!(f, "model"),
            DescriptionKind::Species => write!(f, "species"),
            DescriptionKind::Experiment => write!(f, "experiment"),
        }
    }
}

/// The resolved inheritance parent of a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParentRef {
    /// A description of the same model.
    Declared(DescriptionId),
    /// A description of the built-in registry.
    BuiltIn(Id),
}

/// Errors raised when mutating descriptions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptionError {
    #[error("description `{0}` is finalized and can no longer be modified")]
    Finalized(Id),

    #[error("description {0} does not exist in this model")]
    Unknown(DescriptionId),

    #[error("model `{0}` must be finalized before it can be grafted")]
    NotFinalized(Id),
}

/// A resolved model, species or experiment.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    kind: DescriptionKind,
    declared_as: ElementKind,
    name: Id,
    facets: Facets,
    members: IndexMap<MemberKey, Member>,
    micro: Vec<DescriptionId>,
    parent: Option<ParentRef>,
    owner: Option<DescriptionId>,
    is_built_in: bool,
    is_abstract: bool,
    origin: Option<Id>,
    provenance: Provenance,
    grafted_from: Option<Id>,
    finalized: bool,
}

impl Description {
    /// Creates a user description with no members, no parent and no owner.
    pub fn new(kind: DescriptionKind, declared_as: ElementKind, name: Id, facets: Facets) -> Self {
        let is_abstract = facets.is_true(keyword::VIRTUAL);
        Self {
            kind,
            declared_as,
            name,
            facets,
            members: IndexMap::new(),
            micro: Vec::new(),
            parent: None,
            owner: None,
            is_built_in: false,
            is_abstract,
            origin: None,
            provenance: Provenance::default(),
            grafted_from: None,
            finalized: false,
        }
    }

    /// Creates the member-less shell of a species or experiment declaration.
    ///
    /// Returns `None` for elements that do not declare a species or experiment.
    pub fn shell(element: &SyntacticElement) -> Option<Self> {
        let kind = DescriptionKind::of(element.kind())?;
        if kind == DescriptionKind::Model {
            return None;
        }
        let mut description = Self::new(
            kind,
            element.kind(),
            element.name_or_keyword(),
            element.facets().clone(),
        );
        description.provenance = element.provenance().clone();
        Some(description)
    }

    /// Creates a built-in description.
    pub fn built_in(
        kind: DescriptionKind,
        declared_as: ElementKind,
        name: &str,
        parent: Option<&str>,
    ) -> Self {
        let mut description = Self::new(kind, declared_as, Id::new(name), Facets::new());
        description.is_built_in = true;
        description.parent = parent.map(|parent| ParentRef::BuiltIn(Id::new(parent)));
        description
    }

    pub fn kind(&self) -> DescriptionKind {
        self.kind
    }

    /// The keyword the description was declared with (`species`, `grid`, ...).
    pub fn declared_as(&self) -> ElementKind {
        self.declared_as
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    /// The literal label of facet `key`.
    pub fn label(&self, key: &str) -> Option<&str> {
        self.facets.label(key)
    }

    /// Members in insertion order, inherited members first.
    pub fn members(&self) -> impl Iterator<Item = &Member> {
        self.members.values()
    }

    pub fn member(&self, role: MemberRole, name: &str) -> Option<&Member> {
        self.members.get(&MemberKey::new(role, Id::new(name)))
    }

    pub fn has_member(&self, key: &MemberKey) -> bool {
        self.members.contains_key(key)
    }

    /// Containment children (micro-species, experiments, grafted models).
    pub fn micro(&self) -> &[DescriptionId] {
        &self.micro
    }

    pub fn parent(&self) -> Option<ParentRef> {
        self.parent
    }

    pub fn owner(&self) -> Option<DescriptionId> {
        self.owner
    }

    pub fn is_built_in(&self) -> bool {
        self.is_built_in
    }

    pub fn is_experiment(&self) -> bool {
        self.kind == DescriptionKind::Experiment
    }

    pub fn is_model(&self) -> bool {
        self.kind == DescriptionKind::Model
    }

    pub fn is_abstract(&self) -> bool {
        self.is_abstract
    }

    /// The name of the model the description was declared in.
    pub fn origin(&self) -> Option<Id> {
        self.origin
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// The alias of the graft this description was copied in with.
    pub fn grafted_from(&self) -> Option<Id> {
        self.grafted_from
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn set_parent(&mut self, parent: ParentRef) -> Result<(), DescriptionError> {
        self.ensure_open()?;
        self.parent = Some(parent);
        Ok(())
    }

    pub fn set_origin(&mut self, origin: Id) -> Result<(), DescriptionError> {
        self.ensure_open()?;
        self.origin = Some(origin);
        Ok(())
    }

    pub fn set_provenance(&mut self, provenance: Provenance) -> Result<(), DescriptionError> {
        self.ensure_open()?;
        self.provenance = provenance;
        Ok(())
    }

    pub fn set_facet(
        &mut self,
        key: &str,
        expression: impl Into<Expression>,
    ) -> Result<Option<Expression>, DescriptionError> {
        self.ensure_open()?;
        Ok(self.facets.insert(key, expression))
    }

    pub fn remove_facet(&mut self, key: &str) -> Result<Option<Expression>, DescriptionError> {
        self.ensure_open()?;
        Ok(self.facets.remove(key))
    }

    /// Adds a member, returning the member of the same name and role it replaced.
    pub fn add_member(&mut self, member: Member) -> Result<Option<Member>, DescriptionError> {
        self.ensure_open()?;
        Ok(self.members.insert(member.key(), member))
    }

    /// Merges the members of a parent down into this description.
    ///
    /// Members this description already declares with the same name and role
    /// shadow the parent's. Inherited members are placed before the
    /// description's own members. Returns the number of members copied.
    pub fn inherit_members<'m>(
        &mut self,
        parent: Id,
        parent_members: impl IntoIterator<Item = &'m Member>,
    ) -> Result<usize, DescriptionError> {
        self.ensure_open()?;
        let mut merged: IndexMap<MemberKey, Member> = IndexMap::new();
        for member in parent_members {
            let key = member.key();
            if self.members.contains_key(&key) {
                continue;
            }
            merged.insert(key, member.inherited_via(parent));
        }
        let copied = merged.len();
        merged.extend(self.members.drain(..));
        self.members = merged;
        Ok(copied)
    }

    /// Locks the description against further structural mutation.
    pub fn close(&mut self) {
        self.finalized = true;
    }

    pub(crate) fn set_owner(&mut self, owner: DescriptionId) {
        self.owner = Some(owner);
    }

    pub(crate) fn push_micro(&mut self, child: DescriptionId) -> Result<(), DescriptionError> {
        self.ensure_open()?;
        self.micro.push(child);
        Ok(())
    }

    /// Rewrites every arena index of a description copied into another arena.
    pub(crate) fn remap(&mut self, offset: usize, new_owner: Option<DescriptionId>, alias: Id) {
        let shift = |id: DescriptionId| DescriptionId::new(id.0 + offset);
        self.owner = new_owner.or(self.owner.map(shift));
        self.micro = self.micro.iter().copied().map(shift).collect();
        if let Some(ParentRef::Declared(parent)) = self.parent {
            self.parent = Some(ParentRef::Declared(shift(parent)));
        }
        self.grafted_from = Some(alias);
    }

    fn ensure_open(&self) -> Result<(), DescriptionError> {
        if self.finalized {
            Err(DescriptionError::Finalized(self.name))
        } else {
            Ok(())
        }
    }
}
