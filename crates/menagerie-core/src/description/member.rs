//! Members: the variables, actions, behaviors and other content of a description.
//!
//! The body of a member is opaque to assembly. It is stored so later stages
//! (the expression compiler, the runtime) can build executable symbols from it.

use std::fmt;

use crate::{
    facet::{Expression, Facets},
    identifier::Id,
    keyword,
    syntax::{Provenance, SyntacticElement},
};

/// The role a member plays in its description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MemberRole {
    Variable,
    Action,
    Behavior,
    Aspect,
    Parameter,
    Output,
}

impl fmt::Display for MemberRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let role = match self {
            MemberRole::Variable => "variable",
            MemberRole::Action => "action",
            MemberRole::Behavior => "behavior",
            MemberRole::Aspect => "aspect",
            MemberRole::Parameter => "parameter",
            MemberRole::Output => "output",
        };
        write!(f, "{role}")
    }
}

/// Identity of a member for shadowing: same name *and* same role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MemberKey {
    pub role: MemberRole,
    pub name: Id,
}

impl MemberKey {
    pub fn new(role: MemberRole, name: Id) -> Self {
        Self { role, name }
    }
}

/// A member of a description.
#[derive(Debug, Clone, PartialEq)]
pub struct Member {
    role: MemberRole,
    name: Id,
    facets: Facets,
    body: Vec<SyntacticElement>,
    provenance: Provenance,
    inherited_from: Option<Id>,
}

impl Member {
    pub fn new(role: MemberRole, name: &str) -> Self {
        Self {
            role,
            name: Id::new(name),
            facets: Facets::new(),
            body: Vec::new(),
            provenance: Provenance::default(),
            inherited_from: None,
        }
    }

    /// Builds a member from its syntax element; `None` if the element is not a member.
    pub fn from_element(element: &SyntacticElement) -> Option<Self> {
        let role = element.kind().member_role()?;
        Some(Self {
            role,
            name: element.name_or_keyword(),
            facets: element.facets().clone(),
            body: element.children().to_vec(),
            provenance: element.provenance().clone(),
            inherited_from: None,
        })
    }

    pub fn with_facet(mut self, key: &str, expression: impl Into<Expression>) -> Self {
        self.facets.insert(key, expression);
        self
    }

    pub fn key(&self) -> MemberKey {
        MemberKey::new(self.role, self.name)
    }

    pub fn role(&self) -> MemberRole {
        self.role
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn facets(&self) -> &Facets {
        &self.facets
    }

    pub fn body(&self) -> &[SyntacticElement] {
        &self.body
    }

    pub fn provenance(&self) -> &Provenance {
        &self.provenance
    }

    /// The model a global member was declared in, from its `origin` facet.
    pub fn origin(&self) -> Option<&str> {
        self.facets.label(keyword::ORIGIN)
    }

    /// The description this member was first declared in, for inherited members.
    pub fn inherited_from(&self) -> Option<Id> {
        self.inherited_from
    }

    /// Whether this is an abstract action (`virtual: true`).
    pub fn is_abstract(&self) -> bool {
        self.role == MemberRole::Action && self.facets.is_true(keyword::VIRTUAL)
    }

    /// A copy of this member as seen through `parent`. The declaring ancestor
    /// is kept when the member was itself inherited.
    pub(crate) fn inherited_via(&self, parent: Id) -> Self {
        let mut member = self.clone();
        member.inherited_from = Some(self.inherited_from.unwrap_or(parent));
        member
    }
}
