//! Per-call assembly state.
//!
//! An [`AssemblyContext`] is created at the top of every
//! [`Assembler::assemble`](crate::Assembler::assemble) call and dropped at the
//! end of it, so nothing one assembly learns can leak into the next.

use indexmap::IndexMap;
use menagerie_core::{
    description::{DescriptionId, Member},
    facet::Facets,
    identifier::Id,
    syntax::SyntacticElement,
};

/// A top-level species or experiment declaration, with the name of the model
/// it was declared in.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Declaration<'a> {
    pub element: &'a SyntacticElement,
    pub origin: Id,
}

#[derive(Debug, Default)]
pub(crate) struct AssemblyContext<'a> {
    /// Facets of every model and global section, the primary model's winning.
    pub global_facets: Facets,
    /// Top-level species, grids last within each file.
    pub species: IndexMap<Id, Declaration<'a>>,
    pub experiments: IndexMap<Id, Declaration<'a>>,
    /// Members of every model and global section, stamped with their origin,
    /// primary model last.
    pub global_members: Vec<Member>,
    /// Every instantiated species or experiment, nested ones included.
    pub cache: IndexMap<Id, DescriptionId>,
    /// Syntax element each description was instantiated from, in creation order.
    pub nodes: IndexMap<DescriptionId, &'a SyntacticElement>,
}

impl AssemblyContext<'_> {
    pub fn new() -> Self {
        Self::default()
    }
}
