//! The inheritance hierarchy and its visiting order.
//!
//! Vertices are user-declared descriptions of one kind; an edge runs from a
//! parent to each of its children. Built-in parents are not vertices. An
//! edge that would close a cycle is never added: the child keeps its vertex
//! and is re-parented to the generic base, so the graph stays acyclic and a
//! topological order always exists.

use indexmap::IndexMap;
use log::{debug, warn};
use menagerie_core::{
    description::{Description, DescriptionError, DescriptionId, DescriptionKind, ParentRef},
    model::ModelDescription,
};
use petgraph::{
    algo::{has_path_connecting, toposort},
    graph::{DiGraph, NodeIndex},
};

use crate::error::{Diagnostic, DiagnosticSink, ErrorCode};

/// Parent → child graph over descriptions of one model.
#[derive(Debug, Default)]
pub(crate) struct HierarchyGraph {
    graph: DiGraph<DescriptionId, ()>,
    vertices: IndexMap<DescriptionId, NodeIndex>,
}

impl HierarchyGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_vertex(&mut self, id: DescriptionId) -> NodeIndex {
        if let Some(&index) = self.vertices.get(&id) {
            return index;
        }
        let index = self.graph.add_node(id);
        self.vertices.insert(id, index);
        index
    }

    /// Adds the edge `parent → child` unless it would close a cycle.
    ///
    /// Returns whether the edge was added.
    pub fn try_add_edge(&mut self, parent: DescriptionId, child: DescriptionId) -> bool {
        let parent = self.add_vertex(parent);
        let child = self.add_vertex(child);
        if parent == child || has_path_connecting(&self.graph, child, parent, None) {
            return false;
        }
        self.graph.add_edge(parent, child, ());
        true
    }

    #[cfg(test)]
    pub fn contains_edge(&self, parent: DescriptionId, child: DescriptionId) -> bool {
        match (self.vertices.get(&parent), self.vertices.get(&child)) {
            (Some(&parent), Some(&child)) => self.graph.contains_edge(parent, child),
            _ => false,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Every vertex, ancestors before descendants.
    pub fn order(&self) -> Vec<DescriptionId> {
        toposort(&self.graph, None)
            .expect("cycle-closing edges are never added")
            .into_iter()
            .map(|index| self.graph[index])
            .collect()
    }
}

/// Builds the hierarchy of every user-declared description of `kind` and
/// returns them in inheritance order.
///
/// Descriptions copied in from grafted models are skipped; they arrive
/// already merged and finalized.
pub(crate) fn linearize(
    model: &mut ModelDescription,
    kind: DescriptionKind,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<DescriptionId>, DescriptionError> {
    let fallback = match kind {
        DescriptionKind::Experiment => model.registry().default_experiment(),
        _ => model.registry().default_species(),
    };

    let mut graph = HierarchyGraph::new();
    for id in model.walk(model.root()) {
        let description = model.description(id);
        if description.kind() != kind
            || description.is_built_in()
            || description.grafted_from().is_some()
        {
            continue;
        }
        graph.add_vertex(id);

        let Some(ParentRef::Declared(parent)) = description.parent() else {
            continue;
        };
        // A species extending an experiment is rejected at finalization.
        if model.description(parent).kind() != kind {
            continue;
        }
        if !graph.try_add_edge(parent, id) {
            sink.emit(inconsistent(description));
            warn!(description = description.name().to_string(); "Inconsistent hierarchy");
            model
                .description_mut(id)
                .set_parent(ParentRef::BuiltIn(fallback))?;
        }
    }

    let order = graph.order();
    debug!(kind:% = kind, vertices = graph.vertex_count(); "Hierarchy linearized");
    Ok(order)
}

fn inconsistent(description: &Description) -> Diagnostic {
    let diagnostic = Diagnostic::error(format!(
        "the hierarchy of `{}` is inconsistent",
        description.name()
    ))
    .with_code(ErrorCode::E103)
    .with_label(description.provenance().clone(), "its parents lead back to it")
    .with_help("remove the `parent` facet that closes the cycle");
    if description.is_experiment() {
        diagnostic.on_experiment()
    } else {
        diagnostic
    }
}
