//! Split a linked graph into isolated tables and connected regions.

use super::graph::{NodeId, SchemaGraph};
use super::traversal::TraversalState;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Partition {
    /// Tables with no edge in either direction, in registration order.
    pub isolated: Vec<NodeId>,
    /// Connected components in extraction order; members keep registration order.
    pub regions: Vec<Vec<(NodeId, i32)>>,
}

/// Partition `graph`, which must already be linked.
///
/// Each region is seeded at the first remaining node and consumes everything the
/// expansion reaches, so at most `graph.len()` regions are extracted.
pub fn partition(graph: &SchemaGraph) -> Partition {
    let (isolated, mut active): (Vec<NodeId>, Vec<NodeId>) =
        graph.ids().partition(|&id| graph.is_isolated(id));

    let mut state = TraversalState::new(graph.len());
    let mut regions = Vec::new();

    while let Some(&seed) = active.first() {
        state.reset();
        state.expand_seed(graph, seed);

        let (members, rest): (Vec<NodeId>, Vec<NodeId>) =
            active.into_iter().partition(|&id| state.is_visited(id));
        active = rest;

        let region: Vec<(NodeId, i32)> = members
            .into_iter()
            .filter_map(|id| state.offset(id).map(|offset| (id, offset)))
            .collect();
        tracing::debug!(
            seed = %graph.entity(seed).name,
            tables = region.len(),
            "extracted region"
        );
        regions.push(region);
    }

    Partition { isolated, regions }
}
