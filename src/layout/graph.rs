//! Arena of schema graph nodes with index-based adjacency.

use std::collections::HashMap;

use crate::entity::Entity;

use super::traversal::Direction;

pub type NodeId = usize;

#[derive(Debug, Clone)]
pub struct GraphNode {
    pub entity: Entity,
    /// Nodes whose foreign keys point at this table.
    pub incoming: Vec<NodeId>,
    /// Nodes this table's foreign keys point at.
    pub outgoing: Vec<NodeId>,
}

#[derive(Debug, Clone, Default)]
pub struct SchemaGraph {
    nodes: Vec<GraphNode>,
}

impl SchemaGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: Entity) -> NodeId {
        self.nodes.push(GraphNode {
            entity,
            incoming: Vec::new(),
            outgoing: Vec::new(),
        });
        self.nodes.len() - 1
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> &GraphNode {
        &self.nodes[id]
    }

    pub fn entity(&self, id: NodeId) -> &Entity {
        &self.nodes[id].entity
    }

    pub fn ids(&self) -> std::ops::Range<NodeId> {
        0..self.nodes.len()
    }

    pub fn neighbors(&self, id: NodeId, direction: Direction) -> &[NodeId] {
        match direction {
            Direction::Left => &self.nodes[id].incoming,
            Direction::Right => &self.nodes[id].outgoing,
        }
    }

    pub fn is_isolated(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.incoming.is_empty() && node.outgoing.is_empty()
    }

    /// Rebuild adjacency from the entities' foreign keys. Returns the edge count.
    ///
    /// Every FK column yields one edge per matching table, so self references and
    /// repeated references to the same table produce parallel edges.
    pub fn link(&mut self) -> usize {
        for node in &mut self.nodes {
            node.incoming.clear();
            node.outgoing.clear();
        }

        let mut by_name: HashMap<(&str, &str), Vec<NodeId>> = HashMap::new();
        for (id, node) in self.nodes.iter().enumerate() {
            by_name
                .entry((node.entity.schema.as_str(), node.entity.name.as_str()))
                .or_default()
                .push(id);
        }

        let mut edges: Vec<(NodeId, NodeId)> = Vec::new();
        for (id, node) in self.nodes.iter().enumerate() {
            for reference in node.entity.columns.iter().filter_map(|c| c.link()) {
                match by_name.get(&(reference.schema.as_str(), reference.table.as_str())) {
                    Some(targets) => edges.extend(targets.iter().map(|&target| (id, target))),
                    None => tracing::trace!(
                        table = %node.entity.name,
                        target = %reference.qualified_name(),
                        "unmatched reference"
                    ),
                }
            }
        }

        for &(from, to) in &edges {
            self.nodes[from].outgoing.push(to);
            self.nodes[to].incoming.push(from);
        }

        edges.len()
    }

    pub fn into_entities(self) -> Vec<Entity> {
        self.nodes.into_iter().map(|n| n.entity).collect()
    }
}
