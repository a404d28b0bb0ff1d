//! Offset assignment by bidirectional expansion over the FK graph.

use std::collections::HashSet;

use super::graph::{NodeId, SchemaGraph};

/// Which adjacency list an expansion follows first.
///
/// `Left` walks incoming edges (referencing tables, one offset lower) before outgoing
/// ones; `Right` walks outgoing edges (referenced tables, one offset higher) first.
/// The order decides which path wins when a cycle or diamond offers several offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
}

impl Direction {
    pub fn step(self) -> i32 {
        match self {
            Direction::Left => -1,
            Direction::Right => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Whether moving from `current` to `candidate` pushes further in this direction.
    fn extends(self, current: i32, candidate: i32) -> bool {
        match self {
            Direction::Left => current > candidate,
            Direction::Right => current < candidate,
        }
    }
}

/// Per-pass `{visited, offset}` side table, parallel to the node arena.
#[derive(Debug, Clone)]
pub struct TraversalState {
    visited: Vec<bool>,
    offset: Vec<i32>,
    on_path: Vec<bool>,
    /// `(node, offset, direction)` expansions already run in the current sweep.
    expanded: HashSet<(NodeId, i32, Direction)>,
    expansions: usize,
}

impl TraversalState {
    pub fn new(len: usize) -> Self {
        Self {
            visited: vec![false; len],
            offset: vec![0; len],
            on_path: vec![false; len],
            expanded: HashSet::new(),
            expansions: 0,
        }
    }

    pub fn reset(&mut self) {
        self.visited.fill(false);
        self.offset.fill(0);
        self.on_path.fill(false);
        self.expanded.clear();
        self.expansions = 0;
    }

    /// Number of `expand` calls since the last reset.
    pub fn expansions(&self) -> usize {
        self.expansions
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.visited[id]
    }

    pub fn offset(&self, id: NodeId) -> Option<i32> {
        self.visited[id].then(|| self.offset[id])
    }

    /// Assign `offset` to `id`, then expand its neighbours, `direction` first.
    ///
    /// A neighbour is (re)entered when unvisited or when the new offset lies further
    /// in the step's direction than the one it holds. Nodes on the current expansion
    /// path are never re-entered, so offsets stay within `±graph.len()`, and a
    /// `(node, offset, direction)` triple is expanded at most once per sweep. A sweep
    /// therefore makes at most `2 * len * (2 * len + 1)` calls.
    pub fn expand(&mut self, graph: &SchemaGraph, id: NodeId, offset: i32, direction: Direction) {
        self.expansions += 1;
        self.expanded.insert((id, offset, direction));
        self.visited[id] = true;
        self.offset[id] = offset;
        self.on_path[id] = true;

        for step in [direction, direction.opposite()] {
            let next = offset + step.step();
            for &neighbor in graph.neighbors(id, step) {
                if self.on_path[neighbor] {
                    continue;
                }
                if self.expanded.contains(&(neighbor, next, step)) {
                    continue;
                }
                if !self.visited[neighbor] || step.extends(self.offset[neighbor], next) {
                    self.expand(graph, neighbor, next, step);
                }
            }
        }

        self.on_path[id] = false;
    }

    /// Expand a region from `seed` at offset 0: leftwards first, then rightwards.
    ///
    /// Each of the two sweeps keeps its own record of finished expansions.
    pub fn expand_seed(&mut self, graph: &SchemaGraph, seed: NodeId) {
        self.expand(graph, seed, 0, Direction::Left);
        self.expanded.clear();
        self.expand(graph, seed, 0, Direction::Right);
        self.expanded.clear();
    }
}
