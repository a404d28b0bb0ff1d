//! Connector routing between levels of one region.

use std::collections::HashMap;

use crate::entity::Entity;
use crate::geometry::{Point, Rect};

use super::graph::NodeId;
use super::types::{Connector, Level, PathSegment};

/// Row rectangles of every entity, keyed by qualified column name.
///
/// Built once after all entity geometry is final, so routing never depends on draw order.
#[derive(Debug, Clone, Default)]
pub struct CollisionIndex {
    rows: HashMap<String, Vec<(NodeId, Rect)>>,
}

impl CollisionIndex {
    pub fn build<'a>(entities: impl IntoIterator<Item = (NodeId, &'a Entity)>) -> Self {
        let mut rows: HashMap<String, Vec<(NodeId, Rect)>> = HashMap::new();
        for (id, entity) in entities {
            for (name, rect) in &entity.collision {
                rows.entry(name.clone()).or_default().push((id, *rect));
            }
        }
        Self { rows }
    }

    /// The row rectangle for `name` if it belongs to `node`.
    pub fn find(&self, name: &str, node: NodeId) -> Option<Rect> {
        self.rows
            .get(name)?
            .iter()
            .find(|(id, _)| *id == node)
            .map(|(_, rect)| *rect)
    }
}

/// Route every resolvable reference of a placed region, in region-local coordinates.
///
/// A reference is only routed to a level right of its own; the first level holding
/// the target column wins. Returns the connectors and the number left unrouted.
pub fn route_region(
    levels: &[Level],
    entities: &[Entity],
    index: &CollisionIndex,
    spacing: i32,
) -> (Vec<Connector>, usize) {
    let half = spacing >> 1;
    let mut connectors = Vec::new();
    let mut unrouted = 0;

    for (i, level) in levels.iter().enumerate() {
        let channel_x = level.x + level.width + spacing;

        for placement in &level.members {
            let entity = &entities[placement.node];

            for column in &entity.columns {
                let Some(reference) = column.link() else {
                    continue;
                };
                let target = reference.qualified_name();
                let from = placement.origin + Point::new(column.frame.right(), column.frame.mid_y());

                let mut rail_limit = 0;
                let mut routed = None;
                'search: for (j, candidate) in levels.iter().enumerate().skip(i + 1) {
                    rail_limit = rail_limit.max(candidate.height + half);
                    for member in &candidate.members {
                        if let Some(rect) = index.find(&target, member.node) {
                            let to = member.origin + Point::new(rect.x, rect.mid_y());
                            routed = Some(if j == i + 1 {
                                adjacent(from, to, channel_x)
                            } else {
                                detour(from, to, channel_x, candidate.x, rail_limit, half)
                            });
                            break 'search;
                        }
                    }
                }

                match routed {
                    Some(segments) => connectors.push(Connector {
                        source: entity.qualified_name(&column.physical_name.text),
                        target,
                        segments,
                    }),
                    None => unrouted += 1,
                }
            }
        }
    }

    (connectors, unrouted)
}

/// One curve straight across the gap between neighbouring levels.
fn adjacent(from: Point, to: Point, channel_x: i32) -> Vec<PathSegment> {
    vec![PathSegment::Cubic {
        from,
        ctrl1: Point::new(channel_x, from.y),
        ctrl2: Point::new(channel_x, to.y),
        to,
    }]
}

/// Bend out of the source gap onto a rail along the top or bottom of the region,
/// run along it past the intervening levels, and bend back into the target gap.
///
/// The rail sits at the bottom when the two anchors' midpoint is in the lower half
/// of the levels passed, otherwise at the top.
fn detour(
    from: Point,
    to: Point,
    source_x: i32,
    target_x: i32,
    rail_limit: i32,
    half: i32,
) -> Vec<PathSegment> {
    let mid = from.y.min(to.y) + (from.y - to.y).abs() / 2;
    let rail = if mid > rail_limit / 2 { rail_limit } else { 0 };

    let rail_start = Point::new(source_x + half, rail);
    let rail_end = Point::new(target_x - half, rail);

    vec![
        PathSegment::Cubic {
            from,
            ctrl1: Point::new(source_x, from.y),
            ctrl2: Point::new(source_x, rail),
            to: rail_start,
        },
        PathSegment::Line {
            from: rail_start,
            to: rail_end,
        },
        PathSegment::Cubic {
            from: rail_end,
            ctrl1: Point::new(target_x, rail),
            ctrl2: Point::new(target_x, to.y),
            to,
        },
    ]
}
