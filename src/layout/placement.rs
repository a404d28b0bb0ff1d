//! Level assembly and box placement.

use std::collections::BTreeMap;

use crate::geometry::Point;

use super::graph::{NodeId, SchemaGraph};
use super::types::{IsolatedStrip, Level, Placement, Region};

/// Lay isolated tables out left to right from the origin.
pub fn place_isolated(graph: &SchemaGraph, isolated: &[NodeId], spacing: i32) -> IsolatedStrip {
    let mut strip = IsolatedStrip::default();
    let mut x = 0;

    for &id in isolated {
        let view = graph.entity(id).view;
        strip.members.push(Placement {
            node: id,
            origin: Point::new(x, 0),
        });
        x += view.w + spacing;
        strip.height = strip.height.max(view.h);
    }
    strip.width = x;

    strip
}

/// Group region members by offset into levels, ascending by offset.
///
/// Positions are left unset; [`place_region`] fills them in.
pub fn assemble_levels(graph: &SchemaGraph, members: &[(NodeId, i32)], spacing: i32) -> Vec<Level> {
    let mut by_offset: BTreeMap<i32, Vec<NodeId>> = BTreeMap::new();
    for &(id, offset) in members {
        by_offset.entry(offset).or_default().push(id);
    }

    by_offset
        .into_iter()
        .map(|(offset, ids)| {
            let width = ids.iter().map(|&id| graph.entity(id).view.w).max().unwrap_or(0);
            let height = ids.iter().map(|&id| graph.entity(id).view.h).sum::<i32>()
                + (ids.len() as i32 - 1) * spacing;
            Level {
                offset,
                x: 0,
                width,
                height,
                members: ids
                    .into_iter()
                    .map(|node| Placement {
                        node,
                        origin: Point::default(),
                    })
                    .collect(),
            }
        })
        .collect()
}

/// Position levels left to right and stack each level's boxes, region-local.
///
/// Every level occupies a column `width + spacing` wide; boxes are centred in it
/// and pushed down by half the spacing.
pub fn place_region(graph: &SchemaGraph, mut levels: Vec<Level>, spacing: i32) -> Region {
    let half = spacing >> 1;
    let mut x = 0;
    let mut height = 0;

    for level in &mut levels {
        level.x = x;
        let mut y = 0;
        for member in &mut level.members {
            let view = graph.entity(member.node).view;
            let margin_left = (level.width + spacing - view.w) / 2;
            member.origin = Point::new(x + margin_left, y + half);
            y += view.h + spacing;
        }
        x += level.width + spacing;
        height = height.max(level.height);
    }

    Region {
        origin: Point::default(),
        width: x + spacing,
        height: height + spacing,
        levels,
        connectors: Vec::new(),
    }
}
