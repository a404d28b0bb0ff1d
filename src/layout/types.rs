//! Data structures produced by a layout pass.

use crate::entity::Entity;
use crate::geometry::Point;

use super::graph::NodeId;

/// An entity box at its absolute position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub node: NodeId,
    pub origin: Point,
}

/// Tables sharing one offset within a region, stacked top to bottom.
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub offset: i32,
    /// Left edge of the level's column.
    pub x: i32,
    pub width: i32,
    pub height: i32,
    pub members: Vec<Placement>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment {
    Cubic {
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
    },
    Line {
        from: Point,
        to: Point,
    },
}

impl PathSegment {
    pub fn translate(&self, by: Point) -> PathSegment {
        match *self {
            PathSegment::Cubic {
                from,
                ctrl1,
                ctrl2,
                to,
            } => PathSegment::Cubic {
                from: from + by,
                ctrl1: ctrl1 + by,
                ctrl2: ctrl2 + by,
                to: to + by,
            },
            PathSegment::Line { from, to } => PathSegment::Line {
                from: from + by,
                to: to + by,
            },
        }
    }
}

/// A routed foreign-key connector between two rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Connector {
    /// Qualified name of the FK column.
    pub source: String,
    /// Qualified name of the referenced column.
    pub target: String,
    pub segments: Vec<PathSegment>,
}

/// One connected component of the FK graph.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    pub origin: Point,
    pub width: i32,
    pub height: i32,
    /// Ascending by offset.
    pub levels: Vec<Level>,
    pub connectors: Vec<Connector>,
}

impl Region {
    pub(super) fn move_to(&mut self, origin: Point) {
        let by = Point::new(origin.x - self.origin.x, origin.y - self.origin.y);
        self.origin = origin;
        for level in &mut self.levels {
            level.x += by.x;
            for member in &mut level.members {
                member.origin = member.origin + by;
            }
        }
        for connector in &mut self.connectors {
            for segment in &mut connector.segments {
                *segment = segment.translate(by);
            }
        }
    }
}

/// Tables without foreign-key edges, laid out left to right along the top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct IsolatedStrip {
    pub width: i32,
    pub height: i32,
    pub members: Vec<Placement>,
}

/// Where a table ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Isolated,
    Region { index: usize, offset: i32 },
}

/// A finished layout: every entity, where it sits, and every connector.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagram {
    pub width: i32,
    pub height: i32,
    pub entities: Vec<Entity>,
    pub isolated: IsolatedStrip,
    pub regions: Vec<Region>,
}

impl Diagram {
    pub fn entity(&self, id: NodeId) -> &Entity {
        &self.entities[id]
    }

    /// Every placement, in drawing order.
    pub fn placements(&self) -> impl Iterator<Item = &Placement> {
        self.isolated.members.iter().chain(
            self.regions
                .iter()
                .flat_map(|r| r.levels.iter())
                .flat_map(|l| l.members.iter()),
        )
    }

    pub fn connectors(&self) -> impl Iterator<Item = &Connector> {
        self.regions.iter().flat_map(|r| r.connectors.iter())
    }

    /// Find a table by name; the first match in drawing order wins.
    pub fn locate(&self, table: &str) -> Option<Location> {
        let named = |p: &Placement| self.entities[p.node].name == table;

        if self.isolated.members.iter().any(named) {
            return Some(Location::Isolated);
        }
        self.regions.iter().enumerate().find_map(|(index, region)| {
            region
                .levels
                .iter()
                .find(|l| l.members.iter().any(named))
                .map(|l| Location::Region {
                    index,
                    offset: l.offset,
                })
        })
    }
}
