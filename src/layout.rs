//! Schema layout: FK graph construction, partitioning into an isolated strip and
//! connected regions, level assignment, placement and connector routing.

mod engine;
mod graph;
mod partition;
mod placement;
mod routing;
mod traversal;
mod types;

pub use engine::Canvas;
pub use graph::{GraphNode, NodeId, SchemaGraph};
pub use partition::{Partition, partition};
pub use routing::CollisionIndex;
pub use traversal::{Direction, TraversalState};
pub use types::{Connector, Diagram, IsolatedStrip, Level, Location, PathSegment, Placement, Region};
