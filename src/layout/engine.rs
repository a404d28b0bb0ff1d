//! Layout engine core implementation.

use crate::config::Config;
use crate::entity::Entity;
use crate::error::Result;
use crate::geometry::Point;
use crate::render::{DrawSink, Renderer};

use super::graph::{NodeId, SchemaGraph};
use super::partition::{Partition, partition};
use super::placement::{assemble_levels, place_isolated, place_region};
use super::routing::{CollisionIndex, route_region};
use super::types::{Diagram, Region};

/// Collects entities and lays them out.
///
/// A layout pass drains the registered entities into the returned [`Diagram`], so
/// each canvas lays out one schema graph; register again to lay out another.
pub struct Canvas {
    graph: SchemaGraph,
    spacing: i32,
}

impl Default for Canvas {
    fn default() -> Self {
        Self::new(48)
    }
}

impl Canvas {
    pub fn new(spacing: i32) -> Self {
        Self {
            graph: SchemaGraph::new(),
            spacing,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.spacing)
    }

    pub fn register(&mut self, entity: Entity) -> NodeId {
        self.graph.add(entity)
    }

    pub fn len(&self) -> usize {
        self.graph.len()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.is_empty()
    }

    /// Link, partition, place and route every registered entity.
    pub fn layout(&mut self) -> Diagram {
        let mut graph = std::mem::take(&mut self.graph);
        let spacing = self.spacing;

        let edges = graph.link();
        let Partition { isolated, regions } = partition(&graph);
        tracing::debug!(
            tables = graph.len(),
            edges,
            isolated = isolated.len(),
            regions = regions.len(),
            "partitioned schema graph"
        );

        let strip = place_isolated(&graph, &isolated, spacing);
        let mut regions: Vec<Region> = regions
            .iter()
            .map(|members| place_region(&graph, assemble_levels(&graph, members, spacing), spacing))
            .collect();

        let entities = graph.into_entities();
        let index = CollisionIndex::build(entities.iter().enumerate());

        let mut width = strip.width;
        let mut height = strip.height;
        let mut unrouted = 0;
        for region in &mut regions {
            let (connectors, skipped) = route_region(&region.levels, &entities, &index, spacing);
            region.connectors = connectors;
            unrouted += skipped;

            height += spacing;
            region.move_to(Point::new(0, height));
            height += region.height;
            width = width.max(region.width);

            tracing::debug!(
                offsets = ?region.levels.iter().map(|l| l.offset).collect::<Vec<_>>(),
                connectors = region.connectors.len(),
                "placed region"
            );
        }
        if unrouted > 0 {
            tracing::debug!(unrouted, "references without a connector");
        }

        Diagram {
            width,
            height,
            entities,
            isolated: strip,
            regions,
        }
    }

    /// Lay out and hand the result straight to `renderer`.
    pub fn render<S: DrawSink + ?Sized>(&mut self, renderer: &Renderer, sink: &mut S) -> Result<()> {
        let diagram = self.layout();
        renderer.render(&diagram, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Column, Reference};
    use crate::geometry::Rect;
    use crate::layout::types::{Location, PathSegment};
    use crate::measure::TextMetrics;
    use crate::render::recording::{Op, Recorder};

    fn table(name: &str, refs: &[&str]) -> Entity {
        let mut e = Entity::new("public", name, None)
            .with_column(Column::new(1, "id", "int").primary_key());
        for (i, target) in refs.iter().enumerate() {
            e = e.with_column(
                Column::new(i as i32 + 2, &format!("{}_id", target), "int")
                    .references(Reference::new("public", *target, "id")),
            );
        }
        e.build(&TextMetrics::default());
        e
    }

    fn layout(tables: &[(&str, &[&str])]) -> Diagram {
        let mut canvas = Canvas::default();
        for (name, refs) in tables {
            canvas.register(table(name, refs));
        }
        canvas.layout()
    }

    fn offset(d: &Diagram, name: &str) -> i32 {
        match d.locate(name) {
            Some(Location::Region { offset, .. }) => offset,
            other => panic!("{} not in a region: {:?}", name, other),
        }
    }

    #[test]
    fn test_empty_schema() {
        let d = layout(&[]);
        assert_eq!((d.width, d.height), (0, 0));
        assert!(d.regions.is_empty());
        assert!(d.isolated.members.is_empty());
    }

    #[test]
    fn test_single_table_is_isolated() {
        let d = layout(&[("settings", &[])]);
        assert_eq!(d.locate("settings"), Some(Location::Isolated));
        assert!(d.regions.is_empty());
        assert_eq!(d.width, d.entities[0].view.w + 48);
        assert_eq!(d.height, d.entities[0].view.h);
    }

    #[test]
    fn test_customers_orders() {
        let d = layout(&[("customers", &[]), ("orders", &["customers"])]);

        assert_eq!(d.regions.len(), 1);
        assert_eq!(d.regions[0].levels.len(), 2);
        assert!(offset(&d, "orders") < offset(&d, "customers"));

        let connectors: Vec<_> = d.connectors().collect();
        assert_eq!(connectors.len(), 1);
        assert_eq!(connectors[0].source, "public.orders.customers_id");
        assert_eq!(connectors[0].target, "public.customers.id");
    }

    #[test]
    fn test_cycle_regression() {
        let d = layout(&[("a", &["b"]), ("b", &["c"]), ("c", &["a"])]);

        assert_eq!(d.regions.len(), 1);
        assert_eq!(offset(&d, "a"), 0);
        assert_eq!(offset(&d, "b"), -2);
        assert_eq!(offset(&d, "c"), -1);

        // b -> c and c -> a point right; a -> b points back and is not drawn.
        let routed: Vec<&str> = d.connectors().map(|c| c.source.as_str()).collect();
        assert_eq!(routed, vec!["public.b.c_id", "public.c.a_id"]);
    }

    #[test]
    fn test_every_table_placed_once() {
        let d = layout(&[
            ("a", &["b"]),
            ("b", &[]),
            ("c", &[]),
            ("d", &["d"]),
            ("e", &["a", "f"]),
            ("f", &["missing"]),
        ]);

        let mut seen = vec![0; d.entities.len()];
        for p in d.placements() {
            seen[p.node] += 1;
        }
        assert_eq!(seen, vec![1; 6]);
    }

    #[test]
    fn test_unconnected_tables_separate() {
        let d = layout(&[("a", &["b"]), ("b", &[]), ("x", &["y"]), ("y", &[])]);

        let region = |name| match d.locate(name) {
            Some(Location::Region { index, .. }) => index,
            other => panic!("{:?}", other),
        };
        assert_eq!(region("a"), region("b"));
        assert_eq!(region("x"), region("y"));
        assert_ne!(region("a"), region("x"));
    }

    #[test]
    fn test_unknown_target_stays_fk_styled() {
        let d = layout(&[("orders", &["ghosts"])]);

        assert_eq!(d.locate("orders"), Some(Location::Isolated));
        assert_eq!(d.entities[0].columns[1].data_type.text, "int(FK)");
        assert_eq!(d.connectors().count(), 0);
    }

    #[test]
    fn test_overall_extent() {
        let d = layout(&[
            ("lonely", &[]),
            ("a", &["b"]),
            ("b", &[]),
            ("x", &["y"]),
            ("y", &[]),
        ]);

        let regions = &d.regions;
        assert_eq!(regions[0].origin, Point::new(0, d.isolated.height + 48));
        assert_eq!(
            regions[1].origin,
            Point::new(0, regions[0].origin.y + regions[0].height + 48)
        );
        assert_eq!(d.height, regions[1].origin.y + regions[1].height);

        let widest = regions.iter().map(|r| r.width).max().unwrap();
        assert_eq!(d.width, widest.max(d.isolated.width));
    }

    #[test]
    fn test_connectors_in_absolute_coordinates() {
        let d = layout(&[("lonely", &[]), ("customers", &[]), ("orders", &["customers"])]);

        let region = &d.regions[0];
        let customers = region.levels[1].members[0].origin;
        let PathSegment::Cubic { to, .. } = region.connectors[0].segments[0] else {
            panic!("expected a curve");
        };
        assert_eq!(to, customers + Point::new(2, 31));
        assert!(to.y > d.isolated.height);
    }

    #[test]
    fn test_canvas_is_single_use() {
        let mut canvas = Canvas::default();
        canvas.register(table("a", &[]));
        assert_eq!(canvas.len(), 1);

        let first = canvas.layout();
        assert_eq!(first.entities.len(), 1);
        assert!(canvas.is_empty());

        let second = canvas.layout();
        assert_eq!((second.width, second.height), (0, 0));
    }

    #[test]
    fn test_dense_schema_places_every_table_once() {
        let names: Vec<String> = (0..30).map(|i| format!("t{:02}", i)).collect();
        let mut canvas = Canvas::default();
        for i in 0..names.len() {
            let mut refs = Vec::new();
            if i > 0 {
                refs.push(names[i - 1].as_str());
            }
            if i + 1 < names.len() {
                refs.push(names[i + 1].as_str());
            }
            canvas.register(table(&names[i], &refs));
        }
        let d = canvas.layout();

        assert_eq!(d.regions.len(), 1);
        let mut seen = vec![0; d.entities.len()];
        for p in d.placements() {
            seen[p.node] += 1;
        }
        assert_eq!(seen, vec![1; 30]);
    }

    #[test]
    fn test_render_drains_canvas() {
        let mut canvas = Canvas::default();
        canvas.register(table("customers", &[]));
        canvas.register(table("orders", &["customers"]));

        let mut sink = Recorder::default();
        canvas.render(&Renderer::default(), &mut sink).unwrap();

        assert!(matches!(sink.ops.first(), Some(Op::Begin(w, h)) if *w > 0 && *h > 0));
        assert_eq!(sink.ops.last(), Some(&Op::End));
        assert_eq!(sink.count(|op| matches!(op, Op::Group(_))), 2);
        assert_eq!(sink.count(|op| matches!(op, Op::Cubic(..))), 1);
        assert!(sink.texts().contains(&"customers"));
        assert!(canvas.is_empty());

        let mut again = Recorder::default();
        canvas.render(&Renderer::default(), &mut again).unwrap();
        assert_eq!(
            again.ops,
            vec![Op::Begin(0, 0), Op::Rect(Rect::new(0, 0, 0, 0)), Op::End]
        );
    }
}
