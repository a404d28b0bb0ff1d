//! Walks a finished [`Diagram`] and emits drawing primitives to a sink.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::entity::Entity;
use crate::error::Result;
use crate::geometry::{Point, Rect, Segment};
use crate::layout::{Connector, Diagram, PathSegment};
use crate::measure::TextMetrics;
use crate::style::Style;

/// The primitive set a drawing backend must provide. Coordinates are absolute.
pub trait DrawSink {
    fn begin(&mut self, width: i32, height: i32) -> Result<()>;
    fn end(&mut self) -> Result<()>;

    fn begin_group(&mut self, _id: &str, _style: &Style) -> Result<()> {
        Ok(())
    }

    fn end_group(&mut self) -> Result<()> {
        Ok(())
    }

    fn rect(&mut self, rect: Rect, style: &Style) -> Result<()>;
    fn rounded_rect(&mut self, rect: Rect, radius: i32, style: &Style) -> Result<()>;
    fn line(&mut self, segment: Segment, style: &Style) -> Result<()>;
    fn cubic(&mut self, from: Point, ctrl1: Point, ctrl2: Point, to: Point, style: &Style)
    -> Result<()>;
    fn text(&mut self, at: Point, text: &str, style: &Style) -> Result<()>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub font_family: String,
    pub foreground: String,
    pub background: String,
    pub data_type_color: String,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            font_family: "monospace".to_string(),
            foreground: "black".to_string(),
            background: "white".to_string(),
            data_type_color: "#6b3400".to_string(),
        }
    }
}

pub struct Renderer {
    corner_radius: i32,
    background: Style,
    line: Style,
    font: Style,
    data_type: Style,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(&Theme::default(), &TextMetrics::default())
    }
}

impl Renderer {
    pub fn new(theme: &Theme, metrics: &TextMetrics) -> Self {
        Self {
            corner_radius: metrics.corner_radius(),
            background: Style::new().fill(&theme.background).stroke("none"),
            line: Style::new().fill("none").stroke(&theme.foreground),
            font: Style::new()
                .fill(&theme.foreground)
                .stroke("none")
                .font_family(&theme.font_family)
                .font_size(metrics.font_size),
            data_type: Style::new().fill(&theme.data_type_color),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.theme, &config.metrics)
    }

    /// Isolated strip first, then each region's boxes level by level, followed by
    /// that region's connectors.
    pub fn render<S: DrawSink + ?Sized>(&self, diagram: &Diagram, sink: &mut S) -> Result<()> {
        sink.begin(diagram.width, diagram.height)?;
        sink.rect(
            Rect::new(0, 0, diagram.width, diagram.height),
            &self.background,
        )?;

        for placement in &diagram.isolated.members {
            self.draw_entity(sink, diagram.entity(placement.node), placement.origin)?;
        }

        for region in &diagram.regions {
            for level in &region.levels {
                for placement in &level.members {
                    self.draw_entity(sink, diagram.entity(placement.node), placement.origin)?;
                }
            }
            for connector in &region.connectors {
                self.draw_connector(sink, connector)?;
            }
        }

        sink.end()
    }

    fn draw_entity<S: DrawSink + ?Sized>(
        &self,
        sink: &mut S,
        entity: &Entity,
        origin: Point,
    ) -> Result<()> {
        let plain = Style::new();

        sink.begin_group(&entity.name, &self.font)?;
        sink.text(origin + entity.title_pos, &entity.title, &plain)?;

        let frame = entity.frame.translate(origin);
        if entity.has_cascade_child {
            sink.rounded_rect(frame, self.corner_radius, &self.line)?;
        } else {
            sink.rect(frame, &self.line)?;
        }
        sink.line(entity.separator.translate(origin), &self.line)?;

        for column in &entity.columns {
            if let Some(marker) = column.not_null {
                sink.rect(marker.translate(origin), &self.line)?;
            }
            if !column.logical_name.text.is_empty() {
                sink.text(
                    origin + column.logical_name.anchor,
                    &column.logical_name.text,
                    &plain,
                )?;
            }
            sink.text(
                origin + column.physical_name.anchor,
                &column.physical_name.text,
                &plain,
            )?;
            sink.text(
                origin + column.data_type.anchor,
                &column.data_type.text,
                &self.data_type,
            )?;
        }

        sink.end_group()
    }

    fn draw_connector<S: DrawSink + ?Sized>(&self, sink: &mut S, connector: &Connector) -> Result<()> {
        for segment in &connector.segments {
            match *segment {
                PathSegment::Cubic {
                    from,
                    ctrl1,
                    ctrl2,
                    to,
                } => sink.cubic(from, ctrl1, ctrl2, to, &self.line)?,
                PathSegment::Line { from, to } => sink.line(Segment::new(from, to), &self.line)?,
            }
        }
        Ok(())
    }
}
