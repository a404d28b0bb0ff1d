use std::io::Write;

use crate::error::Result;
use crate::geometry::{Point, Rect, Segment};
use crate::layout::Diagram;
use crate::render::{DrawSink, Renderer};
use crate::style::Style;

/// Writes drawing primitives as SVG elements.
pub struct SvgWriter<W: Write> {
    out: W,
}

impl<W: Write> SvgWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> DrawSink for SvgWriter<W> {
    fn begin(&mut self, width: i32, height: i32) -> Result<()> {
        writeln!(self.out, r#"<?xml version="1.0"?>"#)?;
        writeln!(
            self.out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}" viewBox="0 0 {} {}">"#,
            width, height, width, height
        )?;
        Ok(())
    }

    fn end(&mut self) -> Result<()> {
        writeln!(self.out, "</svg>")?;
        self.out.flush()?;
        Ok(())
    }

    fn begin_group(&mut self, id: &str, style: &Style) -> Result<()> {
        writeln!(self.out, r#"<g id="{}"{}>"#, escape_xml(id), style_attr(style))?;
        Ok(())
    }

    fn end_group(&mut self) -> Result<()> {
        writeln!(self.out, "</g>")?;
        Ok(())
    }

    fn rect(&mut self, rect: Rect, style: &Style) -> Result<()> {
        writeln!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}"{} />"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            style_attr(style)
        )?;
        Ok(())
    }

    fn rounded_rect(&mut self, rect: Rect, radius: i32, style: &Style) -> Result<()> {
        writeln!(
            self.out,
            r#"<rect x="{}" y="{}" width="{}" height="{}" rx="{}" ry="{}"{} />"#,
            rect.x,
            rect.y,
            rect.w,
            rect.h,
            radius,
            radius,
            style_attr(style)
        )?;
        Ok(())
    }

    fn line(&mut self, segment: Segment, style: &Style) -> Result<()> {
        writeln!(
            self.out,
            r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{} />"#,
            segment.from.x,
            segment.from.y,
            segment.to.x,
            segment.to.y,
            style_attr(style)
        )?;
        Ok(())
    }

    fn cubic(
        &mut self,
        from: Point,
        ctrl1: Point,
        ctrl2: Point,
        to: Point,
        style: &Style,
    ) -> Result<()> {
        writeln!(
            self.out,
            r#"<path d="M{},{} C{},{} {},{} {},{}"{} />"#,
            from.x,
            from.y,
            ctrl1.x,
            ctrl1.y,
            ctrl2.x,
            ctrl2.y,
            to.x,
            to.y,
            style_attr(style)
        )?;
        Ok(())
    }

    fn text(&mut self, at: Point, text: &str, style: &Style) -> Result<()> {
        writeln!(
            self.out,
            r#"<text x="{}" y="{}"{}>{}</text>"#,
            at.x,
            at.y,
            style_attr(style),
            escape_xml(text)
        )?;
        Ok(())
    }
}

/// Render a diagram to an SVG document string.
pub fn render_svg(diagram: &Diagram, renderer: &Renderer) -> Result<String> {
    let mut writer = SvgWriter::new(Vec::new());
    renderer.render(diagram, &mut writer)?;
    Ok(String::from_utf8(writer.into_inner())?)
}

fn style_attr(style: &Style) -> String {
    if style.is_empty() {
        String::new()
    } else {
        format!(r#" style="{}""#, escape_xml(&style.to_string()))
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
