pub mod config;
pub mod entity;
pub mod error;
pub mod geometry;
pub mod layout;
pub mod measure;
pub mod render;
pub mod schema;
pub mod style;
pub mod svg;

use wasm_bindgen::prelude::*;

pub use config::Config;
pub use error::{Error, Result};

use entity::Entity;
use layout::Canvas;
use render::Renderer;
use schema::SchemaSnapshot;

/// Initialize panic hook for better error messages in WASM
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(target_arch = "wasm32")]
    console_error_panic_hook::set_once();
}

/// Build and register one entity per table of the snapshot.
pub fn canvas_from_snapshot(snapshot: &SchemaSnapshot, config: &Config) -> Canvas {
    let mut canvas = Canvas::from_config(config);
    for table in &snapshot.tables {
        canvas.register(Entity::from_table_info(table, &config.metrics));
    }
    canvas
}

/// Lay out a schema snapshot and render it to SVG.
pub fn render_snapshot(snapshot: &SchemaSnapshot, config: &Config) -> Result<String> {
    let diagram = canvas_from_snapshot(snapshot, config).layout();
    svg::render_svg(&diagram, &Renderer::from_config(config))
}

/// Render a JSON schema snapshot to SVG
#[wasm_bindgen(js_name = "schemaToSvg")]
pub fn schema_to_svg(snapshot: &str, config: Option<String>) -> std::result::Result<String, String> {
    let snapshot = SchemaSnapshot::from_json(snapshot).map_err(|e| e.to_string())?;
    let config = match config.as_deref() {
        Some(json) => Config::from_json(json).map_err(|e| e.to_string())?,
        None => Config::default(),
    };
    render_snapshot(&snapshot, &config).map_err(|e| e.to_string())
}
