//! Per-table box geometry, computed independently of where the box ends up.

use std::collections::HashMap;

use crate::geometry::{Point, Rect, Segment};
use crate::measure::TextMetrics;
use crate::schema::{ColumnInfo, TableInfo};

/// Suffix appended to the data-type label of foreign-key columns.
pub const FK_MARKER: &str = "(FK)";

/// Target of a foreign key: `schema.table.column`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Reference {
    pub schema: String,
    pub table: String,
    pub column: String,
}

impl Reference {
    pub fn new(
        schema: impl Into<String>,
        table: impl Into<String>,
        column: impl Into<String>,
    ) -> Self {
        Self {
            schema: schema.into(),
            table: table.into(),
            column: column.into(),
        }
    }

    pub fn is_valid(&self) -> bool {
        !self.schema.is_empty() || !self.table.is_empty() || !self.column.is_empty()
    }

    pub fn qualified_name(&self) -> String {
        qualified_name(&self.schema, &self.table, &self.column)
    }
}

pub fn qualified_name(schema: &str, table: &str, column: &str) -> String {
    format!("{}.{}.{}", schema, table, column)
}

/// A piece of row text and where its baseline starts, relative to the box origin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Label {
    pub text: String,
    pub anchor: Point,
}

impl Label {
    fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            anchor: Point::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub ordinal: i32,
    pub physical_name: Label,
    pub logical_name: Label,
    pub data_type: Label,
    pub is_primary_key: bool,
    pub is_required: bool,
    pub reference: Option<Reference>,
    /// Full row rectangle; also registered as the row's collision box.
    pub frame: Rect,
    pub not_null: Option<Rect>,
}

impl Column {
    pub fn new(ordinal: i32, physical_name: &str, data_type: &str) -> Self {
        Self {
            ordinal,
            physical_name: Label::new(physical_name),
            logical_name: Label::default(),
            data_type: Label::new(data_type),
            is_primary_key: false,
            is_required: false,
            reference: None,
            frame: Rect::default(),
            not_null: None,
        }
    }

    pub fn from_info(info: &ColumnInfo) -> Self {
        let mut column = Column::new(info.ordinal_position, &info.name, &info.data_type)
            .logical_name(info.comment.as_deref().unwrap_or_default());
        column.is_primary_key = info.is_primary_key;
        column.is_required = info.is_required();
        if let Some(fk) = &info.foreign_key {
            column = column.references(Reference::new(
                &fk.target_schema,
                &fk.target_table,
                &fk.target_column,
            ));
        }
        column
    }

    pub fn logical_name(mut self, name: &str) -> Self {
        self.logical_name.text = name.to_string();
        self
    }

    /// Primary-key columns are always required.
    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_required = true;
        self
    }

    pub fn required(mut self) -> Self {
        self.is_required = true;
        self
    }

    pub fn references(mut self, reference: Reference) -> Self {
        self.data_type.text.push_str(FK_MARKER);
        self.reference = Some(reference);
        self
    }

    /// The reference, if it names anything at all.
    pub fn link(&self) -> Option<&Reference> {
        self.reference.as_ref().filter(|r| r.is_valid())
    }
}

/// Widest text per row cell, in display units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ColumnWidths {
    pub not_null: i32,
    pub logical_name: i32,
    pub physical_name: i32,
    pub data_type: i32,
}

impl ColumnWidths {
    /// Cell widths in pixels: not-null, logical name, physical name, data type.
    pub fn cells(&self, char_width: i32) -> [i32; 4] {
        let logical = if self.logical_name == 0 {
            0
        } else {
            (self.logical_name + 2) * char_width
        };
        [
            (self.not_null + 1) * char_width,
            logical,
            (self.physical_name + 2) * char_width,
            (self.data_type + 2) * char_width,
        ]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entity {
    pub schema: String,
    pub name: String,
    pub comment: Option<String>,
    pub title: String,
    /// Primary-key rows first, then the rest; each group by ordinal position.
    pub columns: Vec<Column>,
    pub primary_keys: usize,
    pub has_cascade_child: bool,

    /// Overall box extent, origin at (0, 0).
    pub view: Rect,
    pub title_pos: Point,
    pub frame: Rect,
    pub separator: Segment,
    pub collision: HashMap<String, Rect>,
}

impl Entity {
    pub fn new(schema: &str, name: &str, comment: Option<&str>) -> Self {
        let comment = comment.filter(|c| !c.is_empty()).map(str::to_string);
        let title = match &comment {
            Some(comment) => format!("{} ({})", comment, name),
            None => name.to_string(),
        };

        Self {
            schema: schema.to_string(),
            name: name.to_string(),
            comment,
            title,
            columns: Vec::new(),
            primary_keys: 0,
            has_cascade_child: false,
            view: Rect::default(),
            title_pos: Point::default(),
            frame: Rect::default(),
            separator: Segment::default(),
            collision: HashMap::new(),
        }
    }

    pub fn from_table_info(info: &TableInfo, metrics: &TextMetrics) -> Self {
        let mut entity = Entity::new(&info.schema, &info.name, info.comment.as_deref());
        for col in &info.columns {
            if col.foreign_key.as_ref().is_some_and(|fk| fk.cascades()) {
                entity.has_cascade_child = true;
            }
            entity.columns.push(Column::from_info(col));
        }
        entity.build(metrics);
        entity
    }

    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    pub fn cascade_child(mut self) -> Self {
        self.has_cascade_child = true;
        self
    }

    pub fn qualified_name(&self, column: &str) -> String {
        qualified_name(&self.schema, &self.name, column)
    }

    pub fn column_widths(&self, metrics: &TextMetrics) -> ColumnWidths {
        self.columns.iter().fold(
            ColumnWidths {
                not_null: 1,
                ..ColumnWidths::default()
            },
            |cw, c| ColumnWidths {
                not_null: cw.not_null,
                logical_name: cw.logical_name.max(metrics.units(&c.logical_name.text)),
                physical_name: cw.physical_name.max(metrics.units(&c.physical_name.text)),
                data_type: cw.data_type.max(metrics.units(&c.data_type.text)),
            },
        )
    }

    /// Pixel width of all row cells; zero for a table without columns.
    pub fn column_total_width(&self, metrics: &TextMetrics) -> i32 {
        if self.columns.is_empty() {
            return 0;
        }
        self.column_widths(metrics)
            .cells(metrics.char_width)
            .iter()
            .sum()
    }

    pub fn title_width(&self, metrics: &TextMetrics) -> i32 {
        (metrics.units(&self.title) + 2) * metrics.char_width
    }

    /// Sort the rows and compute every piece of local geometry.
    pub fn build(&mut self, metrics: &TextMetrics) {
        self.columns
            .sort_by_key(|c| (!c.is_primary_key, c.ordinal));
        self.primary_keys = self.columns.iter().filter(|c| c.is_primary_key).count();
        self.collision.clear();

        let m = metrics.margin;
        let w = metrics.char_width;
        let h = metrics.row_height();
        let base_line = metrics.baseline();

        let [nnw, lnw, pnw, _] = self.column_widths(metrics).cells(w);
        let rw = self
            .column_total_width(metrics)
            .max(self.title_width(metrics))
            + m * 2;
        let rh = self.columns.len() as i32 * h;

        let cell_left = [m + w / 2, m + nnw, m + nnw + lnw, m + nnw + lnw + pnw];

        let top = h + m / 2;
        let separator_y = top + self.primary_keys as i32 * h;

        self.view = Rect::new(0, 0, rw + m * 2, rh + m * 2 + h);
        self.title_pos = Point::new(m, h + m - base_line);
        self.frame = Rect::new(m, top, rw, rh);
        self.separator = Segment::new(Point::new(m, separator_y), Point::new(m + rw, separator_y));

        for (i, column) in self.columns.iter_mut().enumerate() {
            let row_top = top + i as i32 * h;
            let text_y = row_top + h - base_line;

            column.frame = Rect::new(m, row_top, rw, h);
            column.not_null = column.is_required.then(|| {
                Rect::new(
                    cell_left[0],
                    row_top + metrics.padding * 2,
                    w / 2,
                    h - metrics.padding * 4,
                )
            });
            column.logical_name.anchor = Point::new(cell_left[1], text_y);
            column.physical_name.anchor = Point::new(cell_left[2], text_y);
            column.data_type.anchor = Point::new(cell_left[3], text_y);

            let name = qualified_name(&self.schema, &self.name, &column.physical_name.text);
            self.collision.insert(name, column.frame);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::Canvas;
    use crate::schema::{ForeignKey, ReferentialAction};

    fn users() -> Entity {
        let mut e = Entity::new("public", "users", None)
            .with_column(Column::new(2, "name", "text"))
            .with_column(Column::new(1, "id", "int").primary_key());
        e.build(&TextMetrics::default());
        e
    }

    #[test]
    fn test_reference_validity() {
        assert!(!Reference::default().is_valid());
        assert!(Reference::new("", "t", "").is_valid());
        assert_eq!(Reference::new("s", "t", "c").qualified_name(), "s.t.c");
    }

    #[test]
    fn test_primary_keys_first() {
        let mut e = Entity::new("public", "t", None)
            .with_column(Column::new(1, "a", "int"))
            .with_column(Column::new(4, "k2", "int").primary_key())
            .with_column(Column::new(3, "b", "int"))
            .with_column(Column::new(2, "k1", "int").primary_key());
        e.build(&TextMetrics::default());

        let names: Vec<&str> = e.columns.iter().map(|c| c.physical_name.text.as_str()).collect();
        assert_eq!(names, vec!["k1", "k2", "a", "b"]);
        assert_eq!(e.primary_keys, 2);
    }

    #[test]
    fn test_box_geometry() {
        let e = users();

        // nn 16 + logical 0 + physical (4+2)*8 + type (4+2)*8
        assert_eq!(e.column_total_width(&TextMetrics::default()), 112);
        assert_eq!(e.frame, Rect::new(2, 21, 116, 40));
        assert_eq!(e.view, Rect::new(0, 0, 120, 64));
        assert_eq!(e.title_pos, Point::new(2, 18));
        assert_eq!(e.separator, Segment::new(Point::new(2, 41), Point::new(118, 41)));
    }

    #[test]
    fn test_row_geometry() {
        let e = users();
        let id = &e.columns[0];
        let name = &e.columns[1];

        assert_eq!(id.frame, Rect::new(2, 21, 116, 20));
        assert_eq!(name.frame, Rect::new(2, 41, 116, 20));
        assert_eq!(id.not_null, Some(Rect::new(6, 25, 4, 12)));
        assert_eq!(name.not_null, None);
        assert_eq!(id.logical_name.anchor, Point::new(18, 37));
        assert_eq!(id.physical_name.anchor, Point::new(18, 37));
        assert_eq!(id.data_type.anchor, Point::new(66, 37));
    }

    #[test]
    fn test_logical_name_column() {
        let mut e = Entity::new("public", "users", None)
            .with_column(Column::new(1, "id", "int").primary_key().logical_name("ID"));
        e.build(&TextMetrics::default());

        let id = &e.columns[0];
        assert_eq!(id.physical_name.anchor.x, 2 + 16 + 32);
        assert_eq!(id.data_type.anchor.x, 2 + 16 + 32 + 32);
    }

    #[test]
    fn test_wide_characters_count_double() {
        let metrics = TextMetrics::default();
        let mut e = Entity::new("public", "users", None)
            .with_column(Column::new(1, "id", "int").logical_name("番号"));
        e.build(&metrics);

        assert_eq!(e.column_widths(&metrics).logical_name, 4);
    }

    #[test]
    fn test_long_comment_widens_box() {
        let metrics = TextMetrics::default();
        let mut e = Entity::new("public", "t", Some("A very long descriptive table comment"))
            .with_column(Column::new(1, "id", "int").primary_key());
        e.build(&metrics);

        assert_eq!(e.title, "A very long descriptive table comment (t)");
        let title_w = e.title_width(&metrics);
        assert!(title_w > e.column_total_width(&metrics));
        assert_eq!(e.frame.w, title_w + metrics.margin * 2);
    }

    #[test]
    fn test_columns_widen_box() {
        let metrics = TextMetrics::default();
        let e = users();
        let column_w = e.column_total_width(&metrics);
        assert!(column_w > e.title_width(&metrics));
        assert_eq!(e.frame.w, column_w + metrics.margin * 2);
    }

    #[test]
    fn test_empty_table_sized_to_title() {
        let metrics = TextMetrics::default();
        let mut e = Entity::new("public", "empty", None);
        e.build(&metrics);

        assert_eq!(e.frame.w, e.title_width(&metrics) + metrics.margin * 2);
        assert_eq!(e.frame.h, 0);
        assert_eq!(e.view.h, metrics.row_height() + metrics.margin * 2);
        assert!(e.collision.is_empty());
    }

    #[test]
    fn test_collision_keys() {
        let e = users();
        assert_eq!(e.collision.len(), 2);
        assert_eq!(e.collision["public.users.id"], Rect::new(2, 21, 116, 20));
        assert_eq!(e.collision["public.users.name"], Rect::new(2, 41, 116, 20));
    }

    #[test]
    fn test_collision_survives_layout() {
        let mut orders = Entity::new("public", "orders", None)
            .with_column(Column::new(1, "id", "int").primary_key())
            .with_column(
                Column::new(2, "user_id", "int")
                    .references(Reference::new("public", "users", "id")),
            );
        orders.build(&TextMetrics::default());

        let mut canvas = Canvas::default();
        canvas.register(orders);
        canvas.register(users());
        let diagram = canvas.layout();

        let laid_out = diagram.entities.iter().find(|e| e.name == "users").unwrap();
        assert_eq!(laid_out.collision, users().collision);
        assert_eq!(diagram.connectors().count(), 1);
    }

    #[test]
    fn test_from_table_info() {
        let info = TableInfo {
            schema: "public".to_string(),
            name: "orders".to_string(),
            comment: Some("Orders".to_string()),
            columns: vec![
                ColumnInfo {
                    name: "customer_id".to_string(),
                    ordinal_position: 2,
                    is_nullable: true,
                    data_type: "integer".to_string(),
                    foreign_key: Some(ForeignKey {
                        constraint_name: "orders_customer_id_fkey".to_string(),
                        target_schema: "public".to_string(),
                        target_table: "customers".to_string(),
                        target_column: "id".to_string(),
                        update_rule: ReferentialAction::Cascade,
                        ..ForeignKey::default()
                    }),
                    ..ColumnInfo::default()
                },
                ColumnInfo {
                    name: "id".to_string(),
                    ordinal_position: 1,
                    is_nullable: false,
                    is_primary_key: true,
                    data_type: "integer".to_string(),
                    ..ColumnInfo::default()
                },
            ],
        };
        let e = Entity::from_table_info(&info, &TextMetrics::default());

        assert_eq!(e.title, "Orders (orders)");
        assert!(e.has_cascade_child);
        assert_eq!(e.columns[0].physical_name.text, "id");
        assert_eq!(e.columns[1].data_type.text, "integer(FK)");
        assert_eq!(
            e.columns[1].link().map(Reference::qualified_name).as_deref(),
            Some("public.customers.id")
        );
        assert!(e.columns[0].is_required);
        assert!(!e.columns[1].is_required);
    }
}
