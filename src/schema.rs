//! Read-only snapshot of a relational schema, as produced by database introspection.

use serde::{Deserialize, Serialize};

use crate::error::Result;

fn default_schema() -> String {
    "public".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaSnapshot {
    #[serde(default)]
    pub database: Option<String>,
    #[serde(default)]
    pub tables: Vec<TableInfo>,
}

impl SchemaSnapshot {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableInfo {
    #[serde(default = "default_schema")]
    pub schema: String,
    pub name: String,
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub columns: Vec<ColumnInfo>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnInfo {
    pub name: String,
    pub ordinal_position: i32,
    #[serde(default = "default_true")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_primary_key: bool,
    #[serde(default)]
    pub is_unique: bool,
    pub data_type: String,
    /// Column comment, shown as the logical name.
    #[serde(default)]
    pub comment: Option<String>,
    #[serde(default)]
    pub foreign_key: Option<ForeignKey>,
}

fn default_true() -> bool {
    true
}

impl ColumnInfo {
    /// Primary-key columns and non-nullable columns carry the not-null marker.
    pub fn is_required(&self) -> bool {
        self.is_primary_key || !self.is_nullable
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ForeignKey {
    #[serde(default)]
    pub constraint_name: String,
    #[serde(default = "default_schema")]
    pub target_schema: String,
    #[serde(default)]
    pub target_table: String,
    #[serde(default)]
    pub target_column: String,
    #[serde(default)]
    pub match_option: Option<String>,
    #[serde(default)]
    pub update_rule: ReferentialAction,
    #[serde(default)]
    pub delete_rule: ReferentialAction,
}

impl ForeignKey {
    pub fn cascades(&self) -> bool {
        self.update_rule == ReferentialAction::Cascade
            || self.delete_rule == ReferentialAction::Cascade
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferentialAction {
    #[default]
    #[serde(rename = "NO ACTION")]
    NoAction,
    #[serde(rename = "RESTRICT")]
    Restrict,
    #[serde(rename = "CASCADE")]
    Cascade,
    #[serde(rename = "SET NULL")]
    SetNull,
    #[serde(rename = "SET DEFAULT")]
    SetDefault,
}
