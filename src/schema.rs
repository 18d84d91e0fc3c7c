//! Column schema model.
//!
//! An [`EntitySchema`] is the ordered column list of one entity. Column order
//! drives positional placeholders such as `{{columns}}` and `{{values}}`.
//! Schemas are normally produced by an external schema-resolution step and
//! handed to this crate through a [`SchemaProvider`]; [`Catalog`] is a simple
//! provider loaded from JSON or from a small text format.
//!
//! # Example
//! ```
//! use sqlstencil::schema::Catalog;
//!
//! let json = r#"{
//!     "entities": [{
//!         "name": "User",
//!         "table": "users",
//!         "columns": [
//!             { "name": "Id", "type": "integer", "primary_key": true },
//!             { "name": "Email", "column": "email_address", "type": "text" }
//!         ]
//!     }]
//! }"#;
//!
//! let catalog = Catalog::from_json(json).unwrap();
//! let users = catalog.entity("user").unwrap();
//! assert_eq!(users.find("email").unwrap().column, "email_address");
//! ```

use heck::ToSnakeCase;
use serde::{Deserialize, Serialize};
use strsim::levenshtein;

use crate::ast::{TypeKind, ValueType};
use crate::error::{StencilError, StencilResult};

/// Column descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnDef {
    /// Logical (source) name.
    pub name: String,
    /// Physical (storage) name. Derived from `name` in snake_case when empty.
    #[serde(default)]
    pub column: String,
    #[serde(flatten)]
    pub ty: ValueType,
    #[serde(default)]
    pub primary_key: bool,
}

impl ColumnDef {
    /// Non-nullable column whose physical name is the snake_case logical name.
    pub fn new(name: &str, kind: TypeKind) -> Self {
        Self {
            name: name.to_string(),
            column: name.to_snake_case(),
            ty: ValueType::new(kind),
            primary_key: false,
        }
    }

    /// Builder: explicit physical name.
    pub fn physical(mut self, column: &str) -> Self {
        self.column = column.to_string();
        self
    }

    /// Builder: mark nullable.
    pub fn nullable(mut self) -> Self {
        self.ty.nullable = true;
        self
    }

    /// Builder: mark as primary key.
    pub fn key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// True when `name` is this column's logical name (case-insensitive) or
    /// its physical name.
    pub fn answers_to(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.column == name
    }
}

/// Ordered columns of one entity plus its table name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawEntity")]
pub struct EntitySchema {
    pub name: String,
    pub table: String,
    pub columns: Vec<ColumnDef>,
}

#[derive(Deserialize)]
struct RawEntity {
    name: String,
    #[serde(default)]
    table: String,
    columns: Vec<ColumnDef>,
}

impl TryFrom<RawEntity> for EntitySchema {
    type Error = StencilError;

    fn try_from(raw: RawEntity) -> StencilResult<Self> {
        let table = if raw.table.is_empty() {
            raw.name.to_snake_case()
        } else {
            raw.table
        };
        EntitySchema::new(&raw.name, &table, raw.columns)
    }
}

impl EntitySchema {
    /// Build a schema, filling missing physical names and rejecting
    /// duplicate logical or physical names.
    pub fn new(name: &str, table: &str, columns: Vec<ColumnDef>) -> StencilResult<Self> {
        let mut checked: Vec<ColumnDef> = Vec::with_capacity(columns.len());
        for mut col in columns {
            if col.column.is_empty() {
                col.column = col.name.to_snake_case();
            }
            if let Some(dup) = checked.iter().find(|c| c.column == col.column) {
                return Err(StencilError::Schema(format!(
                    "Entity '{}' maps both '{}' and '{}' to column '{}'",
                    name, dup.name, col.name, col.column
                )));
            }
            if checked.iter().any(|c| c.name.eq_ignore_ascii_case(&col.name)) {
                return Err(StencilError::Schema(format!(
                    "Entity '{}' declares member '{}' twice",
                    name, col.name
                )));
            }
            checked.push(col);
        }
        Ok(Self {
            name: name.to_string(),
            table: table.to_string(),
            columns: checked,
        })
    }

    /// Schema without columns, for templates that only need the table.
    pub fn empty(table: &str) -> Self {
        Self {
            name: table.to_string(),
            table: table.to_string(),
            columns: Vec::new(),
        }
    }

    /// Lookup by logical name (case-insensitive).
    pub fn by_logical(&self, name: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Lookup by physical name.
    pub fn by_physical(&self, column: &str) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.column == column)
    }

    /// Lookup by logical name first, then physical name.
    pub fn find(&self, name: &str) -> Option<&ColumnDef> {
        self.by_logical(name).or_else(|| self.by_physical(name))
    }

    /// First primary-key column.
    pub fn primary_key(&self) -> Option<&ColumnDef> {
        self.columns.iter().find(|c| c.primary_key)
    }

    /// Closest known name, for "did you mean" messages.
    pub fn suggest(&self, name: &str) -> Option<String> {
        let lower = name.to_lowercase();
        self.columns
            .iter()
            .flat_map(|c| [&c.name, &c.column])
            .map(|candidate| (levenshtein(&lower, &candidate.to_lowercase()), candidate))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, candidate)| candidate.clone())
    }
}

/// Source of entity schemas.
pub trait SchemaProvider {
    /// Columns for the named entity, if known.
    fn schema(&self, entity: &str) -> Option<EntitySchema>;
}

/// In-memory set of entity schemas.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub entities: Vec<EntitySchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, entity: EntitySchema) {
        self.entities.push(entity);
    }

    /// Entity by name (case-insensitive) or by table name.
    pub fn entity(&self, name: &str) -> Option<&EntitySchema> {
        self.entities
            .iter()
            .find(|e| e.name.eq_ignore_ascii_case(name) || e.table == name)
    }

    /// Load a catalog from JSON.
    pub fn from_json(json: &str) -> StencilResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a catalog from the text format:
    ///
    /// ```text
    /// entity User users (
    ///     Id integer key,
    ///     Email text null as email_address,
    ///     CreatedAt datetime
    /// )
    /// ```
    ///
    /// The table name is optional and defaults to the snake_case entity name.
    pub fn from_text(input: &str) -> StencilResult<Self> {
        let mut catalog = Catalog::new();
        let mut current: Option<(String, String, Vec<ColumnDef>)> = None;

        for (index, line) in input.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with("--") {
                continue;
            }

            if let Some(rest) = line.strip_prefix("entity ") {
                if current.is_some() {
                    return Err(StencilError::Schema(format!(
                        "line {}: entity declared before the previous one was closed",
                        index + 1
                    )));
                }
                let header: Vec<&str> = rest
                    .trim_end_matches('(')
                    .split_whitespace()
                    .collect();
                let name = header.first().ok_or_else(|| {
                    StencilError::Schema(format!("line {}: missing entity name", index + 1))
                })?;
                let table = header
                    .get(1)
                    .map(|t| t.to_string())
                    .unwrap_or_else(|| name.to_snake_case());
                current = Some((name.to_string(), table, Vec::new()));
            } else if line == ")" {
                let (name, table, columns) = current.take().ok_or_else(|| {
                    StencilError::Schema(format!("line {}: ')' outside an entity", index + 1))
                })?;
                catalog.add(EntitySchema::new(&name, &table, columns)?);
            } else if let Some((_, _, columns)) = current.as_mut() {
                columns.push(parse_column_line(line.trim_end_matches(','), index + 1)?);
            } else {
                return Err(StencilError::Schema(format!(
                    "line {}: column outside an entity",
                    index + 1
                )));
            }
        }

        if let Some((name, _, _)) = current {
            return Err(StencilError::Schema(format!(
                "entity '{}' is not closed",
                name
            )));
        }
        Ok(catalog)
    }

    /// Load a catalog from a file; `.json` files are JSON, anything else
    /// uses the text format.
    pub fn from_file(path: &std::path::Path) -> StencilResult<Self> {
        let content = std::fs::read_to_string(path)?;
        if path.extension().map(|e| e == "json").unwrap_or(false) {
            Self::from_json(&content)
        } else {
            Self::from_text(&content)
        }
    }
}

fn parse_column_line(line: &str, line_no: usize) -> StencilResult<ColumnDef> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 2 {
        return Err(StencilError::Schema(format!(
            "line {}: expected '<name> <type>'",
            line_no
        )));
    }
    let kind: TypeKind = parts[1]
        .parse()
        .map_err(|e| StencilError::Schema(format!("line {}: {}", line_no, e)))?;
    let mut col = ColumnDef::new(parts[0], kind);

    let mut rest = parts[2..].iter();
    while let Some(word) = rest.next() {
        match word.to_ascii_lowercase().as_str() {
            "key" => col = col.key(),
            "null" => col = col.nullable(),
            "as" => {
                let physical = rest.next().ok_or_else(|| {
                    StencilError::Schema(format!("line {}: 'as' needs a column name", line_no))
                })?;
                col = col.physical(physical);
            }
            other => {
                return Err(StencilError::Schema(format!(
                    "line {}: unexpected '{}'",
                    line_no, other
                )));
            }
        }
    }
    Ok(col)
}

impl SchemaProvider for Catalog {
    fn schema(&self, entity: &str) -> Option<EntitySchema> {
        self.entity(entity).cloned()
    }
}
