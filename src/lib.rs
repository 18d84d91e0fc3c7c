//! # sqlstencil
//!
//! Placeholder-driven SQL templates and typed predicate translation for
//! SQLite, SQL Server, MySQL, PostgreSQL, Oracle and DB2.
//!
//! ## Quick Example
//!
//! ```
//! use sqlstencil::prelude::*;
//!
//! let schema = EntitySchema::new("User", "users", vec![
//!     ColumnDef::new("Id", TypeKind::Integer).key(),
//!     ColumnDef::new("Name", TypeKind::Text),
//!     ColumnDef::new("CreatedAt", TypeKind::DateTime),
//! ]).unwrap();
//!
//! let result = sqlstencil::process(
//!     "SELECT {{columns --exclude Id}} FROM {{table}}",
//!     &schema,
//!     Dialect::SQLite,
//! ).unwrap();
//! assert_eq!(result.sql, "SELECT [name], [created_at] FROM [users]");
//! ```
//!
//! ## Placeholders
//!
//! | Placeholder | Output |
//! |-------------|--------|
//! | `{{table}}` | quoted table name |
//! | `{{columns}}` / `{{values}}` / `{{set}}` | column list, parameter list, assignments |
//! | `{{where}}` | `WHERE <predicate>` |
//! | `{{orderby}}` / `{{groupby}}` | ordering and grouping clauses |
//! | `{{limit}}` / `{{offset}}` / `{{page}}` | dialect pagination |
//! | `{{count}}` ... `{{max}}` | aggregates |
//! | `{{returning_id}}` | generated key clause, empty where unsupported |
//! | `{{if notempty=x}}...{{/if}}` | conditional block |

pub mod ast;
pub mod config;
pub mod engine;
pub mod error;
pub mod merge;
pub mod schema;
pub mod template;
pub mod transpiler;

pub mod prelude {
    pub use crate::ast::*;
    pub use crate::config::EngineConfig;
    pub use crate::engine::{Engine, RenderRequest};
    pub use crate::error::*;
    pub use crate::merge::{ParameterMerger, merge_conditions};
    pub use crate::schema::{Catalog, ColumnDef, EntitySchema, SchemaProvider};
    pub use crate::template::{Diagnostic, PlaceholderRegistry, Scope, Severity, Translation};
    pub use crate::transpiler::{Condition, Dialect, SqlGenerator, ToCondition};
}

use ast::Expr;
use error::StencilResult;
use schema::EntitySchema;
use template::{Scope, Translation};
use transpiler::{Condition, Dialect};

/// Resolve the placeholders of `template` with the built-in registry.
pub fn process(
    template: &str,
    schema: &EntitySchema,
    dialect: Dialect,
) -> StencilResult<Translation> {
    template::process(template, &Scope::new(schema, dialect))
}

/// Translate a predicate tree into a parameterized condition.
///
/// ```
/// use sqlstencil::prelude::*;
///
/// let schema = EntitySchema::new("User", "users", vec![
///     ColumnDef::new("Age", TypeKind::Integer),
///     ColumnDef::new("Status", TypeKind::Text),
/// ]).unwrap();
///
/// let predicate = member("Age").gte(18).and(
///     member("Status").eq("active").or(member("Status").eq("pending")),
/// );
/// let condition = sqlstencil::translate(&predicate, &schema, Dialect::SQLite).unwrap();
/// assert_eq!(condition.sql, "(age >= @p0) AND ((status = @p1) OR (status = @p2))");
/// ```
pub fn translate(
    predicate: &Expr,
    schema: &EntitySchema,
    dialect: Dialect,
) -> StencilResult<Condition> {
    transpiler::translate(predicate, schema, dialect)
}
