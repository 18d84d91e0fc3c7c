//! Transpiler test modules.
//!
//! - `dialects`: descriptor conventions per engine (quoting, pagination, literals)
//! - `conditions`: predicate tree translation

mod conditions;

use crate::ast::TypeKind;
use crate::schema::{ColumnDef, EntitySchema};

/// Shared fixture: a users table covering every column kind.
pub(super) fn users() -> EntitySchema {
    EntitySchema::new(
        "User",
        "users",
        vec![
            ColumnDef::new("Id", TypeKind::Integer).key(),
            ColumnDef::new("Name", TypeKind::Text),
            ColumnDef::new("Age", TypeKind::Integer),
            ColumnDef::new("Status", TypeKind::Text),
            ColumnDef::new("Email", TypeKind::Text).nullable(),
            ColumnDef::new("IsActive", TypeKind::Boolean),
            ColumnDef::new("CreatedAt", TypeKind::DateTime),
            ColumnDef::new("DeletedAt", TypeKind::DateTime).nullable(),
            ColumnDef::new("Score", TypeKind::Decimal),
            ColumnDef::new("Order", TypeKind::Integer),
        ],
    )
    .unwrap()
}
