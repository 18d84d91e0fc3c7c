//! Template test modules.
//!
//! - `placeholders`: built-in placeholder output per dialect
//! - `processor`: scanning, blocks, diagnostics and registry overrides

mod processor;

use crate::ast::{Parameters, TypeKind};
use crate::schema::{ColumnDef, EntitySchema};
use crate::template::{Scope, Translation, process};
use crate::transpiler::Dialect;

fn users() -> EntitySchema {
    EntitySchema::new(
        "User",
        "users",
        vec![
            ColumnDef::new("Id", TypeKind::Integer).key(),
            ColumnDef::new("Name", TypeKind::Text),
            ColumnDef::new("CreatedAt", TypeKind::DateTime),
        ],
    )
    .unwrap()
}

fn users_with_update() -> EntitySchema {
    EntitySchema::new(
        "User",
        "users",
        vec![
            ColumnDef::new("Id", TypeKind::Integer).key(),
            ColumnDef::new("Name", TypeKind::Text),
            ColumnDef::new("CreatedAt", TypeKind::DateTime),
            ColumnDef::new("UpdatedAt", TypeKind::DateTime).nullable(),
        ],
    )
    .unwrap()
}

fn orders() -> EntitySchema {
    EntitySchema::new(
        "Order",
        "orders",
        vec![
            ColumnDef::new("OrderId", TypeKind::Guid).key(),
            ColumnDef::new("CustomerId", TypeKind::Integer),
            ColumnDef::new("Total", TypeKind::Decimal),
            ColumnDef::new("Status", TypeKind::Text),
        ],
    )
    .unwrap()
}

fn render(template: &str, schema: &EntitySchema, dialect: Dialect) -> Translation {
    process(template, &Scope::new(schema, dialect)).unwrap()
}

fn render_with(
    template: &str,
    schema: &EntitySchema,
    dialect: Dialect,
    parameters: &Parameters,
) -> Translation {
    process(template, &Scope::new(schema, dialect).parameters(parameters)).unwrap()
}
