//! SQL dialects and predicate translation.
//!
//! Converts typed predicate trees into parameterized SQL conditions, and
//! describes the lexical conventions of each supported engine.

pub mod conditions;
pub mod dialect;
pub mod sql;
pub mod traits;

#[cfg(test)]
mod tests;

use crate::ast::Expr;
use crate::error::StencilResult;
use crate::schema::EntitySchema;

pub use conditions::{Condition, ParamContext, PredicateTranslator, translate, translate_with_stem};
pub use dialect::Dialect;
pub use traits::{Pagination, SqlGenerator, needs_quoting};

/// Trait for converting predicate trees to SQL conditions.
pub trait ToCondition {
    /// Translate against `schema` with the given dialect.
    fn to_condition(&self, schema: &EntitySchema, dialect: Dialect) -> StencilResult<Condition>;
}

impl ToCondition for Expr {
    fn to_condition(&self, schema: &EntitySchema, dialect: Dialect) -> StencilResult<Condition> {
        translate(self, schema, dialect)
    }
}
