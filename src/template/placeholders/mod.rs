//! Built-in placeholders.

pub mod aggregates;
pub mod clauses;
pub mod columns;
pub mod conditional;
pub mod dialect;
pub mod pagination;

use crate::template::context::PlaceholderContext;
use crate::template::registry::PlaceholderRegistry;

/// Register every built-in placeholder.
pub fn register_builtins(registry: &mut PlaceholderRegistry) {
    registry.register("table", columns::Table);
    registry.register("columns", columns::ColumnList::Names);
    registry.register("values", columns::ColumnList::Parameters);
    registry.register("set", columns::ColumnList::Assignments);

    registry.register("where", clauses::Where);
    registry.register("orderby", clauses::OrderBy);
    registry.register("groupby", clauses::GroupBy);

    registry.register("limit", pagination::Limit);
    registry.register("offset", pagination::Offset);
    registry.register("page", pagination::Page);

    registry.register("count", aggregates::Aggregate::COUNT);
    registry.register("sum", aggregates::Aggregate::SUM);
    registry.register("avg", aggregates::Aggregate::AVG);
    registry.register("min", aggregates::Aggregate::MIN);
    registry.register("max", aggregates::Aggregate::MAX);

    registry.register("returning_id", dialect::ReturningId);
    registry.register("bool_true", dialect::BoolLiteral(true));
    registry.register("bool_false", dialect::BoolLiteral(false));
    registry.register("current_timestamp", dialect::CurrentTimestamp);
    registry.register("arg", dialect::Arg);

    registry.register_block("if", conditional::If);
}

/// Quoted physical column for a logical or physical name. Without a known
/// column list any name is accepted as-is.
pub(crate) fn column_ref(ctx: &PlaceholderContext<'_>, name: &str) -> Option<String> {
    let generator = ctx.generator();
    match ctx.schema().find(name) {
        Some(column) => Some(generator.quote_identifier(&column.column)),
        None if ctx.schema().columns.is_empty() => Some(generator.quote_identifier(name)),
        None => None,
    }
}

pub(crate) fn unknown_column(ctx: &PlaceholderContext<'_>, name: &str) -> String {
    match ctx.schema().suggest(name) {
        Some(suggestion) => format!(
            "'{}' is not a column of '{}'. Did you mean '{}'?",
            name,
            ctx.table(),
            suggestion
        ),
        None => format!("'{}' is not a column of '{}'", name, ctx.table()),
    }
}

/// Physical name of the key column, `id` when the schema has none.
pub(crate) fn key_column<'a>(ctx: &PlaceholderContext<'a>) -> &'a str {
    ctx.schema()
        .primary_key()
        .map(|column| column.column.as_str())
        .unwrap_or("id")
}
