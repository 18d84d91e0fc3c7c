//! `{{table}}`, `{{columns}}`, `{{values}}` and `{{set}}`.

use crate::error::StencilResult;
use crate::schema::ColumnDef;
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::placeholders::unknown_column;
use crate::template::registry::{Placeholder, Resolved};

/// Quoted target table.
pub struct Table;

impl Placeholder for Table {
    fn process(&self, ctx: &PlaceholderContext<'_>, _inv: &Invocation) -> StencilResult<Resolved> {
        Ok(Resolved::text(ctx.generator().quote_identifier(ctx.table())))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&[])
    }
}

/// Comma-joined per-column output, filtered by `--exclude` / `--only`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnList {
    /// `[name], [created_at]`
    Names,
    /// `@name, @created_at`, with the dialect's parameter prefix
    /// (`:name, :created_at` on Oracle).
    Parameters,
    /// `[name] = @name, [created_at] = @created_at`; parameters take the
    /// dialect prefix as in `Parameters`.
    Assignments,
}

impl Placeholder for ColumnList {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let generator = ctx.generator();
        let mut notes = Vec::new();
        let columns = select_columns(ctx, inv, &mut notes);

        let rendered: Vec<String> = columns
            .iter()
            .map(|column| match self {
                ColumnList::Names => generator.quote_identifier(&column.column),
                ColumnList::Parameters => generator.parameter(&column.column),
                ColumnList::Assignments => format!(
                    "{} = {}",
                    generator.quote_identifier(&column.column),
                    generator.parameter(&column.column)
                ),
            })
            .collect();

        let mut resolved = Resolved::text(rendered.join(", "));
        for message in notes {
            resolved = resolved.warn(message);
        }
        Ok(resolved)
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["exclude", "only"])
    }
}

/// Schema columns after `--only` then `--exclude`, in schema order.
/// Names that match no column are reported in `notes`.
pub fn select_columns<'s>(
    ctx: &PlaceholderContext<'s>,
    inv: &Invocation,
    notes: &mut Vec<String>,
) -> Vec<&'s ColumnDef> {
    let schema = ctx.schema();
    let only = inv.options.flag("only").unwrap_or_default();
    let exclude = inv.options.flag("exclude").unwrap_or_default();

    for name in only.iter().chain(exclude) {
        if !schema.columns.iter().any(|column| column.answers_to(name)) {
            notes.push(unknown_column(ctx, name));
        }
    }

    schema
        .columns
        .iter()
        .filter(|column| only.is_empty() || only.iter().any(|name| column.answers_to(name)))
        .filter(|column| !exclude.iter().any(|name| column.answers_to(name)))
        .collect()
}
