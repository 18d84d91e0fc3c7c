//! `{{where}}`, `{{orderby}}` and `{{groupby}}`.

use crate::ast::Value;
use crate::error::StencilResult;
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::placeholders::{column_ref, unknown_column};
use crate::template::registry::{Placeholder, Resolved};

/// `{{where}}` emits `WHERE <predicate>` for the translated predicate, or
/// nothing without one. `{{where --param name}}` passes the runtime text
/// parameter `name` through unchanged; the caller owns its safety.
pub struct Where;

impl Placeholder for Where {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        if let Some(values) = inv.options.flag("param") {
            let Some(name) = values.first() else {
                return Ok(Resolved::empty().warn("--param needs a parameter name"));
            };
            return Ok(match ctx.parameters().get(name) {
                Some(Value::Text(fragment)) => Resolved::text(fragment.clone()),
                None | Some(Value::Null) => {
                    Resolved::empty().info(format!("parameter '{}' is not set", name))
                }
                Some(_) => Resolved::empty().warn(format!("parameter '{}' is not text", name)),
            });
        }

        let mut resolved = match ctx.condition() {
            Some(condition) if !condition.is_empty() => {
                Resolved::text(format!("WHERE {}", condition.sql))
            }
            _ => Resolved::empty(),
        };
        if !inv.options.positional.is_empty() {
            resolved = resolved.warn(format!(
                "unexpected arguments '{}'",
                inv.options.positional.join(" ")
            ));
        }
        Ok(resolved)
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["param"])
    }
}

/// `{{orderby [col...] [--asc|--desc]}}`; defaults to the key column ascending.
pub struct OrderBy;

impl Placeholder for OrderBy {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let options = &inv.options;
        let mut warnings = Vec::new();

        let descending = match (options.has_flag("asc"), options.has_flag("desc")) {
            (true, true) => {
                warnings.push("both --asc and --desc given; using ASC".to_string());
                false
            }
            (_, desc) => desc,
        };
        let direction = if descending { "DESC" } else { "ASC" };

        let mut columns: Vec<String> = Vec::new();
        for name in &options.positional {
            match column_ref(ctx, name) {
                Some(column) => columns.push(column),
                None => warnings.push(unknown_column(ctx, name)),
            }
        }

        if columns.is_empty() {
            if let Some(key) = ctx.schema().primary_key() {
                columns.push(ctx.generator().quote_identifier(&key.column));
            }
        }

        let mut resolved = if columns.is_empty() {
            Resolved::empty()
        } else {
            let terms: Vec<String> = columns
                .iter()
                .map(|column| format!("{} {}", column, direction))
                .collect();
            Resolved::text(format!("ORDER BY {}", terms.join(", ")))
        };
        for warning in warnings {
            resolved = resolved.warn(warning);
        }
        Ok(resolved)
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["asc", "desc"])
    }
}

/// `{{groupby col...}}`; empty without columns.
pub struct GroupBy;

impl Placeholder for GroupBy {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let mut warnings = Vec::new();
        let columns: Vec<String> = inv
            .options
            .positional
            .iter()
            .filter_map(|name| {
                let column = column_ref(ctx, name);
                if column.is_none() {
                    warnings.push(unknown_column(ctx, name));
                }
                column
            })
            .collect();

        let mut resolved = if columns.is_empty() {
            Resolved::empty()
        } else {
            Resolved::text(format!("GROUP BY {}", columns.join(", ")))
        };
        for warning in warnings {
            resolved = resolved.warn(warning);
        }
        Ok(resolved)
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&[])
    }
}
