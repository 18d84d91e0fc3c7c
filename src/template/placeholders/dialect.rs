//! Placeholders answered directly by the dialect descriptor.

use crate::error::StencilResult;
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::placeholders::key_column;
use crate::template::registry::{Placeholder, Resolved};

/// Insert-returning clause for the key column (or an explicit column).
pub struct ReturningId;

impl Placeholder for ReturningId {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let key = match inv.options.first() {
            Some(name) => match ctx.schema().find(name) {
                Some(column) => column.column.clone(),
                None => name.to_string(),
            },
            None => key_column(ctx).to_string(),
        };
        Ok(Resolved::text(ctx.generator().returning_id(&key)))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&[])
    }
}

/// `{{bool_true}}` / `{{bool_false}}`.
pub struct BoolLiteral(pub bool);

impl Placeholder for BoolLiteral {
    fn process(&self, ctx: &PlaceholderContext<'_>, _inv: &Invocation) -> StencilResult<Resolved> {
        Ok(Resolved::text(ctx.generator().bool_literal(self.0)))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&[])
    }
}

pub struct CurrentTimestamp;

impl Placeholder for CurrentTimestamp {
    fn process(&self, ctx: &PlaceholderContext<'_>, _inv: &Invocation) -> StencilResult<Resolved> {
        Ok(Resolved::text(ctx.generator().current_timestamp()))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&[])
    }
}

/// `{{arg --param name}}` (or `{{arg name}}`): the dialect's reference to a
/// named parameter, e.g. `@name` or `:name`.
pub struct Arg;

impl Placeholder for Arg {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let name = inv
            .options
            .flag_value("param")
            .or_else(|| inv.options.first())
            .map(|name| name.trim_start_matches(['@', ':']));

        Ok(match name {
            Some(name) if !name.is_empty() => Resolved::text(ctx.generator().parameter(name)),
            _ => Resolved::empty().warn("missing parameter name"),
        })
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["param"])
    }
}
