//! Aggregate placeholders: `{{count}}`, `{{sum:col}}`, `{{avg:col}}`,
//! `{{min:col}}`, `{{max:col}}`.

use crate::error::StencilResult;
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::placeholders::{column_ref, unknown_column};
use crate::template::registry::{Placeholder, Resolved};

/// An aggregate function call over one column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Aggregate {
    pub function: &'static str,
    /// `COUNT(*)` is the only aggregate that works without a column.
    pub star_default: bool,
}

impl Aggregate {
    pub const COUNT: Aggregate = Aggregate {
        function: "COUNT",
        star_default: true,
    };
    pub const SUM: Aggregate = Aggregate {
        function: "SUM",
        star_default: false,
    };
    pub const AVG: Aggregate = Aggregate {
        function: "AVG",
        star_default: false,
    };
    pub const MIN: Aggregate = Aggregate {
        function: "MIN",
        star_default: false,
    };
    pub const MAX: Aggregate = Aggregate {
        function: "MAX",
        star_default: false,
    };
}

impl Placeholder for Aggregate {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let distinct = inv.options.has_flag("distinct");
        let column = inv
            .options
            .flag_value("distinct")
            .or_else(|| inv.options.first());

        let Some(name) = column else {
            if self.star_default {
                let resolved = Resolved::text(format!("{}(*)", self.function));
                return Ok(if distinct {
                    resolved.warn("--distinct needs a column")
                } else {
                    resolved
                });
            }
            // Without a column there is nothing valid to emit.
            return Ok(Resolved::verbatim().warn(format!("{} needs a column", inv.name)));
        };

        let Some(column) = column_ref(ctx, name) else {
            return Ok(Resolved::verbatim().warn(unknown_column(ctx, name)));
        };

        let modifier = if distinct { "DISTINCT " } else { "" };
        Ok(Resolved::text(format!(
            "{}({}{})",
            self.function, modifier, column
        )))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["distinct"])
    }
}
