//! `{{limit}}`, `{{offset}}` and `{{page}}`.
//!
//! A bound is either a literal integer or a runtime parameter (`--param name`
//! or `@name`). Bounds follow one policy everywhere:
//!
//! - a limit below 1 is dropped with a warning (no row limit),
//! - an offset of 0 is the same as no offset, a negative offset is dropped
//!   with a warning,
//! - a parameter bound renders as the parameter reference; when its runtime
//!   value is known the same checks apply to that value.
//!
//! A template holding both `{{limit}}` and `{{offset}}` gets the dialect's
//! combined clause at the first of the two; the second resolves empty.
//!
//! When the dialect only paginates after an `ORDER BY` and the template has
//! none, `ORDER BY (SELECT NULL)` is emitted in front of the clause together
//! with a warning.

use crate::ast::Value;
use crate::error::StencilResult;
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::registry::{Placeholder, Resolved};

const NEUTRAL_ORDER: &str = "ORDER BY (SELECT NULL) ";
const BOUND_FLAGS: &[&str] = &["param"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Bound {
    Literal(i64),
    Param(String),
}

impl Bound {
    /// `10`, `@size` or `:size`.
    pub fn parse(token: &str) -> Option<Bound> {
        if let Some(name) = token.strip_prefix('@').or_else(|| token.strip_prefix(':')) {
            let valid = !name.is_empty() && name.chars().all(|c| c.is_alphanumeric() || c == '_');
            return valid.then(|| Bound::Param(name.to_string()));
        }
        token.parse().ok().map(Bound::Literal)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Kind {
    Limit,
    Offset,
}

impl Kind {
    fn label(&self) -> &'static str {
        match self {
            Kind::Limit => "limit",
            Kind::Offset => "offset",
        }
    }

    fn other(&self) -> Kind {
        match self {
            Kind::Limit => Kind::Offset,
            Kind::Offset => Kind::Limit,
        }
    }

    /// Whether `n` is kept; a dropped value may produce a warning.
    fn check(&self, n: i64, notes: &mut Vec<String>) -> bool {
        match self {
            Kind::Limit if n < 1 => {
                notes.push(format!("limit {} is not positive; no row limit applied", n));
                false
            }
            Kind::Offset if n < 0 => {
                notes.push(format!("offset {} is negative; no offset applied", n));
                false
            }
            Kind::Offset if n == 0 => false,
            _ => true,
        }
    }
}

/// Rendered bound, or `None` when it is absent or dropped.
fn render(
    ctx: &PlaceholderContext<'_>,
    token: Option<&str>,
    kind: Kind,
    notes: &mut Vec<String>,
) -> Option<String> {
    let token = token?;
    let Some(bound) = Bound::parse(token) else {
        notes.push(format!("invalid {} '{}'", kind.label(), token));
        return None;
    };

    match bound {
        Bound::Literal(n) => kind.check(n, notes).then(|| n.to_string()),
        Bound::Param(name) => {
            let reference = ctx.generator().parameter(&name);
            match ctx.parameters().get(&name) {
                // bound at execution time
                None => Some(reference),
                Some(Value::Null) => None,
                Some(Value::Int(n)) => kind.check(*n, notes).then_some(reference),
                Some(other) => {
                    notes.push(format!(
                        "{} parameter '{}' is not an integer ({})",
                        kind.label(),
                        name,
                        other
                    ));
                    None
                }
            }
        }
    }
}

/// Bound token from `--param name` or the first positional; options the
/// processor would reject count as no token.
fn bound_token(inv: &Invocation) -> Option<String> {
    if inv.options_error.is_some() || !inv.options.unknown_flags(BOUND_FLAGS).is_empty() {
        return None;
    }
    match inv.options.flag_value("param") {
        Some(name) => Some(format!("@{}", name.trim_start_matches(['@', ':']))),
        None => inv.options.first().map(str::to_string),
    }
}

/// The invocation's own bound, with a note when it has none.
fn own_bound(ctx: &PlaceholderContext<'_>, inv: &Invocation, kind: Kind, notes: &mut Vec<String>) -> Option<String> {
    let token = bound_token(inv);
    if token.is_none() {
        notes.push(format!("missing {} value", kind.label()));
    }
    render(ctx, token.as_deref(), kind, notes)
}

fn finish(ctx: &PlaceholderContext<'_>, clause: Option<String>, notes: Vec<String>) -> Resolved {
    let mut notes = notes;
    let mut resolved = match clause.filter(|sql| !sql.is_empty()) {
        None => Resolved::empty(),
        Some(sql) => {
            if ctx.generator().pagination().requires_order_by() && !ctx.has_order_by {
                notes.push(format!(
                    "{} pagination requires ORDER BY; added {}",
                    ctx.dialect(),
                    NEUTRAL_ORDER.trim_end()
                ));
                Resolved::text(sql).prefixed(NEUTRAL_ORDER)
            } else {
                Resolved::text(sql)
            }
        }
    };
    for note in notes {
        resolved = resolved.warn(note);
    }
    resolved
}

/// `{{limit}}` or `{{offset}}` alone, or the first of the two: the dialect's
/// combined clause. The later one of a pair resolves empty.
fn resolve_bound(ctx: &PlaceholderContext<'_>, inv: &Invocation, kind: Kind) -> Resolved {
    let mut notes = Vec::new();
    let own = own_bound(ctx, inv, kind, &mut notes);

    let first = ctx.first_of(&[Kind::Limit.label(), Kind::Offset.label()]);
    if first.is_some_and(|first| first.position != inv.position) {
        return finish(ctx, None, notes);
    }

    // partner diagnostics are reported by the partner itself
    let other = kind.other();
    let theirs = ctx
        .first_of(&[other.label()])
        .and_then(|partner| render(ctx, bound_token(partner).as_deref(), other, &mut Vec::new()));
    let (limit, offset) = match kind {
        Kind::Limit => (own, theirs),
        Kind::Offset => (theirs, own),
    };
    let clause = ctx.generator().limit_offset(limit.as_deref(), offset.as_deref());
    finish(ctx, Some(clause), notes)
}

/// `{{limit 10}}`, `{{limit --param size}}`.
pub struct Limit;

impl Placeholder for Limit {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        Ok(resolve_bound(ctx, inv, Kind::Limit))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(BOUND_FLAGS)
    }
}

/// `{{offset 20}}`, `{{offset --param skip}}`.
pub struct Offset;

impl Placeholder for Offset {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        Ok(resolve_bound(ctx, inv, Kind::Offset))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(BOUND_FLAGS)
    }
}

/// `{{page --limit n --offset m}}`: the dialect's combined clause.
pub struct Page;

impl Placeholder for Page {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        let mut notes = Vec::new();
        let limit = render(ctx, inv.options.flag_value("limit"), Kind::Limit, &mut notes);
        let offset = render(ctx, inv.options.flag_value("offset"), Kind::Offset, &mut notes);
        let clause = ctx
            .generator()
            .limit_offset(limit.as_deref(), offset.as_deref());
        Ok(finish(ctx, Some(clause), notes))
    }

    fn flags(&self) -> Option<&'static [&'static str]> {
        Some(&["limit", "offset"])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bound_parse() {
        assert_eq!(Bound::parse("10"), Some(Bound::Literal(10)));
        assert_eq!(Bound::parse("-3"), Some(Bound::Literal(-3)));
        assert_eq!(Bound::parse("@size"), Some(Bound::Param("size".to_string())));
        assert_eq!(Bound::parse(":size"), Some(Bound::Param("size".to_string())));
        assert_eq!(Bound::parse("ten"), None);
        assert_eq!(Bound::parse("@"), None);
    }

    #[test]
    fn test_zero_offset_is_silent() {
        let mut notes = Vec::new();
        assert!(!Kind::Offset.check(0, &mut notes));
        assert!(notes.is_empty());
        assert!(!Kind::Limit.check(0, &mut notes));
        assert_eq!(notes.len(), 1);
    }
}
