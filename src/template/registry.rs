//! Placeholder registry.
//!
//! Maps placeholder names (case-insensitive) to resolvers. Registering a
//! name that already exists replaces the previous resolver, so host code can
//! override any built-in.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use crate::error::StencilResult;
use crate::template::context::PlaceholderContext;
use crate::template::diagnostic::Severity;
use crate::template::parser::Invocation;
use crate::template::placeholders;

/// Output of an inline resolver.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Resolved {
    /// Replacement text; `None` keeps the placeholder verbatim.
    pub sql: Option<String>,
    pub notes: Vec<(Severity, String)>,
}

impl Resolved {
    pub fn text(sql: impl Into<String>) -> Self {
        Self {
            sql: Some(sql.into()),
            notes: Vec::new(),
        }
    }

    pub fn empty() -> Self {
        Self::text(String::new())
    }

    /// Leave the placeholder in the output untouched.
    pub fn verbatim() -> Self {
        Self {
            sql: None,
            notes: Vec::new(),
        }
    }

    pub fn warn(mut self, message: impl Into<String>) -> Self {
        self.notes.push((Severity::Warning, message.into()));
        self
    }

    pub fn info(mut self, message: impl Into<String>) -> Self {
        self.notes.push((Severity::Info, message.into()));
        self
    }

    /// Prepend `prefix` to the replacement text.
    pub fn prefixed(mut self, prefix: &str) -> Self {
        if let Some(sql) = self.sql.as_mut() {
            sql.insert_str(0, prefix);
        }
        self
    }
}

/// An inline placeholder: `{{name options}}` replaced by text.
pub trait Placeholder: Send + Sync {
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved>;

    /// Flags this placeholder understands. `None` accepts anything; with
    /// `Some`, any other flag is reported and the options are ignored.
    fn flags(&self) -> Option<&'static [&'static str]> {
        None
    }
}

impl<F> Placeholder for F
where
    F: Fn(&PlaceholderContext<'_>, &Invocation) -> StencilResult<Resolved> + Send + Sync,
{
    fn process(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<Resolved> {
        self(ctx, inv)
    }
}

/// A block placeholder: `{{name cond}}...{{/name}}` keeps or drops its body.
pub trait BlockPlaceholder: Send + Sync {
    /// Whether the body is part of the output.
    fn include(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<bool>;
}

/// Registered resolver.
#[derive(Clone)]
pub enum Resolver {
    Inline(Arc<dyn Placeholder>),
    Block(Arc<dyn BlockPlaceholder>),
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Resolver::Inline(_) => write!(f, "Resolver::Inline"),
            Resolver::Block(_) => write!(f, "Resolver::Block"),
        }
    }
}

/// Name-keyed table of resolvers.
#[derive(Debug, Clone)]
pub struct PlaceholderRegistry {
    resolvers: HashMap<String, Resolver>,
}

/// Shared registry with the built-ins, for callers that never customize.
pub static DEFAULT_REGISTRY: LazyLock<PlaceholderRegistry> =
    LazyLock::new(PlaceholderRegistry::with_builtins);

impl Default for PlaceholderRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

impl PlaceholderRegistry {
    /// Registry with no resolvers at all.
    pub fn empty() -> Self {
        Self {
            resolvers: HashMap::new(),
        }
    }

    /// Registry with every built-in placeholder.
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        placeholders::register_builtins(&mut registry);
        registry
    }

    /// Register (or replace) an inline placeholder.
    pub fn register(&mut self, name: &str, placeholder: impl Placeholder + 'static) {
        self.resolvers
            .insert(name.to_lowercase(), Resolver::Inline(Arc::new(placeholder)));
    }

    /// Register (or replace) a block placeholder.
    pub fn register_block(&mut self, name: &str, block: impl BlockPlaceholder + 'static) {
        self.resolvers
            .insert(name.to_lowercase(), Resolver::Block(Arc::new(block)));
    }

    pub fn resolve(&self, name: &str) -> Option<&Resolver> {
        self.resolvers.get(&name.to_lowercase())
    }

    pub fn is_block(&self, name: &str) -> bool {
        matches!(self.resolve(name), Some(Resolver::Block(_)))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resolvers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtins_registered() {
        let registry = PlaceholderRegistry::with_builtins();
        for name in [
            "table",
            "columns",
            "values",
            "set",
            "where",
            "orderby",
            "limit",
            "offset",
            "page",
            "groupby",
            "count",
            "sum",
            "avg",
            "min",
            "max",
            "returning_id",
            "bool_true",
            "bool_false",
            "current_timestamp",
            "arg",
        ] {
            assert!(registry.contains(name), "missing {}", name);
        }
        assert!(registry.is_block("if"));
        assert!(!registry.is_block("table"));
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let registry = PlaceholderRegistry::with_builtins();
        assert!(registry.contains("TABLE"));
        assert!(registry.contains("OrderBy"));
    }

    #[test]
    fn test_last_registration_wins() {
        let mut registry = PlaceholderRegistry::empty();
        registry.register("x", |_: &PlaceholderContext<'_>, _: &Invocation| -> StencilResult<Resolved> {
            Ok(Resolved::text("first"))
        });
        registry.register("X", |_: &PlaceholderContext<'_>, _: &Invocation| -> StencilResult<Resolved> {
            Ok(Resolved::text("second"))
        });
        assert_eq!(registry.names(), vec!["x"]);
    }

    #[test]
    fn test_resolved_prefix_skips_verbatim() {
        assert_eq!(
            Resolved::text("OFFSET 1").prefixed("ORDER BY x ").sql.as_deref(),
            Some("ORDER BY x OFFSET 1")
        );
        assert_eq!(Resolved::verbatim().prefixed("x").sql, None);
    }
}
