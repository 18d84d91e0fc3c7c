//! Template processor.
//!
//! One left-to-right pass: resolved text is written to the output and never
//! scanned again, so a resolver cannot inject further placeholders.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, trace, warn};

use crate::ast::Parameters;
use crate::error::StencilResult;
use crate::template::context::{PlaceholderContext, Scope};
use crate::template::diagnostic::Diagnostic;
use crate::template::parser::{Invocation, Node, parse_template};
use crate::template::registry::{PlaceholderRegistry, Resolved, Resolver};

static ORDER_BY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\border\s+by\b").expect("ORDER BY pattern"));

/// Result of a translation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Translation {
    pub sql: String,
    pub parameters: Parameters,
    pub diagnostics: Vec<Diagnostic>,
    /// A `{{@name}}` placeholder was left for a later stage.
    pub has_unresolved_dynamic_placeholder: bool,
}

impl Translation {
    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    /// Emit one `warn!` event per warning diagnostic.
    pub fn log_diagnostics(&self) {
        for diagnostic in self.warnings() {
            warn!(
                placeholder = %diagnostic.placeholder,
                message = %diagnostic.message,
                "template diagnostic"
            );
        }
    }
}

/// Output buffer that swallows one space next to an empty resolution.
#[derive(Default)]
struct Output {
    sql: String,
    trim_next_space: bool,
}

impl Output {
    fn text(&mut self, text: &str) {
        let text = if self.trim_next_space {
            text.strip_prefix(' ').unwrap_or(text)
        } else {
            text
        };
        self.trim_next_space = false;
        self.sql.push_str(text);
    }

    fn resolved(&mut self, text: &str) {
        if text.is_empty() {
            self.collapse();
        } else {
            self.trim_next_space = false;
            self.sql.push_str(text);
        }
    }

    /// Drop the space before an empty resolution, else the one after it.
    fn collapse(&mut self) {
        if self.sql.ends_with(' ') {
            self.sql.pop();
        } else {
            self.trim_next_space = true;
        }
    }
}

/// Processes templates against a placeholder registry.
pub struct TemplateProcessor<'r> {
    registry: &'r PlaceholderRegistry,
}

struct Pass {
    output: Output,
    diagnostics: Vec<Diagnostic>,
    dynamic: bool,
}

impl<'r> TemplateProcessor<'r> {
    pub fn new(registry: &'r PlaceholderRegistry) -> Self {
        Self { registry }
    }

    /// Resolve every placeholder of `template` in `scope`.
    pub fn process(&self, template: &str, scope: &Scope<'_>) -> StencilResult<Translation> {
        let parameters = scope.parameters.clone();
        if template.is_empty() {
            return Ok(Translation {
                parameters,
                ..Translation::default()
            });
        }

        let nodes = parse_template(template, |name| self.registry.is_block(name))?;
        if nodes.iter().all(Node::is_text) {
            return Ok(Translation {
                sql: template.to_string(),
                parameters,
                ..Translation::default()
            });
        }

        let mut present = HashSet::new();
        let mut invocations = Vec::new();
        collect_names(&nodes, &mut present, &mut invocations);
        let has_order_by = present.contains("orderby") || literal_order_by(&nodes);
        let ctx = PlaceholderContext {
            scope,
            has_order_by,
            present: &present,
            invocations: &invocations,
        };

        let mut pass = Pass {
            output: Output::default(),
            diagnostics: Vec::new(),
            dynamic: false,
        };
        self.render(&nodes, &ctx, &mut pass)?;

        debug!(
            dialect = %scope.dialect,
            table = %scope.table,
            placeholders = present.len(),
            diagnostics = pass.diagnostics.len(),
            "processed template"
        );

        Ok(Translation {
            sql: pass.output.sql,
            parameters,
            diagnostics: pass.diagnostics,
            has_unresolved_dynamic_placeholder: pass.dynamic,
        })
    }

    fn render(&self, nodes: &[Node<'_>], ctx: &PlaceholderContext<'_>, pass: &mut Pass) -> StencilResult<()> {
        for node in nodes {
            match node {
                Node::Text(text) => pass.output.text(text),
                Node::Dynamic(raw) => {
                    pass.dynamic = true;
                    pass.output.resolved(raw);
                }
                Node::Placeholder(inv) => {
                    let text = self.resolve_inline(inv, ctx, &mut pass.diagnostics)?;
                    pass.output.resolved(&text);
                }
                Node::Block { open, body, close } => match self.registry.resolve(&open.name) {
                    Some(Resolver::Block(block)) => {
                        let include = block.include(ctx, open)?;
                        trace!(block = %open.name, include, "resolved block");
                        if include {
                            self.render(body, ctx, pass)?;
                        } else {
                            pass.output.collapse();
                        }
                    }
                    // registry changed under the parse; keep the text as written
                    _ => {
                        pass.output.resolved(&open.raw);
                        self.render(body, ctx, pass)?;
                        pass.output.resolved(close);
                    }
                },
            }
        }
        Ok(())
    }

    fn resolve_inline(
        &self,
        inv: &Invocation,
        ctx: &PlaceholderContext<'_>,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> StencilResult<String> {
        let placeholder = match self.registry.resolve(&inv.name) {
            Some(Resolver::Inline(placeholder)) => placeholder,
            _ => {
                diagnostics.push(Diagnostic::warning(
                    &inv.name,
                    format!("Unknown placeholder '{}'", inv.name),
                ));
                return Ok(inv.raw.clone());
            }
        };

        // Invalid options fall back to the placeholder's no-option behavior.
        let fallback;
        let mut effective = inv;
        if let Some(error) = &inv.options_error {
            diagnostics.push(Diagnostic::warning(&inv.name, error.clone()));
            fallback = without_options(inv);
            effective = &fallback;
        } else if let Some(accepted) = placeholder.flags() {
            let unknown = inv.options.unknown_flags(accepted);
            if !unknown.is_empty() {
                diagnostics.push(Diagnostic::warning(
                    &inv.name,
                    format!("unknown option --{}; options ignored", unknown.join(", --")),
                ));
                fallback = without_options(inv);
                effective = &fallback;
            }
        }

        let Resolved { sql, notes } = placeholder.process(ctx, effective)?;
        for (severity, message) in notes {
            diagnostics.push(Diagnostic {
                severity,
                placeholder: inv.name.clone(),
                message,
            });
        }
        trace!(placeholder = %inv.name, "resolved placeholder");
        Ok(sql.unwrap_or_else(|| inv.raw.clone()))
    }
}

fn without_options(inv: &Invocation) -> Invocation {
    Invocation {
        options_text: String::new(),
        options: Default::default(),
        options_error: None,
        ..inv.clone()
    }
}

fn collect_names(nodes: &[Node<'_>], names: &mut HashSet<String>, inline: &mut Vec<Invocation>) {
    for node in nodes {
        match node {
            Node::Placeholder(inv) => {
                names.insert(inv.key());
                inline.push(inv.clone());
            }
            Node::Block { open, body, .. } => {
                names.insert(open.key());
                collect_names(body, names, inline);
            }
            Node::Text(_) | Node::Dynamic(_) => {}
        }
    }
}

fn literal_order_by(nodes: &[Node<'_>]) -> bool {
    nodes.iter().any(|node| match node {
        Node::Text(text) => ORDER_BY.is_match(text),
        Node::Block { body, .. } => literal_order_by(body),
        _ => false,
    })
}
