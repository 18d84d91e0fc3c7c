//! Placeholder templates.
//!
//! A template is SQL text with `{{name options}}` placeholders:
//!
//! ```text
//! SELECT {{columns --exclude Password}} FROM {{table}}
//! {{where}} {{if notempty=search}}AND name LIKE @search{{/if}}
//! {{orderby CreatedAt --desc}} {{page --limit 20 --offset @skip}}
//! ```
//!
//! Placeholders are resolved through a [`PlaceholderRegistry`]; unknown
//! names stay in the output and produce a [`Diagnostic`]. `{{@name}}` marks
//! a runtime placeholder that is left for a later stage.

pub mod context;
pub mod diagnostic;
pub mod options;
pub mod parser;
pub mod placeholders;
pub mod processor;
pub mod registry;

#[cfg(test)]
mod tests;

pub use context::{PlaceholderContext, Scope};
pub use diagnostic::{Diagnostic, Severity};
pub use options::PlaceholderOptions;
pub use parser::Invocation;
pub use processor::{TemplateProcessor, Translation};
pub use registry::{
    BlockPlaceholder, DEFAULT_REGISTRY, Placeholder, PlaceholderRegistry, Resolved, Resolver,
};

use crate::error::StencilResult;

/// Process `template` with the built-in placeholders.
pub fn process(template: &str, scope: &Scope<'_>) -> StencilResult<Translation> {
    TemplateProcessor::new(&DEFAULT_REGISTRY).process(template, scope)
}
