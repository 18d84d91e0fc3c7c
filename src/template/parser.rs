//! Template tokenizer.
//!
//! Splits a template into literal text and `{{...}}` placeholders, pairing
//! block openers with their `{{/name}}` closers. Nested blocks of the same
//! name close innermost first.

use nom::{
    IResult, Parser,
    bytes::complete::{tag, take_until},
    sequence::delimited,
};

use crate::error::{StencilError, StencilResult};
use crate::template::options::{PlaceholderOptions, parse_options, split_name};

/// One parsed `{{name options}}` occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Invocation {
    /// Name as written.
    pub name: String,
    /// Raw text after the name.
    pub options_text: String,
    pub options: PlaceholderOptions,
    /// Why `options_text` did not parse, if it did not.
    pub options_error: Option<String>,
    /// The full `{{...}}` text.
    pub raw: String,
    /// Byte offset of `{{` in the template.
    pub position: usize,
}

impl Invocation {
    pub fn new(inner: &str, raw: &str, position: usize) -> Self {
        let (name, options_text) = split_name(inner);
        let (options, options_error) = match parse_options(options_text) {
            Ok(options) => (options, None),
            Err(err) => (PlaceholderOptions::default(), Some(err)),
        };
        Self {
            name: name.to_string(),
            options_text: options_text.to_string(),
            options,
            options_error,
            raw: raw.to_string(),
            position,
        }
    }

    /// Registry key.
    pub fn key(&self) -> String {
        self.name.to_lowercase()
    }
}

/// Parsed template element.
#[derive(Debug, Clone, PartialEq)]
pub enum Node<'t> {
    Text(&'t str),
    Placeholder(Invocation),
    /// `{{@name}}`: resolved by a later stage.
    Dynamic(&'t str),
    Block {
        open: Invocation,
        body: Vec<Node<'t>>,
        /// Text of the closing tag.
        close: &'t str,
    },
}

impl Node<'_> {
    pub fn is_text(&self) -> bool {
        matches!(self, Node::Text(_))
    }
}

fn placeholder(input: &str) -> IResult<&str, &str> {
    delimited(tag("{{"), take_until("}}"), tag("}}")).parse(input)
}

fn text(input: &str) -> IResult<&str, &str> {
    take_until("{{").parse(input)
}

struct Frame<'t> {
    open: Option<Invocation>,
    nodes: Vec<Node<'t>>,
}

/// Parse `template`; `is_block` tells which names open a block.
pub fn parse_template<'t>(
    template: &'t str,
    is_block: impl Fn(&str) -> bool,
) -> StencilResult<Vec<Node<'t>>> {
    let mut stack = vec![Frame {
        open: None,
        nodes: Vec::new(),
    }];
    let mut rest = template;

    while !rest.is_empty() {
        let Ok((after, literal)) = text(rest) else {
            // no further placeholders
            push(&mut stack, Node::Text(rest));
            break;
        };
        if !literal.is_empty() {
            push(&mut stack, Node::Text(literal));
        }

        let position = template.len() - after.len();
        let Ok((remaining, inner)) = placeholder(after) else {
            return Err(StencilError::UnterminatedPlaceholder { position });
        };
        let raw = &after[..after.len() - remaining.len()];
        rest = remaining;

        let trimmed = inner.trim();
        if let Some(closing) = trimmed.strip_prefix('/') {
            let closing = closing.trim();
            let matches_top = stack
                .last()
                .and_then(|frame| frame.open.as_ref())
                .map(|open| open.name.eq_ignore_ascii_case(closing))
                .unwrap_or(false);
            if !matches_top {
                return Err(StencilError::unmatched(format!("/{}", closing), position));
            }
            if let Some(frame) = stack.pop() {
                if let Some(open) = frame.open {
                    push(
                        &mut stack,
                        Node::Block {
                            open,
                            body: frame.nodes,
                            close: raw,
                        },
                    );
                }
            }
        } else if trimmed.starts_with('@') {
            push(&mut stack, Node::Dynamic(raw));
        } else {
            let invocation = Invocation::new(inner, raw, position);
            if is_block(&invocation.key()) {
                stack.push(Frame {
                    open: Some(invocation),
                    nodes: Vec::new(),
                });
            } else {
                push(&mut stack, Node::Placeholder(invocation));
            }
        }
    }

    if stack.len() > 1 {
        if let Some(open) = stack.pop().and_then(|frame| frame.open) {
            return Err(StencilError::unmatched(open.name, open.position));
        }
    }
    Ok(stack.pop().map(|frame| frame.nodes).unwrap_or_default())
}

fn push<'t>(stack: &mut [Frame<'t>], node: Node<'t>) {
    if let Some(frame) = stack.last_mut() {
        frame.nodes.push(node);
    }
}
