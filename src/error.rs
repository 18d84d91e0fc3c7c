//! Error types for sqlstencil.
//!
//! Everything in here aborts a translation. Conditions that still allow a
//! usable result are reported as [`Diagnostic`](crate::template::Diagnostic)s.

use thiserror::Error;

/// Fatal translation errors.
#[derive(Debug, Error)]
pub enum StencilError {
    /// A block placeholder (`{{if ...}}`) without its closing tag, or a
    /// closing tag without an opener.
    #[error("Unmatched block placeholder '{name}' at position {position}")]
    UnmatchedBlock { name: String, position: usize },

    /// `{{` without a matching `}}`.
    #[error("Unterminated placeholder starting at position {position}")]
    UnterminatedPlaceholder { position: usize },

    /// A predicate member that does not map to a column of the active entity.
    #[error("{}", unknown_member_message(.member, .table, .suggestion))]
    UnknownMember {
        member: String,
        table: String,
        suggestion: Option<String>,
    },

    /// A method-call node whose tag has no SQL mapping.
    #[error("Unsupported method '{method}' for dialect {dialect}")]
    UnsupportedMethod { method: String, dialect: String },

    /// `{{if verb=param}}` with a verb outside notnull/null/notempty/empty.
    #[error("Unknown condition verb '{verb}' in {{{{{placeholder}}}}}")]
    UnknownConditionVerb { verb: String, placeholder: String },

    /// `{{if ...}}` whose condition is not of the form `verb=param`.
    #[error("Invalid block condition '{condition}', expected <verb>=<param>")]
    InvalidCondition { condition: String },

    /// A structurally invalid predicate tree.
    #[error("Invalid {node} node for dialect {dialect}: {message}")]
    InvalidPredicate {
        node: &'static str,
        dialect: String,
        message: String,
    },

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn unknown_member_message(member: &str, table: &str, suggestion: &Option<String>) -> String {
    match suggestion {
        Some(s) => format!(
            "Member '{}' is not a column of '{}'. Did you mean '{}'?",
            member, table, s
        ),
        None => format!("Member '{}' is not a column of '{}'", member, table),
    }
}

impl StencilError {
    /// Create an invalid predicate error.
    pub fn predicate(
        node: &'static str,
        dialect: impl std::fmt::Display,
        message: impl Into<String>,
    ) -> Self {
        Self::InvalidPredicate {
            node,
            dialect: dialect.to_string(),
            message: message.into(),
        }
    }

    /// Create an unmatched block error.
    pub fn unmatched(name: impl Into<String>, position: usize) -> Self {
        Self::UnmatchedBlock {
            name: name.into(),
            position,
        }
    }
}

/// Result type alias for sqlstencil operations.
pub type StencilResult<T> = Result<T, StencilError>;
