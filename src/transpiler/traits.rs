//! Dialect descriptor trait and identifier helpers.

use crate::ast::DateUnit;
use crate::transpiler::Dialect;

/// SQL reserved words that must be quoted when used as identifiers.
pub const RESERVED_WORDS: &[&str] = &[
    "order",
    "group",
    "user",
    "table",
    "select",
    "from",
    "where",
    "join",
    "left",
    "right",
    "inner",
    "outer",
    "on",
    "and",
    "or",
    "not",
    "null",
    "true",
    "false",
    "limit",
    "offset",
    "as",
    "in",
    "is",
    "like",
    "between",
    "having",
    "union",
    "all",
    "distinct",
    "case",
    "when",
    "then",
    "else",
    "end",
    "create",
    "alter",
    "drop",
    "insert",
    "update",
    "delete",
    "index",
    "key",
    "primary",
    "foreign",
    "references",
    "default",
    "constraint",
    "check",
    "values",
    "set",
    "desc",
    "asc",
    "by",
    "top",
    "level",
    "size",
    "date",
    "timestamp",
];

/// Whether a bare identifier part needs quoting to be safe in any dialect.
pub fn needs_quoting(name: &str) -> bool {
    let lower = name.to_lowercase();
    RESERVED_WORDS.contains(&lower.as_str())
        || name.chars().any(|c| !c.is_alphanumeric() && c != '_')
        || name.chars().next().map(|c| c.is_numeric()).unwrap_or(true)
}

/// How a dialect expresses row pagination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    /// `LIMIT n OFFSET m`
    LimitOffset,
    /// `OFFSET m ROWS FETCH NEXT n ROWS ONLY`
    OffsetFetch { requires_order_by: bool },
}

impl Pagination {
    pub fn requires_order_by(&self) -> bool {
        matches!(
            self,
            Pagination::OffsetFetch {
                requires_order_by: true
            }
        )
    }
}

/// Dialect descriptor: the lexical and syntactic conventions of one SQL engine.
///
/// Implementations are stateless unit structs shared by every translation.
pub trait SqlGenerator: Send + Sync {
    fn dialect(&self) -> Dialect;

    /// Opening and closing identifier quote.
    fn quote_pair(&self) -> (char, char);

    /// Quote an identifier (table or column name). Dotted names are quoted
    /// per part, and the closing quote character is doubled inside names.
    fn quote_identifier(&self, name: &str) -> String {
        let (open, close) = self.quote_pair();
        name.split('.')
            .map(|part| {
                let escaped = part.replace(close, &format!("{}{}", close, close));
                format!("{}{}{}", open, escaped, close)
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Quote an identifier only where it is reserved or contains special
    /// characters; plain names pass through unchanged.
    fn escape_identifier(&self, name: &str) -> String {
        name.split('.')
            .map(|part| {
                if needs_quoting(part) {
                    self.quote_identifier(part)
                } else {
                    part.to_string()
                }
            })
            .collect::<Vec<_>>()
            .join(".")
    }

    /// Prefix of named parameter references.
    fn parameter_prefix(&self) -> &'static str {
        "@"
    }

    /// Reference to the named parameter (e.g. `@name`, `:name`).
    fn parameter(&self, name: &str) -> String {
        format!("{}{}", self.parameter_prefix(), name)
    }

    /// Boolean literal.
    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "1" } else { "0" }
    }

    fn pagination(&self) -> Pagination {
        Pagination::LimitOffset
    }

    /// Row-count clause on its own. Arguments are already rendered
    /// (an integer or a parameter reference).
    fn limit_clause(&self, limit: &str) -> String {
        match self.pagination() {
            Pagination::LimitOffset => format!("LIMIT {}", limit),
            Pagination::OffsetFetch { .. } => format!("FETCH NEXT {} ROWS ONLY", limit),
        }
    }

    /// Skip clause on its own.
    fn offset_clause(&self, offset: &str) -> String {
        match self.pagination() {
            Pagination::LimitOffset => format!("OFFSET {}", offset),
            Pagination::OffsetFetch { .. } => format!("OFFSET {} ROWS", offset),
        }
    }

    /// Complete pagination clause for the given bounds; empty when both are absent.
    fn limit_offset(&self, limit: Option<&str>, offset: Option<&str>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(l), None) => self.limit_clause(l),
            (None, Some(o)) => self.offset_clause(o),
            (Some(l), Some(o)) => match self.pagination() {
                Pagination::LimitOffset => {
                    format!("{} {}", self.limit_clause(l), self.offset_clause(o))
                }
                Pagination::OffsetFetch { .. } => {
                    format!("{} {}", self.offset_clause(o), self.limit_clause(l))
                }
            },
        }
    }

    /// Clause appended to an INSERT to return the generated key; empty when
    /// the dialect has no trailing form.
    fn returning_id(&self, _key: &str) -> String {
        String::new()
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Generate string concatenation expression (e.g. 'a' || 'b' vs CONCAT('a', 'b')).
    fn string_concat(&self, parts: &[&str]) -> String {
        parts.join(" || ")
    }

    /// Escape character used for LIKE patterns.
    fn like_escape_char(&self) -> char {
        '\\'
    }

    /// The `ESCAPE` clause matching [`like_escape_char`](Self::like_escape_char).
    fn like_escape_clause(&self) -> String {
        format!("ESCAPE '{}'", self.like_escape_char())
    }

    /// Characters with wildcard meaning inside LIKE patterns.
    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_']
    }

    /// Escape a value so it matches literally inside a LIKE pattern.
    fn escape_like(&self, value: &str) -> String {
        let escape = self.like_escape_char();
        let mut out = String::with_capacity(value.len());
        for c in value.chars() {
            if c == escape || self.like_wildcards().contains(&c) {
                out.push(escape);
            }
            out.push(c);
        }
        out
    }

    /// Substring with a one-based `start` expression.
    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTRING({}, {}, {})", expr, start, len),
            None => format!("SUBSTRING({}, {})", expr, start),
        }
    }

    fn length(&self, expr: &str) -> String {
        format!("LENGTH({})", expr)
    }

    /// `expr` shifted by `amount` units.
    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String;

    fn trim_start(&self, expr: &str) -> String {
        format!("LTRIM({})", expr)
    }

    fn trim_end(&self, expr: &str) -> String {
        format!("RTRIM({})", expr)
    }

    fn floor(&self, expr: &str) -> String {
        format!("FLOOR({})", expr)
    }

    fn ceiling(&self, expr: &str) -> String {
        format!("CEILING({})", expr)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_quoting() {
        assert!(!needs_quoting("status"));
        assert!(needs_quoting("order"));
        assert!(needs_quoting("first name"));
        assert!(needs_quoting("1st"));
        assert!(needs_quoting(""));
    }
}
