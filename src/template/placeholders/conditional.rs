//! `{{if <verb>=<param>}} ... {{/if}}`.

use crate::ast::{Parameters, Value};
use crate::error::{StencilError, StencilResult};
use crate::template::context::PlaceholderContext;
use crate::template::parser::Invocation;
use crate::template::registry::BlockPlaceholder;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verb {
    NotNull,
    Null,
    NotEmpty,
    Empty,
}

impl std::str::FromStr for Verb {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "notnull" => Ok(Verb::NotNull),
            "null" => Ok(Verb::Null),
            "notempty" => Ok(Verb::NotEmpty),
            "empty" => Ok(Verb::Empty),
            _ => Err(()),
        }
    }
}

/// Parsed block condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockCondition {
    pub verb: Verb,
    pub param: String,
}

impl BlockCondition {
    /// Parse `verb=param`; whitespace around `=` and a leading `@` on the
    /// parameter are allowed.
    pub fn parse(text: &str, placeholder: &str) -> StencilResult<Self> {
        let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
        let invalid = || StencilError::InvalidCondition {
            condition: text.trim().to_string(),
        };

        let (verb, param) = compact.split_once('=').ok_or_else(invalid)?;
        let param = param.trim_start_matches(['@', ':']);
        if verb.is_empty() || param.is_empty() {
            return Err(invalid());
        }

        let verb = verb
            .parse::<Verb>()
            .map_err(|_| StencilError::UnknownConditionVerb {
                verb: verb.to_string(),
                placeholder: placeholder.to_string(),
            })?;
        Ok(Self {
            verb,
            param: param.to_string(),
        })
    }

    /// Evaluate against runtime parameters. A missing key counts as null;
    /// emptiness is character count for text and item count for lists.
    pub fn holds(&self, parameters: &Parameters) -> bool {
        let value = parameters.get(&self.param);
        let is_null = matches!(value, None | Some(Value::Null));
        let is_empty = is_null || value.and_then(Value::len).is_some_and(|len| len == 0);
        match self.verb {
            Verb::NotNull => !is_null,
            Verb::Null => is_null,
            Verb::NotEmpty => !is_empty,
            Verb::Empty => is_empty,
        }
    }
}

pub struct If;

impl BlockPlaceholder for If {
    fn include(&self, ctx: &PlaceholderContext<'_>, inv: &Invocation) -> StencilResult<bool> {
        let condition = BlockCondition::parse(&inv.options_text, &inv.name)?;
        Ok(condition.holds(ctx.parameters()))
    }
}
