use std::collections::HashSet;

use crate::ast::Parameters;
use crate::schema::EntitySchema;
use crate::template::parser::Invocation;
use crate::transpiler::{Condition, Dialect, SqlGenerator};

/// Caller-supplied inputs of one template translation.
#[derive(Debug, Clone)]
pub struct Scope<'a> {
    pub schema: &'a EntitySchema,
    /// Target table; the schema's table unless overridden.
    pub table: &'a str,
    pub dialect: Dialect,
    /// Runtime parameters consulted by `{{if}}`, `{{where --param}}` and
    /// pagination placeholders.
    pub parameters: &'a Parameters,
    /// Translated predicate feeding `{{where}}`.
    pub condition: Option<&'a Condition>,
}

static NO_PARAMETERS: std::sync::LazyLock<Parameters> = std::sync::LazyLock::new(Parameters::new);

impl<'a> Scope<'a> {
    pub fn new(schema: &'a EntitySchema, dialect: Dialect) -> Self {
        Self {
            schema,
            table: &schema.table,
            dialect,
            parameters: &NO_PARAMETERS,
            condition: None,
        }
    }

    pub fn table(mut self, table: &'a str) -> Self {
        self.table = table;
        self
    }

    pub fn parameters(mut self, parameters: &'a Parameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn condition(mut self, condition: &'a Condition) -> Self {
        self.condition = Some(condition);
        self
    }
}

/// What a resolver sees: the scope plus facts about the whole template.
#[derive(Debug, Clone)]
pub struct PlaceholderContext<'a> {
    pub scope: &'a Scope<'a>,
    /// The template already orders its rows (literal `ORDER BY` or `{{orderby}}`).
    pub has_order_by: bool,
    /// Lowercase names of every placeholder in the template.
    pub present: &'a HashSet<String>,
    /// Inline placeholders in template order, block bodies included.
    pub invocations: &'a [Invocation],
}

impl<'a> PlaceholderContext<'a> {
    pub fn generator(&self) -> &'static dyn SqlGenerator {
        self.scope.dialect.generator()
    }

    pub fn dialect(&self) -> Dialect {
        self.scope.dialect
    }

    pub fn schema(&self) -> &'a EntitySchema {
        self.scope.schema
    }

    pub fn table(&self) -> &'a str {
        self.scope.table
    }

    pub fn parameters(&self) -> &'a Parameters {
        self.scope.parameters
    }

    pub fn condition(&self) -> Option<&'a Condition> {
        self.scope.condition
    }

    /// Whether `name` occurs anywhere in the template.
    pub fn is_present(&self, name: &str) -> bool {
        self.present.contains(name)
    }

    /// First inline placeholder whose key is one of `names`.
    pub fn first_of(&self, names: &[&str]) -> Option<&'a Invocation> {
        self.invocations
            .iter()
            .find(|inv| names.contains(&inv.key().as_str()))
    }
}
