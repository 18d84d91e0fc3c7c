//! Translation engine.
//!
//! Ties the template processor, the predicate translator and the parameter
//! merger together behind one configured entry point.
//!
//! ```
//! use sqlstencil::prelude::*;
//!
//! let schema = EntitySchema::new("User", "users", vec![
//!     ColumnDef::new("Id", TypeKind::Integer).key(),
//!     ColumnDef::new("Age", TypeKind::Integer),
//! ]).unwrap();
//!
//! let predicate = member("Age").gte(18);
//! let request = RenderRequest::new("SELECT * FROM {{table}} {{where}}", &schema)
//!     .dialect(Dialect::PostgreSql)
//!     .predicate(&predicate);
//!
//! let result = Engine::default().render(&request).unwrap();
//! assert_eq!(result.sql, "SELECT * FROM \"users\" WHERE age >= @p0");
//! ```

use tracing::debug;

use crate::ast::{Expr, Parameters};
use crate::config::EngineConfig;
use crate::error::{StencilError, StencilResult};
use crate::merge::{ParameterMerger, rewrite_references};
use crate::schema::{EntitySchema, SchemaProvider};
use crate::template::{Diagnostic, PlaceholderRegistry, Scope, TemplateProcessor, Translation};
use crate::transpiler::{Condition, Dialect, translate_with_stem};

/// One combined template + predicate translation.
#[derive(Debug, Clone)]
pub struct RenderRequest<'a> {
    pub template: &'a str,
    pub schema: &'a EntitySchema,
    /// Falls back to the configured dialect.
    pub dialect: Option<Dialect>,
    pub table: Option<&'a str>,
    pub predicate: Option<&'a Expr>,
    pub parameters: Option<&'a Parameters>,
}

impl<'a> RenderRequest<'a> {
    pub fn new(template: &'a str, schema: &'a EntitySchema) -> Self {
        Self {
            template,
            schema,
            dialect: None,
            table: None,
            predicate: None,
            parameters: None,
        }
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    pub fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    pub fn predicate(mut self, predicate: &'a Expr) -> Self {
        self.predicate = Some(predicate);
        self
    }

    pub fn parameters(mut self, parameters: &'a Parameters) -> Self {
        self.parameters = Some(parameters);
        self
    }
}

pub struct Engine {
    config: EngineConfig,
    registry: PlaceholderRegistry,
    merger: ParameterMerger,
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let merger = ParameterMerger::new(&config.collision_prefix);
        Self {
            config,
            registry: PlaceholderRegistry::with_builtins(),
            merger,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn registry(&self) -> &PlaceholderRegistry {
        &self.registry
    }

    /// Registry for custom placeholders. Register before sharing the engine.
    pub fn registry_mut(&mut self) -> &mut PlaceholderRegistry {
        &mut self.registry
    }

    pub fn merger(&self) -> &ParameterMerger {
        &self.merger
    }

    /// Resolve the placeholders of `template`.
    pub fn process(
        &self,
        template: &str,
        schema: &EntitySchema,
        dialect: Dialect,
    ) -> StencilResult<Translation> {
        self.process_with(template, &Scope::new(schema, dialect))
    }

    pub fn process_with(&self, template: &str, scope: &Scope<'_>) -> StencilResult<Translation> {
        TemplateProcessor::new(&self.registry).process(template, scope)
    }

    /// Look up `entity` through `provider` and process `template` against it.
    pub fn process_entity(
        &self,
        template: &str,
        provider: &dyn SchemaProvider,
        entity: &str,
        dialect: Dialect,
    ) -> StencilResult<Translation> {
        let schema = provider
            .schema(entity)
            .ok_or_else(|| StencilError::Schema(format!("unknown entity '{}'", entity)))?;
        self.process(template, &schema, dialect)
    }

    /// Translate a predicate tree into a parameterized condition.
    pub fn translate(
        &self,
        predicate: &Expr,
        schema: &EntitySchema,
        dialect: Dialect,
    ) -> StencilResult<Condition> {
        translate_with_stem(predicate, schema, dialect, &self.config.predicate_param_prefix)
    }

    /// Translate the predicate, feed it to `{{where}}` and process the template.
    ///
    /// Runtime parameters win name collisions; colliding predicate parameters
    /// are renamed and the condition text is rewritten to match.
    pub fn render(&self, request: &RenderRequest<'_>) -> StencilResult<Translation> {
        let dialect = request
            .dialect
            .or(self.config.dialect)
            .ok_or_else(|| StencilError::Config("no dialect given and none configured".into()))?;
        let runtime = request.parameters.cloned().unwrap_or_default();

        let condition = match request.predicate {
            Some(predicate) => Some(self.translate(predicate, request.schema, dialect)?),
            None => None,
        };
        let predicate_params = condition
            .as_ref()
            .map(|c| c.parameters.clone())
            .unwrap_or_default();
        let merged = self.merger.merge_tracked(&runtime, &predicate_params);
        let condition = condition.map(|c| {
            let sql = rewrite_references(&c.sql, &merged.renamed, dialect.generator());
            Condition::new(sql, c.parameters)
        });

        let mut scope = Scope::new(request.schema, dialect).parameters(&runtime);
        if let Some(table) = request.table {
            scope = scope.table(table);
        }
        if let Some(condition) = &condition {
            scope = scope.condition(condition);
        }

        let mut translation = self.process_with(request.template, &scope)?;
        if let Some(condition) = condition.as_ref().filter(|c| !c.is_empty()) {
            if !translation.sql.contains(&condition.sql) {
                translation.diagnostics.push(Diagnostic::warning(
                    "where",
                    "predicate given but the template does not use {{where}}",
                ));
            }
        }
        translation.parameters = merged.parameters;

        debug!(
            dialect = %dialect,
            table = %scope.table,
            parameters = translation.parameters.len(),
            renamed = merged.renamed.len(),
            "rendered request"
        );
        Ok(translation)
    }
}
