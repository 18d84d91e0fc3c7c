//! Engine configuration.
//!
//! ```toml
//! collision_prefix = "__ext_"
//! predicate_param_prefix = "p"
//! dialect = "postgresql"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{StencilError, StencilResult};
use crate::merge::DEFAULT_COLLISION_PREFIX;
use crate::transpiler::Dialect;
use crate::transpiler::conditions::DEFAULT_PARAM_STEM;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Prefix for renamed predicate parameters that collide with runtime ones.
    pub collision_prefix: String,
    /// Stem of generated predicate parameter names (`p0`, `p1`, ...).
    pub predicate_param_prefix: String,
    /// Dialect used by `Engine::render` when a request names none.
    pub dialect: Option<Dialect>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            collision_prefix: DEFAULT_COLLISION_PREFIX.to_string(),
            predicate_param_prefix: DEFAULT_PARAM_STEM.to_string(),
            dialect: None,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> StencilResult<Self> {
        let config: EngineConfig =
            toml::from_str(content).map_err(|e| StencilError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> StencilResult<Self> {
        if !path.exists() {
            return Err(StencilError::Config(format!(
                "{} not found",
                path.display()
            )));
        }
        let content = fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn with_dialect(mut self, dialect: Dialect) -> Self {
        self.dialect = Some(dialect);
        self
    }

    fn validate(&self) -> StencilResult<()> {
        if self.collision_prefix.is_empty() {
            return Err(StencilError::Config(
                "collision_prefix must not be empty".to_string(),
            ));
        }
        let stem = &self.predicate_param_prefix;
        let valid_stem = stem
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_')
            && stem.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
        if !valid_stem {
            return Err(StencilError::Config(format!(
                "predicate_param_prefix '{}' is not a valid parameter name",
                stem
            )));
        }
        Ok(())
    }
}
