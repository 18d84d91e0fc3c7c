//! Parameter merging.
//!
//! Combines the parameters of two translations. Entries of the primary map
//! are kept as they are; a secondary key that collides is renamed by
//! prepending the collision prefix (repeatedly, until the name is free).
//! The result depends only on the two inputs.
//!
//! Condition composition is one level deep: composing an already composed
//! condition nests it as a single parenthesized operand and does not flatten
//! the conditions it was built from.

use std::sync::LazyLock;

use indexmap::IndexMap;
use regex::{Captures, Regex};
use tracing::debug;

use crate::ast::Parameters;
use crate::transpiler::{Condition, SqlGenerator};

/// Prefix for renamed secondary parameters.
pub const DEFAULT_COLLISION_PREFIX: &str = "__ext_";

static PARAMETER_REF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^@:\w])([@:])([A-Za-z_]\w*)").expect("parameter reference pattern")
});

/// Merged parameters plus the renames applied to the secondary map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Merged {
    pub parameters: Parameters,
    /// Original secondary name -> name in `parameters`.
    pub renamed: IndexMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterMerger {
    prefix: String,
}

impl Default for ParameterMerger {
    fn default() -> Self {
        Self::new(DEFAULT_COLLISION_PREFIX)
    }
}

impl ParameterMerger {
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// Merge `secondary` into `primary`.
    pub fn merge(&self, primary: &Parameters, secondary: &Parameters) -> Parameters {
        self.merge_tracked(primary, secondary).parameters
    }

    /// Like [`merge`](Self::merge), also reporting which secondary keys were renamed.
    pub fn merge_tracked(&self, primary: &Parameters, secondary: &Parameters) -> Merged {
        let mut merged = Merged {
            parameters: primary.clone(),
            renamed: IndexMap::new(),
        };

        for (name, value) in secondary.iter() {
            if !merged.parameters.contains(name) {
                merged.parameters.insert(name, value.clone());
                continue;
            }
            let mut candidate = format!("{}{}", self.prefix, name);
            while merged.parameters.contains(&candidate) || secondary.contains(&candidate) {
                candidate = format!("{}{}", self.prefix, candidate);
            }
            merged.parameters.insert(candidate.clone(), value.clone());
            merged.renamed.insert(name.to_string(), candidate);
        }

        if !merged.renamed.is_empty() {
            debug!(renamed = merged.renamed.len(), "renamed colliding parameters");
        }
        merged
    }

    /// Compose two conditions with AND. Parameters of `secondary` that
    /// collide with `primary` are renamed, and its SQL is rewritten to match.
    pub fn compose(
        &self,
        primary: &Condition,
        secondary: &Condition,
        generator: &dyn SqlGenerator,
    ) -> Condition {
        let merged = self.merge_tracked(&primary.parameters, &secondary.parameters);
        let secondary_sql = rewrite_references(&secondary.sql, &merged.renamed, generator);
        Condition::new(
            merge_conditions(&[primary.sql.as_str()], &[secondary_sql.as_str()]),
            merged.parameters,
        )
    }
}

/// Join non-empty conditions with AND. With more than one condition each
/// is parenthesized.
pub fn merge_conditions<S: AsRef<str>>(primary: &[S], secondary: &[S]) -> String {
    let parts: Vec<&str> = primary
        .iter()
        .chain(secondary)
        .map(|c| c.as_ref().trim())
        .filter(|c| !c.is_empty())
        .collect();

    match parts.as_slice() {
        [] => String::new(),
        [single] => single.to_string(),
        _ => parts
            .iter()
            .map(|c| format!("({})", c))
            .collect::<Vec<_>>()
            .join(" AND "),
    }
}

/// Rewrite references to renamed parameters (`@old` -> `@new`) in `sql`.
/// Only references with the dialect's own prefix are touched.
pub fn rewrite_references(
    sql: &str,
    renamed: &IndexMap<String, String>,
    generator: &dyn SqlGenerator,
) -> String {
    if renamed.is_empty() {
        return sql.to_string();
    }
    let prefix = generator.parameter_prefix();
    PARAMETER_REF
        .replace_all(sql, |caps: &Captures<'_>| {
            let name = &caps[3];
            match renamed.get(name) {
                Some(new_name) if &caps[2] == prefix => {
                    format!("{}{}", &caps[1], generator.parameter(new_name))
                }
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Value;
    use crate::transpiler::Dialect;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_merge_without_collisions() {
        let primary = Parameters::new().with("id", 1);
        let secondary = Parameters::new().with("p0", "x");
        let merged = ParameterMerger::default().merge(&primary, &secondary);
        let names: Vec<&str> = merged.names().collect();
        assert_eq!(names, vec!["id", "p0"]);
    }

    #[test]
    fn test_colliding_secondary_key_is_prefixed() {
        let primary = Parameters::new().with("p0", 1);
        let secondary = Parameters::new().with("p0", 2);
        let merged = ParameterMerger::default().merge_tracked(&primary, &secondary);
        assert_eq!(merged.parameters.get("p0"), Some(&Value::Int(1)));
        assert_eq!(merged.parameters.get("__ext_p0"), Some(&Value::Int(2)));
        assert_eq!(merged.renamed.get("p0").map(String::as_str), Some("__ext_p0"));
    }

    #[test]
    fn test_rename_skips_taken_names() {
        let primary = Parameters::new().with("id", 1).with("__ext_id", 2);
        let secondary = Parameters::new().with("id", 3);
        let merged = ParameterMerger::default().merge(&primary, &secondary);
        assert_eq!(merged.get("__ext___ext_id"), Some(&Value::Int(3)));
    }

    #[test]
    fn test_merge_is_deterministic() {
        let primary = Parameters::new().with("a", 1).with("b", 2);
        let secondary = Parameters::new().with("b", 3).with("c", 4).with("a", 5);
        let merger = ParameterMerger::new("x_");
        let first = merger.merge(&primary, &secondary);
        let second = merger.merge(&primary, &secondary);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
        let names: Vec<&str> = first.names().collect();
        assert_eq!(names, vec!["a", "b", "x_b", "c", "x_a"]);
    }

    #[test]
    fn test_merge_conditions() {
        assert_eq!(merge_conditions::<&str>(&[], &[]), "");
        assert_eq!(merge_conditions(&["a = 1"], &[""]), "a = 1");
        assert_eq!(
            merge_conditions(&["a = 1", "b = 2"], &["c = 3 OR d = 4"]),
            "(a = 1) AND (b = 2) AND (c = 3 OR d = 4)"
        );
    }

    #[test]
    fn test_rewrite_references() {
        let mut renamed = IndexMap::new();
        renamed.insert("p0".to_string(), "__ext_p0".to_string());
        let generator = Dialect::SQLite.generator();
        assert_eq!(
            rewrite_references("a = @p0 AND b = @p01 AND c = @@p0", &renamed, generator),
            "a = @__ext_p0 AND b = @p01 AND c = @@p0"
        );
    }

    #[test]
    fn test_compose_renames_secondary_references() {
        let primary = Condition::new("tenant = @p0", Parameters::new().with("p0", 9));
        let secondary = Condition::new(
            "(age >= @p0) AND (name = @p1)",
            Parameters::new().with("p0", 18).with("p1", "al"),
        );
        let composed =
            ParameterMerger::default().compose(&primary, &secondary, Dialect::SQLite.generator());
        assert_eq!(
            composed.sql,
            "(tenant = @p0) AND ((age >= @__ext_p0) AND (name = @p1))"
        );
        assert_eq!(composed.parameters.get("__ext_p0"), Some(&Value::Int(18)));
        assert_eq!(composed.parameters.len(), 3);
    }

    #[test]
    fn test_compose_is_one_level() {
        let merger = ParameterMerger::default();
        let generator = Dialect::SQLite.generator();
        let a = Condition::new("a = 1", Parameters::new());
        let b = Condition::new("b = 2", Parameters::new());
        let c = Condition::new("c = 3", Parameters::new());
        let ab = merger.compose(&a, &b, generator);
        assert_eq!(
            merger.compose(&ab, &c, generator).sql,
            "((a = 1) AND (b = 2)) AND (c = 3)"
        );
    }
}
