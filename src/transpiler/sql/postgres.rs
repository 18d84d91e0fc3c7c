use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// PostgreSQL Generator.
pub struct PostgresGenerator;

impl SqlGenerator for PostgresGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::PostgreSql
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    fn bool_literal(&self, val: bool) -> &'static str {
        if val { "true" } else { "false" }
    }

    fn returning_id(&self, key: &str) -> String {
        format!("RETURNING {}", key)
    }

    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTRING({} FROM {} FOR {})", expr, start, len),
            None => format!("SUBSTRING({} FROM {})", expr, start),
        }
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        format!(
            "({} + {} * INTERVAL '1 {}')",
            expr,
            amount,
            unit.keyword().to_lowercase()
        )
    }
}
