use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// SQLite Generator.
pub struct SqliteGenerator;

impl SqlGenerator for SqliteGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SQLite
    }

    fn quote_pair(&self) -> (char, char) {
        ('[', ']')
    }

    fn limit_offset(&self, limit: Option<&str>, offset: Option<&str>) -> String {
        // OFFSET is only valid after a LIMIT; -1 means unbounded.
        match (limit, offset) {
            (None, Some(o)) => format!("LIMIT -1 OFFSET {}", o),
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, None) => String::new(),
        }
    }

    fn returning_id(&self, key: &str) -> String {
        // RETURNING needs SQLite 3.35+
        format!("RETURNING {}", key)
    }

    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTR({}, {}, {})", expr, start, len),
            None => format!("SUBSTR({}, {})", expr, start),
        }
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        let modifier = match unit {
            DateUnit::Minute => "minutes",
            DateUnit::Hour => "hours",
            DateUnit::Day => "days",
            DateUnit::Month => "months",
            DateUnit::Year => "years",
        };
        format!("DATETIME({}, {} || ' {}')", expr, amount, modifier)
    }

    fn floor(&self, expr: &str) -> String {
        format!(
            "(CAST({e} AS INTEGER) - ({e} < CAST({e} AS INTEGER)))",
            e = expr
        )
    }

    fn ceiling(&self, expr: &str) -> String {
        // CEILING is only present when SQLite is built with math functions.
        format!(
            "(CAST({e} AS INTEGER) + ({e} > CAST({e} AS INTEGER)))",
            e = expr
        )
    }
}
