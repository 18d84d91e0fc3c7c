use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::{Pagination, SqlGenerator};

pub struct OracleGenerator;

impl SqlGenerator for OracleGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::Oracle
    }

    fn quote_pair(&self) -> (char, char) {
        // Oracle standardly uses double quotes for case-sensitive identifiers
        ('"', '"')
    }

    fn parameter_prefix(&self) -> &'static str {
        ":"
    }

    fn pagination(&self) -> Pagination {
        // Oracle 12c+ row limiting clause
        Pagination::OffsetFetch {
            requires_order_by: false,
        }
    }

    fn limit_offset(&self, limit: Option<&str>, offset: Option<&str>) -> String {
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(l), None) => format!("FETCH FIRST {} ROWS ONLY", l),
            (None, Some(o)) => format!("OFFSET {} ROWS", o),
            (Some(l), Some(o)) => format!("OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", o, l),
        }
    }

    fn returning_id(&self, key: &str) -> String {
        format!("RETURNING {} INTO {}", key, self.parameter(key))
    }

    fn current_timestamp(&self) -> &'static str {
        "SYSTIMESTAMP"
    }

    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTR({}, {}, {})", expr, start, len),
            None => format!("SUBSTR({}, {})", expr, start),
        }
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        // DATE arithmetic is in days
        match unit {
            DateUnit::Minute => format!("({} + {} / 1440)", expr, amount),
            DateUnit::Hour => format!("({} + {} / 24)", expr, amount),
            DateUnit::Day => format!("({} + {})", expr, amount),
            DateUnit::Month => format!("ADD_MONTHS({}, {})", expr, amount),
            DateUnit::Year => format!("ADD_MONTHS({}, {} * 12)", expr, amount),
        }
    }

    fn ceiling(&self, expr: &str) -> String {
        format!("CEIL({})", expr)
    }
}
