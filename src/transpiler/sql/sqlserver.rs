use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::{Pagination, SqlGenerator};

pub struct SqlServerGenerator;

impl SqlGenerator for SqlServerGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::SqlServer
    }

    fn quote_pair(&self) -> (char, char) {
        ('[', ']')
    }

    fn pagination(&self) -> Pagination {
        // T-SQL only accepts OFFSET/FETCH after an ORDER BY
        Pagination::OffsetFetch {
            requires_order_by: true,
        }
    }

    fn limit_offset(&self, limit: Option<&str>, offset: Option<&str>) -> String {
        // FETCH cannot appear without OFFSET
        match (limit, offset) {
            (None, None) => String::new(),
            (Some(l), None) => format!("OFFSET 0 ROWS FETCH NEXT {} ROWS ONLY", l),
            (None, Some(o)) => format!("OFFSET {} ROWS", o),
            (Some(l), Some(o)) => format!("OFFSET {} ROWS FETCH NEXT {} ROWS ONLY", o, l),
        }
    }

    fn current_timestamp(&self) -> &'static str {
        "GETDATE()"
    }

    fn string_concat(&self, parts: &[&str]) -> String {
        parts.join(" + ")
    }

    fn like_wildcards(&self) -> &'static [char] {
        &['%', '_', '[']
    }

    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTRING({}, {}, {})", expr, start, len),
            None => format!("SUBSTRING({}, {}, LEN({}))", expr, start, expr),
        }
    }

    fn length(&self, expr: &str) -> String {
        format!("LEN({})", expr)
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        format!("DATEADD({}, {}, {})", unit.keyword(), amount, expr)
    }
}
