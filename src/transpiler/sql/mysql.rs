use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// MySQL Generator.
pub struct MysqlGenerator;

impl SqlGenerator for MysqlGenerator {
    fn dialect(&self) -> Dialect {
        Dialect::MySql
    }

    fn quote_pair(&self) -> (char, char) {
        ('`', '`')
    }

    fn limit_offset(&self, limit: Option<&str>, offset: Option<&str>) -> String {
        // MySQL has no OFFSET without LIMIT; the documented idiom is the max row count.
        match (limit, offset) {
            (None, Some(o)) => format!("LIMIT 18446744073709551615 OFFSET {}", o),
            (Some(l), Some(o)) => format!("LIMIT {} OFFSET {}", l, o),
            (Some(l), None) => format!("LIMIT {}", l),
            (None, None) => String::new(),
        }
    }

    fn current_timestamp(&self) -> &'static str {
        "NOW()"
    }

    fn string_concat(&self, parts: &[&str]) -> String {
        format!("CONCAT({})", parts.join(", "))
    }

    fn like_escape_clause(&self) -> String {
        // backslash is itself an escape inside MySQL string literals
        "ESCAPE '\\\\'".to_string()
    }

    fn length(&self, expr: &str) -> String {
        format!("CHAR_LENGTH({})", expr)
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        format!("DATE_ADD({}, INTERVAL {} {})", expr, amount, unit.keyword())
    }
}
