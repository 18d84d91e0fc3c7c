use crate::ast::DateUnit;
use crate::transpiler::Dialect;
use crate::transpiler::traits::{Pagination, SqlGenerator};

pub struct Db2Generator;

impl SqlGenerator for Db2Generator {
    fn dialect(&self) -> Dialect {
        Dialect::DB2
    }

    fn quote_pair(&self) -> (char, char) {
        ('"', '"')
    }

    fn pagination(&self) -> Pagination {
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

    fn current_timestamp(&self) -> &'static str {
        "CURRENT TIMESTAMP"
    }

    fn substring(&self, expr: &str, start: &str, length: Option<&str>) -> String {
        match length {
            Some(len) => format!("SUBSTR({}, {}, {})", expr, start, len),
            None => format!("SUBSTR({}, {})", expr, start),
        }
    }

    fn date_add(&self, unit: DateUnit, amount: &str, expr: &str) -> String {
        // labeled durations: expr + 3 DAYS
        format!("({} + {} {}S)", expr, amount, unit.keyword())
    }
}
