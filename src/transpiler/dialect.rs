use serde::{Deserialize, Serialize};

use crate::transpiler::sql::db2::Db2Generator;
use crate::transpiler::sql::mysql::MysqlGenerator;
use crate::transpiler::sql::oracle::OracleGenerator;
use crate::transpiler::sql::postgres::PostgresGenerator;
use crate::transpiler::sql::sqlite::SqliteGenerator;
use crate::transpiler::sql::sqlserver::SqlServerGenerator;
use crate::transpiler::traits::SqlGenerator;

static SQLITE: SqliteGenerator = SqliteGenerator;
static SQLSERVER: SqlServerGenerator = SqlServerGenerator;
static MYSQL: MysqlGenerator = MysqlGenerator;
static POSTGRES: PostgresGenerator = PostgresGenerator;
static ORACLE: OracleGenerator = OracleGenerator;
static DB2: Db2Generator = Db2Generator;

/// Supported SQL Dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    SQLite,
    #[serde(alias = "mssql")]
    SqlServer,
    MySql,
    #[serde(alias = "postgres", alias = "pg")]
    PostgreSql,
    Oracle,
    DB2,
}

impl Dialect {
    pub const ALL: [Dialect; 6] = [
        Dialect::SQLite,
        Dialect::SqlServer,
        Dialect::MySql,
        Dialect::PostgreSql,
        Dialect::Oracle,
        Dialect::DB2,
    ];

    /// The shared descriptor for this dialect.
    pub fn generator(&self) -> &'static dyn SqlGenerator {
        match self {
            Dialect::SQLite => &SQLITE,
            Dialect::SqlServer => &SQLSERVER,
            Dialect::MySql => &MYSQL,
            Dialect::PostgreSql => &POSTGRES,
            Dialect::Oracle => &ORACLE,
            Dialect::DB2 => &DB2,
        }
    }
}

impl std::fmt::Display for Dialect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dialect::SQLite => write!(f, "SQLite"),
            Dialect::SqlServer => write!(f, "SqlServer"),
            Dialect::MySql => write!(f, "MySql"),
            Dialect::PostgreSql => write!(f, "PostgreSql"),
            Dialect::Oracle => write!(f, "Oracle"),
            Dialect::DB2 => write!(f, "DB2"),
        }
    }
}

impl std::str::FromStr for Dialect {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sqlite" => Ok(Dialect::SQLite),
            "sqlserver" | "mssql" | "tsql" => Ok(Dialect::SqlServer),
            "mysql" => Ok(Dialect::MySql),
            "postgresql" | "postgres" | "pg" => Ok(Dialect::PostgreSql),
            "oracle" => Ok(Dialect::Oracle),
            "db2" => Ok(Dialect::DB2),
            other => Err(format!("unknown dialect '{}'", other)),
        }
    }
}
