use serde::{Deserialize, Serialize};

/// Comparison operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompareOp {
    /// =
    Eq,
    /// <>
    Ne,
    /// <
    Lt,
    /// <=
    Lte,
    /// >
    Gt,
    /// >=
    Gte,
}

impl CompareOp {
    /// The SQL token for this operator.
    pub fn sql_symbol(&self) -> &'static str {
        match self {
            CompareOp::Eq => "=",
            CompareOp::Ne => "<>",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
        }
    }

    /// The operator obtained by swapping operands (`a < b` == `b > a`).
    pub fn flipped(&self) -> CompareOp {
        match self {
            CompareOp::Lt => CompareOp::Gt,
            CompareOp::Lte => CompareOp::Gte,
            CompareOp::Gt => CompareOp::Lt,
            CompareOp::Gte => CompareOp::Lte,
            op => *op,
        }
    }
}

impl std::fmt::Display for CompareOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sql_symbol())
    }
}

/// Logical connectives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogicalOp::And => write!(f, "AND"),
            LogicalOp::Or => write!(f, "OR"),
        }
    }
}

/// Arithmetic operators for value positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArithOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl std::fmt::Display for ArithOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ArithOp::Add => write!(f, "+"),
            ArithOp::Sub => write!(f, "-"),
            ArithOp::Mul => write!(f, "*"),
            ArithOp::Div => write!(f, "/"),
        }
    }
}

/// Method-call tags a predicate may carry.
///
/// Tags arrive from host-language expression trees, so anything the
/// translator has no mapping for is kept as [`Method::Other`] and rejected
/// at translation time with its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// String containment (LIKE) or collection membership (IN).
    Contains,
    StartsWith,
    EndsWith,
    ToLower,
    ToUpper,
    Trim,
    TrimStart,
    TrimEnd,
    /// Zero-based start, optional length.
    Substring,
    Replace,
    Length,
    AddDays,
    AddHours,
    AddMinutes,
    AddMonths,
    AddYears,
    Abs,
    Round,
    Floor,
    Ceiling,
    /// Any tag without a SQL mapping.
    Other(String),
}

impl Method {
    pub fn name(&self) -> &str {
        match self {
            Method::Contains => "Contains",
            Method::StartsWith => "StartsWith",
            Method::EndsWith => "EndsWith",
            Method::ToLower => "ToLower",
            Method::ToUpper => "ToUpper",
            Method::Trim => "Trim",
            Method::TrimStart => "TrimStart",
            Method::TrimEnd => "TrimEnd",
            Method::Substring => "Substring",
            Method::Replace => "Replace",
            Method::Length => "Length",
            Method::AddDays => "AddDays",
            Method::AddHours => "AddHours",
            Method::AddMinutes => "AddMinutes",
            Method::AddMonths => "AddMonths",
            Method::AddYears => "AddYears",
            Method::Abs => "Abs",
            Method::Round => "Round",
            Method::Floor => "Floor",
            Method::Ceiling => "Ceiling",
            Method::Other(name) => name,
        }
    }

    /// Whether the call yields a boolean (usable directly as a condition).
    pub fn is_predicate(&self) -> bool {
        matches!(self, Method::Contains | Method::StartsWith | Method::EndsWith)
    }
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl From<&str> for Method {
    fn from(name: &str) -> Self {
        match name.to_ascii_lowercase().as_str() {
            "contains" => Method::Contains,
            "startswith" | "starts_with" => Method::StartsWith,
            "endswith" | "ends_with" => Method::EndsWith,
            "tolower" | "to_lower" => Method::ToLower,
            "toupper" | "to_upper" => Method::ToUpper,
            "trim" => Method::Trim,
            "trimstart" | "trim_start" => Method::TrimStart,
            "trimend" | "trim_end" => Method::TrimEnd,
            "substring" => Method::Substring,
            "replace" => Method::Replace,
            "length" => Method::Length,
            "adddays" | "add_days" => Method::AddDays,
            "addhours" | "add_hours" => Method::AddHours,
            "addminutes" | "add_minutes" => Method::AddMinutes,
            "addmonths" | "add_months" => Method::AddMonths,
            "addyears" | "add_years" => Method::AddYears,
            "abs" => Method::Abs,
            "round" => Method::Round,
            "floor" => Method::Floor,
            "ceiling" => Method::Ceiling,
            _ => Method::Other(name.to_string()),
        }
    }
}

/// Units for date arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateUnit {
    Minute,
    Hour,
    Day,
    Month,
    Year,
}

impl DateUnit {
    pub fn keyword(&self) -> &'static str {
        match self {
            DateUnit::Minute => "MINUTE",
            DateUnit::Hour => "HOUR",
            DateUnit::Day => "DAY",
            DateUnit::Month => "MONTH",
            DateUnit::Year => "YEAR",
        }
    }
}
