use serde::{Deserialize, Serialize};

use crate::ast::{ArithOp, CompareOp, LogicalOp, Method, Value};

/// A node of a typed predicate tree.
///
/// Host code compiles its own expression syntax into this tree; the
/// serde representation is tagged by `node` so trees can cross process
/// or language boundaries as JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "node", rename_all = "snake_case")]
pub enum Expr {
    /// Entity field, by logical or physical name.
    Member { name: String },
    /// Constant value.
    Literal { value: Value },
    /// Binary comparison.
    Compare {
        op: CompareOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// AND / OR over any number of operands.
    Logical { op: LogicalOp, operands: Vec<Expr> },
    /// Negation.
    Not { operand: Box<Expr> },
    /// Infix arithmetic in value positions.
    Arithmetic {
        op: ArithOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    /// Method call on `target` (`name.StartsWith("a")`, `ids.Contains(id)`).
    Call {
        method: Method,
        target: Box<Expr>,
        #[serde(default)]
        args: Vec<Expr>,
    },
    /// IS NULL / IS NOT NULL.
    NullCheck { operand: Box<Expr>, negated: bool },
    /// Null-coalescing (`a ?? b`).
    Coalesce { left: Box<Expr>, right: Box<Expr> },
}

impl Expr {
    /// Node kind, for error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Expr::Member { .. } => "member",
            Expr::Literal { .. } => "literal",
            Expr::Compare { .. } => "comparison",
            Expr::Logical { .. } => "logical",
            Expr::Not { .. } => "not",
            Expr::Arithmetic { .. } => "arithmetic",
            Expr::Call { .. } => "method call",
            Expr::NullCheck { .. } => "null check",
            Expr::Coalesce { .. } => "coalesce",
        }
    }

    pub fn is_null_literal(&self) -> bool {
        matches!(self, Expr::Literal { value } if value.is_null())
    }

    fn compare(self, op: CompareOp, other: impl Into<Expr>) -> Expr {
        Expr::Compare {
            op,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    pub fn eq(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Eq, other)
    }

    pub fn ne(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Ne, other)
    }

    pub fn lt(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Lt, other)
    }

    pub fn lte(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Lte, other)
    }

    pub fn gt(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Gt, other)
    }

    pub fn gte(self, other: impl Into<Expr>) -> Expr {
        self.compare(CompareOp::Gte, other)
    }

    pub fn and(self, other: Expr) -> Expr {
        Expr::Logical {
            op: LogicalOp::And,
            operands: vec![self, other],
        }
    }

    pub fn or(self, other: Expr) -> Expr {
        Expr::Logical {
            op: LogicalOp::Or,
            operands: vec![self, other],
        }
    }

    pub fn not(self) -> Expr {
        Expr::Not {
            operand: Box::new(self),
        }
    }

    pub fn is_null(self) -> Expr {
        Expr::NullCheck {
            operand: Box::new(self),
            negated: false,
        }
    }

    pub fn is_not_null(self) -> Expr {
        Expr::NullCheck {
            operand: Box::new(self),
            negated: true,
        }
    }

    pub fn call(self, method: impl Into<Method>, args: Vec<Expr>) -> Expr {
        Expr::Call {
            method: method.into(),
            target: Box::new(self),
            args,
        }
    }

    pub fn contains(self, arg: impl Into<Expr>) -> Expr {
        self.call(Method::Contains, vec![arg.into()])
    }

    pub fn starts_with(self, arg: impl Into<Expr>) -> Expr {
        self.call(Method::StartsWith, vec![arg.into()])
    }

    pub fn ends_with(self, arg: impl Into<Expr>) -> Expr {
        self.call(Method::EndsWith, vec![arg.into()])
    }

    pub fn to_lower(self) -> Expr {
        self.call(Method::ToLower, vec![])
    }

    pub fn to_upper(self) -> Expr {
        self.call(Method::ToUpper, vec![])
    }

    pub fn trim(self) -> Expr {
        self.call(Method::Trim, vec![])
    }

    pub fn coalesce(self, fallback: impl Into<Expr>) -> Expr {
        Expr::Coalesce {
            left: Box::new(self),
            right: Box::new(fallback.into()),
        }
    }

    fn arith(self, op: ArithOp, other: impl Into<Expr>) -> Expr {
        Expr::Arithmetic {
            op,
            left: Box::new(self),
            right: Box::new(other.into()),
        }
    }

    pub fn add(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Add, other)
    }

    pub fn sub(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Sub, other)
    }

    pub fn mul(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Mul, other)
    }

    pub fn div(self, other: impl Into<Expr>) -> Expr {
        self.arith(ArithOp::Div, other)
    }
}

macro_rules! literal_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Expr {
                fn from(value: $t) -> Self {
                    Expr::Literal {
                        value: value.into(),
                    }
                }
            }
        )*
    };
}

literal_from!(
    Value,
    bool,
    i32,
    i64,
    f64,
    &str,
    String,
    rust_decimal::Decimal,
    chrono::NaiveDateTime,
    uuid::Uuid
);

/// Entity field reference.
pub fn member(name: &str) -> Expr {
    Expr::Member {
        name: name.to_string(),
    }
}

/// Constant value.
pub fn lit(value: impl Into<Value>) -> Expr {
    Expr::Literal {
        value: value.into(),
    }
}

/// AND over every operand.
pub fn all(operands: Vec<Expr>) -> Expr {
    Expr::Logical {
        op: LogicalOp::And,
        operands,
    }
}

/// OR over every operand.
pub fn any(operands: Vec<Expr>) -> Expr {
    Expr::Logical {
        op: LogicalOp::Or,
        operands,
    }
}
