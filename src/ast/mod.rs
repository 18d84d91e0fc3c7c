pub mod expr;
pub mod operators;
pub mod values;

pub use self::expr::{Expr, all, any, lit, member};
pub use self::operators::{ArithOp, CompareOp, DateUnit, LogicalOp, Method};
pub use self::values::{Parameters, TypeKind, Value, ValueType};
