//! Predicate translation.
//!
//! Walks an [`Expr`] tree and renders a SQL boolean expression. Every literal
//! becomes a named parameter (`@p0`, `@p1`, ... in encounter order); values
//! are never inlined into the condition text.

use tracing::debug;

use crate::ast::{ArithOp, CompareOp, DateUnit, Expr, LogicalOp, Method, Parameters, TypeKind, Value};
use crate::error::{StencilError, StencilResult};
use crate::schema::{ColumnDef, EntitySchema};
use crate::transpiler::Dialect;
use crate::transpiler::traits::SqlGenerator;

/// Default name stem of generated predicate parameters.
pub const DEFAULT_PARAM_STEM: &str = "p";

/// A translated predicate: condition text and the parameters it binds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Condition {
    pub sql: String,
    pub parameters: Parameters,
}

impl Condition {
    pub fn new(sql: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            sql: sql.into(),
            parameters,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sql.trim().is_empty()
    }
}

/// Context for parameterized condition building.
#[derive(Debug)]
pub struct ParamContext {
    stem: String,
    /// Next parameter index (0-based: p0, p1, ...)
    pub index: usize,
    /// Collected parameter values in order
    pub params: Parameters,
}

impl ParamContext {
    pub fn new(stem: &str) -> Self {
        Self {
            stem: stem.to_string(),
            index: 0,
            params: Parameters::new(),
        }
    }

    /// Add a value and return the placeholder for it.
    pub fn add_param(&mut self, value: Value, generator: &dyn SqlGenerator) -> String {
        let name = format!("{}{}", self.stem, self.index);
        self.index += 1;
        let placeholder = generator.parameter(&name);
        self.params.insert(name, value);
        placeholder
    }
}

/// Static type of an operand, used to pick between string and collection
/// semantics without looking at values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StaticType {
    Scalar(TypeKind),
    Collection,
    Null,
    Unknown,
}

impl StaticType {
    fn is(&self, kind: TypeKind) -> bool {
        *self == StaticType::Scalar(kind)
    }
}

/// Translate `expr` into a condition against `schema` for `dialect`.
pub fn translate(expr: &Expr, schema: &EntitySchema, dialect: Dialect) -> StencilResult<Condition> {
    translate_with_stem(expr, schema, dialect, DEFAULT_PARAM_STEM)
}

/// Like [`translate`], naming parameters `<stem>0`, `<stem>1`, ...
pub fn translate_with_stem(
    expr: &Expr,
    schema: &EntitySchema,
    dialect: Dialect,
    stem: &str,
) -> StencilResult<Condition> {
    let mut translator = PredicateTranslator::new(schema, dialect, stem);
    let sql = translator.condition(expr)?;
    let condition = Condition::new(sql, translator.params.params);
    debug!(
        dialect = %dialect,
        table = %schema.table,
        parameters = condition.parameters.len(),
        "translated predicate"
    );
    Ok(condition)
}

/// Recursive-descent renderer over the predicate tree.
pub struct PredicateTranslator<'a> {
    schema: &'a EntitySchema,
    generator: &'static dyn SqlGenerator,
    params: ParamContext,
}

impl<'a> PredicateTranslator<'a> {
    pub fn new(schema: &'a EntitySchema, dialect: Dialect, stem: &str) -> Self {
        Self {
            schema,
            generator: dialect.generator(),
            params: ParamContext::new(stem),
        }
    }

    fn dialect(&self) -> Dialect {
        self.generator.dialect()
    }

    fn invalid(&self, expr: &Expr, message: impl Into<String>) -> StencilError {
        StencilError::predicate(expr.kind(), self.dialect(), message)
    }

    fn column(&self, name: &str) -> StencilResult<&'a ColumnDef> {
        self.schema
            .find(name)
            .ok_or_else(|| StencilError::UnknownMember {
                member: name.to_string(),
                table: self.schema.table.clone(),
                suggestion: self.schema.suggest(name),
            })
    }

    /// Render `expr` in a boolean position.
    pub fn condition(&mut self, expr: &Expr) -> StencilResult<String> {
        match expr {
            Expr::Logical { op, operands } => self.logical(*op, operands),
            Expr::Not { operand } => self.negation(operand),
            Expr::Compare { op, left, right } => self.comparison(expr, *op, left, right),
            Expr::NullCheck { operand, negated } => {
                let value = self.value(operand)?;
                Ok(null_check(&value, *negated))
            }
            Expr::Call {
                method,
                target,
                args,
            } if method.is_predicate() => self.predicate_call(expr, method, target, args),
            Expr::Call {
                method: Method::Other(name),
                ..
            } => Err(StencilError::UnsupportedMethod {
                method: name.clone(),
                dialect: self.dialect().to_string(),
            }),
            Expr::Literal {
                value: Value::Bool(b),
            } => Ok(constant_condition(*b).to_string()),
            _ => {
                // Boolean-valued members and expressions compare against TRUE.
                if self.static_type(expr)?.is(TypeKind::Boolean) {
                    let value = self.value(expr)?;
                    Ok(format!("{} = {}", value, self.generator.bool_literal(true)))
                } else {
                    Err(self.invalid(expr, "expression is not boolean"))
                }
            }
        }
    }

    fn logical(&mut self, op: LogicalOp, operands: &[Expr]) -> StencilResult<String> {
        match operands {
            // Empty AND is vacuously true, empty OR false.
            [] => Ok(constant_condition(op == LogicalOp::And).to_string()),
            [single] => self.condition(single),
            _ => {
                let parts = operands
                    .iter()
                    .map(|operand| self.condition(operand).map(|sql| format!("({})", sql)))
                    .collect::<StencilResult<Vec<_>>>()?;
                Ok(parts.join(&format!(" {} ", op)))
            }
        }
    }

    fn negation(&mut self, operand: &Expr) -> StencilResult<String> {
        match operand {
            Expr::NullCheck { operand, negated } => {
                let value = self.value(operand)?;
                Ok(null_check(&value, !negated))
            }
            Expr::Not { operand } => self.condition(operand),
            Expr::Member { .. } if self.static_type(operand)?.is(TypeKind::Boolean) => {
                let value = self.value(operand)?;
                Ok(format!("{} = {}", value, self.generator.bool_literal(false)))
            }
            _ => {
                let inner = self.condition(operand)?;
                Ok(format!("NOT ({})", inner))
            }
        }
    }

    fn comparison(
        &mut self,
        expr: &Expr,
        op: CompareOp,
        left: &Expr,
        right: &Expr,
    ) -> StencilResult<String> {
        // Comparisons against NULL never go through a bound parameter.
        let null_side = match (left.is_null_literal(), right.is_null_literal()) {
            (true, true) => return Err(self.invalid(expr, "both operands are NULL")),
            (false, true) => Some(left),
            (true, false) => Some(right),
            (false, false) => None,
        };
        if let Some(operand) = null_side {
            let value = self.value(operand)?;
            return match op {
                CompareOp::Eq => Ok(null_check(&value, false)),
                CompareOp::Ne => Ok(null_check(&value, true)),
                other => Err(self.invalid(
                    expr,
                    format!("operator {} cannot compare against NULL", other),
                )),
            };
        }

        let lhs = self.value(left)?;
        let rhs = self.value(right)?;
        Ok(format!("{} {} {}", lhs, op, rhs))
    }

    fn predicate_call(
        &mut self,
        expr: &Expr,
        method: &Method,
        target: &Expr,
        args: &[Expr],
    ) -> StencilResult<String> {
        let [arg] = args else {
            return Err(self.invalid(
                expr,
                format!("{} expects exactly one argument", method),
            ));
        };

        let target_type = self.static_type(target)?;
        match (method, target_type) {
            (Method::Contains, StaticType::Collection) => self.membership(expr, target, arg),
            (_, StaticType::Scalar(TypeKind::Text)) => self.like(expr, method, target, arg),
            (Method::Contains, _) => Err(self.invalid(
                expr,
                "Contains requires a text or collection operand",
            )),
            (_, _) => Err(self.invalid(expr, format!("{} requires a text operand", method))),
        }
    }

    /// `collection.Contains(member)` as an IN list, one parameter per element.
    fn membership(&mut self, expr: &Expr, target: &Expr, arg: &Expr) -> StencilResult<String> {
        let Expr::Literal {
            value: Value::List(items),
        } = target
        else {
            return Err(self.invalid(expr, "collection operand must be a literal list"));
        };
        if arg.is_null_literal() {
            return Err(self.invalid(expr, "Contains argument is NULL"));
        }

        let needle = self.value(arg)?;
        let has_null = items.iter().any(Value::is_null);
        let placeholders: Vec<String> = items
            .iter()
            .filter(|item| !item.is_null())
            .map(|item| self.params.add_param(item.clone(), self.generator))
            .collect();

        let in_list = if placeholders.is_empty() {
            None
        } else {
            Some(format!("{} IN ({})", needle, placeholders.join(", ")))
        };

        Ok(match (in_list, has_null) {
            (Some(list), false) => list,
            (Some(list), true) => format!("({} OR {})", list, null_check(&needle, false)),
            (None, true) => null_check(&needle, false),
            // IN () is not valid SQL; an empty collection matches nothing.
            (None, false) => constant_condition(false).to_string(),
        })
    }

    /// String Contains / StartsWith / EndsWith as LIKE.
    fn like(
        &mut self,
        expr: &Expr,
        method: &Method,
        target: &Expr,
        arg: &Expr,
    ) -> StencilResult<String> {
        let subject = self.value(target)?;
        let (pattern_value, escape) = match arg {
            Expr::Literal {
                value: Value::Text(text),
            } => {
                let escaped = self.generator.escape_like(text);
                let placeholder = self.params.add_param(Value::Text(escaped), self.generator);
                (placeholder, true)
            }
            Expr::Literal { value } if value.is_null() => {
                return Err(self.invalid(expr, format!("{} argument is NULL", method)));
            }
            other => {
                let arg_type = self.static_type(other)?;
                if !(arg_type.is(TypeKind::Text) || arg_type == StaticType::Unknown) {
                    return Err(self.invalid(expr, format!("{} argument must be text", method)));
                }
                (self.value(other)?, false)
            }
        };

        let pattern = match method {
            Method::StartsWith => self.generator.string_concat(&[&pattern_value, "'%'"]),
            Method::EndsWith => self.generator.string_concat(&["'%'", &pattern_value]),
            _ => self
                .generator
                .string_concat(&["'%'", &pattern_value, "'%'"]),
        };

        if escape {
            Ok(format!(
                "{} LIKE {} {}",
                subject,
                pattern,
                self.generator.like_escape_clause()
            ))
        } else {
            Ok(format!("{} LIKE {}", subject, pattern))
        }
    }

    /// Render `expr` in a value position.
    pub fn value(&mut self, expr: &Expr) -> StencilResult<String> {
        match expr {
            Expr::Member { name } => {
                let column = self.column(name)?;
                Ok(self.generator.escape_identifier(&column.column))
            }
            Expr::Literal { value } => match value {
                Value::Null => Ok("NULL".to_string()),
                Value::List(_) => Err(self.invalid(
                    expr,
                    "collections are only valid as the target of Contains",
                )),
                other => Ok(self.params.add_param(other.clone(), self.generator)),
            },
            Expr::Arithmetic { op, left, right } => self.arithmetic(*op, left, right),
            Expr::Coalesce { .. } => {
                let mut operands = Vec::new();
                collect_coalesce(expr, &mut operands);
                let rendered = operands
                    .into_iter()
                    .map(|operand| self.value(operand))
                    .collect::<StencilResult<Vec<_>>>()?;
                Ok(format!("COALESCE({})", rendered.join(", ")))
            }
            Expr::Call {
                method,
                target,
                args,
            } => self.function_call(expr, method, target, args),
            Expr::Compare { .. } | Expr::Logical { .. } | Expr::Not { .. } | Expr::NullCheck { .. } => {
                Err(self.invalid(expr, "boolean expression used as a value"))
            }
        }
    }

    fn arithmetic(&mut self, op: ArithOp, left: &Expr, right: &Expr) -> StencilResult<String> {
        let is_text = self.static_type(left)?.is(TypeKind::Text)
            || self.static_type(right)?.is(TypeKind::Text);
        let lhs = self.value(left)?;
        let rhs = self.value(right)?;
        if is_text && op == ArithOp::Add {
            return Ok(format!("({})", self.generator.string_concat(&[&lhs, &rhs])));
        }
        Ok(format!("({} {} {})", lhs, op, rhs))
    }

    fn function_call(
        &mut self,
        expr: &Expr,
        method: &Method,
        target: &Expr,
        args: &[Expr],
    ) -> StencilResult<String> {
        let dialect = self.dialect();
        let expect_args = |range: std::ops::RangeInclusive<usize>| -> StencilResult<()> {
            if range.contains(&args.len()) {
                Ok(())
            } else if range.start() == range.end() {
                Err(StencilError::predicate(
                    expr.kind(),
                    dialect,
                    format!("{} expects {} argument(s), got {}", method, range.start(), args.len()),
                ))
            } else {
                Err(StencilError::predicate(
                    expr.kind(),
                    dialect,
                    format!(
                        "{} expects {} to {} arguments, got {}",
                        method,
                        range.start(),
                        range.end(),
                        args.len()
                    ),
                ))
            }
        };

        match method {
            Method::Other(name) => Err(StencilError::UnsupportedMethod {
                method: name.clone(),
                dialect: self.dialect().to_string(),
            }),
            Method::Contains | Method::StartsWith | Method::EndsWith => {
                Err(self.invalid(expr, format!("{} used as a value", method)))
            }
            Method::ToLower | Method::ToUpper | Method::Trim | Method::TrimStart | Method::TrimEnd
            | Method::Length | Method::Abs | Method::Floor | Method::Ceiling => {
                expect_args(0..=0)?;
                let subject = self.value(target)?;
                Ok(match method {
                    Method::ToLower => format!("LOWER({})", subject),
                    Method::ToUpper => format!("UPPER({})", subject),
                    Method::Trim => format!("TRIM({})", subject),
                    Method::TrimStart => self.generator.trim_start(&subject),
                    Method::TrimEnd => self.generator.trim_end(&subject),
                    Method::Length => self.generator.length(&subject),
                    Method::Abs => format!("ABS({})", subject),
                    Method::Floor => self.generator.floor(&subject),
                    _ => self.generator.ceiling(&subject),
                })
            }
            Method::Round => {
                expect_args(0..=1)?;
                let subject = self.value(target)?;
                let digits = match args.first() {
                    Some(arg) => self.value(arg)?,
                    None => "0".to_string(),
                };
                Ok(format!("ROUND({}, {})", subject, digits))
            }
            Method::Substring => {
                expect_args(1..=2)?;
                let subject = self.value(target)?;
                // Host offsets are zero-based, SQL is one-based.
                let start = format!("{} + 1", self.value(&args[0])?);
                let length = match args.get(1) {
                    Some(arg) => Some(self.value(arg)?),
                    None => None,
                };
                Ok(self
                    .generator
                    .substring(&subject, &start, length.as_deref()))
            }
            Method::Replace => {
                expect_args(2..=2)?;
                let subject = self.value(target)?;
                let from = self.value(&args[0])?;
                let to = self.value(&args[1])?;
                Ok(format!("REPLACE({}, {}, {})", subject, from, to))
            }
            Method::AddDays | Method::AddHours | Method::AddMinutes | Method::AddMonths
            | Method::AddYears => {
                expect_args(1..=1)?;
                let unit = match method {
                    Method::AddMinutes => DateUnit::Minute,
                    Method::AddHours => DateUnit::Hour,
                    Method::AddDays => DateUnit::Day,
                    Method::AddMonths => DateUnit::Month,
                    _ => DateUnit::Year,
                };
                let subject = self.value(target)?;
                let amount = self.value(&args[0])?;
                Ok(self.generator.date_add(unit, &amount, &subject))
            }
        }
    }

    fn static_type(&self, expr: &Expr) -> StencilResult<StaticType> {
        Ok(match expr {
            Expr::Member { name } => StaticType::Scalar(self.column(name)?.ty.kind),
            Expr::Literal { value } => match value {
                Value::Null => StaticType::Null,
                Value::List(_) => StaticType::Collection,
                other => other
                    .kind()
                    .map(StaticType::Scalar)
                    .unwrap_or(StaticType::Unknown),
            },
            Expr::Compare { .. } | Expr::Logical { .. } | Expr::Not { .. } | Expr::NullCheck { .. } => {
                StaticType::Scalar(TypeKind::Boolean)
            }
            Expr::Arithmetic { left, right, .. } => {
                let (l, r) = (self.static_type(left)?, self.static_type(right)?);
                if l.is(TypeKind::Text) || r.is(TypeKind::Text) {
                    StaticType::Scalar(TypeKind::Text)
                } else if matches!(l, StaticType::Scalar(_)) {
                    l
                } else {
                    r
                }
            }
            Expr::Coalesce { left, right } => match self.static_type(left)? {
                StaticType::Null | StaticType::Unknown => self.static_type(right)?,
                t => t,
            },
            Expr::Call { method, target, .. } => match method {
                Method::Contains | Method::StartsWith | Method::EndsWith => {
                    StaticType::Scalar(TypeKind::Boolean)
                }
                Method::ToLower
                | Method::ToUpper
                | Method::Trim
                | Method::TrimStart
                | Method::TrimEnd
                | Method::Substring
                | Method::Replace => StaticType::Scalar(TypeKind::Text),
                Method::Length => StaticType::Scalar(TypeKind::Integer),
                Method::AddDays
                | Method::AddHours
                | Method::AddMinutes
                | Method::AddMonths
                | Method::AddYears => StaticType::Scalar(TypeKind::DateTime),
                Method::Abs | Method::Round | Method::Floor | Method::Ceiling => {
                    self.static_type(target)?
                }
                Method::Other(_) => StaticType::Unknown,
            },
        })
    }
}

/// Flatten right-nested coalesce chains: `a ?? (b ?? c)` -> [a, b, c].
fn collect_coalesce<'e>(expr: &'e Expr, out: &mut Vec<&'e Expr>) {
    match expr {
        Expr::Coalesce { left, right } => {
            collect_coalesce(left, out);
            collect_coalesce(right, out);
        }
        other => out.push(other),
    }
}

fn null_check(value: &str, negated: bool) -> String {
    if negated {
        format!("{} IS NOT NULL", value)
    } else {
        format!("{} IS NULL", value)
    }
}

fn constant_condition(value: bool) -> &'static str {
    if value { "1 = 1" } else { "1 = 0" }
}
