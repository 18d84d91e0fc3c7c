//! Predicate translation tests.

use pretty_assertions::assert_eq;

use super::users;
use crate::ast::{Expr, Method, Parameters, Value, all, any, lit, member};
use crate::error::StencilError;
use crate::transpiler::{Dialect, ToCondition, translate, translate_with_stem};

fn sql(expr: &Expr, dialect: Dialect) -> String {
    expr.to_condition(&users(), dialect).unwrap().sql
}

#[test]
fn test_nested_logical_wraps_children() {
    let pred = member("Age")
        .gte(18)
        .and(member("Status").eq("active").or(member("Status").eq("pending")));
    let cond = translate(&pred, &users(), Dialect::SQLite).unwrap();
    assert_eq!(
        cond.sql,
        "(age >= @p0) AND ((status = @p1) OR (status = @p2))"
    );
    assert_eq!(
        cond.parameters,
        Parameters::new()
            .with("p0", 18)
            .with("p1", "active")
            .with("p2", "pending")
    );
}

#[test]
fn test_oracle_uses_colon_parameters() {
    let pred = member("Age").gte(18).and(member("Status").eq("active"));
    assert_eq!(
        sql(&pred, Dialect::Oracle),
        "(age >= :p0) AND (status = :p1)"
    );
}

#[test]
fn test_custom_parameter_stem() {
    let pred = member("Age").gt(21);
    let cond = translate_with_stem(&pred, &users(), Dialect::SQLite, "w").unwrap();
    assert_eq!(cond.sql, "age > @w0");
    assert!(cond.parameters.contains("w0"));
}

#[test]
fn test_single_operand_logical_is_unwrapped() {
    assert_eq!(
        sql(&all(vec![member("Age").lt(5)]), Dialect::SQLite),
        "age < @p0"
    );
}

#[test]
fn test_empty_logical_constants() {
    assert_eq!(sql(&all(vec![]), Dialect::SQLite), "1 = 1");
    assert_eq!(sql(&any(vec![]), Dialect::SQLite), "1 = 0");
}

#[test]
fn test_null_comparisons_render_is_null() {
    let cond = translate(
        &member("DeletedAt").eq(Value::Null),
        &users(),
        Dialect::SQLite,
    )
    .unwrap();
    assert_eq!(cond.sql, "deleted_at IS NULL");
    assert!(cond.parameters.is_empty());

    // NULL on the left side behaves the same
    assert_eq!(
        sql(&lit(Value::Null).ne(member("DeletedAt")), Dialect::MySql),
        "deleted_at IS NOT NULL"
    );
    assert_eq!(
        sql(&member("Email").is_null().not(), Dialect::SQLite),
        "email IS NOT NULL"
    );
}

#[test]
fn test_ordering_against_null_is_rejected() {
    let err = translate(&member("Age").gt(Value::Null), &users(), Dialect::SQLite).unwrap_err();
    assert!(matches!(
        err,
        StencilError::InvalidPredicate { node: "comparison", .. }
    ));
}

#[test]
fn test_string_contains_escapes_wildcards() {
    let cond = translate(
        &member("Name").contains("50%_off"),
        &users(),
        Dialect::SQLite,
    )
    .unwrap();
    assert_eq!(cond.sql, "name LIKE '%' || @p0 || '%' ESCAPE '\\'");
    assert_eq!(
        cond.parameters.get("p0"),
        Some(&Value::Text("50\\%\\_off".to_string()))
    );
}

#[test]
fn test_string_contains_per_dialect() {
    let pred = member("Name").contains("al");
    assert_eq!(
        sql(&pred, Dialect::MySql),
        "name LIKE CONCAT('%', @p0, '%') ESCAPE '\\\\'"
    );
    assert_eq!(
        sql(&pred, Dialect::SqlServer),
        "name LIKE '%' + @p0 + '%' ESCAPE '\\'"
    );
}

#[test]
fn test_sqlserver_escapes_bracket_wildcard() {
    let cond = translate(
        &member("Name").starts_with("[x"),
        &users(),
        Dialect::SqlServer,
    )
    .unwrap();
    assert_eq!(cond.sql, "name LIKE @p0 + '%' ESCAPE '\\'");
    assert_eq!(cond.parameters.get("p0"), Some(&Value::from("\\[x")));
}

#[test]
fn test_starts_and_ends_with() {
    assert_eq!(
        sql(&member("Name").starts_with("a"), Dialect::PostgreSql),
        "name LIKE @p0 || '%' ESCAPE '\\'"
    );
    assert_eq!(
        sql(&member("Name").ends_with("z"), Dialect::PostgreSql),
        "name LIKE '%' || @p0 ESCAPE '\\'"
    );
}

#[test]
fn test_like_against_member_is_not_escaped() {
    assert_eq!(
        sql(&member("Name").contains(member("Status")), Dialect::SQLite),
        "name LIKE '%' || status || '%'"
    );
}

#[test]
fn test_collection_contains_renders_in_list() {
    let pred = lit(vec!["active", "pending"]).contains(member("Status"));
    let cond = translate(&pred, &users(), Dialect::SQLite).unwrap();
    assert_eq!(cond.sql, "status IN (@p0, @p1)");
    let names: Vec<&str> = cond.parameters.names().collect();
    assert_eq!(names, vec!["p0", "p1"]);
}

#[test]
fn test_empty_collection_matches_nothing() {
    let pred = lit(Vec::<i64>::new()).contains(member("Id"));
    let cond = translate(&pred, &users(), Dialect::SqlServer).unwrap();
    assert_eq!(cond.sql, "1 = 0");
    assert!(cond.parameters.is_empty());
}

#[test]
fn test_collection_with_null_adds_null_check() {
    let pred = lit(vec![Value::from("a"), Value::Null]).contains(member("Status"));
    assert_eq!(
        sql(&pred, Dialect::SQLite),
        "(status IN (@p0) OR status IS NULL)"
    );
}

#[test]
fn test_collection_contains_null_is_rejected() {
    let pred = lit(vec!["active", "pending"]).contains(Value::Null);
    let err = translate(&pred, &users(), Dialect::SQLite).unwrap_err();
    match err {
        StencilError::InvalidPredicate { message, .. } => {
            assert_eq!(message, "Contains argument is NULL")
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_contains_on_number_is_rejected() {
    let err = translate(&member("Age").contains(5), &users(), Dialect::SQLite).unwrap_err();
    assert!(matches!(err, StencilError::InvalidPredicate { .. }));
}

#[test]
fn test_boolean_member_as_predicate() {
    assert_eq!(sql(&member("IsActive"), Dialect::SQLite), "is_active = 1");
    assert_eq!(
        sql(&member("IsActive"), Dialect::PostgreSql),
        "is_active = true"
    );
    assert_eq!(
        sql(&member("IsActive").not(), Dialect::PostgreSql),
        "is_active = false"
    );
}

#[test]
fn test_not_wraps_condition() {
    assert_eq!(
        sql(&member("Age").lt(18).not(), Dialect::SQLite),
        "NOT (age < @p0)"
    );
}

#[test]
fn test_non_boolean_member_is_not_a_predicate() {
    let err = translate(&member("Name"), &users(), Dialect::SQLite).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Invalid member node for dialect SQLite: expression is not boolean"
    );
}

#[test]
fn test_unknown_member_suggests_column() {
    let err = translate(&member("Nmae").eq("x"), &users(), Dialect::SQLite).unwrap_err();
    match err {
        StencilError::UnknownMember {
            member, suggestion, ..
        } => {
            assert_eq!(member, "Nmae");
            assert_eq!(suggestion.as_deref(), Some("Name"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_physical_name_reference() {
    assert_eq!(
        sql(&member("created_at").is_not_null(), Dialect::SQLite),
        "created_at IS NOT NULL"
    );
}

#[test]
fn test_reserved_column_is_quoted() {
    assert_eq!(sql(&member("Order").eq(1), Dialect::SQLite), "[order] = @p0");
    assert_eq!(sql(&member("Order").eq(1), Dialect::MySql), "`order` = @p0");
}

#[test]
fn test_unsupported_method_names_method_and_dialect() {
    let pred = member("Name").call("PadLeft", vec![lit(5)]).eq("x");
    let err = translate(&pred, &users(), Dialect::DB2).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported method 'PadLeft' for dialect DB2"
    );

    let bare = member("Name").call("IsMatch", vec![lit("x")]);
    let err = translate(&bare, &users(), Dialect::Oracle).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unsupported method 'IsMatch' for dialect Oracle"
    );
    let nested = member("Age").gt(1).and(bare.not());
    let err = translate(&nested, &users(), Dialect::SQLite).unwrap_err();
    assert!(matches!(
        err,
        StencilError::UnsupportedMethod { ref method, .. } if method == "IsMatch"
    ));
}

#[test]
fn test_string_functions() {
    assert_eq!(
        sql(&member("Email").to_lower().eq("a@b.c"), Dialect::SQLite),
        "LOWER(email) = @p0"
    );
    assert_eq!(
        sql(&member("Name").trim().ne(""), Dialect::SQLite),
        "TRIM(name) <> @p0"
    );
    assert_eq!(
        sql(
            &member("Name").call(Method::Length, vec![]).gt(3),
            Dialect::SqlServer
        ),
        "LEN(name) > @p0"
    );
}

#[test]
fn test_substring_shifts_start() {
    let pred = member("Name")
        .call(Method::Substring, vec![lit(0), lit(3)])
        .eq("abc");
    assert_eq!(
        sql(&pred, Dialect::SQLite),
        "SUBSTR(name, @p0 + 1, @p1) = @p2"
    );
    assert_eq!(
        sql(&pred, Dialect::PostgreSql),
        "SUBSTRING(name FROM @p0 + 1 FOR @p1) = @p2"
    );
}

#[test]
fn test_method_argument_count_checked() {
    let pred = member("Name").call(Method::Replace, vec![lit("a")]).eq("b");
    let err = translate(&pred, &users(), Dialect::SQLite).unwrap_err();
    assert!(err.to_string().contains("Replace expects 2 argument(s), got 1"));
}

#[test]
fn test_date_arithmetic_per_dialect() {
    let pred = member("CreatedAt")
        .call(Method::AddDays, vec![lit(30)])
        .gt(member("DeletedAt"));
    assert_eq!(
        sql(&pred, Dialect::SqlServer),
        "DATEADD(DAY, @p0, created_at) > deleted_at"
    );
    assert_eq!(
        sql(&pred, Dialect::MySql),
        "DATE_ADD(created_at, INTERVAL @p0 DAY) > deleted_at"
    );
    assert_eq!(
        sql(&pred, Dialect::DB2),
        "(created_at + @p0 DAYS) > deleted_at"
    );
}

#[test]
fn test_arithmetic_and_concat() {
    assert_eq!(
        sql(&member("Age").add(1).gt(20), Dialect::SQLite),
        "(age + @p0) > @p1"
    );
    assert_eq!(
        sql(&member("Name").add(" jr").eq("al jr"), Dialect::SQLite),
        "(name || @p0) = @p1"
    );
    assert_eq!(
        sql(&member("Name").add(" jr").eq("al jr"), Dialect::MySql),
        "(CONCAT(name, @p0)) = @p1"
    );
}

#[test]
fn test_coalesce_chain_is_flattened() {
    let pred = member("Email")
        .coalesce(member("Name").coalesce("none"))
        .eq("x");
    assert_eq!(
        sql(&pred, Dialect::SQLite),
        "COALESCE(email, name, @p0) = @p1"
    );
}

#[test]
fn test_boolean_literal_predicate() {
    assert_eq!(sql(&lit(true), Dialect::SQLite), "1 = 1");
    assert_eq!(sql(&lit(false), Dialect::SQLite), "1 = 0");
}

#[test]
fn test_literals_are_never_inlined() {
    let pred = member("Name").eq("'; DROP TABLE users; --");
    let cond = translate(&pred, &users(), Dialect::SQLite).unwrap();
    assert_eq!(cond.sql, "name = @p0");
    assert!(!cond.sql.contains("DROP"));
}

#[test]
fn test_translate_json_tree() {
    let json = r#"{
        "node": "logical",
        "op": "and",
        "operands": [
            { "node": "compare", "op": "gte",
              "left": { "node": "member", "name": "Age" },
              "right": { "node": "literal", "value": { "type": "int", "value": 18 } } },
            { "node": "call", "method": "starts_with",
              "target": { "node": "member", "name": "Name" },
              "args": [ { "node": "literal", "value": { "type": "text", "value": "A" } } ] }
        ]
    }"#;
    let expr: Expr = serde_json::from_str(json).unwrap();
    assert_eq!(
        sql(&expr, Dialect::SQLite),
        "(age >= @p0) AND (name LIKE @p1 || '%' ESCAPE '\\')"
    );
}
