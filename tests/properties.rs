//! Invariants that hold across dialects and inputs.

use pretty_assertions::assert_eq;
use sqlstencil::prelude::*;

fn catalog_schema() -> EntitySchema {
    EntitySchema::new(
        "Product",
        "products",
        vec![
            ColumnDef::new("Id", TypeKind::Integer).key(),
            ColumnDef::new("Sku", TypeKind::Text),
            ColumnDef::new("Title", TypeKind::Text),
            ColumnDef::new("Price", TypeKind::Decimal),
            ColumnDef::new("InStock", TypeKind::Boolean),
            ColumnDef::new("ArchivedAt", TypeKind::DateTime).nullable(),
        ],
    )
    .unwrap()
}

#[test]
fn templates_without_placeholders_are_untouched() {
    let schema = catalog_schema();
    let templates = [
        "",
        "SELECT 1",
        "SELECT * FROM products WHERE sku = @sku ORDER BY title",
        "  padded  ",
        "UPDATE t SET a = '{' WHERE b = '}'",
        "{ {not a placeholder} }",
    ];
    for dialect in Dialect::ALL {
        for template in templates {
            let result = sqlstencil::process(template, &schema, dialect).unwrap();
            assert_eq!(result.sql, template, "{dialect}");
        }
    }
}

#[test]
fn exclusion_keeps_columns_and_values_aligned() {
    let schema = catalog_schema();
    let exclusions: [&[&str]; 5] = [
        &[],
        &["Id"],
        &["Id", "ArchivedAt"],
        &["Sku", "Title", "Price"],
        &["Id", "Sku", "Title", "Price", "InStock"],
    ];

    for excluded in exclusions {
        let option = if excluded.is_empty() {
            String::new()
        } else {
            format!(" --exclude {}", excluded.join(" "))
        };
        let columns = sqlstencil::process(&format!("{{{{columns{option}}}}}"), &schema, Dialect::PostgreSql)
            .unwrap()
            .sql;
        let values = sqlstencil::process(&format!("{{{{values{option}}}}}"), &schema, Dialect::PostgreSql)
            .unwrap()
            .sql;

        let columns: Vec<&str> = columns.split(", ").map(|c| c.trim_matches('"')).collect();
        let values: Vec<&str> = values.split(", ").map(|v| v.trim_start_matches('@')).collect();
        assert_eq!(columns.len(), schema.columns.len() - excluded.len());
        assert_eq!(columns, values);
    }
}

#[test]
fn single_column_lists_have_no_separator() {
    let schema = catalog_schema();
    for dialect in Dialect::ALL {
        for name in ["columns", "values", "set"] {
            let template = format!("{{{{{name} --only Title}}}}");
            let sql = sqlstencil::process(&template, &schema, dialect).unwrap().sql;
            assert!(!sql.contains(','), "{dialect} {name}: {sql}");
            assert!(!sql.is_empty());
        }
    }
}

#[test]
fn table_and_boolean_literals_per_dialect() {
    let schema = catalog_schema();
    let expected = [
        (Dialect::SQLite, "[products]", "1", "0"),
        (Dialect::SqlServer, "[products]", "1", "0"),
        (Dialect::MySql, "`products`", "1", "0"),
        (Dialect::PostgreSql, "\"products\"", "true", "false"),
        (Dialect::Oracle, "\"products\"", "1", "0"),
        (Dialect::DB2, "\"products\"", "1", "0"),
    ];
    for (dialect, table, yes, no) in expected {
        let sql = sqlstencil::process("{{table}}|{{bool_true}}|{{bool_false}}", &schema, dialect)
            .unwrap()
            .sql;
        assert_eq!(sql, format!("{table}|{yes}|{no}"));
    }
}

#[test]
fn literals_are_never_inlined() {
    let schema = catalog_schema();
    let predicate = all(vec![
        member("Sku").eq("SKU-XYZZY"),
        member("Price").gt(4242),
        member("Title").contains("plugh"),
        member("Title").to_lower().starts_with("quux"),
        member("InStock").eq(true).not(),
        member("Sku").ne("frobnitz").or(member("Price").lte(9191)),
    ]);

    for dialect in Dialect::ALL {
        let condition = sqlstencil::translate(&predicate, &schema, dialect).unwrap();
        for literal in ["XYZZY", "4242", "plugh", "quux", "frobnitz", "9191"] {
            assert!(
                !condition.sql.contains(literal),
                "{dialect} inlined {literal}: {}",
                condition.sql
            );
        }
        assert_eq!(condition.parameters.len(), 7, "{dialect}");
    }
}

#[test]
fn null_comparisons_use_is_null() {
    let schema = catalog_schema();
    for dialect in Dialect::ALL {
        let eq = sqlstencil::translate(&member("ArchivedAt").eq(Value::Null), &schema, dialect)
            .unwrap();
        assert_eq!(eq.sql, "archived_at IS NULL");
        assert!(eq.parameters.is_empty());

        let ne = sqlstencil::translate(&member("ArchivedAt").ne(Value::Null), &schema, dialect)
            .unwrap();
        assert_eq!(ne.sql, "archived_at IS NOT NULL");

        let reversed = sqlstencil::translate(&lit(Value::Null).eq(member("ArchivedAt")), &schema, dialect)
            .unwrap();
        assert_eq!(reversed.sql, "archived_at IS NULL");
    }
}

#[test]
fn merging_is_deterministic() {
    let runtime = Parameters::new().with("p0", 1).with("p1", 2).with("take", 10);
    let predicate = Parameters::new().with("p1", "x").with("p0", "y").with("p2", "z");
    let merger = ParameterMerger::default();

    let first = merger.merge(&runtime, &predicate);
    let second = merger.merge(&runtime, &predicate);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
    assert_eq!(first.get("p0"), Some(&Value::Int(1)));
    assert_eq!(first.get("__ext_p1"), Some(&Value::from("x")));
    assert_eq!(first.get("__ext_p0"), Some(&Value::from("y")));
    assert_eq!(first.get("p2"), Some(&Value::from("z")));
}

#[test]
fn unknown_placeholder_is_kept_with_one_diagnostic() {
    let result =
        sqlstencil::process("SELECT * FROM t {{nope}}", &catalog_schema(), Dialect::SQLite).unwrap();
    assert_eq!(result.sql, "SELECT * FROM t {{nope}}");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].severity, Severity::Warning);
}
