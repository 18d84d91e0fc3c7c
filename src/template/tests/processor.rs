//! Template processor tests.

use pretty_assertions::assert_eq;

use super::{render, render_with, users, users_with_update};
use crate::ast::{Parameters, Value};
use crate::error::StencilError;
use crate::template::{
    Invocation, PlaceholderContext, PlaceholderRegistry, Resolved, Scope, TemplateProcessor,
    process,
};
use crate::transpiler::Dialect;

#[test]
fn test_template_without_placeholders_is_unchanged() {
    for template in [
        "SELECT * FROM users WHERE id = @id",
        "  leading and trailing  ",
        "braces { } and }} alone",
    ] {
        let result = render(template, &users(), Dialect::SqlServer);
        assert_eq!(result.sql, template);
        assert!(result.diagnostics.is_empty());
        assert!(!result.has_unresolved_dynamic_placeholder);
    }
}

#[test]
fn test_empty_template() {
    let result = render("", &users(), Dialect::SQLite);
    assert_eq!(result.sql, "");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_unknown_placeholder_is_preserved() {
    let result = render("SELECT * FROM t {{nope}}", &users(), Dialect::SQLite);
    assert_eq!(result.sql, "SELECT * FROM t {{nope}}");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].placeholder, "nope");
}

#[test]
fn test_update_statement() {
    let result = render(
        "UPDATE {{table}} SET {{set --exclude Id CreatedAt}} WHERE id = @id",
        &users_with_update(),
        Dialect::MySql,
    );
    assert_eq!(
        result.sql,
        "UPDATE `users` SET `name` = @name, `updated_at` = @updated_at WHERE id = @id"
    );
}

#[test]
fn test_insert_statement() {
    let result = render(
        "INSERT INTO {{table}} ({{columns --exclude Id}}) VALUES ({{values --exclude Id}}) {{returning_id}}",
        &users(),
        Dialect::SQLite,
    );
    assert_eq!(
        result.sql,
        "INSERT INTO [users] ([name], [created_at]) VALUES (@name, @created_at) RETURNING id"
    );
}

#[test]
fn test_if_block_notempty() {
    let template = "{{if notempty=search}}AND name LIKE @search{{/if}}";

    let blank = Parameters::new().with("search", "");
    assert_eq!(render_with(template, &users(), Dialect::SQLite, &blank).sql, "");

    let set = Parameters::new().with("search", "al");
    assert_eq!(
        render_with(template, &users(), Dialect::SQLite, &set).sql,
        "AND name LIKE @search"
    );
}

#[test]
fn test_if_block_inside_statement() {
    let template =
        "SELECT * FROM {{table}} WHERE 1 = 1 {{if notnull=name}}AND name = @name{{/if}} {{orderby}}";

    let without = render(template, &users(), Dialect::SQLite);
    assert_eq!(without.sql, "SELECT * FROM [users] WHERE 1 = 1 ORDER BY [id] ASC");

    let params = Parameters::new().with("name", "al");
    let with = render_with(template, &users(), Dialect::SQLite, &params);
    assert_eq!(
        with.sql,
        "SELECT * FROM [users] WHERE 1 = 1 AND name = @name ORDER BY [id] ASC"
    );
}

#[test]
fn test_nested_if_blocks() {
    let template = "{{if notnull=a}}A{{if notnull=b}}B{{/if}}C{{/if}}";
    let only_a = Parameters::new().with("a", 1);
    assert_eq!(render_with(template, &users(), Dialect::SQLite, &only_a).sql, "AC");

    let both = Parameters::new().with("a", 1).with("b", 2);
    assert_eq!(render_with(template, &users(), Dialect::SQLite, &both).sql, "ABC");

    let only_b = Parameters::new().with("b", 2);
    assert_eq!(render_with(template, &users(), Dialect::SQLite, &only_b).sql, "");
}

#[test]
fn test_placeholders_inside_if_blocks_resolve() {
    let template = "SELECT * FROM {{table}}{{if notempty=ids}} WHERE {{arg --param ids}} IS NOT NULL{{/if}}";
    let params = Parameters::new().with("ids", vec![1, 2]);
    assert_eq!(
        render_with(template, &users(), Dialect::Oracle, &params).sql,
        "SELECT * FROM \"users\" WHERE :ids IS NOT NULL"
    );
}

#[test]
fn test_unmatched_block_is_fatal() {
    let scope_users = users();
    let scope = Scope::new(&scope_users, Dialect::SQLite);
    let err = process("SELECT 1 {{if notnull=a}} AND x", &scope).unwrap_err();
    assert!(matches!(err, StencilError::UnmatchedBlock { ref name, .. } if name == "if"));

    let err = process("SELECT 1 {{/if}}", &scope).unwrap_err();
    assert!(matches!(err, StencilError::UnmatchedBlock { .. }));
}

#[test]
fn test_unknown_verb_is_fatal() {
    let schema = users();
    let err = process(
        "{{if blank=a}}x{{/if}}",
        &Scope::new(&schema, Dialect::SQLite),
    )
    .unwrap_err();
    assert!(matches!(err, StencilError::UnknownConditionVerb { ref verb, .. } if verb == "blank"));
}

#[test]
fn test_resolved_text_is_not_rescanned() {
    let params = Parameters::new().with("filter", "WHERE note = '{{table}}'");
    let result = render_with(
        "SELECT * FROM {{table}} {{where --param filter}}",
        &users(),
        Dialect::SQLite,
        &params,
    );
    assert_eq!(result.sql, "SELECT * FROM [users] WHERE note = '{{table}}'");
}

#[test]
fn test_dynamic_placeholder_is_flagged() {
    let result = render("SELECT * FROM {{@tableName}}", &users(), Dialect::SQLite);
    assert_eq!(result.sql, "SELECT * FROM {{@tableName}}");
    assert!(result.has_unresolved_dynamic_placeholder);
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_invalid_options_fall_back() {
    let result = render("{{columns --exclud Id}}", &users(), Dialect::SQLite);
    assert_eq!(result.sql, "[id], [name], [created_at]");
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(
        result.diagnostics[0].message,
        "unknown option --exclud; options ignored"
    );

    let malformed = render("{{orderby --}}", &users(), Dialect::SQLite);
    assert_eq!(malformed.sql, "ORDER BY [id] ASC");
    assert_eq!(malformed.diagnostics.len(), 1);
}

#[test]
fn test_placeholder_names_are_case_insensitive() {
    assert_eq!(
        render("{{TABLE}} {{Bool_True}}", &users(), Dialect::PostgreSql).sql,
        "\"users\" true"
    );
}

#[test]
fn test_table_override() {
    let schema = users();
    let scope = Scope::new(&schema, Dialect::SqlServer).table("dbo.users_archive");
    assert_eq!(
        process("{{table}}", &scope).unwrap().sql,
        "[dbo].[users_archive]"
    );
}

#[test]
fn test_registered_placeholder_overrides_builtin() {
    let mut registry = PlaceholderRegistry::with_builtins();
    registry.register(
        "table",
        |ctx: &PlaceholderContext<'_>, _: &Invocation| -> crate::error::StencilResult<Resolved> {
            Ok(Resolved::text(format!("main.{}", ctx.table())))
        },
    );
    registry.register(
        "tenant",
        |ctx: &PlaceholderContext<'_>, _: &Invocation| -> crate::error::StencilResult<Resolved> {
            Ok(Resolved::text(ctx.generator().parameter("tenant_id")))
        },
    );

    let schema = users();
    let scope = Scope::new(&schema, Dialect::SQLite);
    let result = TemplateProcessor::new(&registry)
        .process("SELECT * FROM {{table}} WHERE tenant = {{tenant}}", &scope)
        .unwrap();
    assert_eq!(result.sql, "SELECT * FROM main.users WHERE tenant = @tenant_id");
    assert!(result.diagnostics.is_empty());
}

#[test]
fn test_runtime_parameters_are_returned() {
    let params = Parameters::new().with("id", 7);
    let result = render_with("SELECT * FROM {{table}} WHERE id = @id", &users(), Dialect::SQLite, &params);
    assert_eq!(result.parameters.get("id"), Some(&Value::Int(7)));
}
