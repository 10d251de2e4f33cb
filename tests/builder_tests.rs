// tests/builder_tests.rs

use std::sync::Arc;

use aip_filter::builder::{
    Builder, NestedBuilder, NestedFn, functions, nested_column, operators_from_builder,
};
use aip_filter::error::{CallbackResult, CompileError, Error};
use aip_filter::schema::{Column, Declaration};
use aip_filter::value::Value;

/// Renders SQL for columns of one table.
struct Sql {
    table: &'static str,
}

impl Builder<String> for Sql {
    fn standalone(&self, value: &Value) -> CallbackResult<String> {
        Ok(match value {
            Value::Ident(field) => format!("\"{}\".\"{}\"", self.table, field),
            Value::Str(s) => format!("'{}'", s),
            Value::Boolean(true) => "TRUE".to_string(),
            Value::Boolean(false) => "FALSE".to_string(),
            Value::Wildcard => return Err("wildcard".into()),
            other => other.to_string(),
        })
    }

    fn function(&self, operator: &str, _: Option<String>, args: Vec<String>) -> CallbackResult<String> {
        match (operator, args.as_slice()) {
            (functions::AND, _) => Ok(args.join(" AND ")),
            (functions::OR, _) => Ok(args.join(" OR ")),
            (functions::NOT, [arg]) => Ok(format!("NOT ({})", arg)),
            (functions::ASC, [field]) => Ok(field.clone()),
            (functions::DESC, [field]) => Ok(format!("{} DESC", field)),
            (":", [lhs, rhs]) => Ok(format!("{} LIKE {}", lhs, rhs)),
            ("!=", [lhs, rhs]) => Ok(format!("{} <> {}", lhs, rhs)),
            (op, [lhs, rhs]) => Ok(format!("{} {} {}", lhs, op, rhs)),
            (op, _) => Err(format!("unexpected call to {}", op).into()),
        }
    }
}

impl NestedBuilder<String> for Sql {
    fn has_nested(&self, field: &[String], build: NestedFn<'_, String>) -> CallbackResult<String> {
        if field.len() != 1 || field[0] != "pets" {
            return Err("unknown relation".into());
        }
        let inner = build(self)?;
        Ok(format!(
            "\"{}\".\"id\" IN (SELECT \"owner_id\" FROM \"pets\" WHERE {})",
            self.table, inner
        ))
    }
}

fn declaration() -> Declaration<String> {
    let pets = Declaration::<String>::builder()
        .column(Column::new("name").filterable())
        .operators(operators_from_builder(Arc::new(Sql { table: "pets" })))
        .build()
        .unwrap();

    let users = Arc::new(Sql { table: "users" });
    Declaration::builder()
        .column(Column::new("id").filterable())
        .column(Column::new("age").filterable().sortable())
        .column(nested_column(Arc::clone(&users), "pets", pets))
        .operators(operators_from_builder(users))
        .build()
        .unwrap()
}

#[test]
fn test_filters_through_builder() {
    let declaration = declaration();

    let test_cases = vec![
        ("id = 1", "\"users\".\"id\" = 1"),
        ("1 = id", "\"users\".\"id\" = 1"),
        ("age >= 2.5", "\"users\".\"age\" >= 2.5"),
        ("id != age", "\"users\".\"id\" <> \"users\".\"age\""),
        ("id:'x'", "\"users\".\"id\" LIKE 'x'"),
        ("id", "\"users\".\"id\" = TRUE"),
        ("id = 1 AND age < 3", "\"users\".\"id\" = 1 AND \"users\".\"age\" < 3"),
        ("-id = 1", "NOT (\"users\".\"id\" = 1)"),
        ("1 = 1", "TRUE"),
        ("''", "FALSE"),
    ];

    for (input, expected) in test_cases {
        assert_eq!(declaration.filter(input).unwrap(), expected, "Failed for input: {}", input);
    }
}

#[test]
fn test_nested_through_builder() {
    let declaration = declaration();

    // has_nested passes the "users" builder, but the inner filter is
    // rendered by the nested declaration's "pets" operators.

    assert_eq!(
        declaration.filter("pets:(name = 'cat' OR name = 'dog')").unwrap(),
        "\"users\".\"id\" IN (SELECT \"owner_id\" FROM \"pets\" WHERE \"pets\".\"name\" = 'cat' OR \"pets\".\"name\" = 'dog')"
    );
}

#[test]
fn test_order_by_through_builder() {
    let declaration = declaration();
    assert_eq!(
        declaration.order_by("age desc, age").unwrap(),
        vec!["\"users\".\"age\" DESC", "\"users\".\"age\""]
    );
}

#[test]
fn test_builder_errors_are_callback_errors() {
    let owners = Declaration::<String>::builder()
        .column(Column::new("name").filterable())
        .operators(operators_from_builder(Arc::new(Sql { table: "owners" })))
        .build()
        .unwrap();
    let users = Arc::new(Sql { table: "users" });
    let declaration = Declaration::<String>::builder()
        .column(nested_column(Arc::clone(&users), "owners", owners))
        .operators(operators_from_builder(users))
        .build()
        .unwrap();

    let err = match declaration.filter("owners:(name = 'x')") {
        Err(Error::Compile(e)) => e,
        other => panic!("expected compile error, got {:?}", other),
    };
    assert!(matches!(&err, CompileError::Callback { operator, .. } if operator == "owners"));
    assert_eq!(err.to_string(), "operator 'owners' failed: unknown relation");
}

#[test]
fn test_standard_table_is_complete() {
    let operators = operators_from_builder::<String, _>(Arc::new(Sql { table: "t" }));
    let mut names: Vec<_> = operators.iter().map(|op| op.name().to_string()).collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "!=", ":", "<", "<=", "=", ">", ">=", "_and", "_asc", "_desc", "_false", "_not", "_or",
            "_true"
        ]
    );
}
