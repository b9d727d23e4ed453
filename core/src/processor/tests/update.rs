use crate::ast::*;
use crate::error::Error;
use crate::processor::process;

fn process_update(sql: &str) -> Update {
    match process(sql).unwrap() {
        Statement::Update(update) => update,
        other => panic!("expected an update, got {other:?}"),
    }
}

#[test]
fn test_set_and_filter() {
    let update = process_update("update books set year = 2000 where id = 1 returning id, year");
    assert_eq!(
        update,
        Update {
            table: "books".to_string(),
            set: vec![("year".to_string(), Value::Int(2000))],
            filter: Some(Filter::column("id", Operator::Eq, 1i64)),
            returning: vec!["id".to_string(), "year".to_string()],
        }
    );
}

#[test]
fn test_multiple_assignments_keep_order() {
    let update = process_update("update books set title = 'X', year = 2000, available = false");
    assert_eq!(
        update.set,
        vec![
            ("title".to_string(), Value::String("X".to_string())),
            ("year".to_string(), Value::Int(2000)),
            ("available".to_string(), Value::Bool(false)),
        ]
    );
}

#[test]
fn test_set_expression_fails() {
    let err = process("update books set year = year + 1").unwrap_err();
    let Error::Unsupported(message) = err else {
        panic!("expected an unsupported error, got {err:?}");
    };
    assert!(message.contains("constant value"), "got: {message}");
}

#[test]
fn test_set_column_reference_fails() {
    let err = process("update books set year = published_year").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("Column references are not supported where a constant value is expected")
    );
}

#[test]
fn test_non_basic_operator_fails() {
    let err = process("update books set year = 2000 where title like 'The %'").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("\"like\" filters are not supported in UPDATE and DELETE statements")
    );
}

#[test]
fn test_nested_non_basic_operator_fails() {
    let err =
        process("update books set year = 2000 where id = 1 or deleted_at is null").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("\"is\" filters are not supported in UPDATE and DELETE statements")
    );
}

#[test]
fn test_negated_or_of_basic_predicates_passes() {
    let update = process_update("update books set year = 2000 where not (id = 1 or id = 2)");
    assert_eq!(
        update.filter,
        Some(
            Filter::or(vec![
                Filter::column("id", Operator::Eq, 1i64),
                Filter::column("id", Operator::Eq, 2i64),
            ])
            .negated()
        )
    );
}

#[test]
fn test_update_from_fails() {
    let err = process("update books set year = 2000 from archive where archive.id = books.id")
        .unwrap_err();
    assert_eq!(err, Error::unsupported("UPDATE ... FROM is not supported"));
}
