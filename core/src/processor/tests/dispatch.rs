use crate::error::Error;
use crate::processor::process;

#[test]
fn test_empty_input() {
    let err = process("").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("Expected a statement, but received none")
    );
}

#[test]
fn test_multiple_statements() {
    let err = process("select * from a; select * from b").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("Expected a single statement, but received multiple")
    );
}

#[test]
fn test_out_of_subset_statement() {
    let err = process("create table books (id int)").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("CREATE TABLE statements are not supported")
    );
}

#[test]
fn test_truncate_is_unsupported() {
    let err = process("truncate books").unwrap_err();
    let Error::Unsupported(message) = err else {
        panic!("expected an unsupported error, got {err:?}");
    };
    assert!(message.starts_with("TRUNCATE"), "got: {message}");
}

#[test]
fn test_explain_is_unimplemented() {
    let err = process("explain select * from books").unwrap_err();
    assert_eq!(
        err,
        Error::unimplemented("EXPLAIN statements are not implemented")
    );
}

#[test]
fn test_syntax_error_carries_cursor_and_hint() {
    let err = process("select * frum books").unwrap_err();
    let Error::Parsing(parsing) = err else {
        panic!("expected a parsing error, got {err:?}");
    };
    assert!(parsing.cursor.is_some());
    assert!(!parsing.hint.is_empty());
}

#[test]
fn test_incomplete_statement_hint() {
    let err = process("select * from").unwrap_err();
    let Error::Parsing(parsing) = err else {
        panic!("expected a parsing error, got {err:?}");
    };
    assert_eq!(parsing.hint, "the statement looks incomplete");
}
