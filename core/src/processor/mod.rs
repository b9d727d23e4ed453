//! SQL statement processing: parse one statement and lower it to the IR.
//!
//! ```text
//! SQL String → sqlparser AST → per-kind processor → Statement IR
//! ```
//!
//! Processing is fail-fast: the first unsupported construct aborts the
//! statement with a message naming the construct. No partial IR is ever
//! returned.

mod clauses;
mod delete;
mod hint;
mod insert;
mod select;
mod update;

#[cfg(test)]
mod tests;

use sqlparser::ast as sql;
use sqlparser::dialect::PostgreSqlDialect;
use sqlparser::parser::Parser;

use crate::ast::Statement;
use crate::error::{Error, Result};

/// Parse a single SQL statement and lower it to a [`Statement`].
pub fn process(input: &str) -> Result<Statement> {
    let parsed = Parser::parse_sql(&PostgreSqlDialect {}, input)
        .map_err(|e| hint::parsing_error(&e, input))?;

    let mut statements = parsed.into_iter();
    let Some(statement) = statements.next() else {
        return Err(Error::unsupported("Expected a statement, but received none"));
    };
    if statements.next().is_some() {
        return Err(Error::unsupported(
            "Expected a single statement, but received multiple",
        ));
    }

    process_statement(&statement)
}

fn process_statement(statement: &sql::Statement) -> Result<Statement> {
    match statement {
        sql::Statement::Query(query) => select::process_query(query),
        sql::Statement::Insert(insert) => insert::process_insert(insert),
        sql::Statement::Update {
            table,
            assignments,
            from,
            selection,
            returning,
            ..
        } => update::process_update(table, assignments, from, selection, returning),
        sql::Statement::Delete(delete) => delete::process_delete(delete),
        sql::Statement::Explain { .. } | sql::Statement::ExplainTable { .. } => Err(
            Error::unimplemented("EXPLAIN statements are not implemented"),
        ),
        other => Err(Error::unsupported(format!(
            "{} statements are not supported",
            statement_keyword(other)
        ))),
    }
}

/// A human keyword for an out-of-subset statement, taken from its leading
/// SQL words so the dispatcher needs no per-kind match.
fn statement_keyword(statement: &sql::Statement) -> String {
    let text = statement.to_string();
    let mut words = text.split_whitespace().map(str::to_uppercase);
    let Some(first) = words.next() else {
        return "These".to_string();
    };
    if matches!(first.as_str(), "CREATE" | "ALTER" | "DROP") {
        // Skip modifiers so "CREATE OR REPLACE VIEW" reads "CREATE VIEW".
        for word in words {
            if !matches!(
                word.as_str(),
                "OR" | "REPLACE" | "UNIQUE" | "TEMP" | "TEMPORARY" | "MATERIALIZED" | "RECURSIVE"
            ) {
                return format!("{} {}", first, word);
            }
        }
    }
    first
}
