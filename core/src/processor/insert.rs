//! INSERT lowering.

use sqlparser::ast as sql;

use crate::ast::{Insert, Statement, Value};
use crate::error::{Error, Result};
use crate::processor::clauses;

/// Lower an INSERT. Only literal VALUES rows are in subset; `INSERT ...
/// SELECT`, `ON CONFLICT`, expressions and subqueries are each rejected.
pub fn process_insert(insert: &sql::Insert) -> Result<Statement> {
    if insert.on.is_some() {
        return Err(Error::unsupported("ON CONFLICT clauses are not supported"));
    }

    let into = match &insert.table {
        sql::TableObject::TableName(name) => clauses::object_name(name),
        other => {
            return Err(Error::unsupported(format!(
                "\"{}\" is not a plain table reference",
                other
            )));
        }
    };

    let columns: Vec<String> = insert
        .columns
        .iter()
        .map(|column| column.value.clone())
        .collect();

    let Some(source) = &insert.source else {
        return Err(Error::unsupported("INSERT requires a VALUES clause"));
    };
    let rows = match source.body.as_ref() {
        sql::SetExpr::Values(values) => &values.rows,
        sql::SetExpr::Select(_) => {
            return Err(Error::unsupported("INSERT ... SELECT is not supported"));
        }
        _ => return Err(Error::unsupported("INSERT requires a VALUES clause")),
    };

    let mut value_rows: Vec<Vec<Value>> = Vec::with_capacity(rows.len());
    for row in rows {
        let row: Vec<Value> = row
            .iter()
            .map(clauses::scalar_value)
            .collect::<Result<_>>()?;
        if !columns.is_empty() && row.len() != columns.len() {
            return Err(Error::unsupported(
                "INSERT rows must match the number of target columns",
            ));
        }
        if let Some(first) = value_rows.first()
            && row.len() != first.len()
        {
            return Err(Error::unsupported(
                "INSERT rows must all have the same number of values",
            ));
        }
        value_rows.push(row);
    }
    if value_rows.is_empty() {
        return Err(Error::unsupported("INSERT requires at least one row"));
    }

    let returning = insert
        .returning
        .as_deref()
        .map(clauses::returning_columns)
        .transpose()?
        .unwrap_or_default();

    Ok(Statement::Insert(Insert {
        into,
        columns,
        values: value_rows,
        returning,
    }))
}
