//! DELETE lowering.

use sqlparser::ast as sql;

use crate::ast::{Delete, Statement};
use crate::error::{Error, Result};
use crate::processor::clauses::{self, FilterContext};

/// Lower a DELETE. Same predicate restriction as UPDATE, no SET clause.
pub fn process_delete(delete: &sql::Delete) -> Result<Statement> {
    if !delete.tables.is_empty() {
        return Err(Error::unsupported("Multi-table DELETE is not supported"));
    }
    if delete.using.is_some() {
        return Err(Error::unsupported("DELETE ... USING is not supported"));
    }

    let relations = match &delete.from {
        sql::FromTable::WithFromKeyword(tables) | sql::FromTable::WithoutKeyword(tables) => tables,
    };
    let [from] = relations.as_slice() else {
        return Err(Error::unsupported(
            "DELETE requires exactly one target table",
        ));
    };
    if !from.joins.is_empty() {
        return Err(Error::unsupported("Joined DELETE targets are not supported"));
    }

    let table = clauses::table_name(&from.relation)?;

    let ctx = FilterContext { table: &table };
    let filter = delete
        .selection
        .as_ref()
        .map(|expr| clauses::process_where_clause(expr, &ctx))
        .transpose()?;
    if let Some(filter) = &filter {
        clauses::ensure_basic_filter(filter)?;
    }

    let returning = delete
        .returning
        .as_deref()
        .map(clauses::returning_columns)
        .transpose()?
        .unwrap_or_default();

    Ok(Statement::Delete(Delete {
        from: table,
        filter,
        returning,
    }))
}
