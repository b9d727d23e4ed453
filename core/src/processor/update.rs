//! UPDATE lowering.

use sqlparser::ast as sql;

use crate::ast::{Statement, Update};
use crate::error::{Error, Result};
use crate::processor::clauses::{self, FilterContext};

/// Lower an UPDATE. SET values must be literal atoms, and the predicate is
/// restricted to the basic operator set.
pub fn process_update(
    table: &sql::TableWithJoins,
    assignments: &[sql::Assignment],
    from: &Option<sql::UpdateTableFromKind>,
    selection: &Option<sql::Expr>,
    returning: &Option<Vec<sql::SelectItem>>,
) -> Result<Statement> {
    if !table.joins.is_empty() {
        return Err(Error::unsupported(
            "Joined UPDATE targets are not supported",
        ));
    }
    if from.is_some() {
        return Err(Error::unsupported("UPDATE ... FROM is not supported"));
    }

    let table = clauses::table_name(&table.relation)?;

    let mut set = Vec::with_capacity(assignments.len());
    for assignment in assignments {
        let column = match &assignment.target {
            sql::AssignmentTarget::ColumnName(name) => clauses::last_segment(&name),
            sql::AssignmentTarget::Tuple(_) => {
                return Err(Error::unsupported(
                    "Composite SET targets are not supported",
                ));
            }
        };
        set.push((column, clauses::scalar_value(&assignment.value)?));
    }

    let ctx = FilterContext { table: &table };
    let filter = selection
        .as_ref()
        .map(|expr| clauses::process_where_clause(expr, &ctx))
        .transpose()?;
    if let Some(filter) = &filter {
        clauses::ensure_basic_filter(filter)?;
    }

    let returning = returning
        .as_deref()
        .map(clauses::returning_columns)
        .transpose()?
        .unwrap_or_default();

    Ok(Statement::Update(Update {
        table,
        set,
        filter,
        returning,
    }))
}
