//! Filter tree → query parameters, with AND-flattening at the root.

use crate::ast::{ColumnFilter, Filter, LogicalFilter, LogicalOp, Value};
use crate::render::encode::quote_literal;
use crate::render::http::Params;

/// Emit one top-level filter. A non-negated `and` at the root flattens into
/// separate parameters, recursively; every other node becomes a single
/// `(key, value)` pair.
pub fn append_filter(filter: &Filter, params: &mut Params) {
    match filter {
        Filter::Logical(logical) if logical.operator == LogicalOp::And && !logical.negate => {
            for child in &logical.values {
                append_filter(child, params);
            }
        }
        Filter::Column(column) => params.push(column.column.clone(), column_value(column)),
        Filter::Logical(logical) => {
            params.push(logical.operator.keyword(), logical_value(logical))
        }
    }
}

/// `[not.]op.operand` — the parameter value of a column filter.
fn column_value(filter: &ColumnFilter) -> String {
    let not = if filter.negate { "not." } else { "" };
    format!("{}{}.{}", not, filter.operator.keyword(), operand(&filter.value))
}

/// `[not.](child,child,…)` — the parameter value of a logical filter.
fn logical_value(filter: &LogicalFilter) -> String {
    let not = if filter.negate { "not." } else { "" };
    let children: Vec<String> = filter.values.iter().map(nested).collect();
    format!("{}({})", not, children.join(","))
}

/// Serialize a filter in nested form. `and`/`or` below the root never
/// flatten; they serialize as `and(…)`/`or(…)`.
fn nested(filter: &Filter) -> String {
    match filter {
        Filter::Column(column) => format!("{}.{}", column.column, column_value(column)),
        Filter::Logical(logical) => {
            let not = if logical.negate { "not." } else { "" };
            let children: Vec<String> = logical.values.iter().map(nested).collect();
            format!("{}{}({})", not, logical.operator.keyword(), children.join(","))
        }
    }
}

/// A filter operand: `in` lists render parenthesized, `is` keywords and
/// scalars render bare, strings are quoted when they contain syntax.
fn operand(value: &Value) -> String {
    match value {
        Value::List(values) => {
            let items: Vec<String> = values.iter().map(operand).collect();
            format!("({})", items.join(","))
        }
        Value::String(s) => quote_literal(s),
        scalar => scalar.to_string(),
    }
}
