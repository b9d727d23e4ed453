//! Shared clause extractors used by every statement processor.

use sqlparser::ast as sql;

use crate::ast::{ColumnFilter, Filter, LogicalFilter, LogicalOp, Operator, Value};
use crate::error::{Error, Result};

/// Context for the WHERE walker.
pub struct FilterContext<'a> {
    /// The statement's primary relation; its qualifier is stripped from
    /// column references (`books.id` filters as `id`).
    pub table: &'a str,
}

/// Extract a plain table name. Aliases and derived tables are out of subset.
pub fn table_name(factor: &sql::TableFactor) -> Result<String> {
    match factor {
        sql::TableFactor::Table {
            name, alias: None, ..
        } => Ok(object_name(name)),
        sql::TableFactor::Table { .. } => {
            Err(Error::unsupported("Table aliases are not supported"))
        }
        sql::TableFactor::Derived { .. } => {
            Err(Error::unsupported("Subqueries in FROM are not supported"))
        }
        other => Err(Error::unsupported(format!(
            "\"{}\" is not a plain table reference",
            other
        ))),
    }
}

/// Dotted name from an ObjectName, without identifier quoting.
pub fn object_name(name: &sql::ObjectName) -> String {
    name.0
        .iter()
        .map(|part| match part {
            sql::ObjectNamePart::Identifier(ident) => ident.value.clone(),
            other => other.to_string(),
        })
        .collect::<Vec<_>>()
        .join(".")
}

/// The last segment of a possibly-qualified name (`t.col` keeps `col`).
pub fn last_segment(name: &sql::ObjectName) -> String {
    match name.0.last() {
        Some(sql::ObjectNamePart::Identifier(ident)) => ident.value.clone(),
        Some(other) => other.to_string(),
        None => String::new(),
    }
}

/// Lower a literal expression to a scalar atom. Everything non-constant is
/// rejected; the caller decides where the atom may appear.
pub fn scalar_value(expr: &sql::Expr) -> Result<Value> {
    match expr {
        sql::Expr::Value(value) => match &value.value {
            sql::Value::Number(text, _) => number_value(text),
            sql::Value::SingleQuotedString(text) => Ok(Value::String(text.clone())),
            sql::Value::Boolean(b) => Ok(Value::Bool(*b)),
            sql::Value::Null => Ok(Value::Null),
            sql::Value::Placeholder(_) => Err(Error::unsupported(
                "Bind parameters are not supported; inline the value",
            )),
            other => Err(Error::unsupported(format!(
                "\"{}\" literals are not supported",
                other
            ))),
        },
        sql::Expr::UnaryOp {
            op: sql::UnaryOperator::Minus,
            expr,
        } => match scalar_value(expr)? {
            Value::Int(n) => Ok(Value::Int(-n)),
            Value::Float(n) => Ok(Value::Float(-n)),
            _ => Err(Error::unsupported("Only numbers can be negated")),
        },
        sql::Expr::UnaryOp {
            op: sql::UnaryOperator::Plus,
            expr,
        } => scalar_value(expr),
        sql::Expr::Nested(inner) => scalar_value(inner),
        sql::Expr::Identifier(_) | sql::Expr::CompoundIdentifier(_) => Err(Error::unsupported(
            "Column references are not supported where a constant value is expected",
        )),
        sql::Expr::Subquery(_) => Err(Error::unsupported("Subqueries are not supported")),
        other => Err(Error::unsupported(format!(
            "Expressions are not supported where a constant value is expected, found \"{}\"",
            other
        ))),
    }
}

fn number_value(text: &str) -> Result<Value> {
    if let Ok(n) = text.parse::<i64>() {
        return Ok(Value::Int(n));
    }
    text.parse::<f64>().map(Value::Float).map_err(|_| {
        Error::unsupported(format!("\"{}\" is not a supported numeric literal", text))
    })
}

/// RETURNING lists accept plain column references and `*` only. A qualified
/// reference keeps its last segment.
pub fn returning_columns(items: &[sql::SelectItem]) -> Result<Vec<String>> {
    items
        .iter()
        .map(|item| match item {
            sql::SelectItem::UnnamedExpr(sql::Expr::Identifier(ident)) => Ok(ident.value.clone()),
            sql::SelectItem::UnnamedExpr(sql::Expr::CompoundIdentifier(parts)) => Ok(parts
                .last()
                .map(|part| part.value.clone())
                .unwrap_or_default()),
            sql::SelectItem::Wildcard(_) => Ok("*".to_string()),
            sql::SelectItem::ExprWithAlias { .. } => Err(Error::unsupported(
                "Aliased RETURNING columns are not supported",
            )),
            _ => Err(Error::unsupported(
                "RETURNING supports plain column references only",
            )),
        })
        .collect()
}

/// Lower a WHERE expression to a [`Filter`] tree.
///
/// `NOT` folds into the `negate` flag of the node it encloses, and adjacent
/// same-operator `AND`/`OR` chains collapse into one logical node.
pub fn process_where_clause(expr: &sql::Expr, ctx: &FilterContext<'_>) -> Result<Filter> {
    match expr {
        sql::Expr::Nested(inner) => process_where_clause(inner, ctx),
        sql::Expr::UnaryOp {
            op: sql::UnaryOperator::Not,
            expr,
        } => Ok(process_where_clause(expr, ctx)?.negated()),
        sql::Expr::BinaryOp {
            left,
            op: sql::BinaryOperator::And,
            right,
        } => logical_filter(LogicalOp::And, left, right, ctx),
        sql::Expr::BinaryOp {
            left,
            op: sql::BinaryOperator::Or,
            right,
        } => logical_filter(LogicalOp::Or, left, right, ctx),
        sql::Expr::BinaryOp { left, op, right } if op.to_string() == "@@" => {
            text_search_filter(left, right, ctx)
        }
        sql::Expr::BinaryOp { left, op, right } => Ok(Filter::Column(ColumnFilter {
            column: filter_column(left, ctx)?,
            operator: comparison_operator(op)?,
            value: scalar_value(right)?,
            negate: false,
        })),
        sql::Expr::Like {
            negated,
            expr,
            pattern,
            ..
        } => pattern_filter(Operator::Like, *negated, expr, pattern, ctx),
        sql::Expr::ILike {
            negated,
            expr,
            pattern,
            ..
        } => pattern_filter(Operator::Ilike, *negated, expr, pattern, ctx),
        sql::Expr::IsNull(inner) => is_filter(inner, Value::Null, false, ctx),
        sql::Expr::IsNotNull(inner) => is_filter(inner, Value::Null, true, ctx),
        sql::Expr::IsTrue(inner) => is_filter(inner, Value::Bool(true), false, ctx),
        sql::Expr::IsNotTrue(inner) => is_filter(inner, Value::Bool(true), true, ctx),
        sql::Expr::IsFalse(inner) => is_filter(inner, Value::Bool(false), false, ctx),
        sql::Expr::IsNotFalse(inner) => is_filter(inner, Value::Bool(false), true, ctx),
        sql::Expr::InList {
            expr,
            list,
            negated,
        } => {
            let values = list.iter().map(scalar_value).collect::<Result<Vec<_>>>()?;
            Ok(Filter::Column(ColumnFilter {
                column: filter_column(expr, ctx)?,
                operator: Operator::In,
                value: Value::List(values),
                negate: *negated,
            }))
        }
        sql::Expr::InSubquery { .. } => Err(Error::unsupported(
            "Subqueries are not supported in WHERE clauses",
        )),
        sql::Expr::Between { .. } => {
            Err(Error::unsupported("BETWEEN predicates are not supported"))
        }
        sql::Expr::Exists { .. } => Err(Error::unsupported("EXISTS predicates are not supported")),
        sql::Expr::IsDistinctFrom(..) | sql::Expr::IsNotDistinctFrom(..) => Err(
            Error::unsupported("IS DISTINCT FROM predicates are not supported"),
        ),
        other => Err(Error::unsupported(format!(
            "Unsupported WHERE expression: \"{}\"",
            other
        ))),
    }
}

/// UPDATE and DELETE predicates allow basic operators only. Logical nodes
/// are traversed but not themselves restricted, so a negated `or` of basic
/// predicates passes.
pub fn ensure_basic_filter(filter: &Filter) -> Result<()> {
    match filter {
        Filter::Column(column) if !column.operator.is_basic() => {
            Err(Error::unsupported(format!(
                "\"{}\" filters are not supported in UPDATE and DELETE statements",
                column.operator
            )))
        }
        Filter::Column(_) => Ok(()),
        Filter::Logical(logical) => logical.values.iter().try_for_each(ensure_basic_filter),
    }
}

fn logical_filter(
    operator: LogicalOp,
    left: &sql::Expr,
    right: &sql::Expr,
    ctx: &FilterContext<'_>,
) -> Result<Filter> {
    let mut values = Vec::new();
    merge_child(operator, process_where_clause(left, ctx)?, &mut values);
    merge_child(operator, process_where_clause(right, ctx)?, &mut values);
    Ok(Filter::Logical(LogicalFilter {
        operator,
        values,
        negate: false,
    }))
}

/// Splice a same-operator, non-negated child into its parent so `a AND b
/// AND c` becomes one three-way node instead of a nested pair.
fn merge_child(operator: LogicalOp, child: Filter, values: &mut Vec<Filter>) {
    match child {
        Filter::Logical(logical) if logical.operator == operator && !logical.negate => {
            values.extend(logical.values);
        }
        child => values.push(child),
    }
}

fn pattern_filter(
    operator: Operator,
    negated: bool,
    expr: &sql::Expr,
    pattern: &sql::Expr,
    ctx: &FilterContext<'_>,
) -> Result<Filter> {
    let value = match scalar_value(pattern)? {
        value @ Value::String(_) => value,
        _ => {
            return Err(Error::unsupported(
                "LIKE patterns must be string literals",
            ));
        }
    };
    Ok(Filter::Column(ColumnFilter {
        column: filter_column(expr, ctx)?,
        operator,
        value,
        negate: negated,
    }))
}

fn is_filter(
    expr: &sql::Expr,
    value: Value,
    negate: bool,
    ctx: &FilterContext<'_>,
) -> Result<Filter> {
    Ok(Filter::Column(ColumnFilter {
        column: filter_column(expr, ctx)?,
        operator: Operator::Is,
        value,
        negate,
    }))
}

/// Map a SQL comparison to its PostgREST operator. Postgres-specific range
/// and array operators arrive under version-dependent names, so the exotic
/// ones match on their symbol.
fn comparison_operator(op: &sql::BinaryOperator) -> Result<Operator> {
    Ok(match op {
        sql::BinaryOperator::Eq => Operator::Eq,
        sql::BinaryOperator::NotEq => Operator::Neq,
        sql::BinaryOperator::Gt => Operator::Gt,
        sql::BinaryOperator::GtEq => Operator::Gte,
        sql::BinaryOperator::Lt => Operator::Lt,
        sql::BinaryOperator::LtEq => Operator::Lte,
        other => match other.to_string().as_str() {
            "@>" => Operator::Cs,
            "<@" => Operator::Cd,
            "&&" => Operator::Ov,
            "<<" => Operator::Sl,
            ">>" => Operator::Sr,
            "&<" => Operator::Nxr,
            "&>" => Operator::Nxl,
            "-|-" => Operator::Adj,
            symbol => {
                return Err(Error::unsupported(format!(
                    "The \"{}\" operator is not supported",
                    symbol
                )));
            }
        },
    })
}

/// The tsquery constructors PostgREST can express, by full-text flavor.
const TSQUERY_FUNCTIONS: &[(&str, Operator)] = &[
    ("to_tsquery", Operator::Fts),
    ("plainto_tsquery", Operator::Plfts),
    ("phraseto_tsquery", Operator::Phfts),
    ("websearch_to_tsquery", Operator::Wfts),
];

/// Lower `col @@ to_tsquery('…')` and friends. A bare string on the right
/// means plain `fts`; `to_tsvector(col)` on the left unwraps to the column.
fn text_search_filter(
    left: &sql::Expr,
    right: &sql::Expr,
    ctx: &FilterContext<'_>,
) -> Result<Filter> {
    let column = match left {
        sql::Expr::Function(func) => {
            if function_name(func)? != "to_tsvector" {
                return Err(Error::unsupported(
                    "The left side of @@ must be a column or to_tsvector(column)",
                ));
            }
            match single_function_arg(func)? {
                arg @ (sql::Expr::Identifier(_) | sql::Expr::CompoundIdentifier(_)) => {
                    filter_column(arg, ctx)?
                }
                _ => {
                    return Err(Error::unsupported(
                        "to_tsvector accepts a single column argument",
                    ));
                }
            }
        }
        other => filter_column(other, ctx)?,
    };

    let (operator, query) = match right {
        sql::Expr::Function(func) => {
            let name = function_name(func)?;
            let Some((_, operator)) = TSQUERY_FUNCTIONS.iter().find(|(n, _)| *n == name) else {
                return Err(Error::unsupported(format!(
                    "\"{}\" is not a supported tsquery function",
                    name
                )));
            };
            match scalar_value(single_function_arg(func)?)? {
                Value::String(query) => (*operator, query),
                _ => {
                    return Err(Error::unsupported(
                        "tsquery functions take a string literal argument",
                    ));
                }
            }
        }
        other => match scalar_value(other)? {
            Value::String(query) => (Operator::Fts, query),
            _ => {
                return Err(Error::unsupported(
                    "Full-text search requires a tsquery call or a string literal",
                ));
            }
        },
    };

    Ok(Filter::Column(ColumnFilter {
        column,
        operator,
        value: Value::String(query),
        negate: false,
    }))
}

/// Single-part function name, lowercased.
pub fn function_name(func: &sql::Function) -> Result<String> {
    match func.name.0.as_slice() {
        [sql::ObjectNamePart::Identifier(ident)] => Ok(ident.value.to_ascii_lowercase()),
        _ => Err(Error::unsupported(format!(
            "\"{}\" is not a supported function name",
            func.name
        ))),
    }
}

/// A function's positional arguments; named or clause-bearing argument
/// lists are out of subset.
pub fn function_args(func: &sql::Function) -> Result<&[sql::FunctionArg]> {
    match &func.args {
        sql::FunctionArguments::List(list) => {
            if list.duplicate_treatment.is_some() {
                return Err(Error::unsupported("DISTINCT aggregates are not supported"));
            }
            Ok(&list.args)
        }
        sql::FunctionArguments::None => Ok(&[]),
        sql::FunctionArguments::Subquery(_) => {
            Err(Error::unsupported("Subqueries are not supported"))
        }
    }
}

fn single_function_arg(func: &sql::Function) -> Result<&sql::Expr> {
    match function_args(func)? {
        [sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Expr(expr))] => Ok(expr),
        [_, _, ..] => Err(Error::unsupported(
            "tsquery language arguments are not supported",
        )),
        _ => Err(Error::unsupported(format!(
            "\"{}\" requires a single argument",
            func.name
        ))),
    }
}

/// The column side of a predicate: a plain or qualified reference, with the
/// primary relation's qualifier stripped.
fn filter_column(expr: &sql::Expr, ctx: &FilterContext<'_>) -> Result<String> {
    match expr {
        sql::Expr::Identifier(ident) => Ok(ident.value.clone()),
        sql::Expr::CompoundIdentifier(parts) => Ok(qualified_name(parts, ctx)),
        sql::Expr::Nested(inner) => filter_column(inner, ctx),
        other => Err(Error::unsupported(format!(
            "Filters must compare a column, found \"{}\"",
            other
        ))),
    }
}

fn qualified_name(parts: &[sql::Ident], ctx: &FilterContext<'_>) -> String {
    let names: Vec<&str> = parts.iter().map(|part| part.value.as_str()).collect();
    match names.split_first() {
        Some((first, rest)) if *first == ctx.table && !rest.is_empty() => rest.join("."),
        _ => names.join("."),
    }
}
