//! SELECT lowering.

use sqlparser::ast as sql;

use crate::ast::{
    AggregateFunc, AggregateTarget, ColumnTarget, Limit, ResourceTarget, Select, Sort,
    SortDirection, SortNulls, Statement, Target, Value,
};
use crate::error::{Error, Result};
use crate::processor::clauses::{self, FilterContext};

/// Lower a query to a [`Select`]. The query must be a plain SELECT over one
/// relation; joins are accepted only as flat foreign-key embeddings.
pub fn process_query(query: &sql::Query) -> Result<Statement> {
    if query.with.is_some() {
        return Err(Error::unsupported(
            "Common table expressions are not supported",
        ));
    }

    let select = match query.body.as_ref() {
        sql::SetExpr::Select(select) => select,
        sql::SetExpr::SetOperation { .. } => {
            return Err(Error::unsupported(
                "UNION, INTERSECT and EXCEPT are not supported",
            ));
        }
        sql::SetExpr::Values(_) => {
            return Err(Error::unsupported(
                "VALUES lists are not supported outside INSERT",
            ));
        }
        _ => return Err(Error::unsupported("Only plain SELECT queries are supported")),
    };

    if select.distinct.is_some() {
        return Err(Error::unsupported("SELECT DISTINCT is not supported"));
    }
    if select.having.is_some() {
        return Err(Error::unsupported("HAVING is not supported"));
    }
    match &select.group_by {
        sql::GroupByExpr::Expressions(exprs, modifiers)
            if exprs.is_empty() && modifiers.is_empty() => {}
        _ => {
            return Err(Error::unsupported(
                "GROUP BY is not supported; aggregates group implicitly",
            ));
        }
    }

    let [from] = select.from.as_slice() else {
        return Err(Error::unsupported(if select.from.is_empty() {
            "SELECT requires a FROM clause"
        } else {
            "Only a single FROM relation is supported"
        }));
    };

    let table = clauses::table_name(&from.relation)?;
    let mut relations: Vec<String> = Vec::with_capacity(from.joins.len());
    for join in &from.joins {
        let relation = embedded_relation(join, &table, &relations)?;
        relations.push(relation);
    }

    let mut raw = Vec::with_capacity(select.projection.len());
    for item in &select.projection {
        raw.push(lower_select_item(item)?);
    }
    let targets = assemble_targets(raw, &table, &relations)?;

    let ctx = FilterContext { table: &table };
    let filter = select
        .selection
        .as_ref()
        .map(|expr| clauses::process_where_clause(expr, &ctx))
        .transpose()?;

    let sorts = query
        .order_by
        .as_ref()
        .map(|order_by| process_order_by(order_by, &ctx))
        .transpose()?
        .unwrap_or_default();

    let limit = query
        .limit_clause
        .as_ref()
        .map(process_limit)
        .transpose()?
        .flatten();

    Ok(Statement::Select(Select {
        from: table,
        targets,
        filter,
        sorts,
        limit,
    }))
}

/// A projection item before it is grouped under its relation.
struct RawTarget {
    qualifier: Option<String>,
    target: Target,
}

fn lower_select_item(item: &sql::SelectItem) -> Result<RawTarget> {
    match item {
        sql::SelectItem::Wildcard(_) => Ok(RawTarget {
            qualifier: None,
            target: Target::star(),
        }),
        sql::SelectItem::QualifiedWildcard(kind, _) => Ok(RawTarget {
            qualifier: Some(kind.to_string()),
            target: Target::star(),
        }),
        sql::SelectItem::UnnamedExpr(expr) => lower_target_expr(expr, None),
        sql::SelectItem::ExprWithAlias { expr, alias } => {
            lower_target_expr(expr, Some(alias.value.clone()))
        }
    }
}

fn lower_target_expr(expr: &sql::Expr, alias: Option<String>) -> Result<RawTarget> {
    match expr {
        sql::Expr::Identifier(ident) => Ok(RawTarget {
            qualifier: None,
            target: Target::Column(ColumnTarget {
                name: ident.value.clone(),
                alias,
                cast: None,
            }),
        }),
        sql::Expr::CompoundIdentifier(parts) => {
            let (qualifier, name) = split_qualified(parts)?;
            Ok(RawTarget {
                qualifier,
                target: Target::Column(ColumnTarget {
                    name,
                    alias,
                    cast: None,
                }),
            })
        }
        sql::Expr::Cast {
            expr, data_type, ..
        } => {
            let mut raw = lower_target_expr(expr, alias)?;
            let cast = data_type.to_string().to_lowercase();
            match &mut raw.target {
                Target::Column(column) if column.cast.is_none() => column.cast = Some(cast),
                Target::Aggregate(aggregate) if aggregate.cast.is_none() => {
                    aggregate.cast = Some(cast)
                }
                _ => {
                    return Err(Error::unsupported(
                        "Casts apply to columns and aggregates only",
                    ));
                }
            }
            Ok(raw)
        }
        sql::Expr::Function(func) => lower_function_target(func, alias),
        other => Err(Error::unsupported(format!(
            "\"{}\" is not a supported SELECT target",
            other
        ))),
    }
}

/// A function call in the projection is either an aggregate or an embedded
/// relation written as `rel(col1, col2)`.
fn lower_function_target(func: &sql::Function, alias: Option<String>) -> Result<RawTarget> {
    if func.over.is_some() || func.filter.is_some() || !func.within_group.is_empty() {
        return Err(Error::unsupported(
            "Window and filtered aggregates are not supported",
        ));
    }

    let name = clauses::function_name(func)?;
    let args = clauses::function_args(func)?;

    if let Some(aggregate) = AggregateFunc::from_name(&name) {
        return lower_aggregate_target(aggregate, args, alias);
    }

    if alias.is_some() {
        return Err(Error::unsupported("Aliased embeds are not supported"));
    }

    let mut targets = Vec::with_capacity(args.len());
    for arg in args {
        let sql::FunctionArg::Unnamed(arg) = arg else {
            return Err(Error::unsupported(
                "Named arguments are not supported in embeds",
            ));
        };
        targets.push(match arg {
            sql::FunctionArgExpr::Wildcard => Target::star(),
            sql::FunctionArgExpr::Expr(expr) => {
                let raw = lower_target_expr(expr, None)?;
                if raw.qualifier.is_some() {
                    return Err(Error::unsupported(
                        "Qualified columns are not supported inside embeds",
                    ));
                }
                raw.target
            }
            sql::FunctionArgExpr::QualifiedWildcard(_) => {
                return Err(Error::unsupported(
                    "Qualified wildcards are not supported inside embeds",
                ));
            }
        });
    }

    Ok(RawTarget {
        qualifier: None,
        target: Target::Resource(ResourceTarget { name, targets }),
    })
}

fn lower_aggregate_target(
    func: AggregateFunc,
    args: &[sql::FunctionArg],
    alias: Option<String>,
) -> Result<RawTarget> {
    let (qualifier, column) = match args {
        [sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Wildcard)] => {
            if func != AggregateFunc::Count {
                return Err(Error::unsupported(format!(
                    "Only count may aggregate over *, not {}",
                    func
                )));
            }
            (None, None)
        }
        [
            sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Expr(sql::Expr::Identifier(ident))),
        ] => (None, Some(ident.value.clone())),
        [
            sql::FunctionArg::Unnamed(sql::FunctionArgExpr::Expr(sql::Expr::CompoundIdentifier(
                parts,
            ))),
        ] => {
            let (qualifier, name) = split_qualified(parts)?;
            (qualifier, Some(name))
        }
        _ => {
            return Err(Error::unsupported(format!(
                "{} takes a single column argument",
                func
            )));
        }
    };

    Ok(RawTarget {
        qualifier,
        target: Target::Aggregate(AggregateTarget {
            func,
            column,
            alias,
            cast: None,
        }),
    })
}

fn split_qualified(parts: &[sql::Ident]) -> Result<(Option<String>, String)> {
    match parts {
        [name] => Ok((None, name.value.clone())),
        [qualifier, name] => Ok((Some(qualifier.value.clone()), name.value.clone())),
        _ => Err(Error::unsupported(
            "Only one level of qualification is supported in targets",
        )),
    }
}

/// Group qualified targets under their relation's embed, preserving the
/// order of first reference, and give unreferenced joins an empty embed.
fn assemble_targets(
    raw: Vec<RawTarget>,
    table: &str,
    relations: &[String],
) -> Result<Vec<Target>> {
    let mut targets: Vec<Target> = Vec::with_capacity(raw.len());
    for RawTarget { qualifier, target } in raw {
        let Some(qualifier) = qualifier.filter(|qualifier| qualifier.as_str() != table) else {
            targets.push(target);
            continue;
        };
        if !relations.contains(&qualifier) {
            return Err(Error::unsupported(format!(
                "\"{}\" does not name the FROM relation or a joined relation",
                qualifier
            )));
        }
        let embed = targets.iter_mut().find_map(|existing| match existing {
            Target::Resource(resource) if resource.name == qualifier => Some(resource),
            _ => None,
        });
        match embed {
            Some(resource) => resource.targets.push(target),
            None => targets.push(Target::Resource(ResourceTarget {
                name: qualifier,
                targets: vec![target],
            })),
        }
    }

    for relation in relations {
        let present = targets
            .iter()
            .any(|target| matches!(target, Target::Resource(resource) if resource.name == *relation));
        if !present {
            targets.push(Target::Resource(ResourceTarget {
                name: relation.clone(),
                targets: Vec::new(),
            }));
        }
    }

    Ok(targets)
}

/// A join is in subset only as a flat foreign-key embedding: INNER or LEFT,
/// with an `ON a.x = b.y` equality relating the joined table to an earlier
/// relation.
fn embedded_relation(join: &sql::Join, table: &str, known: &[String]) -> Result<String> {
    let relation = clauses::table_name(&join.relation)?;

    let constraint = match &join.join_operator {
        sql::JoinOperator::Join(constraint)
        | sql::JoinOperator::Inner(constraint)
        | sql::JoinOperator::Left(constraint)
        | sql::JoinOperator::LeftOuter(constraint) => constraint,
        _ => {
            return Err(Error::unsupported(
                "Only INNER and LEFT joins can embed a relation",
            ));
        }
    };
    let sql::JoinConstraint::On(on) = constraint else {
        return Err(Error::unsupported(
            "Joins require an ON <table.column> = <table.column> constraint",
        ));
    };
    let sql::Expr::BinaryOp {
        left,
        op: sql::BinaryOperator::Eq,
        right,
    } = on
    else {
        return Err(Error::unsupported(
            "Join conditions must be a single equality",
        ));
    };

    let left = join_side(left)?;
    let right = join_side(right)?;
    let relates_back = |side: &(String, String)| side.0 == table || known.contains(&side.0);
    if (left.0 == relation && relates_back(&right)) || (right.0 == relation && relates_back(&left))
    {
        Ok(relation)
    } else {
        Err(Error::unsupported(
            "Join conditions must relate the joined table to an earlier relation",
        ))
    }
}

fn join_side(expr: &sql::Expr) -> Result<(String, String)> {
    match expr {
        sql::Expr::CompoundIdentifier(parts) if parts.len() == 2 => {
            Ok((parts[0].value.clone(), parts[1].value.clone()))
        }
        _ => Err(Error::unsupported(
            "Join conditions must use qualified columns (table.column)",
        )),
    }
}

fn process_order_by(order_by: &sql::OrderBy, ctx: &FilterContext<'_>) -> Result<Vec<Sort>> {
    match &order_by.kind {
        sql::OrderByKind::All(_) => Err(Error::unsupported("ORDER BY ALL is not supported")),
        sql::OrderByKind::Expressions(exprs) => exprs
            .iter()
            .map(|expr| process_sort(expr, ctx))
            .collect(),
    }
}

fn process_sort(expr: &sql::OrderByExpr, ctx: &FilterContext<'_>) -> Result<Sort> {
    let column = match &expr.expr {
        sql::Expr::Identifier(ident) => ident.value.clone(),
        sql::Expr::CompoundIdentifier(parts) => {
            let (qualifier, name) = split_qualified(parts)?;
            match qualifier {
                Some(qualifier) if qualifier != ctx.table => format!("{}.{}", qualifier, name),
                _ => name,
            }
        }
        _ => {
            return Err(Error::unsupported(
                "ORDER BY supports plain columns only",
            ));
        }
    };
    Ok(Sort {
        column,
        direction: expr.options.asc.map(|asc| {
            if asc {
                SortDirection::Asc
            } else {
                SortDirection::Desc
            }
        }),
        nulls: expr.options.nulls_first.map(|first| {
            if first {
                SortNulls::First
            } else {
                SortNulls::Last
            }
        }),
    })
}

fn process_limit(clause: &sql::LimitClause) -> Result<Option<Limit>> {
    match clause {
        sql::LimitClause::LimitOffset {
            limit,
            offset,
            limit_by,
        } => {
            if !limit_by.is_empty() {
                return Err(Error::unsupported("LIMIT BY is not supported"));
            }
            let count = limit
                .as_ref()
                .map(|expr| non_negative_integer(expr, "LIMIT"))
                .transpose()?;
            let offset = offset
                .as_ref()
                .map(|offset| non_negative_integer(&offset.value, "OFFSET"))
                .transpose()?;
            if count.is_none() && offset.is_none() {
                return Ok(None);
            }
            Ok(Some(Limit { count, offset }))
        }
        _ => Err(Error::unsupported("This LIMIT syntax is not supported")),
    }
}

fn non_negative_integer(expr: &sql::Expr, clause: &str) -> Result<u64> {
    match clauses::scalar_value(expr)? {
        Value::Int(n) if n >= 0 => Ok(n as u64),
        _ => Err(Error::unsupported(format!(
            "{} requires a non-negative integer literal",
            clause
        ))),
    }
}
