use serde::{Deserialize, Serialize};

use crate::ast::Value;

/// Filter operators, spelled the way PostgREST spells them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operator {
    Eq,
    Neq,
    Gt,
    Gte,
    Lt,
    Lte,
    Like,
    Ilike,
    Is,
    In,
    Fts,
    Plfts,
    Phfts,
    Wfts,
    Cs,
    Cd,
    Ov,
    Sl,
    Sr,
    Nxr,
    Nxl,
    Adj,
}

impl Operator {
    /// The operator keyword as it appears in a query parameter.
    pub fn keyword(&self) -> &'static str {
        match self {
            Operator::Eq => "eq",
            Operator::Neq => "neq",
            Operator::Gt => "gt",
            Operator::Gte => "gte",
            Operator::Lt => "lt",
            Operator::Lte => "lte",
            Operator::Like => "like",
            Operator::Ilike => "ilike",
            Operator::Is => "is",
            Operator::In => "in",
            Operator::Fts => "fts",
            Operator::Plfts => "plfts",
            Operator::Phfts => "phfts",
            Operator::Wfts => "wfts",
            Operator::Cs => "cs",
            Operator::Cd => "cd",
            Operator::Ov => "ov",
            Operator::Sl => "sl",
            Operator::Sr => "sr",
            Operator::Nxr => "nxr",
            Operator::Nxl => "nxl",
            Operator::Adj => "adj",
        }
    }

    /// Operators permitted in UPDATE and DELETE predicates.
    pub fn is_basic(&self) -> bool {
        matches!(
            self,
            Operator::Eq
                | Operator::Neq
                | Operator::Gt
                | Operator::Gte
                | Operator::Lt
                | Operator::Lte
        )
    }
}

impl std::fmt::Display for Operator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// Boolean connective between filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogicalOp {
    #[default]
    And,
    Or,
}

impl LogicalOp {
    pub fn keyword(&self) -> &'static str {
        match self {
            LogicalOp::And => "and",
            LogicalOp::Or => "or",
        }
    }
}

impl std::fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// One node of a WHERE tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Filter {
    Column(ColumnFilter),
    Logical(LogicalFilter),
}

/// A predicate on a single (possibly qualified) column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnFilter {
    pub column: String,
    pub operator: Operator,
    pub value: Value,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negate: bool,
}

/// An `and`/`or` over one or more child filters. A single-child node is
/// legal and behaves as its child, except that it keeps its own negation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogicalFilter {
    pub operator: LogicalOp,
    pub values: Vec<Filter>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub negate: bool,
}

/// Helper for skip_serializing_if on bool fields
fn is_false(b: &bool) -> bool {
    !*b
}

impl Filter {
    /// A non-negated column predicate.
    pub fn column(column: impl Into<String>, operator: Operator, value: impl Into<Value>) -> Self {
        Filter::Column(ColumnFilter {
            column: column.into(),
            operator,
            value: value.into(),
            negate: false,
        })
    }

    /// A non-negated `and` node.
    pub fn and(values: Vec<Filter>) -> Self {
        Filter::Logical(LogicalFilter {
            operator: LogicalOp::And,
            values,
            negate: false,
        })
    }

    /// A non-negated `or` node.
    pub fn or(values: Vec<Filter>) -> Self {
        Filter::Logical(LogicalFilter {
            operator: LogicalOp::Or,
            values,
            negate: false,
        })
    }

    /// Flip this node's negation flag. `NOT` in SQL is absorbed here rather
    /// than becoming a wrapper node.
    pub fn negated(self) -> Self {
        match self {
            Filter::Column(mut column) => {
                column.negate = !column.negate;
                Filter::Column(column)
            }
            Filter::Logical(mut logical) => {
                logical.negate = !logical.negate;
                Filter::Logical(logical)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operators() {
        assert!(Operator::Eq.is_basic());
        assert!(Operator::Lte.is_basic());
        assert!(!Operator::Like.is_basic());
        assert!(!Operator::Cs.is_basic());
    }

    #[test]
    fn test_negated_flips_in_place() {
        let filter = Filter::column("id", Operator::Eq, 1i64);
        let negated = filter.clone().negated();
        let Filter::Column(column) = &negated else {
            panic!("expected a column filter");
        };
        assert!(column.negate);
        assert_eq!(negated.negated(), filter);
    }
}
