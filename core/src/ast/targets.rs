use serde::{Deserialize, Serialize};

/// Aggregate functions PostgREST can compute server-side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregateFunc {
    Count,
    Sum,
    Avg,
    Min,
    Max,
}

impl AggregateFunc {
    pub fn keyword(&self) -> &'static str {
        match self {
            AggregateFunc::Count => "count",
            AggregateFunc::Sum => "sum",
            AggregateFunc::Avg => "avg",
            AggregateFunc::Min => "min",
            AggregateFunc::Max => "max",
        }
    }

    /// Look up a SQL function name, case-insensitively.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "count" => Some(AggregateFunc::Count),
            "sum" => Some(AggregateFunc::Sum),
            "avg" => Some(AggregateFunc::Avg),
            "min" => Some(AggregateFunc::Min),
            "max" => Some(AggregateFunc::Max),
            _ => None,
        }
    }
}

impl std::fmt::Display for AggregateFunc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.keyword())
    }
}

/// One item of a SELECT projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Target {
    Column(ColumnTarget),
    Resource(ResourceTarget),
    Aggregate(AggregateTarget),
}

/// A plain column, possibly `*`, with optional alias and cast.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnTarget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
}

/// An embedded relation with its own nested projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceTarget {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub targets: Vec<Target>,
}

/// An aggregate over a column, or over the whole row set for `count(*)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateTarget {
    pub func: AggregateFunc,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast: Option<String>,
}

impl Target {
    /// A bare column with no alias or cast.
    pub fn column(name: impl Into<String>) -> Self {
        Target::Column(ColumnTarget {
            name: name.into(),
            alias: None,
            cast: None,
        })
    }

    /// The canonical "no projection" marker, `*`.
    pub fn star() -> Self {
        Target::column("*")
    }

    pub fn is_star(&self) -> bool {
        matches!(
            self,
            Target::Column(ColumnTarget {
                name,
                alias: None,
                cast: None,
            }) if name == "*"
        )
    }
}
