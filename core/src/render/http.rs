//! IR → HTTP request record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::ast::{Delete, Insert, Select, Sort, Statement, Target, Update, Value};
use crate::error::{Error, Result};
use crate::render::encode::encode_component;
use crate::render::filter::append_filter;

/// HTTP method of a rendered request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Ordered query-parameter multimap. Append order is emission order; the
/// pairs are never sorted, so output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Params(Vec<(String, String)>);

impl Params {
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, (String, String)> {
        self.0.iter()
    }
}

impl fmt::Display for Params {
    /// Percent-encoded `key=value` pairs joined with `&`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (key, value)) in self.0.iter().enumerate() {
            if index > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}={}", encode_component(key), encode_component(value))?;
        }
        Ok(())
    }
}

/// A PostgREST request equivalent to one SQL statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpRequest {
    pub method: Method,
    /// `/` plus the relation name.
    pub path: String,
    pub params: Params,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<serde_json::Value>,
}

impl HttpRequest {
    /// The path with its encoded query string; equals the bare path exactly
    /// when there are no parameters.
    pub fn full_path(&self) -> String {
        if self.params.is_empty() {
            self.path.clone()
        } else {
            format!("{}?{}", self.path, self.params)
        }
    }
}

/// Render a statement as an HTTP request.
pub fn render_http(statement: &Statement) -> Result<HttpRequest> {
    match statement {
        Statement::Select(select) => Ok(build_select(select)),
        Statement::Insert(insert) => build_insert(insert),
        Statement::Update(update) => Ok(build_update(update)),
        Statement::Delete(delete) => Ok(build_delete(delete)),
    }
}

fn build_select(select: &Select) -> HttpRequest {
    let mut params = Params::default();
    if !is_bare_star(&select.targets) {
        params.push("select", render_targets(&select.targets));
    }
    if let Some(filter) = &select.filter {
        append_filter(filter, &mut params);
    }
    if !select.sorts.is_empty() {
        params.push("order", render_sorts(&select.sorts));
    }
    if let Some(limit) = &select.limit {
        if let Some(count) = limit.count {
            params.push("limit", count.to_string());
        }
        if let Some(offset) = limit.offset {
            params.push("offset", offset.to_string());
        }
    }
    HttpRequest {
        method: Method::Get,
        path: format!("/{}", select.from),
        params,
        body: None,
    }
}

fn build_insert(insert: &Insert) -> Result<HttpRequest> {
    let mut params = Params::default();
    push_returning(&insert.returning, &mut params);

    // The statement is well-formed without a column list, but a JSON body
    // has no positional keys to fall back on.
    if insert.columns.is_empty() {
        return Err(Error::render(
            "INSERT without a column list cannot be rendered as a JSON body",
        ));
    }

    let mut rows: Vec<serde_json::Value> = insert
        .values
        .iter()
        .map(|row| {
            let object: serde_json::Map<String, serde_json::Value> = insert
                .columns
                .iter()
                .cloned()
                .zip(row.iter().map(Value::to_json))
                .collect();
            serde_json::Value::Object(object)
        })
        .collect();
    let body = match rows.len() {
        1 => rows.remove(0),
        _ => serde_json::Value::Array(rows),
    };

    Ok(HttpRequest {
        method: Method::Post,
        path: format!("/{}", insert.into),
        params,
        body: Some(body),
    })
}

fn build_update(update: &Update) -> HttpRequest {
    let mut params = Params::default();
    push_returning(&update.returning, &mut params);
    if let Some(filter) = &update.filter {
        append_filter(filter, &mut params);
    }

    let body: serde_json::Map<String, serde_json::Value> = update
        .set
        .iter()
        .map(|(column, value)| (column.clone(), value.to_json()))
        .collect();

    HttpRequest {
        method: Method::Patch,
        path: format!("/{}", update.table),
        params,
        body: Some(serde_json::Value::Object(body)),
    }
}

fn build_delete(delete: &Delete) -> HttpRequest {
    let mut params = Params::default();
    push_returning(&delete.returning, &mut params);
    if let Some(filter) = &delete.filter {
        append_filter(filter, &mut params);
    }
    HttpRequest {
        method: Method::Delete,
        path: format!("/{}", delete.from),
        params,
        body: None,
    }
}

/// RETURNING renders as a `select` parameter, ahead of any filters.
fn push_returning(returning: &[String], params: &mut Params) {
    if !returning.is_empty() {
        params.push("select", returning.join(","));
    }
}

/// A lone bare `*` means "no projection" and emits no `select` parameter.
fn is_bare_star(targets: &[Target]) -> bool {
    matches!(targets, [target] if target.is_star())
}

fn render_targets(targets: &[Target]) -> String {
    targets
        .iter()
        .map(render_target)
        .collect::<Vec<_>>()
        .join(",")
}

fn render_target(target: &Target) -> String {
    match target {
        Target::Column(column) => {
            let mut out = String::new();
            if let Some(alias) = &column.alias {
                out.push_str(alias);
                out.push(':');
            }
            out.push_str(&column.name);
            if let Some(cast) = &column.cast {
                out.push_str("::");
                out.push_str(cast);
            }
            out
        }
        Target::Resource(resource) => {
            format!("{}({})", resource.name, render_targets(&resource.targets))
        }
        Target::Aggregate(aggregate) => {
            let mut out = String::new();
            if let Some(alias) = &aggregate.alias {
                out.push_str(alias);
                out.push(':');
            }
            if let Some(column) = &aggregate.column {
                out.push_str(column);
                out.push('.');
            }
            out.push_str(aggregate.func.keyword());
            out.push_str("()");
            if let Some(cast) = &aggregate.cast {
                out.push_str("::");
                out.push_str(cast);
            }
            out
        }
    }
}

/// All sort keys collapse into one `order` parameter.
fn render_sorts(sorts: &[Sort]) -> String {
    sorts
        .iter()
        .map(|sort| {
            let mut out = sort.column.clone();
            if let Some(direction) = &sort.direction {
                out.push('.');
                out.push_str(direction.keyword());
            }
            if let Some(nulls) = &sort.nulls {
                out.push('.');
                out.push_str(nulls.keyword());
            }
            out
        })
        .collect::<Vec<_>>()
        .join(",")
}
