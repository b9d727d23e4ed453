use crate::ast::*;
use crate::render::filter::append_filter;
use crate::render::http::Params;

fn pairs(filter: &Filter) -> Vec<(String, String)> {
    let mut params = Params::default();
    append_filter(filter, &mut params);
    params.iter().cloned().collect()
}

fn pair(key: &str, value: &str) -> (String, String) {
    (key.to_string(), value.to_string())
}

#[test]
fn test_column_filter_is_one_pair() {
    let filter = Filter::column("id", Operator::Eq, 1i64);
    assert_eq!(pairs(&filter), vec![pair("id", "eq.1")]);
}

#[test]
fn test_negated_column_filter() {
    let filter = Filter::column("id", Operator::Eq, 1i64).negated();
    assert_eq!(pairs(&filter), vec![pair("id", "not.eq.1")]);
}

#[test]
fn test_root_and_flattens() {
    let filter = Filter::and(vec![
        Filter::column("a", Operator::Eq, 1i64),
        Filter::column("b", Operator::Gt, 2i64),
    ]);
    assert_eq!(pairs(&filter), vec![pair("a", "eq.1"), pair("b", "gt.2")]);
}

#[test]
fn test_root_flattening_is_recursive() {
    let filter = Filter::and(vec![
        Filter::and(vec![
            Filter::column("a", Operator::Eq, 1i64),
            Filter::column("b", Operator::Eq, 2i64),
        ]),
        Filter::column("c", Operator::Eq, 3i64),
    ]);
    assert_eq!(
        pairs(&filter),
        vec![pair("a", "eq.1"), pair("b", "eq.2"), pair("c", "eq.3")]
    );
}

#[test]
fn test_negated_root_and_does_not_flatten() {
    let filter = Filter::and(vec![
        Filter::column("a", Operator::Eq, 1i64),
        Filter::column("b", Operator::Eq, 2i64),
    ])
    .negated();
    assert_eq!(pairs(&filter), vec![pair("and", "not.(a.eq.1,b.eq.2)")]);
}

#[test]
fn test_or_nests_and_children() {
    let filter = Filter::or(vec![
        Filter::and(vec![
            Filter::column("rating", Operator::Gt, 4i64),
            Filter::column("year", Operator::Lt, 2000i64),
        ]),
        Filter::column("author", Operator::Eq, "asimov"),
    ]);
    assert_eq!(
        pairs(&filter),
        vec![pair("or", "(and(rating.gt.4,year.lt.2000),author.eq.asimov)")]
    );
}

#[test]
fn test_nested_negations() {
    let filter = Filter::or(vec![
        Filter::column("id", Operator::Eq, 1i64).negated(),
        Filter::and(vec![
            Filter::column("a", Operator::Eq, 1i64),
            Filter::column("b", Operator::Eq, 2i64),
        ])
        .negated(),
    ]);
    assert_eq!(
        pairs(&filter),
        vec![pair("or", "(id.not.eq.1,not.and(a.eq.1,b.eq.2))")]
    );
}

#[test]
fn test_single_child_logical_keeps_negation() {
    let filter = Filter::or(vec![Filter::column("id", Operator::Eq, 1i64)]).negated();
    assert_eq!(pairs(&filter), vec![pair("or", "not.(id.eq.1)")]);
}

#[test]
fn test_in_list_renders_parenthesized() {
    let filter = Filter::column(
        "author",
        Operator::In,
        Value::List(vec![
            Value::String("Adams, D.".to_string()),
            Value::String("Bradbury".to_string()),
        ]),
    );
    assert_eq!(
        pairs(&filter),
        vec![pair("author", "in.(\"Adams, D.\",Bradbury)")]
    );
}

#[test]
fn test_is_renders_bare_keyword() {
    let filter = Filter::column("deleted_at", Operator::Is, Value::Null);
    assert_eq!(pairs(&filter), vec![pair("deleted_at", "is.null")]);

    let filter = Filter::column("available", Operator::Is, true);
    assert_eq!(pairs(&filter), vec![pair("available", "is.true")]);
}

#[test]
fn test_exotic_operators_render_their_keyword() {
    let cases = [
        (Operator::Ov, "ov"),
        (Operator::Nxr, "nxr"),
        (Operator::Nxl, "nxl"),
        (Operator::Adj, "adj"),
    ];
    for (operator, keyword) in cases {
        let filter = Filter::column("range", operator, "{1,5}");
        assert_eq!(
            pairs(&filter),
            vec![pair("range", &format!("{keyword}.{{1,5}}"))]
        );
    }
}

#[test]
fn test_qualified_column_key() {
    let filter = Filter::column("authors.name", Operator::Eq, "asimov");
    assert_eq!(pairs(&filter), vec![pair("authors.name", "eq.asimov")]);
}
