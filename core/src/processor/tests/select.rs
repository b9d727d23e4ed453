use crate::ast::*;
use crate::error::Error;
use crate::processor::process;

fn process_select(sql: &str) -> Select {
    match process(sql).unwrap() {
        Statement::Select(select) => select,
        other => panic!("expected a select, got {other:?}"),
    }
}

#[test]
fn test_select_star() {
    let select = process_select("select * from books");
    assert_eq!(
        select,
        Select {
            from: "books".to_string(),
            targets: vec![Target::star()],
            filter: None,
            sorts: vec![],
            limit: None,
        }
    );
}

#[test]
fn test_select_columns() {
    let select = process_select("select title, author from books");
    assert_eq!(
        select.targets,
        vec![Target::column("title"), Target::column("author")]
    );
}

#[test]
fn test_alias_and_cast() {
    let select = process_select("select title as name, year::text from books");
    assert_eq!(
        select.targets,
        vec![
            Target::Column(ColumnTarget {
                name: "title".to_string(),
                alias: Some("name".to_string()),
                cast: None,
            }),
            Target::Column(ColumnTarget {
                name: "year".to_string(),
                alias: None,
                cast: Some("text".to_string()),
            }),
        ]
    );
}

#[test]
fn test_primary_qualifier_is_stripped() {
    let select = process_select("select books.title from books where books.id = 1");
    assert_eq!(select.targets, vec![Target::column("title")]);
    assert_eq!(select.filter, Some(Filter::column("id", Operator::Eq, 1i64)));
}

#[test]
fn test_aggregates() {
    let select = process_select("select count(*), sum(amount) as total from orders");
    assert_eq!(
        select.targets,
        vec![
            Target::Aggregate(AggregateTarget {
                func: AggregateFunc::Count,
                column: None,
                alias: None,
                cast: None,
            }),
            Target::Aggregate(AggregateTarget {
                func: AggregateFunc::Sum,
                column: Some("amount".to_string()),
                alias: Some("total".to_string()),
                cast: None,
            }),
        ]
    );
}

#[test]
fn test_embedded_relation_call() {
    let select = process_select("select title, authors(name, birth_year) from books");
    assert_eq!(
        select.targets,
        vec![
            Target::column("title"),
            Target::Resource(ResourceTarget {
                name: "authors".to_string(),
                targets: vec![Target::column("name"), Target::column("birth_year")],
            }),
        ]
    );
}

#[test]
fn test_join_becomes_embed() {
    let select = process_select(
        "select books.title, authors.name from books join authors on authors.id = books.author_id",
    );
    assert_eq!(
        select.targets,
        vec![
            Target::column("title"),
            Target::Resource(ResourceTarget {
                name: "authors".to_string(),
                targets: vec![Target::column("name")],
            }),
        ]
    );
}

#[test]
fn test_unreferenced_join_keeps_empty_embed() {
    let select =
        process_select("select title from books join authors on authors.id = books.author_id");
    assert_eq!(
        select.targets,
        vec![
            Target::column("title"),
            Target::Resource(ResourceTarget {
                name: "authors".to_string(),
                targets: vec![],
            }),
        ]
    );
}

#[test]
fn test_join_without_equality_fails() {
    let err = process("select * from books join authors on authors.id > books.author_id")
        .unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("Join conditions must be a single equality")
    );
}

#[test]
fn test_unknown_qualifier_fails() {
    let err = process("select magazines.title from books").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("\"magazines\" does not name the FROM relation or a joined relation")
    );
}

#[test]
fn test_order_by() {
    let select = process_select("select * from books order by title desc nulls last, id");
    assert_eq!(
        select.sorts,
        vec![
            Sort {
                column: "title".to_string(),
                direction: Some(SortDirection::Desc),
                nulls: Some(SortNulls::Last),
            },
            Sort {
                column: "id".to_string(),
                direction: None,
                nulls: None,
            },
        ]
    );
}

#[test]
fn test_limit_offset() {
    let select = process_select("select * from books limit 10 offset 5");
    assert_eq!(
        select.limit,
        Some(Limit {
            count: Some(10),
            offset: Some(5),
        })
    );
}

#[test]
fn test_limit_zero_is_kept() {
    let select = process_select("select * from books limit 0");
    assert_eq!(
        select.limit,
        Some(Limit {
            count: Some(0),
            offset: None,
        })
    );
}

#[test]
fn test_negative_limit_fails() {
    let err = process("select * from books limit -1").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("LIMIT requires a non-negative integer literal")
    );
}

#[test]
fn test_group_by_fails() {
    let err = process("select author from books group by author").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("GROUP BY is not supported; aggregates group implicitly")
    );
}

#[test]
fn test_distinct_fails() {
    let err = process("select distinct author from books").unwrap_err();
    assert_eq!(err, Error::unsupported("SELECT DISTINCT is not supported"));
}

#[test]
fn test_union_fails() {
    let err = process("select * from a union select * from b").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("UNION, INTERSECT and EXCEPT are not supported")
    );
}

#[test]
fn test_cte_fails() {
    let err = process("with recent as (select * from books) select * from recent").unwrap_err();
    assert_eq!(
        err,
        Error::unsupported("Common table expressions are not supported")
    );
}

#[test]
fn test_missing_from_fails() {
    let err = process("select 1").unwrap_err();
    assert_eq!(err, Error::unsupported("SELECT requires a FROM clause"));
}

#[test]
fn test_table_alias_fails() {
    let err = process("select * from books b").unwrap_err();
    assert_eq!(err, Error::unsupported("Table aliases are not supported"));
}
