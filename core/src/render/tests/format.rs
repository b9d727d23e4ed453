use crate::error::Error;
use crate::processor::process;
use crate::render::format::{format_curl, format_http};
use crate::render::http::{HttpRequest, render_http};

const BASE: &str = "http://localhost:3000";

fn translate(sql: &str) -> HttpRequest {
    render_http(&process(sql).unwrap()).unwrap()
}

#[test]
fn test_http_get() {
    let request = translate("select title, author from books where id = 1");
    assert_eq!(
        format_http(&request, BASE).unwrap(),
        "GET /books?select=title,author&id=eq.1 HTTP/1.1\nHost: localhost:3000"
    );
}

#[test]
fn test_http_base_path_prefix() {
    let request = translate("select * from books");
    assert_eq!(
        format_http(&request, "http://api.example.com/rest/v1").unwrap(),
        "GET /rest/v1/books HTTP/1.1\nHost: api.example.com"
    );
}

#[test]
fn test_http_post_carries_body() {
    let request = translate("insert into books (title, year) values ('X', 1999)");
    assert_eq!(
        format_http(&request, BASE).unwrap(),
        "POST /books HTTP/1.1\nHost: localhost:3000\nContent-Type: application/json\n\n{\"title\":\"X\",\"year\":1999}"
    );
}

#[test]
fn test_curl_get_uses_data_parameters() {
    let request = translate("select title, author from books where id = 1");
    assert_eq!(
        format_curl(&request, BASE).unwrap(),
        "curl -G \"http://localhost:3000/books\" \\\n  -d \"select=title,author\" \\\n  -d \"id=eq.1\""
    );
}

#[test]
fn test_curl_get_without_params_has_no_g_flag() {
    let request = translate("select * from books");
    assert_eq!(
        format_curl(&request, BASE).unwrap(),
        "curl \"http://localhost:3000/books\""
    );
}

#[test]
fn test_curl_post_quotes_body() {
    let request = translate("insert into books (title) values ('X') returning id");
    assert_eq!(
        format_curl(&request, BASE).unwrap(),
        "curl -X POST \"http://localhost:3000/books?select=id\" \\\n  -H \"Content-Type: application/json\" \\\n  -d '{\"title\":\"X\"}'"
    );
}

#[test]
fn test_curl_body_escapes_single_quotes() {
    let request = translate("insert into books (title) values ('O''Brien')");
    let curl = format_curl(&request, BASE).unwrap();
    assert!(curl.ends_with("-d '{\"title\":\"O'\\''Brien\"}'"), "got: {curl}");
}

#[test]
fn test_curl_delete() {
    let request = translate("delete from books where id = 1");
    assert_eq!(
        format_curl(&request, BASE).unwrap(),
        "curl -X DELETE \"http://localhost:3000/books?id=eq.1\""
    );
}

#[test]
fn test_invalid_base_url() {
    let request = translate("select * from books");
    let err = format_http(&request, "not a url").unwrap_err();
    assert!(matches!(err, Error::Render(_)), "got: {err:?}");
}
