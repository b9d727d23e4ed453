//! Text renderings of an [`HttpRequest`]: wire-style HTTP and curl.

use url::Url;

use crate::error::{Error, Result};
use crate::render::encode::encode_component;
use crate::render::http::{HttpRequest, Method};

/// Wire-style request text: request line, `Host:`, and a JSON body with its
/// `Content-Type:` when the request carries one.
pub fn format_http(request: &HttpRequest, base_url: &str) -> Result<String> {
    let (host, prefix) = split_base(base_url)?;
    let mut out = format!(
        "{} {}{} HTTP/1.1\nHost: {}",
        request.method,
        prefix,
        request.full_path(),
        host
    );
    if let Some(body) = &request.body {
        out.push_str("\nContent-Type: application/json\n\n");
        out.push_str(&body.to_string());
    }
    Ok(out)
}

/// A multi-line curl invocation. GET passes parameters as `-G`/`-d` pairs;
/// POST and PATCH carry the JSON body in a single-quoted `-d`.
pub fn format_curl(request: &HttpRequest, base_url: &str) -> Result<String> {
    // Parsed only to fail early on a bad base; curl receives it verbatim.
    split_base(base_url)?;
    let prefix = base_url.trim_end_matches('/');

    let mut lines = Vec::new();
    match request.method {
        Method::Get => {
            let flag = if request.params.is_empty() { "" } else { " -G" };
            lines.push(format!("curl{} \"{}{}\"", flag, prefix, request.path));
            for (key, value) in request.params.iter() {
                lines.push(format!("-d \"{}={}\"", key, encode_component(value)));
            }
        }
        method => {
            lines.push(format!(
                "curl -X {} \"{}{}\"",
                method,
                prefix,
                request.full_path()
            ));
            if let Some(body) = &request.body {
                lines.push("-H \"Content-Type: application/json\"".to_string());
                lines.push(format!("-d '{}'", body.to_string().replace('\'', "'\\''")));
            }
        }
    }
    Ok(lines.join(" \\\n  "))
}

/// Split a base URL into `host[:port]` and its path prefix (no trailing
/// slash).
fn split_base(base_url: &str) -> Result<(String, String)> {
    let url = Url::parse(base_url)
        .map_err(|e| Error::render(format!("Invalid base URL \"{}\": {}", base_url, e)))?;
    let host = match (url.host_str(), url.port()) {
        (Some(host), Some(port)) => format!("{}:{}", host, port),
        (Some(host), None) => host.to_string(),
        (None, _) => {
            return Err(Error::render(format!(
                "Base URL \"{}\" has no host",
                base_url
            )));
        }
    };
    Ok((host, url.path().trim_end_matches('/').to_string()))
}
