//! sqlrest — translate one SQL statement into a PostgREST request.
//!
//! # Usage
//!
//! ```bash
//! sqlrest "select * from books where id = 1"
//! sqlrest --format curl "delete from books where id = 1"
//! echo "select * from books" | sqlrest --format json
//! ```

use std::io::Read;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use sqlrest_core::render::{HttpRequest, format_curl, format_http, render_http};

#[derive(Parser)]
#[command(name = "sqlrest")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Translate a SQL statement into a PostgREST request", long_about = None)]
#[command(after_help = "EXAMPLES:
    sqlrest \"select * from books where id = 1\"
    sqlrest --format curl \"update books set year = 2000 where id = 1\"
    cat query.sql | sqlrest --base-url https://api.example.com/rest/v1")]
struct Cli {
    /// The SQL statement to translate (read from stdin when omitted)
    sql: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "http")]
    format: OutputFormat,

    /// Base URL prepended to the request path
    #[arg(short, long, default_value = "http://localhost:3000")]
    base_url: String,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Http,
    Curl,
    Json,
}

fn main() {
    let cli = Cli::parse();
    if let Err(error) = run(&cli) {
        eprintln!("{} {error:#}", "error:".red().bold());
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let sql = match &cli.sql {
        Some(sql) => sql.clone(),
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read SQL from stdin")?;
            buffer
        }
    };

    let statement = sqlrest_core::process(sql.trim())?;
    let request = render_http(&statement)?;

    let output = match cli.format {
        OutputFormat::Http => format_http(&request, &cli.base_url)?,
        OutputFormat::Curl => format_curl(&request, &cli.base_url)?,
        OutputFormat::Json => serde_json::to_string_pretty(&request_json(&request))?,
    };
    println!("{output}");
    Ok(())
}

/// The request as the JSON shape scripts consume: method, full path, body.
fn request_json(request: &HttpRequest) -> serde_json::Value {
    serde_json::json!({
        "method": request.method,
        "path": request.path,
        "fullPath": request.full_path(),
        "body": request.body,
    })
}
