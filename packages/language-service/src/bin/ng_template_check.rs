/**
 * ng-template-check
 *
 * Reports template diagnostics for every file of a project manifest
 */
use std::path::Path;
use std::process;

use angular_language_service::logging::init_tracing;
use angular_language_service::{LanguageService, LanguageServiceConfig, ProjectHost, Span};
use anyhow::{Context, Result};
use clap::{Arg, Command};
use serde::Serialize;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct FileDiagnostic {
    file_name: String,
    span: Span,
    line: usize,
    column: usize,
    message: String,
}

fn main() -> Result<()> {
    init_tracing();

    let matches = Command::new("ng-template-check")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Checks Angular templates of a project manifest")
        .arg(
            Arg::new("project")
                .value_name("PROJECT")
                .required(true)
                .help("Path to the project manifest (JSON)"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("PATH")
                .help("Language service configuration (JSON)"),
        )
        .arg(
            Arg::new("format")
                .long("format")
                .value_name("FORMAT")
                .value_parser(["text", "json"])
                .default_value("text")
                .help("Output format"),
        )
        .get_matches();

    let project = matches
        .get_one::<String>("project")
        .context("missing project manifest")?;
    let config = match matches.get_one::<String>("config") {
        Some(path) => LanguageServiceConfig::load(Path::new(path))
            .with_context(|| format!("loading configuration {}", path))?,
        None => LanguageServiceConfig::default(),
    };
    let host = ProjectHost::load(Path::new(project))
        .with_context(|| format!("loading project {}", project))?;

    let file_names: Vec<String> = host.file_names().map(str::to_string).collect();
    let mut service = LanguageService::with_config(host, config);
    let mut diagnostics = Vec::new();
    for file_name in &file_names {
        for diagnostic in service.get_diagnostics(file_name).unwrap_or_default() {
            let (line, column) = service
                .host()
                .line_and_column(file_name, diagnostic.span.start)
                .unwrap_or((0, 0));
            diagnostics.push(FileDiagnostic {
                file_name: file_name.clone(),
                span: diagnostic.span,
                line,
                column,
                message: diagnostic.message,
            });
        }
    }

    match matches.get_one::<String>("format").map(String::as_str) {
        Some("json") => println!("{}", serde_json::to_string_pretty(&diagnostics)?),
        _ => {
            for diagnostic in &diagnostics {
                println!(
                    "{}:{}:{} - error: {}",
                    diagnostic.file_name, diagnostic.line, diagnostic.column, diagnostic.message
                );
            }
        }
    }

    if !diagnostics.is_empty() {
        eprintln!("Found {} template error(s).", diagnostics.len());
        process::exit(1);
    }
    Ok(())
}
