//! CLI probe for `embedtag_core`.
//!
//! # Responsibility
//! - Print crate and generator versions to verify linkage.
//! - Render QuickTime markup or rewrite external links from the shell.
//!
//! Usage:
//! - `embedtag_cli`
//! - `embedtag_cli qt [--xhtml] <src> <width> <height> <version> [name value]...`
//! - `embedtag_cli links < page.html`

use embedtag_core::quicktime::{generate, MarkupDialect};
use std::io::{self, Read};
use std::process::ExitCode;

const USAGE_EXIT: u8 = 2;

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.first().map(String::as_str) {
        None => {
            println!("embedtag_core version={}", embedtag_core::core_version());
            println!(
                "quicktime_generator version={}",
                embedtag_core::generator_version()
            );
            ExitCode::SUCCESS
        }
        Some("qt") => run_quicktime(&args[1..]),
        Some("links") => run_links(),
        Some(other) => {
            eprintln!("unknown command `{other}`; expected `qt` or `links`");
            ExitCode::from(USAGE_EXIT)
        }
    }
}

fn run_quicktime(args: &[String]) -> ExitCode {
    let (dialect, rest) = match args.first().map(String::as_str) {
        Some("--xhtml") => (MarkupDialect::Xhtml, &args[1..]),
        _ => (MarkupDialect::Html, args),
    };
    // An empty shell argument stands for a missing value.
    let values: Vec<Option<&str>> = rest
        .iter()
        .map(|arg| Some(arg.as_str()).filter(|value| !value.is_empty()))
        .collect();

    match generate("embedtag_cli qt", dialect, &values) {
        Ok(markup) => {
            println!("{markup}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::from(USAGE_EXIT)
        }
    }
}

fn run_links() -> ExitCode {
    let mut html = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut html) {
        eprintln!("failed to read stdin: {err}");
        return ExitCode::FAILURE;
    }
    print!("{}", embedtag_core::rewrite_external_links(&html));
    ExitCode::SUCCESS
}
