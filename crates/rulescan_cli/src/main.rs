//! rscan: Tokenize rule files and print their token streams.
//!
//! Usage:
//!   rscan [options] <file...>
//!
//! Options not given on the command line come from `--config`, or from a
//! `rulescan.json` in the working directory when present.

use clap::{Parser as ClapParser, ValueEnum};
use rayon::prelude::*;
use rulescan_ast::TokenKind;
use rulescan_core::text::LineMap;
use rulescan_diagnostics::ScanError;
use rulescan_options::{LiteralSpans, OutputFormat, ScanConfig, ScannerOptions, DEFAULT_CONFIG_FILE};
use rulescan_scanner::{Scanner, Token};
use rustc_hash::FxHashMap;
use std::io::IsTerminal;
use std::path::Path;
use std::process;
use std::sync::Once;
use std::time::Instant;
use tracing::{debug, info};

#[derive(ClapParser, Debug)]
#[command(name = "rscan", about = "rulescan - a lexical scanner for pattern-matching rule files", version)]
struct Cli {
    /// Rule files to scan.
    #[arg(value_name = "FILE")]
    files: Vec<String>,

    /// Path to a rulescan.json configuration file.
    #[arg(short = 'c', long)]
    config: Option<String>,

    /// Token listing format.
    #[arg(long, value_enum)]
    format: Option<Format>,

    /// How literal token spans are reported.
    #[arg(long = "literal-spans", value_enum)]
    literal_spans: Option<SpanMode>,

    /// Print a per-kind token histogram after the listing.
    #[arg(long)]
    stats: bool,
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum Format {
    Text,
    Json,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Json => OutputFormat::Json,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum SpanMode {
    Closing,
    Full,
}

impl From<SpanMode> for LiteralSpans {
    fn from(mode: SpanMode) -> Self {
        match mode {
            SpanMode::Closing => LiteralSpans::Closing,
            SpanMode::Full => LiteralSpans::Full,
        }
    }
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const EXIT_SCAN_ERROR: i32 = 1;
const EXIT_USAGE_ERROR: i32 = 2;

static TRACING_INIT: Once = Once::new();

/// Install the tracing subscriber.
///
/// Only active when `RUST_LOG` is set, e.g. `RUST_LOG=rulescan_scanner=trace`.
fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
                .with(filter)
                .init();
        }
    });
}

fn main() {
    init_tracing();
    let cli = Cli::parse();
    process::exit(run_scan(&cli));
}

/// The outcome of scanning one file.
struct ScannedFile {
    path: String,
    source: Vec<u8>,
    tokens: Vec<Token>,
    error: Option<ScanError>,
}

fn run_scan(cli: &Cli) -> i32 {
    let start = Instant::now();

    let (config, config_dir) = match resolve_config(cli) {
        Ok(resolved) => resolved,
        Err(message) => {
            print_error(&message);
            return EXIT_USAGE_ERROR;
        }
    };

    // Command-line flags override the configuration file
    let mut options = config.scanner_options();
    if let Some(mode) = cli.literal_spans {
        options.literal_spans = mode.into();
    }
    let format = cli.format.map(OutputFormat::from).unwrap_or_else(|| config.output());

    let mut files = cli.files.clone();
    if let Some(include) = &config.include {
        files.extend(include.iter().map(|file| config_dir.join(file).to_string_lossy().into_owned()));
    }
    if files.is_empty() {
        print_error("No input files.");
        return EXIT_USAGE_ERROR;
    }

    let results: Vec<Result<ScannedFile, String>> = files.par_iter().map(|path| scan_file(path, options)).collect();

    let mut exit_code = 0;
    let mut histogram: FxHashMap<TokenKind, usize> = FxHashMap::default();
    let mut line_total = 0usize;
    for result in &results {
        let file = match result {
            Ok(file) => file,
            Err(message) => {
                print_error(message);
                exit_code = EXIT_USAGE_ERROR;
                continue;
            }
        };

        match format {
            OutputFormat::Text => print_text(file, files.len() > 1),
            OutputFormat::Json => print_json(file),
        }

        if let Some(err) = &file.error {
            report_scan_error(file, err);
            if exit_code == 0 {
                exit_code = EXIT_SCAN_ERROR;
            }
        }

        for token in &file.tokens {
            *histogram.entry(token.kind).or_insert(0) += 1;
        }
        line_total += LineMap::new(&file.source).line_count();
    }

    if cli.stats {
        print_stats(&histogram, line_total);
    }

    info!(files = files.len(), elapsed_ms = start.elapsed().as_millis() as u64, "scan finished");
    if cli.stats && use_color() {
        eprintln!("{}Scanned {} file(s) in {:.2}s.{}", GRAY, files.len(), start.elapsed().as_secs_f64(), RESET);
    }

    exit_code
}

/// Load the configuration named by `--config`, else `rulescan.json` in the
/// working directory, else defaults. Also returns the directory `include`
/// paths are relative to.
fn resolve_config(cli: &Cli) -> Result<(ScanConfig, std::path::PathBuf), String> {
    let path = match &cli.config {
        Some(path) => Path::new(path).to_path_buf(),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Path::new(DEFAULT_CONFIG_FILE).to_path_buf(),
        None => return Ok((ScanConfig::default(), Path::new(".").to_path_buf())),
    };
    let config = rulescan_options::parse_config_file(&path).map_err(|e| e.to_string())?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .map(Path::to_path_buf)
        .unwrap_or_else(|| Path::new(".").to_path_buf());
    debug!(config = %path.display(), "loaded configuration");
    Ok((config, dir))
}

/// Read and tokenize one file. Tokens scanned before an error are kept.
fn scan_file(path: &str, options: ScannerOptions) -> Result<ScannedFile, String> {
    let source = std::fs::read(path).map_err(|e| format!("Cannot read '{}': {}", path, e))?;
    let mut tokens = Vec::new();
    let mut error = None;
    for item in Scanner::with_options(&source, options) {
        match item {
            Ok(token) => tokens.push(token),
            Err(err) => error = Some(err),
        }
    }
    debug!(path, tokens = tokens.len(), failed = error.is_some(), "scanned file");
    Ok(ScannedFile {
        path: path.to_string(),
        source,
        tokens,
        error,
    })
}

fn print_text(file: &ScannedFile, with_header: bool) {
    if with_header {
        println!("== {} ==", file.path);
    }
    for token in &file.tokens {
        match &token.value {
            Some(value) => println!("{}:{:?} {} {}", token.line, token.span(), token.kind, value),
            None => println!("{}:{:?} {}", token.line, token.span(), token.kind),
        }
    }
}

fn print_json(file: &ScannedFile) {
    let tokens: Vec<serde_json::Value> = file
        .tokens
        .iter()
        .map(|token| {
            serde_json::json!({
                "kind": token.kind.to_string(),
                "line": token.line,
                "start": token.start,
                "end": token.end,
                "value": token.value.as_ref().map(|v| v.to_string()),
            })
        })
        .collect();
    match serde_json::to_string_pretty(&tokens) {
        Ok(json) => println!("{}", json),
        Err(e) => print_error(&format!("Cannot serialize tokens of '{}': {}", file.path, e)),
    }
}

fn report_scan_error(file: &ScannedFile, err: &ScanError) {
    if use_color() {
        let source = String::from_utf8_lossy(&file.source).into_owned();
        let report = miette::Report::new(err.clone()).with_source_code(miette::NamedSource::new(&file.path, source));
        eprintln!("{:?}", report);
    } else {
        eprintln!("{}: {}", error_location(&file.path, &file.source, err), err.message);
    }
}

/// `path:line:column` of an error, or `path:line` when it has no span.
fn error_location(path: &str, source: &[u8], err: &ScanError) -> String {
    match err.span {
        Some(span) => {
            let (line, column) = LineMap::new(source).line_and_column_of(span.start);
            format!("{}:{}:{} [{}]", path, line, column, err.code)
        }
        None => format!("{}:{} [{}]", path, err.line, err.code),
    }
}

/// Coarse grouping used by `--stats`.
fn category(kind: TokenKind) -> &'static str {
    if kind.is_keyword() {
        "keywords"
    } else if kind.is_literal() {
        "literals"
    } else if kind.is_identifier_like() {
        "identifiers"
    } else if kind == TokenKind::Unknown {
        "unknown"
    } else {
        "punctuation"
    }
}

fn print_stats(histogram: &FxHashMap<TokenKind, usize>, line_total: usize) {
    let mut rows: Vec<(TokenKind, usize)> = histogram.iter().map(|(kind, count)| (*kind, *count)).collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    let total: usize = rows.iter().map(|(_, count)| count).sum();
    println!();
    println!("{} tokens in {} lines", total, line_total);

    let mut groups: FxHashMap<&'static str, usize> = FxHashMap::default();
    for (kind, count) in &rows {
        *groups.entry(category(*kind)).or_insert(0) += count;
    }
    let mut groups: Vec<(&str, usize)> = groups.into_iter().collect();
    groups.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(b.0)));
    for (group, count) in groups {
        println!("{:>8}  {}", count, group);
    }
    println!();
    for (kind, count) in rows {
        println!("{:>8}  {}", count, kind);
    }
}

fn print_error(msg: &str) {
    if use_color() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn use_color() -> bool {
    std::io::stderr().is_terminal()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulescan_scanner::tokenize;

    #[test]
    fn test_error_location_uses_columns() {
        let source = b"rule a {\n  condition: \"abc\n}";
        let err = tokenize(source).unwrap_err();
        assert_eq!(error_location("a.yar", source, &err), "a.yar:2:14 [UnterminatedStringError]");
    }

    #[test]
    fn test_error_location_without_span() {
        let err = ScanError::new(&rulescan_diagnostics::messages::EMPTY_ALTERNATIVE, &[], 4);
        assert_eq!(error_location("b.yar", b"", &err), "b.yar:4 [EmptyAlternativeError]");
    }

    #[test]
    fn test_categories() {
        let tokens = tokenize(b"rule $a = \"x\" ; (").unwrap();
        let groups: Vec<&str> = tokens[..tokens.len() - 1].iter().map(|t| category(t.kind)).collect();
        assert_eq!(groups, vec!["keywords", "identifiers", "punctuation", "literals", "unknown", "punctuation"]);
    }
}
