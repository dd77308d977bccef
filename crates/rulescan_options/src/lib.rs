//! rulescan_options: `rulescan.json` parsing and scanner options.
//!
//! ```json
//! {
//!   "scannerOptions": { "literalSpans": "full" },
//!   "output": "json",
//!   "include": ["rules/base.yar"]
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;

/// The file name looked up in the working directory when no explicit
/// configuration path is given.
pub const DEFAULT_CONFIG_FILE: &str = "rulescan.json";

/// How `start` is reported for literals that span several sub-matches
/// (text strings and regular expressions).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum LiteralSpans {
    /// `start`/`end` cover only the closing delimiter match.
    #[default]
    Closing,
    /// `start` is widened to the opening delimiter.
    Full,
}

/// Options that change what the scanner reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScannerOptions {
    pub literal_spans: LiteralSpans,
}

/// Token listing format of the command-line tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum OutputFormat {
    Text,
    Json,
}

/// The `rulescan.json` file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanConfig {
    pub scanner_options: Option<ScannerOptions>,
    pub output: Option<OutputFormat>,
    /// Rule files scanned in addition to those named on the command line.
    pub include: Option<Vec<String>>,
}

impl ScanConfig {
    pub fn scanner_options(&self) -> ScannerOptions {
        self.scanner_options.unwrap_or_default()
    }

    pub fn output(&self) -> OutputFormat {
        self.output.unwrap_or(OutputFormat::Text)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid configuration in {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Parse a configuration from a string.
pub fn parse_config(content: &str) -> Result<ScanConfig, serde_json::Error> {
    serde_json::from_str(content)
}

/// Parse a configuration file from a path.
pub fn parse_config_file(path: impl AsRef<Path>) -> Result<ScanConfig, ConfigError> {
    let path = path.as_ref();
    let display = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display.clone(),
        source,
    })?;
    parse_config(&content).map_err(|source| ConfigError::Parse {
        path: display,
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = parse_config("{}").unwrap();
        assert_eq!(config.scanner_options(), ScannerOptions::default());
        assert_eq!(config.scanner_options().literal_spans, LiteralSpans::Closing);
        assert_eq!(config.output(), OutputFormat::Text);
        assert!(config.include.is_none());
    }

    #[test]
    fn test_full_config() {
        let config = parse_config(
            r#"{
                "scannerOptions": { "literalSpans": "full" },
                "output": "json",
                "include": ["a.yar", "b.yar"]
            }"#,
        )
        .unwrap();
        assert_eq!(config.scanner_options().literal_spans, LiteralSpans::Full);
        assert_eq!(config.output(), OutputFormat::Json);
        assert_eq!(config.include.as_deref(), Some(&["a.yar".to_string(), "b.yar".to_string()][..]));
    }

    #[test]
    fn test_empty_scanner_options_use_defaults() {
        let config = parse_config(r#"{ "scannerOptions": {} }"#).unwrap();
        assert_eq!(config.scanner_options().literal_spans, LiteralSpans::Closing);
    }

    #[test]
    fn test_rejects_unknown_span_mode() {
        assert!(parse_config(r#"{ "scannerOptions": { "literalSpans": "wide" } }"#).is_err());
    }

    #[test]
    fn test_missing_file() {
        let err = parse_config_file("/nonexistent/rulescan.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
