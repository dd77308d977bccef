//! rulescan_diagnostics: Error codes, message catalogue and the error value
//! every scanner component reports through.
//!
//! Errors replace tokens: a component that hits malformed input builds a
//! [`ScanError`] from one of the [`messages`] and returns it in place of the
//! token it was about to produce.

use miette::LabeledSpan;
use rulescan_core::text::TextSpan;
use std::fmt;

/// The closed set of error kinds a scan can end with.
///
/// The hex-pattern kinds belong to the hex-pattern collaborator; the scanner
/// forwards them without reinterpreting them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    NumberConversion,
    IntegerOverflow,
    UnterminatedString,
    IllegalEscapeSequence,
    UnterminatedRegex,
    InvalidUtf8,
    InvalidRegexModifier,
    InvalidAscii,
    HexSyntax,
    InvalidJump,
    EmptyAlternative,
}

impl ErrorCode {
    /// Stable numeric code. Scanner errors live in 1000-1099, hex pattern
    /// errors in 1100-1199.
    pub fn code(self) -> u32 {
        match self {
            ErrorCode::NumberConversion => 1000,
            ErrorCode::IntegerOverflow => 1001,
            ErrorCode::UnterminatedString => 1002,
            ErrorCode::IllegalEscapeSequence => 1003,
            ErrorCode::UnterminatedRegex => 1004,
            ErrorCode::InvalidUtf8 => 1005,
            ErrorCode::InvalidRegexModifier => 1006,
            ErrorCode::InvalidAscii => 1007,
            ErrorCode::HexSyntax => 1100,
            ErrorCode::InvalidJump => 1101,
            ErrorCode::EmptyAlternative => 1102,
        }
    }

    /// The name callers match on, e.g. `UnterminatedStringError`.
    pub fn name(self) -> &'static str {
        match self {
            ErrorCode::NumberConversion => "NumberConversionError",
            ErrorCode::IntegerOverflow => "IntegerOverflowError",
            ErrorCode::UnterminatedString => "UnterminatedStringError",
            ErrorCode::IllegalEscapeSequence => "IllegalEscapeSequenceError",
            ErrorCode::UnterminatedRegex => "UnterminatedRegexError",
            ErrorCode::InvalidUtf8 => "InvalidUTF8Error",
            ErrorCode::InvalidRegexModifier => "InvalidRegexModifierError",
            ErrorCode::InvalidAscii => "InvalidAsciiError",
            ErrorCode::HexSyntax => "HexSyntaxError",
            ErrorCode::InvalidJump => "InvalidJumpError",
            ErrorCode::EmptyAlternative => "EmptyAlternativeError",
        }
    }

    /// Whether this kind is reported by the hex-pattern collaborator.
    pub fn is_hex_pattern(self) -> bool {
        (1100..1200).contains(&self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A message template with its error code.
/// The template may contain `{0}`, `{1}`, etc. placeholders.
#[derive(Debug, Clone)]
pub struct DiagnosticMessage {
    pub code: ErrorCode,
    pub message: &'static str,
}

/// A realized scan error: `{code, message, line}` plus the offending bytes
/// when they are known.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct ScanError {
    /// The error kind.
    pub code: ErrorCode,
    /// Resolved, human-readable message.
    pub message: String,
    /// 1-based line on which the error was detected.
    pub line: u32,
    /// Byte span of the offending input, if any.
    pub span: Option<TextSpan>,
}

impl ScanError {
    /// Create an error from a message template.
    pub fn new(message: &DiagnosticMessage, args: &[&str], line: u32) -> Self {
        Self {
            code: message.code,
            message: format_message(message.message, args),
            line,
            span: None,
        }
    }

    /// Attach the byte span of the offending input.
    pub fn with_span(mut self, span: TextSpan) -> Self {
        self.span = Some(span);
        self
    }

    /// Shift the error to a different first line. Used to place errors
    /// reported relative to an embedded snippet onto the enclosing source.
    pub fn rebased(mut self, first_line: u32, first_offset: u32) -> Self {
        self.line += first_line.saturating_sub(1);
        if let Some(span) = self.span {
            self.span = Some(TextSpan::new(span.start + first_offset, span.length));
        }
        self
    }
}

impl miette::Diagnostic for ScanError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(self.code.name()))
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let span = self.span?;
        Some(Box::new(std::iter::once(LabeledSpan::new(
            Some(self.message.clone()),
            span.start as usize,
            span.length as usize,
        ))))
    }
}

/// Format a message template by replacing `{0}`, `{1}`, etc. with arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

// ============================================================================
// Messages
// ============================================================================

pub mod messages {
    use super::*;

    macro_rules! diag {
        ($code:ident, $msg:expr) => {
            DiagnosticMessage { code: ErrorCode::$code, message: $msg }
        };
    }

    // ========================================================================
    // Scanner errors (1000-1099)
    // ========================================================================
    pub const NUMBER_CONVERSION_0_1: DiagnosticMessage = diag!(NumberConversion, "cannot convert `{0}` to a number: {1}");
    pub const INTEGER_OVERFLOW_0_MAX_1: DiagnosticMessage = diag!(IntegerOverflow, "integer overflow: found {0}, maximum is {1}");
    pub const UNTERMINATED_STRING_LITERAL: DiagnosticMessage = diag!(UnterminatedString, "unterminated string literal");
    pub const ILLEGAL_ESCAPE_SEQUENCE_0: DiagnosticMessage = diag!(IllegalEscapeSequence, "illegal escape sequence `{0}`");
    pub const UNTERMINATED_REGULAR_EXPRESSION: DiagnosticMessage = diag!(UnterminatedRegex, "unterminated regular expression");
    pub const INVALID_UTF8_AT_OFFSET_0: DiagnosticMessage = diag!(InvalidUtf8, "invalid UTF-8 in regular expression at offset {0}");
    pub const INVALID_REGEX_MODIFIER_0: DiagnosticMessage = diag!(InvalidRegexModifier, "invalid regular expression modifier `{0}`");
    pub const INVALID_ASCII_CHARACTER_0: DiagnosticMessage = diag!(InvalidAscii, "invalid character 0x{0} outside of a literal");

    // ========================================================================
    // Hex pattern errors (1100-1199)
    // ========================================================================
    pub const HEX_SYNTAX_0: DiagnosticMessage = diag!(HexSyntax, "invalid hex pattern: {0}");
    pub const INVALID_JUMP_0_1: DiagnosticMessage = diag!(InvalidJump, "invalid jump `{0}`: {1}");
    pub const EMPTY_ALTERNATIVE: DiagnosticMessage = diag!(EmptyAlternative, "empty alternative in hex pattern");
}
