//! The rule-language scanner.
//!
//! Converts raw source bytes into a stream of tokens. The scanner is a small
//! mode machine: `Initial` handles everything outside literals, while
//! `InString`, `InRegexp` and `InComment` consume the bodies of text strings,
//! regular expressions and block comments. String and regular expression
//! bodies are accumulated verbatim, escapes included, into a buffer that is
//! turned into the token value when the closing delimiter is seen.
//!
//! Scanning stops at the first error. From then on every call reports the
//! same error again.

use crate::number::{parse_number, NumberShape};
use crate::rules::{longest_match, rules_for, Action, Mode};
use crate::token::Token;
use rulescan_ast::{HexPatternParser, RegexpLiteral, RegexpModifiers, TokenKind, Value};
use rulescan_core::text::{TextPos, TextSpan};
use rulescan_core::{validate_printable_ascii, validate_utf8};
use rulescan_diagnostics::{messages, ScanError};
use rulescan_hex::HexParser;
use rulescan_options::{LiteralSpans, ScannerOptions};
use std::iter::FusedIterator;
use tracing::{debug, trace, warn};

/// The scanner converts rule source bytes into tokens.
pub struct Scanner<'src, H: HexPatternParser = HexParser> {
    /// The source being scanned.
    source: &'src [u8],
    /// Current position in the source.
    pos: usize,
    /// Current 1-based line.
    line: u32,
    mode: Mode,
    /// Body of the string or regular expression being scanned.
    buffer: Vec<u8>,
    /// Offset of the opening delimiter of the current literal.
    literal_start: usize,
    hex_parser: H,
    options: ScannerOptions,
    /// The error scanning stopped at, replayed on every later call.
    error: Option<ScanError>,
    /// Set once the iterator has yielded its last item.
    exhausted: bool,
}

impl<'src> Scanner<'src> {
    /// Create a scanner with default options and the default hex parser.
    pub fn new(source: &'src [u8]) -> Self {
        Self::with_options(source, ScannerOptions::default())
    }

    /// Create a scanner with the default hex parser.
    pub fn with_options(source: &'src [u8], options: ScannerOptions) -> Self {
        Self::with_hex_parser(source, options, HexParser::new())
    }
}

impl<'src, H: HexPatternParser> Scanner<'src, H> {
    /// Create a scanner that hands hex pattern blocks to `hex_parser`.
    pub fn with_hex_parser(source: &'src [u8], options: ScannerOptions, hex_parser: H) -> Self {
        Self {
            source,
            pos: 0,
            line: 1,
            mode: Mode::Initial,
            buffer: Vec::new(),
            literal_start: 0,
            hex_parser,
            options,
            error: None,
            exhausted: false,
        }
    }

    /// The current 1-based line.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// The current byte offset.
    pub fn offset(&self) -> usize {
        self.pos
    }

    /// The mode the next call starts in.
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Scan the next token.
    ///
    /// Once the end of input is reached, every call returns the
    /// end-of-file token. Once an error is returned, every call returns
    /// that error.
    pub fn next_token(&mut self) -> Result<Token, ScanError> {
        if let Some(err) = &self.error {
            return Err(err.clone());
        }
        loop {
            match self.step() {
                Ok(Some(token)) => return Ok(token),
                Ok(None) => continue,
                Err(err) => {
                    debug!(code = %err.code, line = err.line, offset = self.pos, "scan failed");
                    self.buffer.clear();
                    self.mode = Mode::Initial;
                    self.error = Some(err.clone());
                    return Err(err);
                }
            }
        }
    }

    /// Apply one rule of the current mode. Returns `None` when the match
    /// produced no token.
    fn step(&mut self) -> Result<Option<Token>, ScanError> {
        let source = self.source;
        let rest = &source[self.pos..];
        if rest.is_empty() {
            return self.end_of_input().map(Some);
        }

        let Some((len, rule)) = longest_match(rules_for(self.mode), rest) else {
            // Only literal bodies can fail to match: a backslash right
            // before a line feed or the end of input.
            return Err(self.unterminated());
        };

        let start = self.pos;
        let end = start + len;
        let lexeme = &rest[..len];
        let line = self.line;
        self.pos = end;

        match rule.action {
            Action::Emit(kind) => Ok(Some(Token::new(kind, line, start, end))),
            Action::EmitNamed(kind) => {
                let name = String::from_utf8_lossy(lexeme).into_owned();
                Ok(Some(Token::new(kind, line, start, end).with_value(Value::String(name))))
            }
            Action::Number(shape) => {
                let kind = match shape {
                    NumberShape::Double => TokenKind::DoubleLiteral,
                    _ => TokenKind::NumberLiteral,
                };
                let value = parse_number(shape, lexeme, line).map_err(|err| err.with_span(span(start, end)))?;
                Ok(Some(Token::new(kind, line, start, end).with_value(value)))
            }
            Action::HexPattern => {
                let tokens = self
                    .hex_parser
                    .parse(lexeme)
                    .map_err(|err| err.rebased(line, start as TextPos))?;
                self.line += memchr::memchr_iter(b'\n', lexeme).count() as u32;
                Ok(Some(
                    Token::new(TokenKind::HexStringLiteral, line, start, end).with_value(Value::Hex(tokens)),
                ))
            }
            Action::EnterString | Action::EnterRegexp | Action::EnterComment => {
                self.literal_start = start;
                self.transition(match rule.action {
                    Action::EnterString => Mode::InString,
                    Action::EnterRegexp => Mode::InRegexp,
                    _ => Mode::InComment,
                });
                Ok(None)
            }
            Action::Skip => Ok(None),
            Action::Newline => {
                self.line += 1;
                Ok(None)
            }
            Action::SingleByte => {
                if validate_printable_ascii(lexeme).is_err() {
                    return Err(ScanError::new(
                        &messages::INVALID_ASCII_CHARACTER_0,
                        &[&format!("{:02X}", lexeme[0])],
                        line,
                    )
                    .with_span(span(start, end)));
                }
                Ok(Some(Token::new(TokenKind::from_punctuation(lexeme[0]), line, start, end)))
            }
            Action::Append => {
                self.buffer.extend_from_slice(lexeme);
                Ok(None)
            }
            Action::CloseString => {
                let bytes = std::mem::take(&mut self.buffer);
                self.transition(Mode::Initial);
                let token = Token::new(TokenKind::TextStringLiteral, line, self.token_start(start), end);
                debug!(len = bytes.len(), line, "text string");
                Ok(Some(token.with_value(Value::Bytes(bytes))))
            }
            Action::IllegalEscape => Err(ScanError::new(
                &messages::ILLEGAL_ESCAPE_SEQUENCE_0,
                &[&String::from_utf8_lossy(lexeme)],
                line,
            )
            .with_span(span(start, end))),
            Action::UnterminatedString | Action::UnterminatedRegexp => {
                self.pos = start;
                Err(self.unterminated())
            }
            Action::CloseRegexp => self.close_regexp(&lexeme[1..], line, start, end).map(Some),
            Action::CloseComment => {
                self.transition(Mode::Initial);
                Ok(None)
            }
        }
    }

    /// Build the regular expression token once its closing `/` and
    /// trailing modifier letters have been matched.
    fn close_regexp(&mut self, flags: &[u8], line: u32, start: usize, end: usize) -> Result<Token, ScanError> {
        let body_start = self.literal_start + 1;
        if let Err(offset) = validate_utf8(&self.buffer) {
            return Err(ScanError::new(
                &messages::INVALID_UTF8_AT_OFFSET_0,
                &[&offset.to_string()],
                line,
            )
            .with_span(TextSpan::new((body_start + offset) as TextPos, 1)));
        }

        let mut modifiers = RegexpModifiers::NONE;
        for (i, &flag) in flags.iter().enumerate() {
            match flag {
                b'i' => modifiers |= RegexpModifiers::CASE_INSENSITIVE,
                b's' => modifiers |= RegexpModifiers::DOT_ALL,
                _ => {
                    let at = (start + 1 + i) as TextPos;
                    return Err(ScanError::new(
                        &messages::INVALID_REGEX_MODIFIER_0,
                        &[&(flag as char).to_string()],
                        line,
                    )
                    .with_span(TextSpan::new(at, 1)));
                }
            }
        }

        let body = std::mem::take(&mut self.buffer);
        let pattern = String::from_utf8_lossy(&body).into_owned();
        debug!(len = body.len(), line, "regular expression");
        self.transition(Mode::Initial);
        Ok(Token::new(TokenKind::RegularExpressionLiteral, line, self.token_start(start), end)
            .with_value(Value::Regexp(RegexpLiteral::new(pattern, modifiers))))
    }

    fn end_of_input(&mut self) -> Result<Token, ScanError> {
        match self.mode {
            Mode::Initial => {}
            Mode::InComment => {
                warn!(line = self.line, start = self.literal_start, "end of input inside a block comment");
                self.transition(Mode::Initial);
            }
            Mode::InString | Mode::InRegexp => return Err(self.unterminated()),
        }
        Ok(Token::new(TokenKind::EndOfFileToken, self.line, self.pos, self.pos))
    }

    /// The error for a string or regular expression that was never closed.
    fn unterminated(&self) -> ScanError {
        let message = match self.mode {
            Mode::InRegexp => &messages::UNTERMINATED_REGULAR_EXPRESSION,
            _ => &messages::UNTERMINATED_STRING_LITERAL,
        };
        ScanError::new(message, &[], self.line).with_span(span(self.literal_start, self.pos))
    }

    /// Start offset reported for a literal whose closing match ends at `end`.
    fn token_start(&self, closing_start: usize) -> usize {
        match self.options.literal_spans {
            LiteralSpans::Closing => closing_start,
            LiteralSpans::Full => self.literal_start,
        }
    }

    fn transition(&mut self, to: Mode) {
        trace!(from = ?self.mode, to = ?to, offset = self.pos, line = self.line, "mode transition");
        if to != Mode::Initial {
            self.buffer.clear();
        }
        self.mode = to;
    }
}

fn span(start: usize, end: usize) -> TextSpan {
    TextSpan::from_bounds(start as TextPos, end as TextPos)
}

/// Iterates over the tokens of the source, end-of-file token excluded.
/// The first error ends the iteration.
impl<H: HexPatternParser> Iterator for Scanner<'_, H> {
    type Item = Result<Token, ScanError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted {
            return None;
        }
        match self.next_token() {
            Ok(token) if token.is_eof() => {
                self.exhausted = true;
                None
            }
            Ok(token) => Some(Ok(token)),
            Err(err) => {
                self.exhausted = true;
                Some(Err(err))
            }
        }
    }
}

impl<H: HexPatternParser> FusedIterator for Scanner<'_, H> {}

/// Scan `source` to completion. The returned tokens end with the
/// end-of-file token.
pub fn tokenize(source: &[u8]) -> Result<Vec<Token>, ScanError> {
    tokenize_with_options(source, ScannerOptions::default())
}

pub fn tokenize_with_options(source: &[u8], options: ScannerOptions) -> Result<Vec<Token>, ScanError> {
    let mut scanner = Scanner::with_options(source, options);
    let mut tokens = Vec::new();
    loop {
        let token = scanner.next_token()?;
        let eof = token.is_eof();
        tokens.push(token);
        if eof {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_follows_literals() {
        let mut scanner = Scanner::new(b"\"ab\" /x/ /* c */");
        assert_eq!(scanner.mode(), Mode::Initial);
        scanner.next_token().unwrap();
        assert_eq!(scanner.mode(), Mode::Initial);
        scanner.next_token().unwrap();
        assert_eq!(scanner.mode(), Mode::Initial);
        assert!(scanner.next_token().unwrap().is_eof());
        assert_eq!(scanner.offset(), 16);
    }

    #[test]
    fn test_buffer_empty_between_literals() {
        let mut scanner = Scanner::new(b"\"abc\" \"\"");
        let first = scanner.next_token().unwrap();
        assert!(scanner.buffer.is_empty());
        let second = scanner.next_token().unwrap();
        assert_eq!(first.value, Some(Value::Bytes(b"abc".to_vec())));
        assert_eq!(second.value, Some(Value::Bytes(Vec::new())));
    }

    #[test]
    fn test_error_resets_mode() {
        let mut scanner = Scanner::new(b"\"abc");
        assert!(scanner.next_token().is_err());
        assert_eq!(scanner.mode(), Mode::Initial);
        assert!(scanner.buffer.is_empty());
    }

    #[test]
    fn test_unterminated_span_covers_literal() {
        let mut scanner = Scanner::new(b"x = \"abc\n");
        scanner.next_token().unwrap();
        scanner.next_token().unwrap();
        let err = scanner.next_token().unwrap_err();
        assert_eq!(err.span, Some(TextSpan::new(4, 4)));
    }
}
