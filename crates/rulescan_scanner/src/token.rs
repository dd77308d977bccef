//! Tokens produced by the scanner.

use rulescan_ast::{TokenKind, Value};
use rulescan_core::text::{TextPos, TextSpan};

/// A scanned token.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,
    /// 1-based line on which the match that produced the token began.
    pub line: u32,
    /// Start byte offset of the reported match.
    pub start: usize,
    /// End byte offset of the reported match (exclusive).
    pub end: usize,
    /// Decoded value for literals and identifier-family tokens.
    pub value: Option<Value>,
}

impl Token {
    pub fn new(kind: TokenKind, line: u32, start: usize, end: usize) -> Self {
        Self {
            kind,
            line,
            start,
            end,
            value: None,
        }
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::EndOfFileToken
    }

    pub fn span(&self) -> TextSpan {
        TextSpan::from_bounds(self.start as TextPos, self.end as TextPos)
    }

    /// The source bytes the token's span covers.
    pub fn lexeme<'s>(&self, source: &'s [u8]) -> &'s [u8] {
        &source[self.start..self.end]
    }
}
