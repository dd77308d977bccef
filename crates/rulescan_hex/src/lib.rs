//! rulescan_hex: The default hex pattern parser.
//!
//! Turns the raw text of a `{ ... }` block, exactly as the scanner matched
//! it, into a sequence of [`HexToken`]s:
//!
//! ```text
//! { 4D 5A ?? ~00 [2-4] ( 01 02 | 03 ?4 ) // comments are allowed
//!   /* anywhere */ 90 }
//! ```

use rulescan_ast::{HexPatternParser, HexToken};
use rulescan_core::text::TextSpan;
use rulescan_diagnostics::{messages, DiagnosticMessage, ScanError};
use tracing::debug;

/// Stateless parser for hex pattern blocks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HexParser;

impl HexParser {
    pub fn new() -> Self {
        Self
    }
}

impl HexPatternParser for HexParser {
    fn parse(&self, raw: &[u8]) -> Result<Vec<HexToken>, ScanError> {
        let result = PatternParser::new(raw).parse_pattern();
        if let Err(ref err) = result {
            debug!(code = %err.code, line = err.line, "hex pattern rejected");
        }
        result
    }
}

/// Cursor over one pattern's text.
struct PatternParser<'a> {
    text: &'a [u8],
    pos: usize,
    /// 1-based line within `text`.
    line: u32,
}

impl<'a> PatternParser<'a> {
    fn new(text: &'a [u8]) -> Self {
        Self {
            text,
            pos: 0,
            line: 1,
        }
    }

    fn parse_pattern(mut self) -> Result<Vec<HexToken>, ScanError> {
        self.skip_trivia()?;
        self.expect(b'{')?;
        let tokens = self.parse_sequence(0)?;
        self.skip_trivia()?;
        self.expect(b'}')?;
        self.skip_trivia()?;
        if !self.is_eof() {
            return Err(self.error(&messages::HEX_SYNTAX_0, &["unexpected input after closing brace"]));
        }

        if tokens.is_empty() {
            return Err(self.error(&messages::HEX_SYNTAX_0, &["empty hex pattern"]));
        }
        let edge_jump = [tokens.first(), tokens.last()]
            .into_iter()
            .flatten()
            .find(|t| matches!(t, HexToken::Jump { .. }));
        if let Some(jump) = edge_jump {
            return Err(ScanError::new(
                &messages::INVALID_JUMP_0_1,
                &[&jump.to_string(), "a pattern cannot start or end with a jump"],
                1,
            ));
        }
        Ok(tokens)
    }

    /// Parse elements until something that cannot start one.
    /// `depth` counts enclosing alternations.
    fn parse_sequence(&mut self, depth: usize) -> Result<Vec<HexToken>, ScanError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia()?;
            match self.current() {
                Some(b'~') => {
                    self.pos += 1;
                    let (value, mask) = self.parse_byte()?;
                    if mask == 0 {
                        return Err(self.error(&messages::HEX_SYNTAX_0, &["`~??` can never match"]));
                    }
                    tokens.push(HexToken::NotByte { value, mask });
                }
                Some(ch) if is_nibble(ch) => {
                    let (value, mask) = self.parse_byte()?;
                    tokens.push(HexToken::Byte { value, mask });
                }
                Some(b'[') => tokens.push(self.parse_jump(depth)?),
                Some(b'(') => tokens.push(self.parse_alternatives(depth + 1)?),
                _ => break,
            }
        }
        Ok(tokens)
    }

    /// Two adjacent nibbles, each a hex digit or `?`.
    fn parse_byte(&mut self) -> Result<(u8, u8), ScanError> {
        let high = self.current().and_then(nibble);
        let low = self.char_at(1).and_then(nibble);
        match (high, low) {
            (Some((hv, hm)), Some((lv, lm))) => {
                self.pos += 2;
                Ok(((hv << 4) | lv, (hm << 4) | lm))
            }
            _ => Err(self.error(&messages::HEX_SYNTAX_0, &["a byte needs two hex digits"])),
        }
    }

    /// `[n]`, `[n-m]`, `[n-]`, `[-m]` or `[-]`.
    fn parse_jump(&mut self, depth: usize) -> Result<HexToken, ScanError> {
        let open = self.pos;
        self.pos += 1; // skip [
        self.skip_spaces();
        let low = self.parse_decimal()?;
        self.skip_spaces();

        let (start, end) = match self.current() {
            Some(b']') => match low {
                Some(n) => (n, Some(n)),
                None => return Err(self.error(&messages::HEX_SYNTAX_0, &["empty jump"])),
            },
            Some(b'-') => {
                self.pos += 1;
                self.skip_spaces();
                let high = self.parse_decimal()?;
                self.skip_spaces();
                if self.current() != Some(b']') {
                    return Err(self.error(&messages::HEX_SYNTAX_0, &["expected `]`"]));
                }
                (low.unwrap_or(0), high)
            }
            _ => return Err(self.error(&messages::HEX_SYNTAX_0, &["expected `-` or `]`"])),
        };
        self.pos += 1; // skip ]

        let text = String::from_utf8_lossy(&self.text[open..self.pos]).into_owned();
        if let Some(end) = end {
            if start > end {
                return Err(self.error(&messages::INVALID_JUMP_0_1, &[&text, "lower bound exceeds upper bound"]));
            }
        } else if depth > 0 {
            return Err(self.error(&messages::INVALID_JUMP_0_1, &[&text, "unbounded jumps are not allowed inside alternatives"]));
        }
        Ok(HexToken::Jump { start, end })
    }

    /// `( seq | seq | ... )`.
    fn parse_alternatives(&mut self, depth: usize) -> Result<HexToken, ScanError> {
        self.pos += 1; // skip (
        let mut alternatives = Vec::new();
        loop {
            let sequence = self.parse_sequence(depth)?;
            if sequence.is_empty() {
                return Err(self.error(&messages::EMPTY_ALTERNATIVE, &[]));
            }
            alternatives.push(sequence);
            self.skip_trivia()?;
            match self.current() {
                Some(b'|') => self.pos += 1,
                Some(b')') => {
                    self.pos += 1;
                    break;
                }
                _ => return Err(self.unexpected("`|` or `)`")),
            }
        }
        Ok(HexToken::Alternatives(alternatives))
    }

    fn parse_decimal(&mut self) -> Result<Option<u32>, ScanError> {
        let start = self.pos;
        while self.current().is_some_and(|ch| ch.is_ascii_digit()) {
            self.pos += 1;
        }
        if start == self.pos {
            return Ok(None);
        }
        // Only ASCII digits were consumed.
        let digits = String::from_utf8_lossy(&self.text[start..self.pos]);
        digits
            .parse::<u32>()
            .map(Some)
            .map_err(|_| self.error(&messages::HEX_SYNTAX_0, &["jump bound is too large"]))
    }

    // ========================================================================
    // Trivia
    // ========================================================================

    fn skip_spaces(&mut self) {
        while let Some(ch) = self.current() {
            match ch {
                b' ' | b'\t' | b'\r' => self.pos += 1,
                b'\n' => {
                    self.line += 1;
                    self.pos += 1;
                }
                _ => return,
            }
        }
    }

    /// Skip whitespace, `// line` and `/* block */` comments.
    fn skip_trivia(&mut self) -> Result<(), ScanError> {
        loop {
            self.skip_spaces();
            if self.current() != Some(b'/') {
                return Ok(());
            }
            match self.char_at(1) {
                Some(b'/') => {
                    self.pos += 2;
                    while self.current().is_some_and(|ch| ch != b'\n') {
                        self.pos += 1;
                    }
                }
                Some(b'*') => {
                    let open = self.pos;
                    self.pos += 2;
                    loop {
                        match self.current() {
                            None => {
                                self.pos = open;
                                return Err(self.error(&messages::HEX_SYNTAX_0, &["unterminated comment"]));
                            }
                            Some(b'*') if self.char_at(1) == Some(b'/') => {
                                self.pos += 2;
                                break;
                            }
                            Some(b'\n') => {
                                self.line += 1;
                                self.pos += 1;
                            }
                            Some(_) => self.pos += 1,
                        }
                    }
                }
                _ => return Err(self.unexpected("a hex byte")),
            }
        }
    }

    // ========================================================================
    // Cursor helpers
    // ========================================================================

    #[inline]
    fn current(&self) -> Option<u8> {
        self.text.get(self.pos).copied()
    }

    #[inline]
    fn char_at(&self, offset: usize) -> Option<u8> {
        self.text.get(self.pos + offset).copied()
    }

    #[inline]
    fn is_eof(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn expect(&mut self, ch: u8) -> Result<(), ScanError> {
        if self.current() == Some(ch) {
            self.pos += 1;
            Ok(())
        } else {
            let wanted = format!("`{}`", char::from(ch));
            Err(self.unexpected(&wanted))
        }
    }

    fn unexpected(&self, wanted: &str) -> ScanError {
        let found = match self.current() {
            Some(ch) if ch.is_ascii_graphic() => format!("`{}`", char::from(ch)),
            Some(ch) => format!("byte 0x{:02X}", ch),
            None => "end of pattern".to_string(),
        };
        let detail = format!("expected {}, found {}", wanted, found);
        self.error(&messages::HEX_SYNTAX_0, &[&detail])
    }

    fn error(&self, message: &DiagnosticMessage, args: &[&str]) -> ScanError {
        let length = u32::from(!self.is_eof());
        ScanError::new(message, args, self.line).with_span(TextSpan::new(self.pos as u32, length))
    }
}

#[inline]
fn is_nibble(ch: u8) -> bool {
    ch.is_ascii_hexdigit() || ch == b'?'
}

/// Value and mask of one nibble.
fn nibble(ch: u8) -> Option<(u8, u8)> {
    match ch {
        b'?' => Some((0, 0)),
        b'0'..=b'9' => Some((ch - b'0', 0xF)),
        b'a'..=b'f' => Some((ch - b'a' + 10, 0xF)),
        b'A'..=b'F' => Some((ch - b'A' + 10, 0xF)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rulescan_diagnostics::ErrorCode;

    fn parse(text: &str) -> Result<Vec<HexToken>, ScanError> {
        HexParser::new().parse(text.as_bytes())
    }

    fn byte(value: u8) -> HexToken {
        HexToken::Byte { value, mask: 0xFF }
    }

    #[test]
    fn test_plain_bytes_and_wildcards() {
        let tokens = parse("{ AA bb ?? 4? ?d }").unwrap();
        assert_eq!(tokens, vec![
            byte(0xAA),
            byte(0xBB),
            HexToken::Byte { value: 0, mask: 0 },
            HexToken::Byte { value: 0x40, mask: 0xF0 },
            HexToken::Byte { value: 0x0D, mask: 0x0F },
        ]);
    }

    #[test]
    fn test_not_byte() {
        let tokens = parse("{ 01 ~02 ~?3 }").unwrap();
        assert_eq!(tokens, vec![
            byte(0x01),
            HexToken::NotByte { value: 0x02, mask: 0xFF },
            HexToken::NotByte { value: 0x03, mask: 0x0F },
        ]);
        let err = parse("{ 01 ~?? }").unwrap_err();
        assert_eq!(err.code, ErrorCode::HexSyntax);
    }

    #[test]
    fn test_jumps() {
        let tokens = parse("{ 01 [4] 02 [2-6] 03 [8-] 04 [-] 05 [ 1 - 3 ] 06 }").unwrap();
        assert_eq!(tokens, vec![
            byte(0x01),
            HexToken::Jump { start: 4, end: Some(4) },
            byte(0x02),
            HexToken::Jump { start: 2, end: Some(6) },
            byte(0x03),
            HexToken::Jump { start: 8, end: None },
            byte(0x04),
            HexToken::Jump { start: 0, end: None },
            byte(0x05),
            HexToken::Jump { start: 1, end: Some(3) },
            byte(0x06),
        ]);
    }

    #[test]
    fn test_invalid_jumps() {
        assert_eq!(parse("{ 01 [6-2] 02 }").unwrap_err().code, ErrorCode::InvalidJump);
        assert_eq!(parse("{ [2] 01 }").unwrap_err().code, ErrorCode::InvalidJump);
        assert_eq!(parse("{ 01 [2] }").unwrap_err().code, ErrorCode::InvalidJump);
        assert_eq!(parse("{ 01 ( 02 [-] 03 | 04 ) 05 }").unwrap_err().code, ErrorCode::InvalidJump);
        assert_eq!(parse("{ 01 [] 02 }").unwrap_err().code, ErrorCode::HexSyntax);
    }

    #[test]
    fn test_alternatives() {
        let tokens = parse("{ 01 ( 02 03 | 04 [1-2] 05 | ( 06 | 07 ) ) 08 }").unwrap();
        assert_eq!(tokens, vec![
            byte(0x01),
            HexToken::Alternatives(vec![
                vec![byte(0x02), byte(0x03)],
                vec![byte(0x04), HexToken::Jump { start: 1, end: Some(2) }, byte(0x05)],
                vec![HexToken::Alternatives(vec![vec![byte(0x06)], vec![byte(0x07)]])],
            ]),
            byte(0x08),
        ]);
    }

    #[test]
    fn test_empty_alternative() {
        let err = parse("{ 01 ( 02 | ) }").unwrap_err();
        assert_eq!(err.code, ErrorCode::EmptyAlternative);
    }

    #[test]
    fn test_comments_and_lines() {
        let tokens = parse("{ 01 // one\n  /* two\n */ 02 }").unwrap();
        assert_eq!(tokens, vec![byte(0x01), byte(0x02)]);

        let err = parse("{ 01\n\n 0G }").unwrap_err();
        assert_eq!(err.code, ErrorCode::HexSyntax);
        assert_eq!(err.line, 3);
        assert_eq!(err.span.map(|s| s.start), Some(7));
    }

    #[test]
    fn test_syntax_errors() {
        assert_eq!(parse("{ }").unwrap_err().code, ErrorCode::HexSyntax);
        assert_eq!(parse("{ 0 }").unwrap_err().code, ErrorCode::HexSyntax);
        assert_eq!(parse("{ 01 | 02 }").unwrap_err().code, ErrorCode::HexSyntax);
        assert_eq!(parse("{ 01 ( 02 }").unwrap_err().code, ErrorCode::HexSyntax);
        assert_eq!(parse("01 02").unwrap_err().code, ErrorCode::HexSyntax);
    }
}
