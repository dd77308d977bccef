//! Per-mode rule tables.
//!
//! Each mode owns an ordered list of rules. At every step the scanner tries
//! all rules of the current mode against the remaining input and keeps the
//! longest match; on equal length the rule declared first wins. This is how
//! `rule` becomes a keyword while `ruleset` stays an identifier.

use crate::char_codes::*;
use crate::number::NumberShape;
use memchr::{memchr, memchr2, memchr3, memmem};
use rulescan_ast::token_kind::{KEYWORDS, OPERATORS};
use rulescan_ast::TokenKind;
use std::sync::OnceLock;

/// Scanner mode. Selects which rule table is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    Initial,
    InString,
    InRegexp,
    InComment,
}

/// What the scanner does with a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Action {
    /// Emit a token without value (keywords, operators).
    Emit(TokenKind),
    /// Emit a token whose value is the matched text.
    EmitNamed(TokenKind),
    Number(NumberShape),
    HexPattern,
    EnterString,
    EnterRegexp,
    EnterComment,
    Skip,
    Newline,
    /// Punctuation, or an error for non-printable bytes.
    SingleByte,
    /// Append the matched bytes to the literal buffer.
    Append,
    CloseString,
    IllegalEscape,
    UnterminatedString,
    CloseRegexp,
    UnterminatedRegexp,
    CloseComment,
}

/// How a rule recognizes its input.
#[derive(Clone, Copy)]
pub(crate) enum Pattern {
    Literal(&'static [u8]),
    /// Returns the length of the match at the start of the input, 0 if none.
    Scan(fn(&[u8]) -> usize),
}

impl Pattern {
    #[inline]
    fn match_len(&self, input: &[u8]) -> usize {
        match self {
            Pattern::Literal(lit) if input.starts_with(lit) => lit.len(),
            Pattern::Literal(_) => 0,
            Pattern::Scan(scan) => scan(input),
        }
    }
}

#[derive(Clone, Copy)]
pub(crate) struct Rule {
    pub pattern: Pattern,
    pub action: Action,
}

const fn literal(text: &'static str, action: Action) -> Rule {
    Rule {
        pattern: Pattern::Literal(text.as_bytes()),
        action,
    }
}

const fn scan(f: fn(&[u8]) -> usize, action: Action) -> Rule {
    Rule {
        pattern: Pattern::Scan(f),
        action,
    }
}

/// The longest match among `rules`, earliest rule on ties.
pub(crate) fn longest_match<'r>(rules: &'r [Rule], input: &[u8]) -> Option<(usize, &'r Rule)> {
    let mut best: Option<(usize, &Rule)> = None;
    for rule in rules {
        let len = rule.pattern.match_len(input);
        if len > 0 && best.map_or(true, |(best_len, _)| len > best_len) {
            best = Some((len, rule));
        }
    }
    best
}

pub(crate) fn rules_for(mode: Mode) -> &'static [Rule] {
    match mode {
        Mode::Initial => initial_rules(),
        Mode::InString => STRING_RULES,
        Mode::InRegexp => REGEXP_RULES,
        Mode::InComment => COMMENT_RULES,
    }
}

fn initial_rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let mut rules = Vec::with_capacity(OPERATORS.len() + KEYWORDS.len() + 20);
        rules.extend(OPERATORS.iter().map(|&(text, kind)| literal(text, Action::Emit(kind))));
        rules.extend(KEYWORDS.iter().map(|&(text, kind)| literal(text, Action::Emit(kind))));
        rules.extend([
            literal("/*", Action::EnterComment),
            scan(line_comment, Action::Skip),
            scan(string_identifier_with_wildcard, Action::EmitNamed(TokenKind::StringIdentifierWithWildcard)),
            scan(string_identifier, Action::EmitNamed(TokenKind::StringIdentifier)),
            scan(string_count, Action::EmitNamed(TokenKind::StringCount)),
            scan(string_offset, Action::EmitNamed(TokenKind::StringOffset)),
            scan(string_length, Action::EmitNamed(TokenKind::StringLength)),
            scan(integer_function, Action::EmitNamed(TokenKind::IntegerFunction)),
            scan(identifier, Action::EmitNamed(TokenKind::Identifier)),
            scan(decimal_number, Action::Number(NumberShape::Decimal)),
            scan(double_number, Action::Number(NumberShape::Double)),
            scan(hex_number, Action::Number(NumberShape::Hex)),
            scan(octal_number, Action::Number(NumberShape::Octal)),
            literal("\"", Action::EnterString),
            literal("/", Action::EnterRegexp),
            scan(hex_pattern, Action::HexPattern),
            scan(horizontal_space, Action::Skip),
            literal("\n", Action::Newline),
            scan(any_byte, Action::SingleByte),
        ]);
        rules
    })
}

static STRING_RULES: &[Rule] = &[
    literal("\"", Action::CloseString),
    literal("\\t", Action::Append),
    literal("\\r", Action::Append),
    literal("\\n", Action::Append),
    literal("\\\"", Action::Append),
    literal("\\\\", Action::Append),
    scan(hex_escape, Action::Append),
    scan(escaped_byte, Action::IllegalEscape),
    literal("\n", Action::UnterminatedString),
    scan(string_run, Action::Append),
];

static REGEXP_RULES: &[Rule] = &[
    scan(regexp_close, Action::CloseRegexp),
    scan(escaped_byte, Action::Append),
    literal("\n", Action::UnterminatedRegexp),
    scan(regexp_run, Action::Append),
];

static COMMENT_RULES: &[Rule] = &[
    literal("*/", Action::CloseComment),
    literal("\n", Action::Newline),
    scan(comment_run, Action::Skip),
    literal("*", Action::Skip),
];

// ============================================================================
// Initial mode matchers
// ============================================================================

/// `//[^\n]*`
fn line_comment(input: &[u8]) -> usize {
    if !input.starts_with(b"//") {
        return 0;
    }
    let body = &input[2..];
    2 + memchr(LINE_FEED, body).unwrap_or(body.len())
}

/// `<sigil>[A-Za-z0-9_]*`
#[inline]
fn sigil_name(input: &[u8], sigil: u8) -> usize {
    match input.first() {
        Some(&first) if first == sigil => 1 + count_while(&input[1..], is_identifier_part),
        _ => 0,
    }
}

/// `$[A-Za-z0-9_]*\*`
fn string_identifier_with_wildcard(input: &[u8]) -> usize {
    let len = sigil_name(input, DOLLAR_SIGN);
    if len > 0 && input.get(len) == Some(&ASTERISK) {
        len + 1
    } else {
        0
    }
}

fn string_identifier(input: &[u8]) -> usize {
    sigil_name(input, DOLLAR_SIGN)
}

fn string_count(input: &[u8]) -> usize {
    sigil_name(input, HASH)
}

fn string_offset(input: &[u8]) -> usize {
    sigil_name(input, AT)
}

fn string_length(input: &[u8]) -> usize {
    sigil_name(input, EXCLAMATION)
}

/// `u?int(8|16|32)(be)?`
fn integer_function(input: &[u8]) -> usize {
    let mut len = usize::from(input.first() == Some(&b'u'));
    if !input[len..].starts_with(b"int") {
        return 0;
    }
    len += 3;
    let rest = &input[len..];
    if rest.starts_with(b"8") {
        len += 1;
    } else if rest.starts_with(b"16") || rest.starts_with(b"32") {
        len += 2;
    } else {
        return 0;
    }
    if input[len..].starts_with(b"be") {
        len += 2;
    }
    len
}

/// `[A-Za-z_][A-Za-z0-9_]*`
fn identifier(input: &[u8]) -> usize {
    match input.first() {
        Some(&first) if is_identifier_start(first) => 1 + count_while(&input[1..], is_identifier_part),
        _ => 0,
    }
}

/// `[0-9]+(KB|MB)?`
fn decimal_number(input: &[u8]) -> usize {
    let digits = count_while(input, |b| b.is_ascii_digit());
    if digits == 0 {
        return 0;
    }
    let rest = &input[digits..];
    if rest.starts_with(b"KB") || rest.starts_with(b"MB") {
        digits + 2
    } else {
        digits
    }
}

/// `[0-9]+\.[0-9]+`
fn double_number(input: &[u8]) -> usize {
    let whole = count_while(input, |b| b.is_ascii_digit());
    if whole == 0 || input.get(whole) != Some(&DOT) {
        return 0;
    }
    let fraction = count_while(&input[whole + 1..], |b| b.is_ascii_digit());
    if fraction == 0 {
        0
    } else {
        whole + 1 + fraction
    }
}

/// `0x[0-9a-fA-F]+`
fn hex_number(input: &[u8]) -> usize {
    prefixed_digits(input, b"0x", |b| b.is_ascii_hexdigit())
}

/// `0o[0-7]+`
fn octal_number(input: &[u8]) -> usize {
    prefixed_digits(input, b"0o", is_octal_digit)
}

fn prefixed_digits(input: &[u8], prefix: &[u8], is_digit: fn(u8) -> bool) -> usize {
    if !input.starts_with(prefix) {
        return 0;
    }
    match count_while(&input[prefix.len()..], is_digit) {
        0 => 0,
        n => prefix.len() + n,
    }
}

/// A brace-delimited hex pattern: `{`, at least one element, then `}`.
///
/// Elements are hex digits, the bytes of [`is_hex_pattern_byte`], block
/// comments and line comments. Anything else means the `{` is a plain brace.
fn hex_pattern(input: &[u8]) -> usize {
    if input.first() != Some(&OPEN_BRACE) {
        return 0;
    }
    let mut pos = 1;
    let mut elements = 0usize;
    loop {
        match input.get(pos) {
            Some(&CLOSE_BRACE) if elements > 0 => return pos + 1,
            Some(&byte) if is_hex_pattern_byte(byte) => pos += 1,
            Some(&SLASH) => match input.get(pos + 1) {
                Some(&ASTERISK) => match memmem::find(&input[pos + 2..], b"*/") {
                    Some(close) => pos += 2 + close + 2,
                    None => return 0,
                },
                Some(&SLASH) => {
                    let body = &input[pos + 2..];
                    pos += 2 + memchr(LINE_FEED, body).unwrap_or(body.len());
                }
                _ => return 0,
            },
            _ => return 0,
        }
        elements += 1;
    }
}

/// `[ \t\r]+`
fn horizontal_space(input: &[u8]) -> usize {
    count_while(input, is_horizontal_space)
}

fn any_byte(input: &[u8]) -> usize {
    usize::from(!input.is_empty())
}

// ============================================================================
// Literal body matchers
// ============================================================================

/// `\x[0-9a-fA-F]{2}`
fn hex_escape(input: &[u8]) -> usize {
    match input {
        [BACKSLASH, b'x', hi, lo, ..] if hi.is_ascii_hexdigit() && lo.is_ascii_hexdigit() => 4,
        _ => 0,
    }
}

/// A backslash followed by any byte but a line feed.
fn escaped_byte(input: &[u8]) -> usize {
    match input {
        [BACKSLASH, next, ..] if *next != LINE_FEED => 2,
        _ => 0,
    }
}

/// `[^\\\n"]+`
fn string_run(input: &[u8]) -> usize {
    memchr3(BACKSLASH, LINE_FEED, DOUBLE_QUOTE, input).unwrap_or(input.len())
}

/// `/[A-Za-z]*`
fn regexp_close(input: &[u8]) -> usize {
    if input.first() != Some(&SLASH) {
        return 0;
    }
    1 + count_while(&input[1..], |b| b.is_ascii_alphabetic())
}

/// `[^\\\n/]+`
fn regexp_run(input: &[u8]) -> usize {
    memchr3(BACKSLASH, LINE_FEED, SLASH, input).unwrap_or(input.len())
}

/// `[^*\n]+`
fn comment_run(input: &[u8]) -> usize {
    memchr2(ASTERISK, LINE_FEED, input).unwrap_or(input.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn best(mode: Mode, input: &str) -> Option<(usize, Action)> {
        longest_match(rules_for(mode), input.as_bytes()).map(|(len, rule)| (len, rule.action))
    }

    #[test]
    fn test_keyword_wins_tie_with_identifier() {
        assert_eq!(best(Mode::Initial, "rule "), Some((4, Action::Emit(TokenKind::RuleKeyword))));
        assert_eq!(
            best(Mode::Initial, "ruleset"),
            Some((7, Action::EmitNamed(TokenKind::Identifier)))
        );
    }

    #[test]
    fn test_longest_operator() {
        assert_eq!(best(Mode::Initial, "<<1"), Some((2, Action::Emit(TokenKind::LessThanLessThanToken))));
        assert_eq!(best(Mode::Initial, "<1"), Some((1, Action::Emit(TokenKind::LessThanToken))));
    }

    #[test]
    fn test_integer_function() {
        assert_eq!(integer_function(b"uint16be("), 8);
        assert_eq!(integer_function(b"int8"), 4);
        assert_eq!(integer_function(b"int64"), 0);
        assert_eq!(integer_function(b"uin"), 0);
    }

    #[test]
    fn test_sigils() {
        assert_eq!(string_identifier_with_wildcard(b"$a*"), 3);
        assert_eq!(string_identifier_with_wildcard(b"$*"), 2);
        assert_eq!(string_identifier_with_wildcard(b"$a"), 0);
        assert_eq!(string_identifier(b"$"), 1);
        assert_eq!(string_length(b"!len=="), 4);
    }

    #[test]
    fn test_numbers() {
        assert_eq!(decimal_number(b"10KB"), 4);
        assert_eq!(decimal_number(b"10kb"), 2);
        assert_eq!(double_number(b"1.5"), 3);
        assert_eq!(double_number(b"1..2"), 0);
        assert_eq!(hex_number(b"0x1F"), 4);
        assert_eq!(hex_number(b"0x"), 0);
        assert_eq!(octal_number(b"0o78"), 3);
    }

    #[test]
    fn test_hex_pattern_extent() {
        assert_eq!(hex_pattern(b"{ AA BB } x"), 9);
        assert_eq!(hex_pattern(b"{ AA /* } */ BB }"), 17);
        assert_eq!(hex_pattern(b"{ AA // }\n BB }"), 15);
        assert_eq!(hex_pattern(b"{}"), 0);
        assert_eq!(hex_pattern(b"{ AA /* }"), 0);
        assert_eq!(hex_pattern(b"{ condition }"), 0);
    }

    #[test]
    fn test_string_rules() {
        assert_eq!(best(Mode::InString, "\\x41"), Some((4, Action::Append)));
        assert_eq!(best(Mode::InString, "\\q"), Some((2, Action::IllegalEscape)));
        assert_eq!(best(Mode::InString, "abc\"").map(|(len, _)| len), Some(3));
        assert_eq!(best(Mode::InString, "\\\n"), None);
    }

    #[test]
    fn test_comment_rules() {
        assert_eq!(best(Mode::InComment, "*/"), Some((2, Action::CloseComment)));
        assert_eq!(best(Mode::InComment, "**/"), Some((1, Action::Skip)));
        assert_eq!(best(Mode::InComment, "ab*"), Some((2, Action::Skip)));
    }
}
