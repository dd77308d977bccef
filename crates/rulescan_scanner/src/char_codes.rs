//! Byte constants and byte classes used by the rule matchers.

pub const LINE_FEED: u8 = b'\n';
pub const CARRIAGE_RETURN: u8 = b'\r';
pub const TAB: u8 = b'\t';
pub const SPACE: u8 = b' ';

pub const ASTERISK: u8 = b'*';
pub const BACKSLASH: u8 = b'\\';
pub const DOLLAR_SIGN: u8 = b'$';
pub const DOT: u8 = b'.';
pub const DOUBLE_QUOTE: u8 = b'"';
pub const EXCLAMATION: u8 = b'!';
pub const HASH: u8 = b'#';
pub const AT: u8 = b'@';
pub const OPEN_BRACE: u8 = b'{';
pub const CLOSE_BRACE: u8 = b'}';
pub const SLASH: u8 = b'/';
pub const UNDERSCORE: u8 = b'_';

/// `[A-Za-z_]`
#[inline]
pub fn is_identifier_start(byte: u8) -> bool {
    byte.is_ascii_alphabetic() || byte == UNDERSCORE
}

/// `[A-Za-z0-9_]`
#[inline]
pub fn is_identifier_part(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == UNDERSCORE
}

#[inline]
pub fn is_octal_digit(byte: u8) -> bool {
    (b'0'..=b'7').contains(&byte)
}

/// Whitespace skipped between tokens, line feeds excluded.
#[inline]
pub fn is_horizontal_space(byte: u8) -> bool {
    matches!(byte, SPACE | TAB | CARRIAGE_RETURN)
}

/// Bytes that may appear between the braces of a hex pattern besides
/// digits and comments.
#[inline]
pub fn is_hex_pattern_byte(byte: u8) -> bool {
    byte.is_ascii_hexdigit()
        || matches!(
            byte,
            SPACE | TAB | CARRIAGE_RETURN | LINE_FEED | b'-' | b'|' | b'~' | b'?' | b'[' | b']' | b'(' | b')'
        )
}

/// Length of the run of bytes at the start of `input` satisfying `pred`.
#[inline]
pub fn count_while(input: &[u8], pred: impl Fn(u8) -> bool) -> usize {
    input.iter().take_while(|&&byte| pred(byte)).count()
}
