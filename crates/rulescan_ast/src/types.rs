//! Values carried by literal and identifier tokens.

use crate::hex::HexToken;
use std::fmt;

bitflags::bitflags! {
    /// Trailing modifier letters of a regular expression literal.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct RegexpModifiers: u8 {
        const NONE             = 0;
        /// `i`
        const CASE_INSENSITIVE = 1 << 0;
        /// `s`
        const DOT_ALL          = 1 << 1;
    }
}

/// A regular expression literal: `/pattern/is`.
///
/// `pattern` is the body between the slashes with escapes kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegexpLiteral {
    pub pattern: String,
    pub modifiers: RegexpModifiers,
}

impl RegexpLiteral {
    pub fn new(pattern: impl Into<String>, modifiers: RegexpModifiers) -> Self {
        Self {
            pattern: pattern.into(),
            modifiers,
        }
    }

    #[inline]
    pub fn case_insensitive(&self) -> bool {
        self.modifiers.contains(RegexpModifiers::CASE_INSENSITIVE)
    }

    #[inline]
    pub fn dot_all(&self) -> bool {
        self.modifiers.contains(RegexpModifiers::DOT_ALL)
    }
}

impl fmt::Display for RegexpLiteral {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}/", self.pattern)?;
        if self.case_insensitive() {
            f.write_str("i")?;
        }
        if self.dot_all() {
            f.write_str("s")?;
        }
        Ok(())
    }
}

/// The typed value attached to a token. Keywords and punctuation carry none.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Name of an identifier-family token, sigil included (`$a`, `#a`, `uint8`).
    String(String),
    /// Body of a text string literal. Escapes are kept verbatim and raw
    /// bytes are not required to be UTF-8.
    Bytes(Vec<u8>),
    Integer(i64),
    Float(f64),
    Regexp(RegexpLiteral),
    Hex(Vec<HexToken>),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_regexp(&self) -> Option<&RegexpLiteral> {
        match self {
            Value::Regexp(r) => Some(r),
            _ => None,
        }
    }

    pub fn as_hex(&self) -> Option<&[HexToken]> {
        match self {
            Value::Hex(tokens) => Some(tokens),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Bytes(b) => write!(f, "\"{}\"", String::from_utf8_lossy(b)),
            Value::Integer(n) => write!(f, "{}", n),
            Value::Float(n) => write!(f, "{}", n),
            Value::Regexp(r) => write!(f, "{}", r),
            Value::Hex(tokens) => {
                f.write_str("{ ")?;
                for token in tokens {
                    write!(f, "{} ", token)?;
                }
                f.write_str("}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_regexp_flags() {
        let re = RegexpLiteral::new("abc", RegexpModifiers::CASE_INSENSITIVE | RegexpModifiers::DOT_ALL);
        assert!(re.case_insensitive());
        assert!(re.dot_all());
        assert_eq!(re.to_string(), "/abc/is");

        let plain = RegexpLiteral::new("a\\/b", RegexpModifiers::NONE);
        assert!(!plain.case_insensitive());
        assert_eq!(plain.to_string(), "/a\\/b/");
    }

    #[test]
    fn test_value_accessors() {
        assert_eq!(Value::Integer(10240).as_integer(), Some(10240));
        assert_eq!(Value::String("$a".into()).as_str(), Some("$a"));
        assert_eq!(Value::Bytes(b"ab".to_vec()).as_bytes(), Some(&b"ab"[..]));
        assert_eq!(Value::Float(1.5).as_integer(), None);
        assert_eq!(Value::Bytes(b"x\\n".to_vec()).to_string(), "\"x\\n\"");
    }
}
