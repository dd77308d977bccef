//! Hex pattern tokens and the parser seam the scanner delegates to.

use rulescan_diagnostics::ScanError;
use std::fmt;

/// One element of a parsed hex pattern such as `{ 4D 5A ?? [2-4] (01 | 02) }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HexToken {
    /// A byte, possibly with wildcard nibbles. A `?` nibble is 0 in both
    /// `value` and `mask`.
    Byte { value: u8, mask: u8 },
    /// `~XX`: any byte except the given one.
    NotByte { value: u8, mask: u8 },
    /// `[start-end]`; `end` is `None` for an unbounded jump.
    Jump { start: u32, end: Option<u32> },
    /// `( a | b | ... )`.
    Alternatives(Vec<Vec<HexToken>>),
}

impl fmt::Display for HexToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HexToken::Byte { value, mask } => write_masked(f, *value, *mask),
            HexToken::NotByte { value, mask } => {
                f.write_str("~")?;
                write_masked(f, *value, *mask)
            }
            HexToken::Jump { start, end } => match end {
                Some(end) if end == start => write!(f, "[{}]", start),
                Some(end) => write!(f, "[{}-{}]", start, end),
                None if *start == 0 => f.write_str("[-]"),
                None => write!(f, "[{}-]", start),
            },
            HexToken::Alternatives(alternatives) => {
                f.write_str("(")?;
                for (i, alternative) in alternatives.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" |")?;
                    }
                    for token in alternative {
                        write!(f, " {}", token)?;
                    }
                }
                f.write_str(" )")
            }
        }
    }
}

fn write_masked(f: &mut fmt::Formatter<'_>, value: u8, mask: u8) -> fmt::Result {
    for shift in [4u8, 0] {
        if (mask >> shift) & 0xF == 0 {
            f.write_str("?")?;
        } else {
            write!(f, "{:X}", (value >> shift) & 0xF)?;
        }
    }
    Ok(())
}

/// Parses the raw text of a `{ ... }` hex pattern block.
///
/// The scanner hands over the exact matched text, braces and any interior
/// comments included. Errors are reported with lines relative to that text
/// (the first line is 1) and spans relative to its first byte.
pub trait HexPatternParser {
    fn parse(&self, raw: &[u8]) -> Result<Vec<HexToken>, ScanError>;
}

impl<P: HexPatternParser + ?Sized> HexPatternParser for &P {
    fn parse(&self, raw: &[u8]) -> Result<Vec<HexToken>, ScanError> {
        (**self).parse(raw)
    }
}
