//! rulescan_scanner: Lexer for the pattern-matching rule language.
//!
//! Produces tokens from raw rule source bytes with support for:
//! - Keywords, operators and punctuation
//! - String identifiers (`$a`, `$a*`, `#a`, `@a`, `!a`) and integer functions
//! - Decimal numbers with `KB`/`MB` suffixes, hex, octal and doubles
//! - Text strings and regular expressions, accumulated verbatim
//! - Hex pattern blocks, decoded by a pluggable [`HexPatternParser`]
//!
//! [`HexPatternParser`]: rulescan_ast::HexPatternParser

mod char_codes;
mod number;
mod rules;
mod scanner;
mod token;

pub use rules::Mode;
pub use scanner::{tokenize, tokenize_with_options, Scanner};
pub use token::Token;
