//! rulescan_ast: Token kinds and token value types shared between the
//! scanner and the grammar that consumes its token stream.
//!
//! The AST proper lives with the parser; this crate only holds the data
//! shapes that cross the scanner boundary.

pub mod hex;
pub mod token_kind;
pub mod types;

// Re-export key types
pub use hex::{HexPatternParser, HexToken};
pub use token_kind::TokenKind;
pub use types::*;
