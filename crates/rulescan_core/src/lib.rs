//! rulescan_core: Core utilities shared by the rule scanner crates.
//!
//! Provides byte spans, a byte-offset to line map, and the validators the
//! scanner runs over raw source bytes.

pub mod text;
pub mod validate;

// Re-export commonly used types
pub use text::{LineMap, TextPos, TextSpan};
pub use validate::{validate_printable_ascii, validate_utf8};
