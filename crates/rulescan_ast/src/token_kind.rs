//! TokenKind enum - every token kind the rule scanner can produce.

/// The kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u16)]
pub enum TokenKind {
    // ========================================================================
    // Special
    // ========================================================================
    /// A printable character no rule of the grammar uses (e.g. `;`).
    Unknown = 0,
    EndOfFileToken = 1,

    // ========================================================================
    // Literals
    // ========================================================================
    NumberLiteral = 2,
    DoubleLiteral = 3,
    TextStringLiteral = 4,
    RegularExpressionLiteral = 5,
    HexStringLiteral = 6,

    // ========================================================================
    // Identifier family
    // ========================================================================
    Identifier = 10,
    StringIdentifier = 11,
    StringIdentifierWithWildcard = 12,
    StringCount = 13,
    StringOffset = 14,
    StringLength = 15,
    IntegerFunction = 16,

    // ========================================================================
    // Punctuation
    // ========================================================================
    DotDotToken = 20,
    LessThanToken = 21,
    GreaterThanToken = 22,
    LessThanEqualsToken = 23,
    GreaterThanEqualsToken = 24,
    EqualsEqualsToken = 25,
    ExclamationEqualsToken = 26,
    LessThanLessThanToken = 27,
    GreaterThanGreaterThanToken = 28,
    OpenBraceToken = 29,
    CloseBraceToken = 30,
    OpenParenToken = 31,
    CloseParenToken = 32,
    OpenBracketToken = 33,
    CloseBracketToken = 34,
    PlusToken = 35,
    MinusToken = 36,
    AsteriskToken = 37,
    BackslashToken = 38,
    PercentToken = 39,
    AmpersandToken = 40,
    BarToken = 41,
    CaretToken = 42,
    TildeToken = 43,
    ColonToken = 44,
    CommaToken = 45,
    EqualsToken = 46,
    DotToken = 47,

    // ========================================================================
    // Keywords
    // ========================================================================
    AllKeyword = 60,
    AndKeyword = 61,
    AnyKeyword = 62,
    AsciiKeyword = 63,
    AtKeyword = 64,
    Base64Keyword = 65,
    Base64WideKeyword = 66,
    ConditionKeyword = 67,
    ContainsKeyword = 68,
    DefinedKeyword = 69,
    EndsWithKeyword = 70,
    EntrypointKeyword = 71,
    FalseKeyword = 72,
    FilesizeKeyword = 73,
    ForKeyword = 74,
    FullwordKeyword = 75,
    GlobalKeyword = 76,
    IContainsKeyword = 77,
    IEndsWithKeyword = 78,
    IEqualsKeyword = 79,
    IStartsWithKeyword = 80,
    ImportKeyword = 81,
    InKeyword = 82,
    IncludeKeyword = 83,
    MatchesKeyword = 84,
    MetaKeyword = 85,
    NocaseKeyword = 86,
    NoneKeyword = 87,
    NotKeyword = 88,
    OfKeyword = 89,
    OrKeyword = 90,
    PrivateKeyword = 91,
    RuleKeyword = 92,
    StartsWithKeyword = 93,
    StringsKeyword = 94,
    ThemKeyword = 95,
    TrueKeyword = 96,
    WideKeyword = 97,
    XorKeyword = 98,
}

/// Every keyword lexeme with its kind, in the order the scanner tries them.
pub const KEYWORDS: &[(&str, TokenKind)] = &[
    ("all", TokenKind::AllKeyword),
    ("and", TokenKind::AndKeyword),
    ("any", TokenKind::AnyKeyword),
    ("ascii", TokenKind::AsciiKeyword),
    ("at", TokenKind::AtKeyword),
    ("base64", TokenKind::Base64Keyword),
    ("base64wide", TokenKind::Base64WideKeyword),
    ("condition", TokenKind::ConditionKeyword),
    ("contains", TokenKind::ContainsKeyword),
    ("defined", TokenKind::DefinedKeyword),
    ("endswith", TokenKind::EndsWithKeyword),
    ("entrypoint", TokenKind::EntrypointKeyword),
    ("false", TokenKind::FalseKeyword),
    ("filesize", TokenKind::FilesizeKeyword),
    ("for", TokenKind::ForKeyword),
    ("fullword", TokenKind::FullwordKeyword),
    ("global", TokenKind::GlobalKeyword),
    ("icontains", TokenKind::IContainsKeyword),
    ("iendswith", TokenKind::IEndsWithKeyword),
    ("iequals", TokenKind::IEqualsKeyword),
    ("istartswith", TokenKind::IStartsWithKeyword),
    ("import", TokenKind::ImportKeyword),
    ("in", TokenKind::InKeyword),
    ("include", TokenKind::IncludeKeyword),
    ("matches", TokenKind::MatchesKeyword),
    ("meta", TokenKind::MetaKeyword),
    ("nocase", TokenKind::NocaseKeyword),
    ("none", TokenKind::NoneKeyword),
    ("not", TokenKind::NotKeyword),
    ("of", TokenKind::OfKeyword),
    ("or", TokenKind::OrKeyword),
    ("private", TokenKind::PrivateKeyword),
    ("rule", TokenKind::RuleKeyword),
    ("startswith", TokenKind::StartsWithKeyword),
    ("strings", TokenKind::StringsKeyword),
    ("them", TokenKind::ThemKeyword),
    ("true", TokenKind::TrueKeyword),
    ("wide", TokenKind::WideKeyword),
    ("xor", TokenKind::XorKeyword),
];

/// Multi-character operators, longest first within each shared prefix.
pub const OPERATORS: &[(&str, TokenKind)] = &[
    ("..", TokenKind::DotDotToken),
    ("<=", TokenKind::LessThanEqualsToken),
    (">=", TokenKind::GreaterThanEqualsToken),
    ("==", TokenKind::EqualsEqualsToken),
    ("!=", TokenKind::ExclamationEqualsToken),
    ("<<", TokenKind::LessThanLessThanToken),
    (">>", TokenKind::GreaterThanGreaterThanToken),
    ("<", TokenKind::LessThanToken),
    (">", TokenKind::GreaterThanToken),
];

impl TokenKind {
    /// Whether this is a keyword token.
    pub fn is_keyword(self) -> bool {
        self >= TokenKind::AllKeyword && self <= TokenKind::XorKeyword
    }

    /// Whether this is a literal token.
    pub fn is_literal(self) -> bool {
        self >= TokenKind::NumberLiteral && self <= TokenKind::HexStringLiteral
    }

    /// Whether tokens of this kind carry an identifier-like name as value.
    pub fn is_identifier_like(self) -> bool {
        self >= TokenKind::Identifier && self <= TokenKind::IntegerFunction
    }

    /// Map a single printable byte to its punctuation kind.
    ///
    /// Printable bytes the grammar has no use for map to [`TokenKind::Unknown`].
    pub fn from_punctuation(byte: u8) -> TokenKind {
        match byte {
            b'{' => TokenKind::OpenBraceToken,
            b'}' => TokenKind::CloseBraceToken,
            b'(' => TokenKind::OpenParenToken,
            b')' => TokenKind::CloseParenToken,
            b'[' => TokenKind::OpenBracketToken,
            b']' => TokenKind::CloseBracketToken,
            b'<' => TokenKind::LessThanToken,
            b'>' => TokenKind::GreaterThanToken,
            b'+' => TokenKind::PlusToken,
            b'-' => TokenKind::MinusToken,
            b'*' => TokenKind::AsteriskToken,
            b'\\' => TokenKind::BackslashToken,
            b'%' => TokenKind::PercentToken,
            b'&' => TokenKind::AmpersandToken,
            b'|' => TokenKind::BarToken,
            b'^' => TokenKind::CaretToken,
            b'~' => TokenKind::TildeToken,
            b':' => TokenKind::ColonToken,
            b',' => TokenKind::CommaToken,
            b'=' => TokenKind::EqualsToken,
            b'.' => TokenKind::DotToken,
            _ => TokenKind::Unknown,
        }
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_table() {
        for (text, kind) in KEYWORDS {
            assert!(kind.is_keyword(), "{}", text);
            assert!(text.bytes().all(|b| b.is_ascii_lowercase() || b.is_ascii_digit()));
        }
        let mut kinds: Vec<TokenKind> = KEYWORDS.iter().map(|(_, kind)| *kind).collect();
        kinds.sort();
        kinds.dedup();
        assert_eq!(kinds.len(), KEYWORDS.len());
    }

    #[test]
    fn test_operators_are_punctuation() {
        for (text, kind) in OPERATORS {
            assert!(!kind.is_keyword() && !kind.is_literal() && !kind.is_identifier_like(), "{}", text);
        }
    }

    #[test]
    fn test_punctuation() {
        assert_eq!(TokenKind::from_punctuation(b'('), TokenKind::OpenParenToken);
        assert_eq!(TokenKind::from_punctuation(b'\\'), TokenKind::BackslashToken);
        assert_eq!(TokenKind::from_punctuation(b';'), TokenKind::Unknown);
    }

    #[test]
    fn test_categories() {
        assert!(TokenKind::HexStringLiteral.is_literal());
        assert!(TokenKind::IntegerFunction.is_identifier_like());
        assert!(!TokenKind::Identifier.is_literal());
        assert!(!TokenKind::DotToken.is_keyword());
        assert!(TokenKind::XorKeyword.is_keyword());
    }
}
