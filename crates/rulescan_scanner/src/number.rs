//! Numeric literal conversion.

use rulescan_ast::Value;
use rulescan_diagnostics::{messages, ScanError};

const KILOBYTE: i64 = 1024;
const MEGABYTE: i64 = 1024 * 1024;

/// The lexical shape of a matched numeric literal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberShape {
    /// `[0-9]+(KB|MB)?`
    Decimal,
    /// `[0-9]+\.[0-9]+`
    Double,
    /// `0x[0-9a-fA-F]+`
    Hex,
    /// `0o[0-7]+`
    Octal,
}

/// Convert the text of a numeric literal into its value.
///
/// `line` is only used for error reporting.
pub fn parse_number(shape: NumberShape, lexeme: &[u8], line: u32) -> Result<Value, ScanError> {
    let text = std::str::from_utf8(lexeme).map_err(|err| conversion_error(lexeme, &err, line))?;
    match shape {
        NumberShape::Decimal => parse_decimal(text, line).map(Value::Integer),
        NumberShape::Double => text
            .parse::<f64>()
            .map(Value::Float)
            .map_err(|err| conversion_error(lexeme, &err, line)),
        NumberShape::Hex => parse_radix(text, 16, line).map(Value::Integer),
        NumberShape::Octal => parse_radix(text, 8, line).map(Value::Integer),
    }
}

fn parse_decimal(text: &str, line: u32) -> Result<i64, ScanError> {
    let (digits, multiplier) = if let Some(digits) = text.strip_suffix("KB") {
        (digits, KILOBYTE)
    } else if let Some(digits) = text.strip_suffix("MB") {
        (digits, MEGABYTE)
    } else {
        (text, 1)
    };
    let value = digits
        .parse::<i64>()
        .map_err(|err| conversion_error(text.as_bytes(), &err, line))?;
    if value > i64::MAX / multiplier {
        return Err(ScanError::new(
            &messages::INTEGER_OVERFLOW_0_MAX_1,
            &[text, &i64::MAX.to_string()],
            line,
        ));
    }
    Ok(value * multiplier)
}

/// `text` still carries its two-byte radix prefix.
fn parse_radix(text: &str, radix: u32, line: u32) -> Result<i64, ScanError> {
    i64::from_str_radix(&text[2..], radix).map_err(|err| conversion_error(text.as_bytes(), &err, line))
}

fn conversion_error(lexeme: &[u8], err: &dyn std::fmt::Display, line: u32) -> ScanError {
    ScanError::new(
        &messages::NUMBER_CONVERSION_0_1,
        &[&String::from_utf8_lossy(lexeme), &err.to_string()],
        line,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rulescan_diagnostics::ErrorCode;

    fn int(shape: NumberShape, text: &str) -> Result<i64, ErrorCode> {
        parse_number(shape, text.as_bytes(), 1)
            .map(|value| value.as_integer().unwrap())
            .map_err(|err| err.code)
    }

    #[test]
    fn test_decimal_suffixes() {
        assert_eq!(int(NumberShape::Decimal, "10"), Ok(10));
        assert_eq!(int(NumberShape::Decimal, "10KB"), Ok(10240));
        assert_eq!(int(NumberShape::Decimal, "2MB"), Ok(2_097_152));
        assert_eq!(int(NumberShape::Decimal, "0KB"), Ok(0));
    }

    #[test]
    fn test_overflow_after_multiplier() {
        assert_eq!(int(NumberShape::Decimal, "9223372036854775807KB"), Err(ErrorCode::IntegerOverflow));
        assert_eq!(int(NumberShape::Decimal, "9007199254740992KB"), Err(ErrorCode::IntegerOverflow));
        assert_eq!(int(NumberShape::Decimal, "9007199254740991KB"), Ok(9_007_199_254_740_991 * 1024));
    }

    #[test]
    fn test_overflow_before_multiplier() {
        assert_eq!(int(NumberShape::Decimal, "9223372036854775808"), Err(ErrorCode::NumberConversion));
        assert_eq!(int(NumberShape::Decimal, "99999999999999999999MB"), Err(ErrorCode::NumberConversion));
    }

    #[test]
    fn test_radix() {
        assert_eq!(int(NumberShape::Hex, "0xFF"), Ok(255));
        assert_eq!(int(NumberShape::Hex, "0x7fffffffffffffff"), Ok(i64::MAX));
        assert_eq!(int(NumberShape::Hex, "0x8000000000000000"), Err(ErrorCode::NumberConversion));
        assert_eq!(int(NumberShape::Octal, "0o17"), Ok(15));
    }

    #[test]
    fn test_double() {
        let value = parse_number(NumberShape::Double, b"3.25", 1).unwrap();
        assert_eq!(value.as_float(), Some(3.25));
    }

    #[test]
    fn test_overflow_message() {
        let err = parse_number(NumberShape::Decimal, b"9223372036854775807MB", 4).unwrap_err();
        assert_eq!(err.line, 4);
        assert_eq!(
            err.message,
            "integer overflow: found 9223372036854775807MB, maximum is 9223372036854775807"
        );
    }
}
