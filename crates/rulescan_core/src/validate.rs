//! Byte-level validators.
//!
//! Both report the offset of the first offending byte so the caller can
//! point a diagnostic at it.

/// Check that every byte is printable ASCII (`0x20..=0x7E`).
///
/// Returns the offset of the first byte outside that range.
pub fn validate_printable_ascii(bytes: &[u8]) -> Result<(), usize> {
    match bytes.iter().position(|b| !is_printable_ascii(*b)) {
        Some(offset) => Err(offset),
        None => Ok(()),
    }
}

/// Check that `bytes` is well-formed UTF-8.
///
/// Returns the offset of the first byte of the first invalid sequence.
pub fn validate_utf8(bytes: &[u8]) -> Result<(), usize> {
    simdutf8::compat::from_utf8(bytes)
        .map(|_| ())
        .map_err(|err| err.valid_up_to())
}

#[inline]
pub fn is_printable_ascii(byte: u8) -> bool {
    (0x20..=0x7E).contains(&byte)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_printable_ascii() {
        assert_eq!(validate_printable_ascii(b"rule test { }"), Ok(()));
        assert_eq!(validate_printable_ascii(b""), Ok(()));
        assert_eq!(validate_printable_ascii(b"ab\x01c"), Err(2));
        assert_eq!(validate_printable_ascii(b"tab\there"), Err(3));
        assert_eq!(validate_printable_ascii(b"~\x7f"), Err(1));
    }

    #[test]
    fn test_utf8() {
        assert_eq!(validate_utf8("caf\u{e9} \u{1f600}".as_bytes()), Ok(()));
        assert_eq!(validate_utf8(b"abc\xffdef"), Err(3));
        // Truncated two-byte sequence at the end.
        assert_eq!(validate_utf8(b"ab\xc3"), Err(2));
    }

    proptest! {
        #[test]
        fn utf8_agrees_with_std(bytes in proptest::collection::vec(any::<u8>(), 0..128)) {
            let expected = std::str::from_utf8(&bytes).map(|_| ()).map_err(|e| e.valid_up_to());
            prop_assert_eq!(validate_utf8(&bytes), expected);
        }

        #[test]
        fn printable_offset_points_at_offender(bytes in proptest::collection::vec(any::<u8>(), 0..64)) {
            match validate_printable_ascii(&bytes) {
                Ok(()) => prop_assert!(bytes.iter().all(|b| is_printable_ascii(*b))),
                Err(offset) => {
                    prop_assert!(!is_printable_ascii(bytes[offset]));
                    prop_assert!(bytes[..offset].iter().all(|b| is_printable_ascii(*b)));
                }
            }
        }
    }
}
