//! Escape decoding
//!
//! Script dumps carry raw engine bytes in a backslash-escaped textual
//! form: `\\` is a literal backslash byte and `\DDD` is the byte with
//! decimal value `DDD`. Everything else passes through the side's text
//! encoding — the original side is one byte per character (latin1
//! semantics), the translated side is EUC-KR and may yield several
//! bytes per character.

use crate::error::{Error, Result};
use std::fmt::Write as _;
use std::str::Chars;

/// Decode an original-language line (post tag strip) into engine bytes.
///
/// # Errors
/// [`Error::InvalidEscape`] on a truncated or non-digit escape,
/// [`Error::ByteOutOfRange`] on an escape value above 255 or a
/// character outside latin1.
///
/// [`Error::InvalidEscape`]: crate::Error::InvalidEscape
/// [`Error::ByteOutOfRange`]: crate::Error::ByteOutOfRange
pub fn decode_original(line_no: usize, text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            out.push(decode_escape(line_no, text, &mut chars)?);
        } else {
            let value = u32::from(c);
            if value > 0xFF {
                return Err(Error::ByteOutOfRange {
                    line: line_no,
                    text: text.to_owned(),
                });
            }
            out.push(value as u8);
        }
    }

    Ok(out)
}

/// Decode a translated line (post tag strip) into EUC-KR engine bytes.
///
/// # Errors
/// Escape errors as for [`decode_original`], plus
/// [`Error::Unencodable`] when a character has no EUC-KR form.
///
/// [`Error::Unencodable`]: crate::Error::Unencodable
pub fn decode_translated(line_no: usize, text: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() * 2);
    let mut run = String::new();
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        if c == '\\' {
            flush_run(line_no, &mut run, &mut out)?;
            out.push(decode_escape(line_no, text, &mut chars)?);
        } else {
            run.push(c);
        }
    }
    flush_run(line_no, &mut run, &mut out)?;

    Ok(out)
}

/// Render engine bytes back into the escaped textual form.
///
/// Printable ASCII passes through (with `\` doubled); every other byte
/// becomes a `\DDD` escape. Inverse of [`decode_original`].
pub fn encode_original(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len());
    for &b in bytes {
        match b {
            b'\\' => out.push_str("\\\\"),
            0x20..=0x7E => out.push(char::from(b)),
            _ => {
                let _ = write!(out, "\\{b:03}");
            }
        }
    }
    out
}

/// Consume the tail of one escape sequence: either a second backslash
/// or exactly three decimal digits.
fn decode_escape(line_no: usize, text: &str, chars: &mut Chars<'_>) -> Result<u8> {
    let invalid = || Error::InvalidEscape {
        line: line_no,
        text: text.to_owned(),
    };

    match chars.next() {
        Some('\\') => Ok(b'\\'),
        Some(d0) => {
            let d1 = chars.next().and_then(|c| c.to_digit(10));
            let d2 = chars.next().and_then(|c| c.to_digit(10));
            match (d0.to_digit(10), d1, d2) {
                (Some(a), Some(b), Some(c)) => {
                    u8::try_from(a * 100 + b * 10 + c).map_err(|_| Error::ByteOutOfRange {
                        line: line_no,
                        text: text.to_owned(),
                    })
                }
                _ => Err(invalid()),
            }
        }
        None => Err(invalid()),
    }
}

fn flush_run(line_no: usize, run: &mut String, out: &mut Vec<u8>) -> Result<()> {
    if run.is_empty() {
        return Ok(());
    }
    let (bytes, _, had_unmappable) = encoding_rs::EUC_KR.encode(run);
    if had_unmappable {
        return Err(Error::Unencodable {
            line: line_no,
            text: run.clone(),
        });
    }
    out.extend_from_slice(&bytes);
    run.clear();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_original_plain_text() {
        assert_eq!(decode_original(1, "Hello").unwrap(), b"Hello");
        assert_eq!(decode_original(1, "").unwrap(), b"");
    }

    #[test]
    fn test_original_digit_escapes() {
        assert_eq!(decode_original(1, "\\255").unwrap(), vec![0xFF]);
        assert_eq!(decode_original(1, "\\000").unwrap(), vec![0x00]);
        assert_eq!(
            decode_original(1, "a\\010b").unwrap(),
            vec![b'a', 10, b'b']
        );
    }

    #[test]
    fn test_original_literal_backslash() {
        assert_eq!(decode_original(1, "\\\\").unwrap(), vec![b'\\']);
        assert_eq!(decode_original(1, "a\\\\\\065").unwrap(), vec![b'a', b'\\', 65]);
    }

    #[test]
    fn test_original_latin1_high_bytes() {
        // U+00E9 is one byte in latin1 semantics
        assert_eq!(decode_original(1, "é").unwrap(), vec![0xE9]);
    }

    #[test]
    fn test_original_rejects_wide_chars() {
        assert!(matches!(
            decode_original(3, "안"),
            Err(Error::ByteOutOfRange { line: 3, .. })
        ));
    }

    #[test]
    fn test_malformed_escapes_are_fatal() {
        assert!(matches!(
            decode_original(2, "\\ab1"),
            Err(Error::InvalidEscape { line: 2, .. })
        ));
        assert!(matches!(
            decode_original(2, "\\12"),
            Err(Error::InvalidEscape { .. })
        ));
        assert!(matches!(
            decode_original(2, "trailing\\"),
            Err(Error::InvalidEscape { .. })
        ));
        assert!(matches!(
            decode_original(2, "\\999"),
            Err(Error::ByteOutOfRange { .. })
        ));
    }

    #[test]
    fn test_translated_euc_kr() {
        // 안녕 is B0 A1-range double-byte EUC-KR
        let bytes = decode_translated(1, "안녕").unwrap();
        assert_eq!(bytes, vec![0xBE, 0xC8, 0xB3, 0xE7]);
        // ASCII stays single-byte, escapes are raw bytes
        assert_eq!(
            decode_translated(1, "a\\255안").unwrap(),
            vec![b'a', 0xFF, 0xBE, 0xC8]
        );
    }

    #[test]
    fn test_translated_unencodable_is_fatal() {
        // Hieroglyphs have no EUC-KR mapping
        assert!(matches!(
            decode_translated(4, "𓀀"),
            Err(Error::Unencodable { line: 4, .. })
        ));
    }

    #[test]
    fn test_encode_decode_inverse() {
        let cases: &[&[u8]] = &[
            b"Hello",
            b"\\path\\to",
            &[0x00, 0x01, 0xFF, 0x20, 0x7E, 0x7F],
            &[0xFF, 0x0A, b'a', 0xB0],
            b"",
        ];
        for bytes in cases {
            let text = encode_original(bytes);
            assert_eq!(&decode_original(1, &text).unwrap(), bytes, "via {text:?}");
        }
    }
}
