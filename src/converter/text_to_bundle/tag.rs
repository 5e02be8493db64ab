//! Script tag parsing
//!
//! Every original-language line carries a bracketed prefix of the shape
//! `[RRR-XXXX####]`: a 3-digit room id, a type tag (2 characters padded
//! with `#`, or 4 characters), and the 4-digit script index sitting
//! immediately before the closing bracket.

use crate::error::{Error, Result};
use crate::formats::bundle::ScriptKind;

/// Identity parsed out of a line's tag prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParsedTag {
    pub room_id: u16,
    pub kind: ScriptKind,
    pub script_id: u16,
}

/// Parse the tag prefix of an original-language line.
///
/// Returns `None` when the line is skipped entirely: blank or
/// whitespace-only lines, and lines that do not open with `[`. On
/// success, returns the parsed identity together with the remainder of
/// the line after the closing bracket.
///
/// # Errors
/// Returns [`Error::MalformedTag`] when a line opens with `[` but the
/// tag is truncated, unterminated, or carries non-digit id fields.
///
/// [`Error::MalformedTag`]: crate::Error::MalformedTag
pub fn parse_tag(line_no: usize, text: &str) -> Result<Option<(ParsedTag, &str)>> {
    if text.trim().is_empty() {
        return Ok(None);
    }

    let bytes = text.as_bytes();
    if bytes[0] != b'[' {
        return Ok(None);
    }

    let malformed = || Error::MalformedTag {
        line: line_no,
        text: text.to_owned(),
    };

    // Need at least the room digits and the tag discriminator position.
    if bytes.len() < 8 {
        return Err(malformed());
    }
    let close = bytes.iter().position(|&b| b == b']').ok_or_else(malformed)?;
    if close < 9 {
        return Err(malformed());
    }

    let mut room_id = parse_digits(&bytes[1..4]).ok_or_else(malformed)?;

    // A `#` in the fourth tag column marks the short, padded form.
    let tag_len = if bytes[7] == b'#' { 2 } else { 4 };
    let kind = match &bytes[5..5 + tag_len] {
        b"VERB" | b"OC" | b"OCv1" | b"OCv2" | b"OCv3" | b"OBNA" | b"ONv1" | b"ONv2" => {
            ScriptKind::ObjectVerb
        }
        b"SCRP" | b"SC" | b"SCv1" | b"SCv2" | b"SCv3" => ScriptKind::Global,
        b"LSCR" | b"LS" | b"LSv3" | b"ENCD" | b"EN" | b"ENv3" | b"EXCD" | b"EX" | b"EXv3" => {
            ScriptKind::Local
        }
        _ => ScriptKind::Unknown,
    };

    let mut script_id = parse_digits(&bytes[close - 4..close]).ok_or_else(malformed)?;

    // Global scripts live outside any room; object/verb scripts are
    // keyed by room alone.
    if kind == ScriptKind::Global {
        room_id = 0;
    }
    if kind == ScriptKind::ObjectVerb {
        script_id = 0;
    }

    let tag = ParsedTag {
        room_id,
        kind,
        script_id,
    };
    Ok(Some((tag, &text[close + 1..])))
}

/// Strip the bracketed prefix of a translated line, if present.
///
/// The translated side's prefix is not validated; a line opening with
/// `[` but missing `]` is used verbatim.
pub fn strip_translated_prefix(text: &str) -> &str {
    if text.as_bytes().first() == Some(&b'[')
        && let Some(close) = text.find(']')
    {
        return &text[close + 1..];
    }
    text
}

fn parse_digits(bytes: &[u8]) -> Option<u16> {
    let mut value: u16 = 0;
    for &b in bytes {
        if !b.is_ascii_digit() {
            return None;
        }
        value = value * 10 + u16::from(b - b'0');
    }
    Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(text: &str) -> (ParsedTag, &str) {
        parse_tag(1, text).unwrap().unwrap()
    }

    #[test]
    fn test_skips_blank_and_untagged() {
        assert!(parse_tag(1, "").unwrap().is_none());
        assert!(parse_tag(1, "   \t ").unwrap().is_none());
        assert!(parse_tag(1, "plain text").unwrap().is_none());
    }

    #[test]
    fn test_long_tag_form() {
        let (t, rest) = tag("[001-SCRP0001]Hello");
        assert_eq!(t.kind, ScriptKind::Global);
        assert_eq!(t.room_id, 0); // SCRP forces room 0
        assert_eq!(t.script_id, 1);
        assert_eq!(rest, "Hello");
    }

    #[test]
    fn test_short_tag_form_is_hash_padded() {
        let (t, rest) = tag("[012-LS##0205]text");
        assert_eq!(t.kind, ScriptKind::Local);
        assert_eq!(t.room_id, 12);
        assert_eq!(t.script_id, 205);
        assert_eq!(rest, "text");
    }

    #[test]
    fn test_object_verb_forces_script_id_zero() {
        let (t, _) = tag("[004-VERB0123]line");
        assert_eq!(t.kind, ScriptKind::ObjectVerb);
        assert_eq!(t.room_id, 4);
        assert_eq!(t.script_id, 0);
    }

    #[test]
    fn test_full_vocabulary() {
        let cases: &[(&str, ScriptKind)] = &[
            ("VERB", ScriptKind::ObjectVerb),
            ("OC##", ScriptKind::ObjectVerb),
            ("OCv1", ScriptKind::ObjectVerb),
            ("OCv2", ScriptKind::ObjectVerb),
            ("OCv3", ScriptKind::ObjectVerb),
            ("OBNA", ScriptKind::ObjectVerb),
            ("ONv1", ScriptKind::ObjectVerb),
            ("ONv2", ScriptKind::ObjectVerb),
            ("SCRP", ScriptKind::Global),
            ("SC##", ScriptKind::Global),
            ("SCv1", ScriptKind::Global),
            ("SCv2", ScriptKind::Global),
            ("SCv3", ScriptKind::Global),
            ("LSCR", ScriptKind::Local),
            ("LS##", ScriptKind::Local),
            ("LSv3", ScriptKind::Local),
            ("ENCD", ScriptKind::Local),
            ("EN##", ScriptKind::Local),
            ("ENv3", ScriptKind::Local),
            ("EXCD", ScriptKind::Local),
            ("EX##", ScriptKind::Local),
            ("EXv3", ScriptKind::Local),
        ];
        for (name, kind) in cases {
            let line = format!("[007-{name}0002]x");
            let (t, _) = tag(&line);
            assert_eq!(t.kind, *kind, "tag {name}");
        }
    }

    #[test]
    fn test_unknown_tag_is_fallback_bucket() {
        let (t, rest) = tag("[031-QQQQ0009]kept");
        assert_eq!(t.kind, ScriptKind::Unknown);
        assert_eq!(t.room_id, 31);
        assert_eq!(t.script_id, 9);
        assert_eq!(rest, "kept");
    }

    #[test]
    fn test_malformed_tags_are_fatal() {
        for bad in [
            "[001",            // unterminated
            "[0x1-SCRP0001]a", // non-digit room
            "[001-SCRP00x1]a", // non-digit script index
            "[01]",            // too short
        ] {
            assert!(
                matches!(parse_tag(7, bad), Err(Error::MalformedTag { line: 7, .. })),
                "expected malformed: {bad}"
            );
        }
    }

    #[test]
    fn test_translated_prefix_strip() {
        assert_eq!(strip_translated_prefix("[001] 안녕"), " 안녕");
        assert_eq!(strip_translated_prefix("no prefix"), "no prefix");
        assert_eq!(strip_translated_prefix("[dangling"), "[dangling");
        assert_eq!(strip_translated_prefix(""), "");
    }
}
