//! Error types for `scummloc`

use thiserror::Error;

/// The error type for `scummloc` operations.
///
/// Every input-shape, format, or capacity violation is fatal: the
/// converter is a batch tool and produces either a complete bundle or
/// no bundle at all. Variants raised while parsing input text carry the
/// 1-based input line number and the offending text.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum Error {
    // ==================== IO Errors ====================
    /// IO error from file operations.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ==================== Input Shape Errors ====================
    /// The two input dumps do not pair up line for line.
    #[error("line count mismatch: original has {original} lines, translated has {translated}")]
    LineCountMismatch {
        /// Line count of the original-language dump.
        original: usize,
        /// Line count of the translated dump.
        translated: usize,
    },

    // ==================== Tag/Escape Format Errors ====================
    /// A line opens with `[` but does not carry a well-formed script tag.
    #[error("malformed script tag at line {line}: {text:?}")]
    MalformedTag {
        /// 1-based input line number.
        line: usize,
        /// The raw input line.
        text: String,
    },

    /// A backslash escape is truncated or followed by non-digits.
    #[error("invalid escape sequence at line {line}: {text:?}")]
    InvalidEscape {
        /// 1-based input line number.
        line: usize,
        /// The text being decoded.
        text: String,
    },

    /// A character or 3-digit escape decodes to a value outside 0-255.
    #[error("byte value out of range at line {line}: {text:?}")]
    ByteOutOfRange {
        /// 1-based input line number.
        line: usize,
        /// The text being decoded.
        text: String,
    },

    /// A translated character has no EUC-KR representation.
    #[error("character not representable in EUC-KR at line {line}: {text:?}")]
    Unencodable {
        /// 1-based input line number.
        line: usize,
        /// The text being encoded.
        text: String,
    },

    // ==================== Capacity Errors ====================
    /// More surviving lines than the 16-bit index table can hold.
    #[error("bundle holds {count} lines, the index table limit is 65535")]
    TooManyLines {
        /// The surviving line count.
        count: usize,
    },

    /// More rooms than the 8-bit room count field can hold.
    #[error("bundle holds {count} rooms, the hierarchy table limit is 255")]
    TooManyRooms {
        /// The room count.
        count: usize,
    },

    /// A parsed room id does not fit the 8-bit hierarchy table field.
    #[error("room id {room} does not fit the 8-bit hierarchy table")]
    RoomIdOverflow {
        /// The offending room id.
        room: u16,
    },

    // ==================== Bundle Format Errors ====================
    /// The file is not a valid bundle (missing `SCVMTRS ` magic).
    #[error("invalid bundle magic: expected SCVMTRS, found {0:?}")]
    InvalidBundleMagic([u8; 8]),

    /// Unexpected end of file.
    #[error("unexpected end of file")]
    UnexpectedEof,
}

/// A specialized Result type for `scummloc` operations.
pub type Result<T> = std::result::Result<T, Error>;
