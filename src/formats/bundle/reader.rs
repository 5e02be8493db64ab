//! Bundle reading and lookup
//!
//! The read side of the format, used by tooling and tests to verify
//! bundles and to resolve lines the way the game runtime does: index
//! table slot by line id, hierarchy table by `(room id, script key)`.

use super::{BUNDLE_MAGIC, BundleResource};
use crate::error::{Error, Result};
use byteorder::{LittleEndian, ReadBytesExt};
use std::fs;
use std::io::{Cursor, Read};
use std::path::Path;

/// One resolved index table entry.
#[derive(Debug, Clone)]
pub struct BundleEntry {
    pub line_id: u16,
    /// Absolute file offset of the original string.
    pub original_offset: u32,
    /// Absolute file offset of the translated string.
    pub translated_offset: u32,
    /// Original bytes, read up to (excluding) the null terminator.
    pub original: Vec<u8>,
    /// Translated bytes, read up to (excluding) the null terminator.
    pub translated: Vec<u8>,
}

/// Ordinal range of one script in the hierarchy table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScriptRange {
    pub key: u32,
    pub left: u16,
    pub right: u16,
}

/// One room's slice of the hierarchy table.
#[derive(Debug, Clone)]
pub struct RoomTable {
    pub id: u8,
    pub scripts: Vec<ScriptRange>,
}

/// A parsed bundle.
#[derive(Debug, Clone)]
pub struct BundleFile {
    /// Index entries in on-disk order (ascending line id).
    pub entries: Vec<BundleEntry>,
    /// Hierarchy table in on-disk order (ascending room id).
    pub rooms: Vec<RoomTable>,
}

impl BundleFile {
    /// Resolve a line by its ordinal.
    ///
    /// Slots are written in ascending line id order so this is a direct
    /// index; a linear scan backs it up for bundles written by other
    /// tools that kept the legacy blob-order table.
    pub fn line(&self, line_id: u16) -> Option<&BundleEntry> {
        match self.entries.get(usize::from(line_id)) {
            Some(entry) if entry.line_id == line_id => Some(entry),
            _ => self.entries.iter().find(|e| e.line_id == line_id),
        }
    }

    /// Ordinal range `[left, right]` of a script, by room id and key.
    pub fn script_range(&self, room_id: u8, key: u32) -> Option<(u16, u16)> {
        let room = self.rooms.iter().find(|r| r.id == room_id)?;
        room.scripts
            .iter()
            .find(|s| s.key == key)
            .map(|s| (s.left, s.right))
    }
}

/// Read a bundle file from disk.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be opened or read, and
/// [`Error::InvalidBundleMagic`] if it is not a bundle.
///
/// [`Error::Io`]: crate::Error::Io
/// [`Error::InvalidBundleMagic`]: crate::Error::InvalidBundleMagic
pub fn read_bundle<P: AsRef<Path>>(path: P) -> Result<BundleFile> {
    let data = fs::read(path)?;
    parse_bundle_bytes(&data)
}

/// Parse bundle data from bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidBundleMagic`] on a bad header.
/// Returns [`Error::Io`] if reading from the byte buffer fails (e.g.,
/// a truncated header, index, or hierarchy table).
/// Returns [`Error::UnexpectedEof`] when an index slot's offset points
/// outside the data or at a string with no null terminator.
///
/// [`Error::InvalidBundleMagic`]: crate::Error::InvalidBundleMagic
/// [`Error::Io`]: crate::Error::Io
/// [`Error::UnexpectedEof`]: crate::Error::UnexpectedEof
pub fn parse_bundle_bytes(data: &[u8]) -> Result<BundleFile> {
    let mut cursor = Cursor::new(data);

    let mut magic = [0u8; 8];
    cursor.read_exact(&mut magic)?;
    if &magic != BUNDLE_MAGIC {
        return Err(Error::InvalidBundleMagic(magic));
    }

    let count = usize::from(cursor.read_u16::<LittleEndian>()?);

    let mut slots = Vec::with_capacity(count);
    for _ in 0..count {
        let line_id = cursor.read_u16::<LittleEndian>()?;
        let original_offset = cursor.read_u32::<LittleEndian>()?;
        let translated_offset = cursor.read_u32::<LittleEndian>()?;
        slots.push((line_id, original_offset, translated_offset));
    }

    let room_count = cursor.read_u8()?;
    let mut rooms = Vec::with_capacity(usize::from(room_count));
    for _ in 0..room_count {
        let id = cursor.read_u8()?;
        let script_count = cursor.read_u16::<LittleEndian>()?;
        let mut scripts = Vec::with_capacity(usize::from(script_count));
        for _ in 0..script_count {
            scripts.push(ScriptRange {
                key: cursor.read_u32::<LittleEndian>()?,
                left: cursor.read_u16::<LittleEndian>()?,
                right: cursor.read_u16::<LittleEndian>()?,
            });
        }
        rooms.push(RoomTable { id, scripts });
    }

    let entries = slots
        .into_iter()
        .map(|(line_id, original_offset, translated_offset)| {
            Ok(BundleEntry {
                line_id,
                original_offset,
                translated_offset,
                original: read_c_str(data, original_offset)?,
                translated: read_c_str(data, translated_offset)?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(BundleFile { entries, rooms })
}

/// Read a null-terminated byte string at an absolute offset.
fn read_c_str(data: &[u8], offset: u32) -> Result<Vec<u8>> {
    let tail = data.get(offset as usize..).ok_or(Error::UnexpectedEof)?;
    let end = tail
        .iter()
        .position(|&b| b == 0)
        .ok_or(Error::UnexpectedEof)?;
    Ok(tail[..end].to_vec())
}

/// Verify that a parsed bundle's hierarchy ranges are contiguous.
///
/// Ranges must tile `0..count` exactly: each script's span is adjacent
/// to the previous one, with no gaps or overlaps. Exposed for tests
/// and bundle validation tooling.
pub fn check_contiguity(file: &BundleFile) -> bool {
    let mut next = 0u32;
    for room in &file.rooms {
        for script in &room.scripts {
            if u32::from(script.left) != next || script.right < script.left {
                return false;
            }
            next = u32::from(script.right) + 1;
        }
    }
    next as usize == file.entries.len()
}

impl BundleResource {
    /// Round-trip convenience used when inspecting freshly built
    /// resources: serialize and reparse.
    pub fn to_file(&self) -> Result<BundleFile> {
        parse_bundle_bytes(&super::bundle_to_bytes(self)?)
    }
}
