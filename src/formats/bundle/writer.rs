//! Bundle serialization
//!
//! Layout, little-endian throughout: 8-byte magic, u16 line count,
//! index table (one 10-byte slot per line, ascending line id),
//! hierarchy table (rooms ascending by id, scripts ascending by key),
//! then the string blob with every line re-sorted globally by
//! [`compare_c_str`] and written as `original NUL translated NUL`.
//!
//! The whole file is assembled in memory: the index region is reserved
//! as zeroed placeholders, offsets are collected while the blob is
//! appended, the placeholders are overwritten in the buffer, and the
//! finished buffer hits disk in a single write. A failed run therefore
//! never leaves a half-written bundle behind.

use super::{BUNDLE_MAGIC, BundleResource, HEADER_SIZE, INDEX_ENTRY_SIZE, Line, compare_c_str};
use crate::error::{Error, Result};
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fs;
use std::path::Path;

/// Write a bundle file to disk.
///
/// # Errors
/// Returns a capacity error if the resource exceeds the on-disk field
/// widths, or [`Error::Io`] if writing fails.
///
/// [`Error::Io`]: crate::Error::Io
pub fn write_bundle<P: AsRef<Path>>(path: P, resource: &BundleResource) -> Result<()> {
    let bytes = bundle_to_bytes(resource)?;
    fs::write(path, bytes)?;
    Ok(())
}

/// Serialize a bundle into a byte buffer.
///
/// The resource must already have line ids assigned (see
/// [`assign_line_ids`]); ids are expected to be exactly `0..N` in
/// traversal order.
///
/// # Errors
/// Returns [`Error::TooManyLines`], [`Error::TooManyRooms`], or
/// [`Error::RoomIdOverflow`] when a value would be silently truncated
/// by the legacy field widths.
///
/// [`assign_line_ids`]: crate::converter::text_to_bundle::assign_line_ids
/// [`Error::TooManyLines`]: crate::Error::TooManyLines
/// [`Error::TooManyRooms`]: crate::Error::TooManyRooms
/// [`Error::RoomIdOverflow`]: crate::Error::RoomIdOverflow
pub fn bundle_to_bytes(resource: &BundleResource) -> Result<Vec<u8>> {
    let count = resource.line_count();
    if count > usize::from(u16::MAX) {
        return Err(Error::TooManyLines { count });
    }
    if resource.rooms.len() > usize::from(u8::MAX) {
        return Err(Error::TooManyRooms {
            count: resource.rooms.len(),
        });
    }
    if let Some(&room) = resource.rooms.keys().find(|&&id| id > u16::from(u8::MAX)) {
        return Err(Error::RoomIdOverflow { room });
    }

    let mut buf: Vec<u8> = Vec::with_capacity(HEADER_SIZE + count * INDEX_ENTRY_SIZE);

    // Header
    buf.extend_from_slice(BUNDLE_MAGIC);
    buf.write_u16::<LittleEndian>(count as u16)?;

    // Index table placeholders, overwritten once blob offsets are known
    buf.resize(HEADER_SIZE + count * INDEX_ENTRY_SIZE, 0);

    // Hierarchy table
    buf.write_u8(resource.rooms.len() as u8)?;
    for (&room_id, room) in &resource.rooms {
        buf.write_u8(room_id as u8)?;
        buf.write_u16::<LittleEndian>(room.scripts.len() as u16)?;
        for (&key, script) in &room.scripts {
            buf.write_u32::<LittleEndian>(key)?;
            buf.write_u16::<LittleEndian>(script.left)?;
            buf.write_u16::<LittleEndian>(script.right)?;
        }
    }

    // String blob: a second, bundle-wide sort, independent of the
    // per-script sort that produced the line ids.
    let mut lines: Vec<&Line> = resource.lines().collect();
    lines.sort_unstable_by(|a, b| compare_c_str(&a.original, &b.original));

    let mut slots = Vec::with_capacity(count);
    for line in lines {
        let original_offset = buf.len() as u32;
        buf.extend_from_slice(&line.original);
        buf.push(0);

        let translated_offset = buf.len() as u32;
        buf.extend_from_slice(&line.translated);
        buf.push(0);

        slots.push((line.line_id, original_offset, translated_offset));
    }

    // Backfill the index table ordered by line id, so a consumer can
    // resolve a line id by direct slot indexing.
    slots.sort_unstable_by_key(|&(line_id, _, _)| line_id);
    for (i, &(line_id, original_offset, translated_offset)) in slots.iter().enumerate() {
        let at = HEADER_SIZE + i * INDEX_ENTRY_SIZE;
        LittleEndian::write_u16(&mut buf[at..], line_id);
        LittleEndian::write_u32(&mut buf[at + 2..], original_offset);
        LittleEndian::write_u32(&mut buf[at + 6..], translated_offset);
    }

    Ok(buf)
}
