//! Hierarchy building, deduplication, and ordinal assignment
//!
//! Decoded lines are grouped room → script → line, deduplicated by
//! content within each script, sorted, and handed their bundle-wide
//! line ids. Assignment walks rooms ascending by id and scripts
//! ascending by key, so each script (and each room) owns one contiguous
//! ordinal range recorded as `[left, right]`.

use crate::error::{Error, Result};
use crate::formats::bundle::{
    BundleResource, Line, Room, Script, ScriptKind, compare_c_str, script_key,
};
use std::collections::HashSet;

/// Legacy filter: unknown-kind lines whose entire original payload is a
/// single space are noise from the extraction tooling and are dropped
/// before grouping.
pub fn is_legacy_space_filtered(line: &Line) -> bool {
    line.kind == ScriptKind::Unknown && line.original == [b' ']
}

/// Insert a line into its room/script bucket, creating both as needed.
pub fn insert(resource: &mut BundleResource, line: Line) {
    let room = resource
        .rooms
        .entry(line.room_id)
        .or_insert_with(|| Room::new(line.room_id));
    let key = script_key(line.kind, line.script_id);
    let script = room.scripts.entry(key).or_insert_with(|| Script::new(key));
    script.lines.push(line);
}

/// Deduplicate each script's lines by content.
///
/// Two lines are duplicates iff both their original and translated
/// byte strings are equal; the first-seen line survives. Runs strictly
/// before sorting, so survival does not depend on final order. Returns
/// the number of lines removed.
pub fn dedup(resource: &mut BundleResource) -> usize {
    let mut removed = 0;
    for room in resource.rooms.values_mut() {
        for script in room.scripts.values_mut() {
            let before = script.lines.len();
            let mut seen: HashSet<(Vec<u8>, Vec<u8>)> = HashSet::with_capacity(before);
            script
                .lines
                .retain(|l| seen.insert((l.original.clone(), l.translated.clone())));
            removed += before - script.lines.len();
        }
    }
    removed
}

/// Sort every script's lines and assign bundle-wide line ids.
///
/// Lines are sorted within each script by [`compare_c_str`] on original
/// bytes, then ids are handed out sequentially from 0 in traversal
/// order. Each script's and room's `[left, right]` span is recorded.
///
/// # Errors
/// Returns [`Error::TooManyLines`] if the surviving line count exceeds
/// the 16-bit index table range.
///
/// [`Error::TooManyLines`]: crate::Error::TooManyLines
pub fn assign_line_ids(resource: &mut BundleResource) -> Result<()> {
    let total = resource.line_count();
    if total > usize::from(u16::MAX) {
        return Err(Error::TooManyLines { count: total });
    }

    let mut next_id: usize = 0;
    let mut assigned: usize = 0;

    for room in resource.rooms.values_mut() {
        let room_lines: usize = room.scripts.values().map(|s| s.lines.len()).sum();
        room.left = assigned as u16;
        room.right = (assigned + room_lines.max(1) - 1) as u16;

        let mut script_left = assigned;
        for script in room.scripts.values_mut() {
            script
                .lines
                .sort_by(|a, b| compare_c_str(&a.original, &b.original));

            script.left = script_left as u16;
            script.right = (script_left + script.lines.len().max(1) - 1) as u16;

            // The per-room span accounting and the global id counter
            // must agree at every script boundary.
            debug_assert_eq!(script_left, next_id);

            for line in &mut script.lines {
                line.line_id = next_id as u16;
                next_id += 1;
            }

            script_left += script.lines.len();
        }

        assigned += room_lines;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(room_id: u16, kind: ScriptKind, script_id: u16, org: &[u8], trs: &[u8]) -> Line {
        Line {
            room_id,
            kind,
            script_id,
            original: org.to_vec(),
            translated: trs.to_vec(),
            line_id: 0,
            debug_original: String::new(),
            debug_translated: String::new(),
        }
    }

    #[test]
    fn test_space_filter_needs_both_conditions() {
        assert!(is_legacy_space_filtered(&line(
            0,
            ScriptKind::Unknown,
            0,
            b" ",
            b"x"
        )));
        // Known kind: kept even when the payload is a lone space
        assert!(!is_legacy_space_filtered(&line(
            0,
            ScriptKind::Local,
            1,
            b" ",
            b"x"
        )));
        // Unknown kind with real payload: kept
        assert!(!is_legacy_space_filtered(&line(
            0,
            ScriptKind::Unknown,
            0,
            b"  ",
            b"x"
        )));
    }

    #[test]
    fn test_dedup_is_content_based_and_first_seen() {
        let mut resource = BundleResource::new();
        insert(&mut resource, line(1, ScriptKind::Local, 2, b"A", b"a"));
        insert(&mut resource, line(1, ScriptKind::Local, 2, b"A", b"a"));
        // Same original, different translation: not a duplicate
        insert(&mut resource, line(1, ScriptKind::Local, 2, b"A", b"b"));
        // Same pair in a different script: not a duplicate
        insert(&mut resource, line(1, ScriptKind::Local, 3, b"A", b"a"));

        assert_eq!(dedup(&mut resource), 1);
        assert_eq!(resource.line_count(), 3);
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let mut resource = BundleResource::new();
        for _ in 0..3 {
            insert(&mut resource, line(1, ScriptKind::Local, 2, b"A", b"a"));
        }
        assert_eq!(dedup(&mut resource), 2);
        assert_eq!(dedup(&mut resource), 0);
        assert_eq!(resource.line_count(), 1);
    }

    #[test]
    fn test_line_count_over_index_range_is_fatal() {
        let mut resource = BundleResource::new();
        for _ in 0..=usize::from(u16::MAX) {
            insert(&mut resource, line(1, ScriptKind::Local, 2, b"x", b"y"));
        }
        // 65,536 lines: one more than the 16-bit index table can hold
        assert!(matches!(
            assign_line_ids(&mut resource),
            Err(Error::TooManyLines { count: 65536 })
        ));
    }

    #[test]
    fn test_ordinals_are_contiguous_across_rooms_and_scripts() {
        let mut resource = BundleResource::new();
        // Inserted in scrambled order on purpose
        insert(&mut resource, line(5, ScriptKind::Local, 1, b"zz", b"t"));
        insert(&mut resource, line(0, ScriptKind::Global, 9, b"mm", b"t"));
        insert(&mut resource, line(5, ScriptKind::ObjectVerb, 0, b"aa", b"t"));
        insert(&mut resource, line(5, ScriptKind::Local, 1, b"bb", b"t"));
        insert(&mut resource, line(0, ScriptKind::Global, 2, b"qq", b"t"));

        assign_line_ids(&mut resource).unwrap();

        // Traversal: room 0 (keys 2<<16|2, 2<<16|9), then room 5
        // (keys 1<<16|0, 3<<16|1 with lines sorted bb < zz).
        let ids: Vec<(u16, &[u8])> = resource
            .lines()
            .map(|l| (l.line_id, l.original.as_slice()))
            .collect();
        assert_eq!(
            ids,
            vec![
                (0, b"qq".as_slice()),
                (1, b"mm".as_slice()),
                (2, b"aa".as_slice()),
                (3, b"bb".as_slice()),
                (4, b"zz".as_slice()),
            ]
        );

        // Range invariant: right - left + 1 == count, ranges adjacent
        let mut next = 0u32;
        for room in resource.rooms.values() {
            assert_eq!(u32::from(room.left), next);
            for script in room.scripts.values() {
                assert_eq!(
                    usize::from(script.right - script.left) + 1,
                    script.lines.len()
                );
                assert_eq!(u32::from(script.left), next);
                next = u32::from(script.right) + 1;
            }
            assert_eq!(u32::from(room.right), next - 1);
        }
        assert_eq!(next as usize, resource.line_count());
    }
}
