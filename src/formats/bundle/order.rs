//! Byte-lexicographic string ordering
//!
//! The runtime stores strings null-terminated, so every sort in the
//! pipeline must reproduce C-string comparison semantics exactly:
//! sorted order decides line ordinals, and a mismatch with the engine's
//! own comparisons would break lookup.

use std::cmp::Ordering;

/// Compare two byte strings the way `strcmp` would.
///
/// A position past the end of either sequence reads as a synthetic 0
/// and terminates the comparison there. Note the quirk this inherits:
/// a sequence that *ends* and a sequence holding an explicit 0 byte at
/// the same position compare equal from that point on.
pub fn compare_c_str(a: &[u8], b: &[u8]) -> Ordering {
    let mut i = 0;
    loop {
        let c1 = a.get(i).copied().unwrap_or(0);
        let c2 = b.get(i).copied().unwrap_or(0);

        if i >= a.len() || i >= b.len() || c1 != c2 {
            return c1.cmp(&c2);
        }

        i += 1;
    }
}
