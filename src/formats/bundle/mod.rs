//! `SCVMTRS` localization bundle format
//!
//! Binary format holding every translated script line of a game,
//! addressable by line ordinal (via the index table) or by
//! room/script identity (via the hierarchy table).

mod order;
mod reader;
mod writer;

pub use order::compare_c_str;
pub use reader::{
    BundleEntry, BundleFile, RoomTable, ScriptRange, check_contiguity, parse_bundle_bytes,
    read_bundle,
};
pub use writer::{bundle_to_bytes, write_bundle};

use std::collections::BTreeMap;
use std::fmt;

/// 8-byte magic at the start of every bundle (trailing space included)
pub const BUNDLE_MAGIC: &[u8; 8] = b"SCVMTRS ";

/// Size of the fixed header (magic + u16 line count)
pub const HEADER_SIZE: usize = 10;

/// Size of each index table slot (u16 line id + two u32 offsets)
pub const INDEX_ENTRY_SIZE: usize = 10;

/// Coarse category of the in-game script a line belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScriptKind {
    /// Object/verb-bound script (`VERB`, `OC*`, `OBNA`, `ON*` tags).
    ObjectVerb,
    /// Global script (`SCRP`, `SC*` tags); always lives in room 0.
    Global,
    /// Local/entry/exit script (`LSCR`, `LS*`, `ENCD`, `EN*`, `EXCD`, `EX*` tags).
    Local,
    /// Unrecognized tag vocabulary. Kept as a fallback bucket rather
    /// than rejected; packs as 0xFF in script keys.
    Unknown,
}

impl ScriptKind {
    /// The byte packed into the high half of a script key.
    pub fn key_byte(self) -> u8 {
        match self {
            ScriptKind::ObjectVerb => 1,
            ScriptKind::Global => 2,
            ScriptKind::Local => 3,
            ScriptKind::Unknown => 0xFF,
        }
    }
}

/// Pack a `(kind, script id)` pair into a 32-bit script key.
pub fn script_key(kind: ScriptKind, script_id: u16) -> u32 {
    (u32::from(kind.key_byte()) << 16) | u32::from(script_id)
}

/// One translatable line: a pair of raw engine byte strings.
#[derive(Debug, Clone)]
pub struct Line {
    /// Room the line belongs to (0 = global scope).
    pub room_id: u16,
    /// Script category.
    pub kind: ScriptKind,
    /// Script index within its kind (0 for [`ScriptKind::ObjectVerb`]).
    pub script_id: u16,
    /// Raw engine-encoded bytes of the original text.
    pub original: Vec<u8>,
    /// EUC-KR bytes of the translated text.
    pub translated: Vec<u8>,
    /// Bundle-wide ordinal. Zero until ordinal assignment, written once.
    pub line_id: u16,
    /// Post-tag-strip echo of the original input text, for diagnostics.
    pub debug_original: String,
    /// Post-tag-strip echo of the translated input text, for diagnostics.
    pub debug_translated: String,
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{}:{}/{} {:?}",
            self.line_id,
            self.kind.key_byte(),
            self.script_id,
            self.debug_original
        )
    }
}

/// A uniquely keyed script owning a contiguous ordinal range of lines.
#[derive(Debug, Clone)]
pub struct Script {
    /// `(kind.key_byte() << 16) | script_id`.
    pub key: u32,
    /// First ordinal owned by this script.
    pub left: u16,
    /// Last ordinal owned by this script (inclusive).
    pub right: u16,
    /// Lines of this script. After the pipeline runs these are
    /// deduplicated and sorted by [`compare_c_str`] on original bytes.
    pub lines: Vec<Line>,
}

impl Script {
    pub fn new(key: u32) -> Self {
        Self {
            key,
            left: 0,
            right: 0,
            lines: Vec::new(),
        }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Script {}/{}: {}..{}",
            self.key >> 16,
            self.key & 0xFFFF,
            self.left,
            self.right
        )
    }
}

/// A room grouping scripts, with the union ordinal range of its lines.
#[derive(Debug, Clone)]
pub struct Room {
    pub id: u16,
    /// First ordinal owned by this room.
    pub left: u16,
    /// Last ordinal owned by this room (inclusive).
    pub right: u16,
    /// Scripts keyed by script key; ascending iteration order is
    /// load-bearing for ordinal assignment.
    pub scripts: BTreeMap<u32, Script>,
}

impl Room {
    pub fn new(id: u16) -> Self {
        Self {
            id,
            left: 0,
            right: 0,
            scripts: BTreeMap::new(),
        }
    }
}

impl fmt::Display for Room {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Room {}: {}..{}", self.id, self.left, self.right)
    }
}

/// The full room → script → line hierarchy of a bundle.
#[derive(Debug, Clone, Default)]
pub struct BundleResource {
    /// Rooms keyed by room id, ascending.
    pub rooms: BTreeMap<u16, Room>,
}

impl BundleResource {
    pub fn new() -> Self {
        Self {
            rooms: BTreeMap::new(),
        }
    }

    /// Total number of lines across all rooms and scripts.
    pub fn line_count(&self) -> usize {
        self.rooms
            .values()
            .flat_map(|r| r.scripts.values())
            .map(|s| s.lines.len())
            .sum()
    }

    /// Iterate lines in traversal order: rooms ascending by id,
    /// scripts ascending by key, lines in stored order.
    pub fn lines(&self) -> impl Iterator<Item = &Line> {
        self.rooms
            .values()
            .flat_map(|r| r.scripts.values())
            .flat_map(|s| s.lines.iter())
    }
}
