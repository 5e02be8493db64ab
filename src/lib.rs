//! # scummloc
//!
//! A pure-Rust library for building localization bundles for
//! SCUMM-era adventure-game script translations.
//!
//! Script text is extracted from the game's resource files as two
//! line-aligned dumps: the original-language lines (tagged with room
//! and script identity, raw engine bytes backslash-escaped) and their
//! translations. This crate turns such a pair into a single `SCVMTRS`
//! bundle the runtime can query by line ordinal or by room/script
//! identity.
//!
//! ## Quick Start
//!
//! ### Building a bundle from text dumps
//!
//! ```no_run
//! use scummloc::converter::convert_text_to_bundle;
//!
//! convert_text_to_bundle("game.txt", "game.ko.txt", "game.trs")?;
//! # Ok::<(), scummloc::Error>(())
//! ```
//!
//! ### Reading a bundle back
//!
//! ```no_run
//! use scummloc::formats::bundle::read_bundle;
//!
//! let bundle = read_bundle("game.trs")?;
//! if let Some(entry) = bundle.line(0) {
//!     println!("line 0: {:?}", entry.original);
//! }
//! # Ok::<(), scummloc::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `cli` - Enables the `scummloc` command-line binary

pub mod converter;
pub mod error;
pub mod formats;

// Re-exports for convenience
pub use error::{Error, Result};

/// Prelude module for common imports
pub mod prelude {
    pub use crate::converter::{build_bundle_resource, convert_text_to_bundle};
    pub use crate::error::{Error, Result};
    pub use crate::formats::bundle::{
        BundleEntry, BundleFile, BundleResource, Line, Room, Script, ScriptKind, compare_c_str,
        read_bundle, script_key, write_bundle,
    };
}

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// CLI module (feature-gated)
#[cfg(feature = "cli")]
pub mod cli;
