//! File format handlers

pub mod bundle;

// Re-export main bundle types
pub use bundle::{
    BundleEntry, BundleFile, BundleResource, Line, Room, Script, ScriptKind, read_bundle,
    write_bundle,
};
