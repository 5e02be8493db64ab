//! Conversion pipelines
//!
//! Currently one pipeline lives here: line-aligned script text dumps
//! (original + translation) → `SCVMTRS` localization bundle.

pub mod text_to_bundle;

pub use text_to_bundle::{build_bundle_resource, convert_text_to_bundle};
