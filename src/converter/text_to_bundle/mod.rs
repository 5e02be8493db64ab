//! Script text → bundle conversion
//!
//! Takes the two line-aligned dumps produced by the script extractor —
//! the original-language text (latin1) and its translation (EUC-KR) —
//! and builds the binary bundle the runtime loads. The whole input is
//! parsed in memory before a single output byte is written; any format
//! violation aborts the run with the offending line number.

pub mod escape;
pub mod hierarchy;
pub mod tag;

pub use hierarchy::{assign_line_ids, dedup};
pub use tag::{ParsedTag, parse_tag, strip_translated_prefix};

use crate::error::{Error, Result};
use crate::formats::bundle::{self, BundleResource, Line};
use std::fs;
use std::path::Path;

/// Convert a pair of script text dumps into a bundle file.
///
/// # Errors
/// Returns an error if reading, parsing, or writing fails. No output
/// file is produced on failure.
pub fn convert_text_to_bundle<P: AsRef<Path>>(original: P, translated: P, dest: P) -> Result<()> {
    tracing::info!(
        "Converting script text → bundle: {:?} + {:?} → {:?}",
        original.as_ref(),
        translated.as_ref(),
        dest.as_ref()
    );

    let original_lines = read_lines_latin1(original.as_ref())?;
    let translated_lines = read_lines_euc_kr(translated.as_ref())?;

    let resource = build_bundle_resource(&original_lines, &translated_lines)?;

    bundle::write_bundle(dest, &resource)?;

    tracing::info!(
        "Wrote {} lines across {} rooms",
        resource.line_count(),
        resource.rooms.len()
    );
    Ok(())
}

/// Run the full transformation pipeline on already-decoded line pairs.
///
/// Line `i` of `original` corresponds to line `i` of `translated`.
/// The returned resource is deduplicated, sorted, and has final line
/// ids assigned; it is ready for [`bundle::write_bundle`].
///
/// # Errors
/// Returns [`Error::LineCountMismatch`] before any transformation if
/// the dumps do not pair up, and tag/escape/capacity errors from the
/// pipeline stages.
///
/// [`Error::LineCountMismatch`]: crate::Error::LineCountMismatch
pub fn build_bundle_resource<S: AsRef<str>>(
    original: &[S],
    translated: &[S],
) -> Result<BundleResource> {
    if original.len() != translated.len() {
        return Err(Error::LineCountMismatch {
            original: original.len(),
            translated: translated.len(),
        });
    }

    let mut resource = BundleResource::new();
    let mut parsed = 0usize;
    let mut filtered = 0usize;

    for (idx, (org, trs)) in original.iter().zip(translated).enumerate() {
        let line_no = idx + 1;
        let org = org.as_ref();
        let trs = trs.as_ref();

        let Some((parsed_tag, org_rest)) = tag::parse_tag(line_no, org)? else {
            continue;
        };
        let trs_rest = tag::strip_translated_prefix(trs);

        let line = Line {
            room_id: parsed_tag.room_id,
            kind: parsed_tag.kind,
            script_id: parsed_tag.script_id,
            original: escape::decode_original(line_no, org_rest)?,
            translated: escape::decode_translated(line_no, trs_rest)?,
            line_id: 0,
            debug_original: org_rest.to_owned(),
            debug_translated: trs_rest.to_owned(),
        };

        if hierarchy::is_legacy_space_filtered(&line) {
            filtered += 1;
            continue;
        }

        parsed += 1;
        hierarchy::insert(&mut resource, line);
    }

    let deduplicated = hierarchy::dedup(&mut resource);
    hierarchy::assign_line_ids(&mut resource)?;

    tracing::debug!(
        parsed,
        filtered,
        deduplicated,
        surviving = resource.line_count(),
        "pipeline complete"
    );

    Ok(resource)
}

/// Read a latin1 text file as lines (one byte per character, exactly).
fn read_lines_latin1(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let text = encoding_rs::mem::decode_latin1(&bytes);
    Ok(text.lines().map(str::to_owned).collect())
}

/// Read an EUC-KR text file as lines.
fn read_lines_euc_kr(path: &Path) -> Result<Vec<String>> {
    let bytes = fs::read(path)?;
    let (text, _, had_errors) = encoding_rs::EUC_KR.decode(&bytes);
    if had_errors {
        tracing::warn!("malformed EUC-KR sequences in {:?} were replaced", path);
    }
    Ok(text.lines().map(str::to_owned).collect())
}
