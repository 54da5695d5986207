//! Descriptor parsing module
//!
//! This module turns a raw text blob of proxy descriptor lines into structured
//! [`NodeRecord`]s:
//! - Normalizing the blob (line splitting, trimming, `&amp;` unescaping)
//! - Dispatching each line to a per-scheme decoder by URI prefix
//! - Falling back to a degraded record for unrecognized or broken lines
//! - Grouping the resulting records by scheme for the output writer
//!
//! Parsing is total: every non-blank input line produces exactly one record,
//! in input order, and no error ever reaches the caller.

pub mod base64;
pub mod decoders;
pub mod record;

pub use decoders::{NodeDecoder, decode_line, decoder_table};
pub use record::{Credential, NodeRecord, NodeScheme, NodeStatus};

use tracing::debug;

// ============================================================================
// Normalization
// ============================================================================

/// Splits a blob into candidate descriptor lines.
///
/// Lines are trimmed, blank lines dropped, and the HTML-escaped query
/// separator `&amp;` restored to `&` (the upstream page serves the code block
/// entity-escaped). This step never fails.
pub fn normalize_lines(blob: &str) -> Vec<String> {
    blob.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.replace("&amp;", "&"))
        .collect()
}

// ============================================================================
// Batch Parsing
// ============================================================================

/// Parses a whole blob into records, one per non-blank line, in input order
pub fn parse_blob(blob: &str) -> Vec<NodeRecord> {
    let lines = normalize_lines(blob);
    debug!("Parsing {} descriptor lines from blob", lines.len());

    let records: Vec<NodeRecord> = lines.iter().map(|line| decode_line(line)).collect();

    let ok = records
        .iter()
        .filter(|r| r.status == NodeStatus::Ok)
        .count();
    debug!(
        "Descriptor parsing complete: {} total, {} ok, {} degraded",
        records.len(),
        ok,
        records.len() - ok
    );

    records
}

// ============================================================================
// Aggregation
// ============================================================================

/// Groups records by scheme, keyed in first-seen order, preserving the
/// original relative order inside each group
pub fn group_by_scheme(records: &[NodeRecord]) -> Vec<(NodeScheme, Vec<&NodeRecord>)> {
    let mut groups: Vec<(NodeScheme, Vec<&NodeRecord>)> = Vec::new();
    for record in records {
        match groups.iter_mut().find(|(scheme, _)| *scheme == record.scheme) {
            Some((_, group)) => group.push(record),
            None => groups.push((record.scheme, vec![record])),
        }
    }
    groups
}
