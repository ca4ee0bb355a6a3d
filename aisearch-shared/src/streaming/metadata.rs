//! Decoding of the citation metadata trailing a reply.

use tracing::trace;

/// Delimiter between metadata fields.
pub const PART_DELIMITER: &str = "</s>";

const DOC_IDS_KEY: &str = "doc_ids=";
const CHUNK_IDS_KEY: &str = "chunk_ids=";

/// Source citations trailing a streamed reply.
///
/// Malformed fields decode to `None` rather than failing; unknown keys are
/// skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplyMetadata {
    /// `doc_ids=` values; `None` when absent, empty or not all integers.
    pub doc_ids: Option<Vec<i64>>,
    /// `chunk_ids=` values; `None` when absent or empty.
    pub chunk_ids: Option<Vec<String>>,
}

impl ReplyMetadata {
    /// Decodes the full metadata region of a reply.
    ///
    /// When a key appears more than once the last occurrence wins.
    #[must_use]
    pub fn decode(buffer: &str) -> Self {
        let mut metadata = Self::default();

        for part in buffer.split(PART_DELIMITER) {
            if let Some(raw) = part.strip_prefix(DOC_IDS_KEY) {
                metadata.doc_ids = decode_doc_ids(raw);
            } else if let Some(raw) = part.strip_prefix(CHUNK_IDS_KEY) {
                metadata.chunk_ids = decode_chunk_ids(raw);
            } else if !part.is_empty() {
                trace!(part, "skipping unknown reply metadata field");
            }
        }

        metadata
    }
}

fn decode_doc_ids(raw: &str) -> Option<Vec<i64>> {
    let ids = raw
        .split(',')
        .map(|id| id.trim().parse::<i64>().ok())
        .collect::<Option<Vec<_>>>();
    if ids.is_none() {
        trace!(raw, "doc_ids field is empty or malformed");
    }
    ids.filter(|ids| !ids.is_empty())
}

fn decode_chunk_ids(raw: &str) -> Option<Vec<String>> {
    let mut ids = raw.split(',').peekable();
    if ids.peek().is_none_or(|first| first.is_empty()) {
        return None;
    }
    Some(ids.map(|id| id.trim().to_string()).collect())
}
