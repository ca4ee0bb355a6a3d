//! Two-region parser for streamed replies.

use tracing::debug;

use super::{decoder::Utf8ChunkDecoder, metadata::ReplyMetadata};

/// Reserved character separating the visible reply from its metadata.
pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum ParseRegion {
    #[default]
    Visible,
    Metadata,
}

/// Transient state of one in-flight reply.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StreamParseState {
    visible_text: String,
    region: ParseRegion,
    metadata_buffer: String,
}

impl StreamParseState {
    /// Reply text received before the separator.
    #[must_use]
    pub fn visible_text(&self) -> &str {
        &self.visible_text
    }

    /// Whether the separator has been seen.
    #[must_use]
    pub fn in_metadata_region(&self) -> bool {
        self.region == ParseRegion::Metadata
    }

    /// Raw metadata received so far, decoded only at the end.
    #[must_use]
    pub fn metadata_buffer(&self) -> &str {
        &self.metadata_buffer
    }
}

/// Final result of a completed reply, applied to the message in one step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssembledReply {
    /// Everything before the separator.
    pub assistant_text: String,
    /// Cited document ids, `None` when absent or malformed.
    pub source_document_ids: Option<Vec<i64>>,
    /// Cited chunk ids, `None` when absent or empty.
    pub source_chunk_ids: Option<Vec<String>>,
}

/// Splits a streamed reply into display text and trailing citations.
///
/// Everything before the first [`SEPARATOR`] is visible text; everything
/// after it, including further separators, is metadata decoded by
/// [`ReplyMetadata::decode`] once the stream ends. Chunk boundaries are
/// irrelevant: any split of the same stream yields the same result.
#[derive(Debug, Default)]
pub struct StreamedReplyAssembler {
    state: StreamParseState,
}

impl StreamedReplyAssembler {
    /// Starts in the visible region with nothing buffered.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes one text chunk.
    ///
    /// Returns the full visible text for re-rendering, or `None` once the
    /// metadata region has started.
    pub fn feed(&mut self, chunk: &str) -> Option<&str> {
        let state = &mut self.state;
        match state.region {
            ParseRegion::Visible => {
                if let Some((visible, metadata)) = chunk.split_once(SEPARATOR) {
                    state.visible_text.push_str(visible);
                    state.region = ParseRegion::Metadata;
                    state.metadata_buffer.clear();
                    state.metadata_buffer.push_str(metadata);
                    debug!(
                        visible_len = state.visible_text.len(),
                        "reply entered metadata region"
                    );
                } else {
                    state.visible_text.push_str(chunk);
                }
            }
            ParseRegion::Metadata => state.metadata_buffer.push_str(chunk),
        }

        match state.region {
            ParseRegion::Visible => Some(state.visible_text.as_str()),
            ParseRegion::Metadata => None,
        }
    }

    /// Progress of the reply so far.
    #[must_use]
    pub fn state(&self) -> &StreamParseState {
        &self.state
    }

    /// Ends the stream and decodes the metadata region.
    #[must_use]
    pub fn finish(self) -> AssembledReply {
        let StreamParseState {
            visible_text,
            metadata_buffer,
            ..
        } = self.state;
        let metadata = ReplyMetadata::decode(&metadata_buffer);
        debug!(
            doc_ids = ?metadata.doc_ids,
            chunk_ids = ?metadata.chunk_ids,
            "reply stream finished"
        );

        AssembledReply {
            assistant_text: visible_text,
            source_document_ids: metadata.doc_ids,
            source_chunk_ids: metadata.chunk_ids,
        }
    }
}

/// [`StreamedReplyAssembler`] fed with raw transport bytes.
#[derive(Debug, Default)]
pub struct ReplyStream {
    decoder: Utf8ChunkDecoder,
    assembler: StreamedReplyAssembler,
}

impl ReplyStream {
    /// Empty decoder and assembler.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes `bytes` and feeds the complete characters to the assembler.
    pub fn feed_bytes(&mut self, bytes: &[u8]) -> Option<&str> {
        let text = self.decoder.decode(bytes);
        self.assembler.feed(&text)
    }

    /// Progress of the reply so far.
    #[must_use]
    pub fn state(&self) -> &StreamParseState {
        self.assembler.state()
    }

    /// Flushes any dangling partial character and finishes the reply.
    #[must_use]
    pub fn finish(mut self) -> AssembledReply {
        let tail = self.decoder.finish();
        if !tail.is_empty() {
            self.assembler.feed(&tail);
        }
        self.assembler.finish()
    }
}
