//! # Streamed replies
//!
//! The chat endpoint answers with a plain incremental text body: the
//! model's reply, a single [`SEPARATOR`], then citation metadata in the form
//! `doc_ids=1,2</s>chunk_ids=a,b`. This module turns that body into
//! progressively revealed text plus a final [`AssembledReply`].

pub mod assembler;
pub mod decoder;
pub mod driver;
pub mod metadata;

pub use assembler::{
    AssembledReply, ReplyStream, SEPARATOR, StreamParseState, StreamedReplyAssembler,
};
pub use decoder::Utf8ChunkDecoder;
pub use driver::{StreamError, drive_reply};
pub use metadata::{PART_DELIMITER, ReplyMetadata};
