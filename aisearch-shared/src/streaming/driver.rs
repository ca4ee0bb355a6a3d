//! Drives a transport byte stream through [`ReplyStream`].

use std::fmt::Display;

use futures_util::{Stream, StreamExt};
use thiserror::Error;
use tracing::{debug, warn};

use super::assembler::{AssembledReply, ReplyStream};

/// Failure while reading a reply from the transport.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// The request failed, was rejected, or the body ended abnormally.
    #[error("reply stream failed: {0}")]
    Transport(String),
}

/// Reads a streamed reply to completion.
///
/// `on_progress` receives the full visible text after every chunk that
/// arrives before the metadata region; it is never called with metadata.
///
/// # Errors
/// Returns [`StreamError::Transport`] on the first failed chunk. Nothing is
/// retried; the partial reply is dropped.
pub async fn drive_reply<S, B, E, F>(
    stream: S,
    mut on_progress: F,
) -> Result<AssembledReply, StreamError>
where
    S: Stream<Item = Result<B, E>>,
    B: AsRef<[u8]>,
    E: Display,
    F: FnMut(&str),
{
    let mut stream = std::pin::pin!(stream);
    let mut reply = ReplyStream::new();
    let mut chunks = 0_usize;

    while let Some(chunk) = stream.next().await {
        let bytes = chunk.map_err(|err| {
            let state = reply.state();
            warn!(
                chunks,
                visible_len = state.visible_text().len(),
                in_metadata = state.in_metadata_region(),
                error = %err,
                "reply stream interrupted"
            );
            StreamError::Transport(err.to_string())
        })?;
        chunks += 1;
        if let Some(visible) = reply.feed_bytes(bytes.as_ref()) {
            on_progress(visible);
        }
    }

    debug!(chunks, "reply stream closed");
    Ok(reply.finish())
}
