//! UTF-8 decoding across chunk boundaries.

/// Incremental UTF-8 decoder for transport byte chunks.
///
/// Chunk boundaries may fall inside a multi-byte character; the incomplete
/// tail is held back and completed by the next chunk. Invalid sequences are
/// replaced with U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8ChunkDecoder {
    pending: Vec<u8>,
}

impl Utf8ChunkDecoder {
    /// Decoder with nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decodes as much of `pending + bytes` as forms complete characters.
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut decoded = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    decoded.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(err) => {
                    let valid = err.valid_up_to();
                    decoded.push_str(&String::from_utf8_lossy(&self.pending[..valid]));
                    match err.error_len() {
                        Some(invalid) => {
                            decoded.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            // Incomplete sequence at the end: wait for more bytes.
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        decoded
    }

    /// Flushes bytes still pending at end of stream.
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }

    /// Whether an incomplete character is being held back.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_through() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"hello"), "hello");
        assert!(!decoder.has_pending());
        assert_eq!(decoder.finish(), "");
    }

    #[test]
    fn split_multibyte_character_is_reassembled() {
        let text = "검색 결과";
        let bytes = text.as_bytes();
        let mut decoder = Utf8ChunkDecoder::new();

        let mut decoded = String::new();
        for byte in bytes {
            decoded.push_str(&decoder.decode(std::slice::from_ref(byte)));
        }
        decoded.push_str(&decoder.finish());

        assert_eq!(decoded, text);
    }

    #[test]
    fn holds_incomplete_tail_until_next_chunk() {
        let bytes = "é".as_bytes();
        let mut decoder = Utf8ChunkDecoder::new();

        assert_eq!(decoder.decode(&bytes[..1]), "");
        assert!(decoder.has_pending());
        assert_eq!(decoder.decode(&bytes[1..]), "é");
        assert!(!decoder.has_pending());
    }

    #[test]
    fn invalid_bytes_become_replacement_characters() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"a\xFFb"), "a\u{FFFD}b");
    }

    #[test]
    fn dangling_partial_sequence_is_replaced_at_finish() {
        let mut decoder = Utf8ChunkDecoder::new();
        assert_eq!(decoder.decode(b"ok\xE2\x82"), "ok");
        assert_eq!(decoder.finish(), "\u{FFFD}");
        assert!(!decoder.has_pending());
    }
}
