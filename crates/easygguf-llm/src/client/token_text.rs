use encoding_rs::{Decoder, UTF_8};

/// Streaming UTF-8 decoder for token pieces.
///
/// Byte-fallback tokenizers split multi-byte characters across tokens, so a
/// single token's bytes are not always valid UTF-8. Incomplete sequences are
/// held back until the bytes that complete them arrive.
pub struct TokenTextDecoder {
    decoder: Decoder,
}

impl TokenTextDecoder {
    pub fn new() -> Self {
        Self {
            decoder: UTF_8.new_decoder(),
        }
    }

    /// Append the text completed by `bytes` to `out`
    pub fn push(&mut self, bytes: &[u8], out: &mut String) {
        self.decode(bytes, out, false);
    }

    /// Flush held-back bytes; a dangling partial character becomes U+FFFD
    pub fn finish(&mut self, out: &mut String) {
        self.decode(&[], out, true);
    }

    fn decode(&mut self, bytes: &[u8], out: &mut String, last: bool) {
        if let Some(needed) = self.decoder.max_utf8_buffer_length(bytes.len()) {
            out.reserve(needed);
        }
        let _ = self.decoder.decode_to_string(bytes, out, last);
    }
}

impl Default for TokenTextDecoder {
    fn default() -> Self {
        Self::new()
    }
}
