//! Reads terms from an async byte stream.

use bytes::{Buf, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

use crate::codec::Decoder;
use crate::error::TermError;
use crate::types::Term;

/// Smallest read requested from the underlying reader.
const READ_CHUNK: usize = 8 * 1024;

/// Reads versioned terms from an `AsyncRead` stream.
///
/// The format carries no framing, so the reader buffers input until a whole
/// term decodes. Terms written back to back on one stream are read one at a
/// time.
pub struct TermReader<R> {
    reader: R,
    buf: BytesMut,
    decoder: Decoder,
}

impl<R: AsyncRead + Unpin> TermReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_decoder(reader, Decoder::new())
    }

    pub fn with_decoder(reader: R, decoder: Decoder) -> Self {
        Self {
            reader,
            buf: BytesMut::with_capacity(READ_CHUNK),
            decoder,
        }
    }

    /// Reads the next term.
    ///
    /// Returns `Ok(None)` if the stream ends cleanly before a new term starts.
    /// A stream that ends inside a term yields the truncation error.
    pub async fn read_term(&mut self) -> Result<Option<Term>, TermError> {
        let mut truncated = None;
        // Buffered length below which another decode attempt cannot succeed.
        let mut wanted = 1;
        loop {
            if self.buf.len() >= wanted {
                let mut cursor = &self.buf[..];
                match self.decoder.decode_envelope(&mut cursor) {
                    Ok(term) => {
                        let consumed = self.buf.len() - cursor.len();
                        self.buf.advance(consumed);
                        tracing::trace!(consumed, kind = term.kind(), "read term");
                        return Ok(Some(term));
                    }
                    Err(e) if e.is_truncated() => {
                        wanted = required_len(self.buf.len(), &e);
                        tracing::trace!(buffered = self.buf.len(), wanted, "waiting for more input");
                        truncated = Some(e);
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "term decode failed");
                        return Err(e);
                    }
                }
            }

            // Grow geometrically while a term is pending.
            let grow = if truncated.is_some() {
                self.buf.len().max(READ_CHUNK)
            } else {
                READ_CHUNK
            };
            self.buf.reserve(grow);
            if self.reader.read_buf(&mut self.buf).await? == 0 {
                return match truncated {
                    Some(e) => {
                        tracing::debug!(error = %e, "stream ended inside a term");
                        Err(e)
                    }
                    None => Ok(None),
                };
            }
        }
    }

    pub fn into_inner(self) -> R {
        self.reader
    }
}

/// Total buffered length needed before decoding can get past the point where
/// `err` stopped it.
fn required_len(buffered: usize, err: &TermError) -> usize {
    match err {
        TermError::TruncatedInput { needed, remaining } => {
            (buffered - remaining).saturating_add(*needed)
        }
        _ => buffered + 1,
    }
}
