//! Writes terms to an async byte stream.

use bytes::BytesMut;
use tokio::io::{AsyncWrite, AsyncWriteExt};

use crate::codec::Encoder;
use crate::error::TermError;
use crate::types::Term;

/// Writes versioned terms to an `AsyncWrite` stream.
pub struct TermWriter<W> {
    writer: W,
    buf: BytesMut,
    encoder: Encoder,
}

impl<W: AsyncWrite + Unpin> TermWriter<W> {
    pub fn new(writer: W) -> Self {
        Self::with_encoder(writer, Encoder::new())
    }

    pub fn with_encoder(writer: W, encoder: Encoder) -> Self {
        Self {
            writer,
            buf: BytesMut::new(),
            encoder,
        }
    }

    /// Encodes one term with its version byte, writes it and flushes.
    ///
    /// The term is encoded in full before anything is written, so a failed
    /// encode leaves the stream untouched.
    pub async fn write_term(&mut self, term: &Term) -> Result<(), TermError> {
        self.buf.clear();
        self.encoder.encode_into(&mut self.buf, term)?;
        self.writer.write_all(&self.buf).await?;
        self.writer.flush().await?;
        tracing::trace!(len = self.buf.len(), "wrote term");
        Ok(())
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Atom;

    #[tokio::test]
    async fn write_single_term() {
        let mut output = Vec::new();
        let mut writer = TermWriter::new(&mut output);
        writer.write_term(&Term::atom("ok")).await.unwrap();
        assert_eq!(output, vec![131, 119, 2, b'o', b'k']);
    }

    #[tokio::test]
    async fn write_two_terms() {
        let mut output = Vec::new();
        let mut writer = TermWriter::new(&mut output);
        writer.write_term(&Term::Integer(1)).await.unwrap();
        writer.write_term(&Term::Integer(2)).await.unwrap();
        assert_eq!(output, vec![131, 97, 1, 131, 97, 2]);
    }

    #[tokio::test]
    async fn failed_encode_writes_nothing() {
        let mut output = Vec::new();
        let mut writer = TermWriter::new(&mut output);
        let bad = Term::List(vec![Term::Atom(Atom::from_bytes(vec![0xFF]))]);
        assert!(matches!(
            writer.write_term(&bad).await,
            Err(TermError::InvalidSymbol(_))
        ));
        assert!(output.is_empty());
    }
}
