//! Decoding: bytes → `Term`.

use bytes::Buf;

use super::{bigint, tag};
use crate::config::DecodeConfig;
use crate::error::TermError;
use crate::types::{Atom, MapKey, Term, TermMap};
use crate::version::check_version;

/// Decodes one versioned term from a byte slice with the default options.
///
/// Bytes after the term are ignored.
pub fn decode(bytes: &[u8]) -> Result<Term, TermError> {
    Decoder::new().decode(bytes)
}

/// Decodes a single term, without the version byte, from the buffer.
///
/// Uses the default limits; see [`Decoder::decode_term`] for a configured
/// decoder.
pub fn decode_term(buf: &mut impl Buf) -> Result<Term, TermError> {
    Decoder::new().decode_term(buf)
}

/// Most elements preallocated for any one container. Larger containers grow
/// as their elements actually arrive.
const PREALLOC_LIMIT: usize = 32;

/// A configured decoder. Holds no per-call state and can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Decoder {
    config: DecodeConfig,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: DecodeConfig) -> Self {
        Self { config }
    }

    /// Decodes one versioned term from a byte slice.
    pub fn decode(&self, bytes: &[u8]) -> Result<Term, TermError> {
        let mut cursor = bytes;
        self.decode_buf(&mut cursor)
    }

    /// Decodes one versioned term and leaves the buffer positioned right
    /// after it.
    ///
    /// On error the buffer position is unspecified and the caller must start
    /// over from a fresh copy of the input.
    pub fn decode_buf(&self, buf: &mut impl Buf) -> Result<Term, TermError> {
        let available = buf.remaining();
        let result = self.decode_envelope(buf);
        match &result {
            Ok(term) => tracing::trace!(
                kind = term.kind(),
                consumed = available - buf.remaining(),
                "decoded term"
            ),
            Err(e) => tracing::debug!(error = %e, "term decode failed"),
        }
        result
    }

    /// Decodes a single term without the version byte.
    pub fn decode_term(&self, buf: &mut impl Buf) -> Result<Term, TermError> {
        TermDecoder::new(buf, self.config.depth_limit()).term()
    }

    pub(crate) fn decode_envelope(&self, buf: &mut impl Buf) -> Result<Term, TermError> {
        let mut decoder = TermDecoder::new(buf, self.config.depth_limit());
        decoder.need(1)?;
        check_version(decoder.buf.get_u8())?;
        decoder.term()
    }
}

/// Recursive-descent state over one buffer.
struct TermDecoder<'a, B> {
    buf: &'a mut B,
    max_depth: usize,
    depth: usize,
}

impl<'a, B: Buf> TermDecoder<'a, B> {
    fn new(buf: &'a mut B, max_depth: usize) -> Self {
        Self {
            buf,
            max_depth,
            depth: 0,
        }
    }

    fn term(&mut self) -> Result<Term, TermError> {
        self.need(1)?;
        let t = self.buf.get_u8();
        match t {
            tag::SMALL_INTEGER => {
                self.need(1)?;
                Ok(Term::Integer(i64::from(self.buf.get_u8())))
            }
            tag::INTEGER => {
                self.need(4)?;
                Ok(Term::Integer(i64::from(self.buf.get_i32())))
            }
            tag::FLOAT => {
                self.need(8)?;
                Ok(Term::Float(self.buf.get_f64()))
            }

            tag::ATOM => {
                self.need(2)?;
                let len = self.buf.get_u16() as usize;
                self.atom(len)
            }
            tag::SMALL_ATOM => {
                self.need(1)?;
                let len = self.buf.get_u8() as usize;
                self.atom(len)
            }

            tag::SMALL_TUPLE => {
                self.need(1)?;
                let arity = self.buf.get_u8() as usize;
                self.tuple(arity)
            }
            tag::LARGE_TUPLE => {
                self.need(4)?;
                let arity = self.buf.get_u32() as usize;
                self.tuple(arity)
            }

            tag::NIL => Ok(Term::nil()),
            tag::STRING => {
                self.need(2)?;
                let len = self.buf.get_u16() as usize;
                Ok(Term::CharList(self.bytes(len)?))
            }
            tag::LIST => {
                self.need(4)?;
                let len = self.buf.get_u32() as usize;
                self.list(len)
            }

            tag::BINARY => {
                self.need(4)?;
                let len = self.buf.get_u32() as usize;
                Ok(Term::Binary(self.bytes(len)?))
            }

            tag::SMALL_BIG => {
                self.need(1)?;
                let len = self.buf.get_u8() as usize;
                self.big(len)
            }
            tag::LARGE_BIG => {
                self.need(4)?;
                let len = self.buf.get_u32() as usize;
                self.big(len)
            }

            tag::MAP => {
                self.need(4)?;
                let len = self.buf.get_u32() as usize;
                self.map(len)
            }

            other => match tag::unsupported_feature(other) {
                Some(feature) => Err(TermError::UnsupportedTag {
                    tag: other,
                    feature,
                }),
                None => Err(TermError::UnknownTag(other)),
            },
        }
    }

    fn need(&self, needed: usize) -> Result<(), TermError> {
        let remaining = self.buf.remaining();
        if remaining < needed {
            Err(TermError::TruncatedInput { needed, remaining })
        } else {
            Ok(())
        }
    }

    /// Caps preallocation by the bytes left (each element takes at least one)
    /// and by [`PREALLOC_LIMIT`].
    fn capacity_hint(&self, declared: usize) -> usize {
        declared.min(self.buf.remaining()).min(PREALLOC_LIMIT)
    }

    fn nested<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, TermError>,
    ) -> Result<T, TermError> {
        if self.depth >= self.max_depth {
            return Err(TermError::DepthLimitExceeded(self.max_depth));
        }
        self.depth += 1;
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn bytes(&mut self, len: usize) -> Result<Vec<u8>, TermError> {
        self.need(len)?;
        let mut data = vec![0u8; len];
        self.buf.copy_to_slice(&mut data);
        Ok(data)
    }

    fn atom(&mut self, len: usize) -> Result<Term, TermError> {
        let atom = Atom::from_bytes(self.bytes(len)?);
        atom.validate()?;
        Ok(Term::Atom(atom))
    }

    fn big(&mut self, len: usize) -> Result<Term, TermError> {
        self.need(len.saturating_add(1))?;
        let sign = self.buf.get_u8();
        let magnitude = self.bytes(len)?;
        Ok(Term::BigInteger(bigint::from_sign_magnitude(sign, &magnitude)))
    }

    fn tuple(&mut self, arity: usize) -> Result<Term, TermError> {
        self.nested(|d| {
            let mut items = Vec::with_capacity(d.capacity_hint(arity));
            for _ in 0..arity {
                items.push(d.term()?);
            }
            Ok(Term::Tuple(items))
        })
    }

    fn list(&mut self, len: usize) -> Result<Term, TermError> {
        self.nested(|d| {
            let mut items = Vec::with_capacity(d.capacity_hint(len));
            for _ in 0..len {
                items.push(d.term()?);
            }
            let tail = d.term()?;
            if !tail.is_nil() {
                return Err(TermError::ImproperList(tail.to_string()));
            }
            Ok(Term::List(items))
        })
    }

    fn map(&mut self, len: usize) -> Result<Term, TermError> {
        self.nested(|d| {
            let mut map = TermMap::with_capacity(d.capacity_hint(len));
            for _ in 0..len {
                let key = MapKey::try_from(d.term()?)?;
                let value = d.term()?;
                map.insert(key, value);
            }
            Ok(Term::Map(map))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode;
    use crate::version::VERSION_MAGIC;
    use malachite::Integer;

    /// Encode then decode a term and return the result.
    fn round_trip(term: &Term) -> Term {
        let bytes = encode::encode(term).expect("encode failed");
        decode(&bytes).expect("decode failed")
    }

    fn decode_raw(body: &[u8]) -> Result<Term, TermError> {
        let mut bytes = vec![VERSION_MAGIC];
        bytes.extend_from_slice(body);
        decode(&bytes)
    }

    #[test]
    fn small_integer() {
        assert_eq!(decode_raw(&[97, 42]).unwrap(), Term::Integer(42));
        assert_eq!(decode_raw(&[97, 255]).unwrap(), Term::Integer(255));
    }

    #[test]
    fn integer_is_signed() {
        assert_eq!(decode_raw(&[98, 0xFF, 0xFF, 0xFF, 0xFF]).unwrap(), Term::Integer(-1));
        assert_eq!(decode_raw(&[98, 0, 0, 1, 0]).unwrap(), Term::Integer(256));
    }

    #[test]
    fn float() {
        let mut body = vec![70];
        body.extend_from_slice(&3.14f64.to_be_bytes());
        assert_eq!(decode_raw(&body).unwrap(), Term::Float(3.14));
    }

    #[test]
    fn atoms() {
        assert_eq!(decode_raw(&[119, 2, b'o', b'k']).unwrap(), Term::atom("ok"));
        assert_eq!(decode_raw(&[118, 0, 2, b'o', b'k']).unwrap(), Term::atom("ok"));
        assert!(matches!(
            decode_raw(&[119, 1, 0xFF]),
            Err(TermError::InvalidSymbol(_))
        ));
    }

    #[test]
    fn nil_is_empty_list() {
        assert_eq!(decode_raw(&[106]).unwrap(), Term::List(vec![]));
    }

    #[test]
    fn string_is_char_list() {
        assert_eq!(
            decode_raw(&[107, 0, 3, 1, 2, 3]).unwrap(),
            Term::CharList(vec![1, 2, 3])
        );
    }

    #[test]
    fn binary() {
        assert_eq!(
            decode_raw(&[109, 0, 0, 0, 2, 0xDE, 0xAD]).unwrap(),
            Term::Binary(vec![0xDE, 0xAD])
        );
    }

    #[test]
    fn small_big_regardless_of_magnitude() {
        assert_eq!(
            decode_raw(&[110, 1, 0, 5]).unwrap(),
            Term::BigInteger(Integer::from(5))
        );
        assert_eq!(
            decode_raw(&[110, 2, 1, 0x00, 0x01]).unwrap(),
            Term::BigInteger(Integer::from(-256))
        );
        assert_eq!(
            decode_raw(&[111, 0, 0, 0, 0, 0]).unwrap(),
            Term::BigInteger(Integer::from(0))
        );
    }

    #[test]
    fn proper_list() {
        assert_eq!(
            decode_raw(&[108, 0, 0, 0, 2, 97, 1, 97, 2, 106]).unwrap(),
            Term::List(vec![Term::Integer(1), Term::Integer(2)])
        );
    }

    #[test]
    fn improper_list_rejected() {
        assert!(matches!(
            decode_raw(&[108, 0, 0, 0, 1, 97, 1, 97, 2]),
            Err(TermError::ImproperList(_))
        ));
    }

    #[test]
    fn missing_tail_is_truncation() {
        assert!(decode_raw(&[108, 0, 0, 0, 1, 97, 1]).unwrap_err().is_truncated());
    }

    #[test]
    fn map_with_allowed_keys() {
        let term = decode_raw(&[
            116, 0, 0, 0, 3, //
            119, 1, b'a', 97, 1, //
            109, 0, 0, 0, 1, b'b', 97, 2, //
            107, 0, 1, b'c', 97, 3,
        ])
        .unwrap();
        let map = term.as_map().unwrap();
        assert_eq!(map.get(&MapKey::atom("a")), Some(&Term::Integer(1)));
        assert_eq!(map.get(&MapKey::binary(b"b".to_vec())), Some(&Term::Integer(2)));
        assert_eq!(map.get(&MapKey::CharList(b"c".to_vec())), Some(&Term::Integer(3)));
    }

    #[test]
    fn map_duplicate_keys_collapse() {
        let term = decode_raw(&[
            116, 0, 0, 0, 2, //
            119, 1, b'a', 97, 1, //
            119, 1, b'a', 97, 2,
        ])
        .unwrap();
        let map = term.as_map().unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get(&MapKey::atom("a")), Some(&Term::Integer(2)));
    }

    #[test]
    fn map_with_integer_key_rejected() {
        assert!(matches!(
            decode_raw(&[116, 0, 0, 0, 1, 97, 1, 97, 2]),
            Err(TermError::InvalidMapKey(_))
        ));
    }

    #[test]
    fn unknown_tag() {
        assert!(matches!(decode_raw(&[1]), Err(TermError::UnknownTag(1))));
    }

    #[test]
    fn bad_version() {
        assert!(matches!(
            decode(&[130, 97, 1]),
            Err(TermError::UnsupportedVersion(130))
        ));
    }

    #[test]
    fn empty_input_is_truncated() {
        assert!(decode(&[]).unwrap_err().is_truncated());
        assert!(decode(&[VERSION_MAGIC]).unwrap_err().is_truncated());
    }

    #[test]
    fn short_fields_are_truncated() {
        for body in [
            &[97][..],
            &[98, 0, 0],
            &[70, 0, 0, 0, 0],
            &[119, 3, b'a'],
            &[109, 0, 0, 0, 9, 1],
            &[110, 2, 0, 1],
            &[104, 2, 97, 1],
        ] {
            assert!(decode_raw(body).unwrap_err().is_truncated(), "body {body:?}");
        }
    }

    #[test]
    fn huge_declared_length_does_not_allocate() {
        // Declares 4 billion elements but provides one.
        let err = decode_raw(&[108, 0xFF, 0xFF, 0xFF, 0xFF, 97, 1]).unwrap_err();
        assert!(err.is_truncated());
    }

    #[test]
    fn depth_limit() {
        let nested = [104, 1, 104, 1, 104, 1, 106];
        let strict = Decoder::with_config(DecodeConfig::new().max_depth(2));
        let mut bytes = vec![VERSION_MAGIC];
        bytes.extend_from_slice(&nested);
        assert!(matches!(
            strict.decode(&bytes),
            Err(TermError::DepthLimitExceeded(2))
        ));
        let relaxed = Decoder::with_config(DecodeConfig::new().max_depth(3));
        assert!(relaxed.decode(&bytes).is_ok());
    }

    #[test]
    fn decode_term_uses_decoder_limits() {
        let nested = [104, 1, 104, 1, 106];
        let strict = Decoder::with_config(DecodeConfig::new().max_depth(1));
        assert!(matches!(
            strict.decode_term(&mut &nested[..]),
            Err(TermError::DepthLimitExceeded(1))
        ));
        assert!(decode_term(&mut &nested[..]).is_ok());
    }

    #[test]
    fn default_depth_fits_small_stack() {
        let depth = crate::config::DEFAULT_MAX_DEPTH;
        let mut bytes = vec![VERSION_MAGIC];
        for _ in 0..depth {
            bytes.extend_from_slice(&[108, 0, 0, 0, 1]);
        }
        bytes.push(106);
        bytes.extend(std::iter::repeat_n(106, depth));

        let handle = std::thread::Builder::new()
            .stack_size(2 << 20)
            .spawn(move || {
                let term = decode(&bytes).unwrap();
                assert_eq!(round_trip(&term), term);
            })
            .unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn decode_buf_leaves_trailing_bytes() {
        let data = [VERSION_MAGIC, 97, 1, VERSION_MAGIC, 97, 2];
        let mut cursor = &data[..];
        let decoder = Decoder::new();
        assert_eq!(decoder.decode_buf(&mut cursor).unwrap(), Term::Integer(1));
        assert_eq!(decoder.decode_buf(&mut cursor).unwrap(), Term::Integer(2));
        assert!(cursor.is_empty());
    }

    #[test]
    fn round_trip_integers() {
        for i in [0, 1, 255, 256, -1, i64::from(i32::MIN), i64::from(i32::MAX)] {
            assert_eq!(round_trip(&Term::Integer(i)), Term::Integer(i), "failed for {i}");
        }
        // Beyond 32 bits the value comes back as a big integer.
        for i in [i64::from(i32::MAX) + 1, i64::from(i32::MIN) - 1, i64::MAX, i64::MIN] {
            assert_eq!(round_trip(&Term::Integer(i)).as_int(), Some(i), "failed for {i}");
        }
    }

    #[test]
    fn round_trip_nested() {
        let term = Term::tuple(vec![
            Term::atom("reply"),
            Term::List(vec![Term::binary(b"x".to_vec()), Term::Float(-0.5)]),
            Term::Map(TermMap::from([(MapKey::atom("k"), Term::nil())])),
        ]);
        assert_eq!(round_trip(&term), term);
    }
}
