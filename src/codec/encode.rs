//! Encoding: `Term` → bytes.

use bytes::{BufMut, Bytes, BytesMut};
use malachite::Integer;

use super::{bigint, tag};
use crate::config::EncodeConfig;
use crate::error::TermError;
use crate::types::{Atom, MapKey, Term, TermMap};
use crate::version::VERSION_MAGIC;

/// Encodes a term, prefixed with the version byte, using the default options.
pub fn encode(term: &Term) -> Result<Bytes, TermError> {
    Encoder::new().encode(term)
}

/// A configured encoder. Holds no per-call state and can be shared freely.
#[derive(Debug, Clone, Copy, Default)]
pub struct Encoder {
    config: EncodeConfig,
}

impl Encoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: EncodeConfig) -> Self {
        Self { config }
    }

    /// Encodes a term, prefixed with the version byte.
    pub fn encode(&self, term: &Term) -> Result<Bytes, TermError> {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf, term)?;
        Ok(buf.freeze())
    }

    /// Appends the version byte and the term to `buf`.
    ///
    /// On error `buf` is truncated back to its length before the call.
    pub fn encode_into(&self, buf: &mut BytesMut, term: &Term) -> Result<(), TermError> {
        let start = buf.len();
        buf.put_u8(VERSION_MAGIC);
        let result = self.encode_term(buf, term);
        match &result {
            Ok(()) => tracing::trace!(kind = term.kind(), len = buf.len() - start, "encoded term"),
            Err(e) => {
                buf.truncate(start);
                tracing::debug!(error = %e, "term encode failed");
            }
        }
        result
    }

    /// Encodes a term without the version byte, choosing the most compact
    /// tag for its shape and size.
    pub fn encode_term(&self, buf: &mut BytesMut, term: &Term) -> Result<(), TermError> {
        match term {
            Term::Integer(i) => encode_int(buf, *i),
            Term::BigInteger(i) => encode_big(buf, i),
            Term::Float(f) => {
                encode_float(buf, *f);
                Ok(())
            }
            Term::Atom(a) => encode_atom(buf, a),
            Term::Binary(b) => encode_binary(buf, b),
            Term::CharList(c) => encode_char_list(buf, c),
            Term::Tuple(items) => self.encode_tuple(buf, items),
            Term::List(items) => self.encode_list(buf, items),
            Term::Map(map) => self.encode_map(buf, map),
        }
    }

    fn encode_tuple(&self, buf: &mut BytesMut, items: &[Term]) -> Result<(), TermError> {
        if let Ok(arity) = u8::try_from(items.len()) {
            buf.put_u8(tag::SMALL_TUPLE);
            buf.put_u8(arity);
        } else {
            let arity = len_u32("tuple arity", items.len())?;
            buf.put_u8(tag::LARGE_TUPLE);
            buf.put_u32(arity);
        }
        for item in items {
            self.encode_term(buf, item)?;
        }
        Ok(())
    }

    fn encode_list(&self, buf: &mut BytesMut, items: &[Term]) -> Result<(), TermError> {
        if items.is_empty() && self.config.nil_for_empty_list() {
            encode_nil(buf);
            return Ok(());
        }
        let len = len_u32("list length", items.len())?;
        buf.put_u8(tag::LIST);
        buf.put_u32(len);
        for item in items {
            self.encode_term(buf, item)?;
        }
        encode_nil(buf);
        Ok(())
    }

    fn encode_map(&self, buf: &mut BytesMut, map: &TermMap) -> Result<(), TermError> {
        let len = len_u32("map size", map.len())?;
        buf.put_u8(tag::MAP);
        buf.put_u32(len);
        for (key, value) in map.iter() {
            encode_key(buf, key)?;
            self.encode_term(buf, value)?;
        }
        Ok(())
    }
}

fn len_u32(what: &'static str, len: usize) -> Result<u32, TermError> {
    u32::try_from(len).map_err(|_| TermError::LengthOverflow {
        what,
        len,
        max: u32::MAX as usize,
    })
}

/// Encodes an integer using the smallest fitting tag.
pub fn encode_int(buf: &mut BytesMut, value: i64) -> Result<(), TermError> {
    if let Ok(small) = u8::try_from(value) {
        buf.put_u8(tag::SMALL_INTEGER);
        buf.put_u8(small);
    } else if let Ok(int) = i32::try_from(value) {
        buf.put_u8(tag::INTEGER);
        buf.put_i32(int);
    } else {
        bigint::put_big_i64(buf, value)?;
    }
    Ok(())
}

pub fn encode_big(buf: &mut BytesMut, value: &Integer) -> Result<(), TermError> {
    bigint::put_big_integer(buf, value)
}

pub fn encode_float(buf: &mut BytesMut, value: f64) {
    buf.put_u8(tag::FLOAT);
    buf.put_f64(value);
}

/// Validates and encodes an atom. Nothing is written if validation fails.
pub fn encode_atom(buf: &mut BytesMut, atom: &Atom) -> Result<(), TermError> {
    let name = atom.validate()?;
    if atom.is_small() {
        buf.put_u8(tag::SMALL_ATOM);
        buf.put_u8(name.len() as u8);
    } else {
        // validate() bounds the length to u16.
        buf.put_u8(tag::ATOM);
        buf.put_u16(name.len() as u16);
    }
    buf.put_slice(name.as_bytes());
    Ok(())
}

pub fn encode_binary(buf: &mut BytesMut, value: &[u8]) -> Result<(), TermError> {
    let len = len_u32("binary length", value.len())?;
    buf.put_u8(tag::BINARY);
    buf.put_u32(len);
    buf.put_slice(value);
    Ok(())
}

/// Encodes a char list. Lists longer than the 16-bit length field are
/// rejected rather than truncated.
pub fn encode_char_list(buf: &mut BytesMut, chars: &[u8]) -> Result<(), TermError> {
    let len = u16::try_from(chars.len()).map_err(|_| TermError::LengthOverflow {
        what: "char list length",
        len: chars.len(),
        max: u16::MAX as usize,
    })?;
    buf.put_u8(tag::STRING);
    buf.put_u16(len);
    buf.put_slice(chars);
    Ok(())
}

pub fn encode_nil(buf: &mut BytesMut) {
    buf.put_u8(tag::NIL);
}

pub fn encode_key(buf: &mut BytesMut, key: &MapKey) -> Result<(), TermError> {
    match key {
        MapKey::Atom(a) => encode_atom(buf, a),
        MapKey::Binary(b) => encode_binary(buf, b.as_bytes()),
        MapKey::CharList(c) => encode_char_list(buf, c),
    }
}
