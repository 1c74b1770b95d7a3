//! Term value types.

use std::fmt;

use malachite::Integer;

use super::map::{MapKey, TermMap};
use crate::error::TermError;

/// Longest atom, in bytes, that the long atom form can carry.
pub const MAX_ATOM_LEN: usize = u16::MAX as usize;

/// An atom (symbol): a UTF-8 name that is wire-distinct from ordinary strings.
///
/// The name is stored as raw bytes so that a value decoded or built from
/// foreign data can still be held and inspected; it is validated when encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Atom(Vec<u8>);

impl Atom {
    /// Creates an atom from a UTF-8 name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into().into_bytes())
    }

    /// Creates an atom from raw bytes without validating them.
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Returns the name, if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.0).ok()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Whether the name fits the short (1-byte length) atom form.
    pub fn is_small(&self) -> bool {
        self.0.len() <= usize::from(u8::MAX)
    }

    /// Checks that the atom can be written: at most [`MAX_ATOM_LEN`] bytes
    /// of valid UTF-8.
    pub fn validate(&self) -> Result<&str, TermError> {
        if self.0.len() > MAX_ATOM_LEN {
            return Err(TermError::InvalidSymbol(format!(
                "atom is {} bytes long, limit is {MAX_ATOM_LEN}",
                self.0.len()
            )));
        }
        std::str::from_utf8(&self.0)
            .map_err(|e| TermError::InvalidSymbol(format!("invalid UTF-8 in atom: {e}")))
    }
}

impl From<&str> for Atom {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for Atom {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

/// A raw byte string used as a map key, so that it cannot be mistaken for a
/// character list carrying the same bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Binstr(Vec<u8>);

impl Binstr {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for Binstr {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Binstr {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<&str> for Binstr {
    fn from(s: &str) -> Self {
        Self(s.as_bytes().to_vec())
    }
}

/// A decoded or caller-built term.
///
/// Structural equality is recursive: order-sensitive for tuples and lists,
/// order-insensitive for maps. Floats compare by bit pattern, so a NaN equals
/// itself and `0.0` differs from `-0.0`, matching their encoded bytes.
#[derive(Debug, Clone)]
pub enum Term {
    /// An integer that fits a machine word. The wire form is picked from the
    /// magnitude at encode time.
    Integer(i64),
    /// An arbitrary-precision integer. Decoding a big-integer tag always
    /// yields this variant, whatever the magnitude.
    BigInteger(Integer),
    Float(f64),
    Atom(Atom),
    /// A binary (raw byte string).
    Binary(Vec<u8>),
    /// A list of byte-sized character codes (the compact string form).
    CharList(Vec<u8>),
    Tuple(Vec<Term>),
    /// A proper list. The empty list decodes to an empty `List`.
    List(Vec<Term>),
    Map(TermMap),
}

impl PartialEq for Term {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Integer(a), Self::Integer(b)) => a == b,
            (Self::BigInteger(a), Self::BigInteger(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Atom(a), Self::Atom(b)) => a == b,
            (Self::Binary(a), Self::Binary(b)) => a == b,
            (Self::CharList(a), Self::CharList(b)) => a == b,
            (Self::Tuple(a), Self::Tuple(b)) => a == b,
            (Self::List(a), Self::List(b)) => a == b,
            (Self::Map(a), Self::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(Atom::new(name))
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary(bytes.into())
    }

    pub fn char_list(chars: impl Into<Vec<u8>>) -> Self {
        Self::CharList(chars.into())
    }

    pub fn tuple(items: impl Into<Vec<Term>>) -> Self {
        Self::Tuple(items.into())
    }

    /// The empty list.
    pub fn nil() -> Self {
        Self::List(Vec::new())
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, Self::List(items) if items.is_empty())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            Self::BigInteger(i) => i64::try_from(i).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Returns the bytes of a `Binary` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Binary(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_tuple(&self) -> Option<&[Term]> {
        match self {
            Self::Tuple(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Term]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&TermMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    /// A short name for the shape of this term, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::BigInteger(_) => "big integer",
            Self::Float(_) => "float",
            Self::Atom(_) => "atom",
            Self::Binary(_) => "binary",
            Self::CharList(_) => "char list",
            Self::Tuple(_) => "tuple",
            Self::List(_) => "list",
            Self::Map(_) => "map",
        }
    }
}

// -- Convenience conversions --

impl From<i64> for Term {
    fn from(i: i64) -> Self {
        Self::Integer(i)
    }
}

impl From<i32> for Term {
    fn from(i: i32) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<u8> for Term {
    fn from(i: u8) -> Self {
        Self::Integer(i64::from(i))
    }
}

impl From<Integer> for Term {
    fn from(i: Integer) -> Self {
        Self::BigInteger(i)
    }
}

impl From<f64> for Term {
    fn from(f: f64) -> Self {
        Self::Float(f)
    }
}

/// Widens to `f64`. The original `f32` bit pattern is not recoverable from
/// the encoded form.
impl From<f32> for Term {
    fn from(f: f32) -> Self {
        Self::Float(f64::from(f))
    }
}

impl From<Atom> for Term {
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}

impl From<Binstr> for Term {
    fn from(b: Binstr) -> Self {
        Self::Binary(b.into_vec())
    }
}

impl From<Vec<u8>> for Term {
    fn from(b: Vec<u8>) -> Self {
        Self::Binary(b)
    }
}

impl From<Vec<Term>> for Term {
    fn from(v: Vec<Term>) -> Self {
        Self::List(v)
    }
}

impl From<TermMap> for Term {
    fn from(m: TermMap) -> Self {
        Self::Map(m)
    }
}

impl From<MapKey> for Term {
    fn from(key: MapKey) -> Self {
        match key {
            MapKey::Atom(a) => Self::Atom(a),
            MapKey::Binary(b) => Self::Binary(b.into_vec()),
            MapKey::CharList(c) => Self::CharList(c),
        }
    }
}

pub(crate) fn fmt_binary(f: &mut fmt::Formatter<'_>, bytes: &[u8]) -> fmt::Result {
    let printable = !bytes.is_empty() && bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ');
    if printable {
        return write!(f, "<<\"{}\">>", String::from_utf8_lossy(bytes));
    }
    write!(f, "<<")?;
    for (i, b) in bytes.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{b}")?;
    }
    write!(f, ">>")
}

pub(crate) fn fmt_char_list(f: &mut fmt::Formatter<'_>, chars: &[u8]) -> fmt::Result {
    if chars.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
        return write!(f, "\"{}\"", String::from_utf8_lossy(chars));
    }
    write!(f, "[")?;
    for (i, c) in chars.iter().enumerate() {
        if i > 0 {
            write!(f, ",")?;
        }
        write!(f, "{c}")?;
    }
    write!(f, "]")
}

fn fmt_seq(f: &mut fmt::Formatter<'_>, items: &[Term]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Integer(i) => write!(f, "{i}"),
            Self::BigInteger(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v:?}"),
            Self::Atom(a) => write!(f, "{a}"),
            Self::Binary(b) => fmt_binary(f, b),
            Self::CharList(c) => fmt_char_list(f, c),
            Self::Tuple(items) => {
                write!(f, "{{")?;
                fmt_seq(f, items)?;
                write!(f, "}}")
            }
            Self::List(items) => {
                write!(f, "[")?;
                fmt_seq(f, items)?;
                write!(f, "]")
            }
            Self::Map(map) => write!(f, "{map}"),
        }
    }
}
