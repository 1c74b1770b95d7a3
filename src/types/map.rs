//! Map keys and the insertion-ordered term map.

use std::collections::HashMap;
use std::fmt;

use super::value::{Atom, Binstr, Term, fmt_binary, fmt_char_list};
use crate::error::TermError;

/// The key shapes a map may carry.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MapKey {
    Atom(Atom),
    Binary(Binstr),
    CharList(Vec<u8>),
}

impl MapKey {
    pub fn atom(name: impl Into<String>) -> Self {
        Self::Atom(Atom::new(name))
    }

    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Self::Binary(Binstr::new(bytes))
    }
}

impl From<Atom> for MapKey {
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}

impl From<Binstr> for MapKey {
    fn from(b: Binstr) -> Self {
        Self::Binary(b)
    }
}

impl TryFrom<Term> for MapKey {
    type Error = TermError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        match term {
            Term::Atom(a) => Ok(Self::Atom(a)),
            Term::Binary(b) => Ok(Self::Binary(Binstr::from(b))),
            Term::CharList(c) => Ok(Self::CharList(c)),
            other => Err(TermError::InvalidMapKey(format!("{} {other}", other.kind()))),
        }
    }
}

impl fmt::Display for MapKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a}"),
            Self::Binary(b) => fmt_binary(f, b.as_bytes()),
            Self::CharList(c) => fmt_char_list(f, c),
        }
    }
}

/// A map that keeps its entries in insertion (or decode) order.
///
/// Order is kept so that a decoded map re-encodes to the same bytes. Lookups
/// go through a hash index. Inserting a key that is already present replaces
/// its value without moving the entry. Equality ignores order.
#[derive(Debug, Clone, Default)]
pub struct TermMap {
    entries: Vec<(MapKey, Term)>,
    index: HashMap<MapKey, usize>,
}

impl TermMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Inserts a pair, returning the previous value for the key if any.
    pub fn insert(&mut self, key: impl Into<MapKey>, value: impl Into<Term>) -> Option<Term> {
        let key = key.into();
        let value = value.into();
        if let Some(&pos) = self.index.get(&key) {
            return Some(std::mem::replace(&mut self.entries[pos].1, value));
        }
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, value));
        None
    }

    pub fn get(&self, key: &MapKey) -> Option<&Term> {
        self.index.get(key).map(|&pos| &self.entries[pos].1)
    }

    pub fn contains_key(&self, key: &MapKey) -> bool {
        self.index.contains_key(key)
    }

    /// Iterates over the entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&MapKey, &Term)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &MapKey> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Term> {
        self.entries.iter().map(|(_, v)| v)
    }
}

impl PartialEq for TermMap {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|(k, v)| other.get(k) == Some(v))
    }
}

impl<K: Into<MapKey>, V: Into<Term>> FromIterator<(K, V)> for TermMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}

impl<K: Into<MapKey>, V: Into<Term>, const N: usize> From<[(K, V); N]> for TermMap {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl IntoIterator for TermMap {
    type Item = (MapKey, Term);
    type IntoIter = std::vec::IntoIter<(MapKey, Term)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl fmt::Display for TermMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{{")?;
        for (i, (k, v)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{k} => {v}")?;
        }
        write!(f, "}}")
    }
}
