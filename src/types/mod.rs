//! In-memory term model.

mod map;
mod value;

pub use map::{MapKey, TermMap};
pub use value::{Atom, Binstr, MAX_ATOM_LEN, Term};
