//! termwire — a pure-Rust codec for the tagged external term binary format.
//!
//! The format is a self-describing representation of dynamically-typed
//! values: integers of arbitrary precision, floats, atoms, tuples, proper
//! lists, binaries, char lists and maps. Every encoded term starts with the
//! version byte 131.
//!
//! # Architecture
//!
//! - **`types`** — The term model (`Term`, `Atom`, `Binstr`, `TermMap`)
//! - **`codec`** — Tag table, decoder, encoder and big-integer transcoding
//! - **`stream`** — Reading and writing terms over async byte streams
//! - **`config`** — Decoder and encoder options
//! - **`version`** — The stream envelope
//!
//! # Example
//!
//! ```
//! use termwire::{MapKey, Term, TermMap};
//!
//! let term = Term::tuple(vec![
//!     Term::atom("ok"),
//!     Term::Map(TermMap::from([(MapKey::atom("count"), 3)])),
//! ]);
//! let bytes = termwire::encode(&term).unwrap();
//! assert_eq!(termwire::decode(&bytes).unwrap(), term);
//! ```

pub mod codec;
pub mod config;
pub mod error;
pub mod stream;
pub mod types;
pub mod version;

pub use codec::{Decoder, Encoder, decode, encode};
pub use config::{DecodeConfig, EncodeConfig};
pub use error::TermError;
pub use stream::{TermReader, TermWriter};
pub use types::{Atom, Binstr, MapKey, Term, TermMap};
