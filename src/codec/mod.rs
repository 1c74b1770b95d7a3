//! Binary encoding of terms.
//!
//! Every multi-byte length and value field is big-endian, except big-integer
//! magnitudes, which are stored least significant byte first.

pub mod bigint;
pub mod decode;
pub mod encode;
pub mod tag;

pub use decode::{Decoder, decode, decode_term};
pub use encode::{Encoder, encode};
