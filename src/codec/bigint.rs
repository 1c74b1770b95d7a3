//! Big-integer transcoding: sign byte plus little-endian magnitude digits.
//!
//! This is the only place that deals with magnitude byte order. Zero has an
//! empty magnitude and a non-negative sign. Magnitudes are produced without
//! trailing (most significant) zero bytes.

use bytes::{BufMut, BytesMut};
use malachite::{Integer, Natural};

use super::tag;
use crate::error::TermError;

pub const SIGN_POSITIVE: u8 = 0;
pub const SIGN_NEGATIVE: u8 = 1;

fn trim(magnitude: &mut Vec<u8>) {
    while magnitude.last() == Some(&0) {
        magnitude.pop();
    }
}

/// Splits an integer into its sign byte and least-significant-first magnitude.
pub fn to_sign_magnitude(value: &Integer) -> (u8, Vec<u8>) {
    let negative = *value < Integer::from(0);
    let limbs = value.unsigned_abs_ref().to_limbs_asc();
    let mut magnitude = Vec::with_capacity(limbs.len() * 8);
    for limb in limbs {
        magnitude.extend_from_slice(&limb.to_le_bytes());
    }
    trim(&mut magnitude);

    let sign = if negative { SIGN_NEGATIVE } else { SIGN_POSITIVE };
    (sign, magnitude)
}

/// Same layout as [`to_sign_magnitude`] for a machine integer.
pub fn magnitude_of_i64(value: i64) -> (u8, Vec<u8>) {
    let sign = if value < 0 { SIGN_NEGATIVE } else { SIGN_POSITIVE };
    let mut magnitude = value.unsigned_abs().to_le_bytes().to_vec();
    trim(&mut magnitude);
    (sign, magnitude)
}

/// Rebuilds an integer from little-endian magnitude digits. Any nonzero sign
/// byte means negative.
pub fn from_sign_magnitude(sign: u8, magnitude: &[u8]) -> Integer {
    // Limbs are aligned from the least significant end; only the last can be short.
    let limbs: Vec<u64> = magnitude
        .chunks(8)
        .map(|chunk| {
            let mut word = [0u8; 8];
            word[..chunk.len()].copy_from_slice(chunk);
            u64::from_le_bytes(word)
        })
        .collect();
    Integer::from_sign_and_abs(sign == SIGN_POSITIVE, Natural::from_limbs_asc(&limbs))
}

/// Writes a big-integer tag, choosing the small form for magnitudes of at
/// most 255 bytes and the large form otherwise.
pub fn put_big(buf: &mut BytesMut, sign: u8, magnitude: &[u8]) -> Result<(), TermError> {
    let len = magnitude.len();
    if let Ok(short) = u8::try_from(len) {
        buf.put_u8(tag::SMALL_BIG);
        buf.put_u8(short);
    } else {
        let long = u32::try_from(len).map_err(|_| TermError::LengthOverflow {
            what: "big integer magnitude",
            len,
            max: u32::MAX as usize,
        })?;
        buf.put_u8(tag::LARGE_BIG);
        buf.put_u32(long);
    }
    buf.put_u8(sign);
    buf.put_slice(magnitude);
    Ok(())
}

pub fn put_big_integer(buf: &mut BytesMut, value: &Integer) -> Result<(), TermError> {
    let (sign, magnitude) = to_sign_magnitude(value);
    put_big(buf, sign, &magnitude)
}

pub fn put_big_i64(buf: &mut BytesMut, value: i64) -> Result<(), TermError> {
    let (sign, magnitude) = magnitude_of_i64(value);
    put_big(buf, sign, &magnitude)
}
