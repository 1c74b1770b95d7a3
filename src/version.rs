//! Stream envelope.

use crate::error::TermError;

/// The version byte that opens every encoded term.
pub const VERSION_MAGIC: u8 = 131;

/// Checks the leading envelope byte.
pub fn check_version(byte: u8) -> Result<(), TermError> {
    if byte == VERSION_MAGIC {
        Ok(())
    } else {
        Err(TermError::UnsupportedVersion(byte))
    }
}
