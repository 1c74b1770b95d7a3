//! Error types for the term codec.

/// Errors that can occur while decoding or encoding a term.
///
/// Every error is fatal to the call that produced it: no partial term is
/// returned on decode, and any bytes produced before an encode failure are
/// discarded.
#[derive(Debug, thiserror::Error)]
pub enum TermError {
    #[error("unsupported version: {0}")]
    UnsupportedVersion(u8),

    #[error("unsupported tag {tag}: {feature} is not supported")]
    UnsupportedTag { tag: u8, feature: &'static str },

    #[error("unknown tag: {0}")]
    UnknownTag(u8),

    #[error("truncated input: need {needed} bytes but only {remaining} remaining")]
    TruncatedInput { needed: usize, remaining: usize },

    #[error("improper lists are not supported (tail: {0})")]
    ImproperList(String),

    #[error("unsupported map key: {0}")]
    InvalidMapKey(String),

    #[error("invalid atom: {0}")]
    InvalidSymbol(String),

    #[error("{what} length {len} exceeds the maximum of {max}")]
    LengthOverflow {
        what: &'static str,
        len: usize,
        max: usize,
    },

    #[error("nesting depth exceeds the limit of {0}")]
    DepthLimitExceeded(usize),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TermError {
    /// Returns true if more input could turn this failure into a success.
    ///
    /// The streaming reader uses this to decide whether to wait for more bytes.
    pub fn is_truncated(&self) -> bool {
        matches!(self, Self::TruncatedInput { .. })
    }
}
