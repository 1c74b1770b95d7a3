//! Decoder and encoder options.

/// Default limit on term nesting while decoding. Decoding is recursive, and
/// this depth fits a 2 MiB thread stack in unoptimized builds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options for decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeConfig {
    max_depth: usize,
}

impl DecodeConfig {
    pub fn new() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    /// Sets how deeply tuples, lists and maps may nest before decoding fails.
    pub fn max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn depth_limit(&self) -> usize {
        self.max_depth
    }
}

impl Default for DecodeConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Options for encoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeConfig {
    empty_list_as_nil: bool,
}

impl EncodeConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes an empty list as the bare nil tag instead of a zero-length list
    /// followed by the nil terminator.
    pub fn empty_list_as_nil(mut self, enabled: bool) -> Self {
        self.empty_list_as_nil = enabled;
        self
    }

    pub fn nil_for_empty_list(&self) -> bool {
        self.empty_list_as_nil
    }
}
