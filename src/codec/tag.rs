//! Tag byte constants.

// Integers
pub const SMALL_INTEGER: u8 = 97;
pub const INTEGER: u8 = 98;
pub const SMALL_BIG: u8 = 110;
pub const LARGE_BIG: u8 = 111;

// Float (8-byte IEEE 754 double)
pub const FLOAT: u8 = 70;

// Atoms (UTF-8)
pub const ATOM: u8 = 118;
pub const SMALL_ATOM: u8 = 119;

// Tuples
pub const SMALL_TUPLE: u8 = 104;
pub const LARGE_TUPLE: u8 = 105;

// Lists
pub const NIL: u8 = 106;
pub const STRING: u8 = 107;
pub const LIST: u8 = 108;

pub const BINARY: u8 = 109;
pub const MAP: u8 = 116;

/// Returns the feature name for tags that are recognized but not supported.
pub const fn unsupported_feature(tag: u8) -> Option<&'static str> {
    match tag {
        82 => Some("atom cache ref"),
        102 => Some("port ext"),
        89 => Some("new port ext"),
        120 => Some("v4 port ext"),
        103 => Some("pid ext"),
        88 => Some("new pid ext"),
        99 => Some("float ext"),
        101 => Some("reference ext"),
        114 => Some("new reference ext"),
        90 => Some("newer reference ext"),
        117 => Some("fun ext"),
        112 => Some("new fun ext"),
        113 => Some("export fun ext"),
        77 => Some("bit binary ext"),
        100 => Some("atom (deprecated) ext"),
        115 => Some("small atom (deprecated) ext"),
        121 => Some("local ext"),
        _ => None,
    }
}
