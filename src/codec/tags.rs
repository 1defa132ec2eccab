//! External term format tag constants.
//!
//! Each term kind is introduced on the wire by a single tag byte. Several
//! kinds have more than one historical encoding; the decoder accepts all of
//! them, while the encoder emits the narrowest (for sizes) or newest (for
//! identifiers) form.
//!
//! All multi-byte integers in the format are big-endian, except big-integer
//! magnitudes which are little-endian.

/// Version prefix on top-level terms.
pub const VERSION_MAGIC: u8 = 131;

/// Small integer (0..=255): 1 payload byte.
pub const SMALL_INTEGER_EXT: u8 = 97;

/// Integer: 4-byte signed payload.
pub const INTEGER_EXT: u8 = 98;

/// Float, old format: 31-byte ASCII decimal payload.
pub const FLOAT_EXT: u8 = 99;

/// Atom: 2-byte length + bytes.
pub const ATOM_EXT: u8 = 100;

/// Small atom: 1-byte length + bytes.
pub const SMALL_ATOM_EXT: u8 = 115;

/// Reference, old format: atom + 4-byte id + 1-byte creation.
pub const REFERENCE_EXT: u8 = 101;

/// Reference, new format: 2-byte id count + atom + 1-byte creation + ids.
pub const NEW_REFERENCE_EXT: u8 = 114;

/// Reference, newer format: 2-byte id count + atom + 4-byte creation + ids.
pub const NEWER_REFERENCE_EXT: u8 = 90;

/// Port, old format: atom + 4-byte id + 1-byte creation.
pub const PORT_EXT: u8 = 102;

/// Port, new format: atom + 4-byte id + 4-byte creation.
pub const NEW_PORT_EXT: u8 = 89;

/// Pid, old format: atom + 4-byte id + 4-byte serial + 1-byte creation.
pub const PID_EXT: u8 = 103;

/// Pid, new format: atom + 4-byte id + 4-byte serial + 4-byte creation.
pub const NEW_PID_EXT: u8 = 88;

/// Tuple with arity <= 255: 1-byte arity + elements.
pub const SMALL_TUPLE_EXT: u8 = 104;

/// Tuple with arity > 255: 4-byte arity + elements.
pub const LARGE_TUPLE_EXT: u8 = 105;

/// Map: 4-byte arity + key-value pairs.
pub const MAP_EXT: u8 = 116;

/// The empty list.
pub const NIL_EXT: u8 = 106;

/// String: 2-byte length + bytes.
pub const STRING_EXT: u8 = 107;

/// List: 4-byte element count + elements + tail term.
pub const LIST_EXT: u8 = 108;

/// Binary: 4-byte length + bytes.
pub const BINARY_EXT: u8 = 109;

/// Big integer with <= 255 magnitude bytes: 1-byte length + sign + bytes.
pub const SMALL_BIG_EXT: u8 = 110;

/// Big integer: 4-byte length + sign + bytes.
pub const LARGE_BIG_EXT: u8 = 111;

/// Float, new format: 8-byte IEEE-754 payload.
pub const NEW_FLOAT_EXT: u8 = 70;
