//! The external term format codec.
//!
//! Decoding reads a term out of a byte slice at a cursor; encoding writes
//! one at a cursor, with [`Term::encode_size`] pre-computing the exact
//! output length. Top-level terms carry a one-byte version prefix
//! ([`tags::VERSION_MAGIC`]); nested terms never do.
//!
//! The decoder accepts every historical encoding of each term kind: both
//! atom widths, both float forms, legacy and "new" pid/port/reference
//! layouts. The encoder emits the narrowest size-wise opcode and the
//! newest identifier opcodes, preserving full 32-bit creation values.
//!
//! # Examples
//!
//! ```
//! use exterm::term::Term;
//!
//! let term = Term::tuple(vec![Term::atom("ok"), Term::from(1)]);
//! let bytes = term.to_bytes().unwrap();
//!
//! assert_eq!(Term::from_bytes(&bytes).unwrap(), term);
//! ```
//!
//! [`Term::encode_size`]: crate::term::Term::encode_size

mod decode;
mod encode;
mod reader;
mod writer;

pub mod tags;

pub use self::decode::decode_string;
pub use self::reader::DecodeError;
pub use self::writer::EncodeError;
