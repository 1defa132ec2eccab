//! Crate-wide limits and default capacities.
//!
//! This module defines the fundamental limits and tuning parameters for the
//! term model and the mailbox layer: atom table sizing, node name bounds,
//! reference arity, and initial capacities for the bookkeeping collections.
//!
//! # Categories
//!
//! - **Atoms**: interning table limits
//! - **Node names**: wire-level identifier bounds
//! - **References**: id word arity
//! - **Mailbox**: initial capacities for link/monitor sets

// -----------------------------------------------------------------------------
// Atoms
// -----------------------------------------------------------------------------

/// Maximum number of bytes allowed in an interned atom.
///
/// The external term format length-prefixes atom names, and the small atom
/// encoding carries a single length byte, so names longer than 255 bytes
/// are unrepresentable on the wire.
///
/// Atoms exceeding this limit fail interning with [`BadArgument`].
///
/// [`BadArgument`]: crate::core::AtomTableError::BadArgument
pub const MAX_ATOM_BYTES: usize = 255;

/// Maximum number of distinct atoms the table can hold.
///
/// The table is limited to 1,048,576 (2²⁰) distinct atoms. Interned names
/// are never reclaimed, so this bound is what stands between dynamic atom
/// creation and unbounded memory growth.
///
/// Exceeding this limit fails interning with [`TableFull`].
///
/// [`TableFull`]: crate::core::AtomTableError::TableFull
pub const MAX_ATOM_COUNT: usize = 1 << 20;

// -----------------------------------------------------------------------------
// Node Names
// -----------------------------------------------------------------------------

/// Maximum number of bytes in a node name (`alive@host`).
pub const MAX_NODE_BYTES: usize = 255;

// -----------------------------------------------------------------------------
// References
// -----------------------------------------------------------------------------

/// Maximum number of 32-bit id words carried by a reference.
///
/// The wire format allows between one and three id words per reference;
/// the decoder rejects lengths outside that range.
pub const MAX_REF_IDS: usize = 3;

// -----------------------------------------------------------------------------
// Mailbox
// -----------------------------------------------------------------------------

/// Initial capacity of a mailbox's link set.
pub const CAP_MAILBOX_LINKS: usize = 8;

/// Initial capacity of a mailbox's monitor map.
pub const CAP_MAILBOX_MONITORS: usize = 8;

/// Initial capacity of the node-wide name registry.
pub const CAP_REGISTERED_NAMES: usize = 64;
