//! Global atom interning table with permanent storage semantics.
//!
//! This module provides a thread-safe string interning table that permanently
//! stores unique identifier strings. Once interned, atoms are never
//! deallocated and can be referenced by their numeric slot index.
//!
//! # Atom Semantics
//!
//! - **Permanent storage**: once created, atoms live for the process lifetime
//! - **Unique representation**: each distinct string is stored exactly once
//! - **Fast comparison**: atoms can be compared by their slot index (u32)
//! - **Bounded capacity**: limited to [`MAX_ATOM_COUNT`] distinct atoms
//!
//! Slot 0 is reserved for the empty atom: looking up the empty string always
//! returns 0 and never allocates.
//!
//! # Thread Safety
//!
//! The table uses a read-write lock with an optimized fast path for existing
//! atoms. Most lookups only take an upgradable read lock; new atom creation
//! upgrades to a write lock, under which the presence check is repeated so
//! two racing lookups of the same string can never mint two slots.
//!
//! # Memory Considerations
//!
//! Atoms are **never deallocated**. Avoid interning untrusted or unbounded
//! dynamic input: every distinct string consumes table capacity permanently.

use hashbrown::HashMap;
use parking_lot::RwLock;
use parking_lot::RwLockReadGuard;
use parking_lot::RwLockUpgradableReadGuard;
use parking_lot::RwLockWriteGuard;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::consts::MAX_ATOM_BYTES;
use crate::consts::MAX_ATOM_COUNT;

// -----------------------------------------------------------------------------
// Atom Table Error
// -----------------------------------------------------------------------------

/// Errors returned from atom table insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum AtomTableError {
  /// The identifier exceeds [`MAX_ATOM_BYTES`] bytes.
  ///
  /// Names longer than 255 bytes cannot be carried by the external term
  /// format and are rejected before touching the table.
  BadArgument,
  /// The atom table has reached [`MAX_ATOM_COUNT`] distinct atoms.
  TableFull,
}

impl Display for AtomTableError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::BadArgument => f.write_str("atom too large"),
      Self::TableFull => f.write_str("atom table full"),
    }
  }
}

impl Error for AtomTableError {}

// -----------------------------------------------------------------------------
// Atom Table
// -----------------------------------------------------------------------------

/// Thread-safe atom interning table with permanent storage.
///
/// The table stores unique strings permanently and provides fast lookups
/// via dense u32 slot indices. Interned strings are never deallocated.
///
/// # Implementation Details
///
/// Two-level structure under one lock:
///
/// 1. **HashMap**: maps strings to slot indices for O(1) lookup
/// 2. **Slot vector**: maps slot indices back to the leaked string data
///
/// Slot 0 always holds the empty string, so an empty lookup is answered
/// without consulting the map.
#[repr(transparent)]
pub struct AtomTable {
  inner: RwLock<Table>,
}

impl AtomTable {
  /// Creates a new atom table with the empty atom pre-seeded at slot 0.
  pub fn new() -> Self {
    Self {
      inner: RwLock::new(Table::new()),
    }
  }

  /// Returns the string stored at the given table slot.
  ///
  /// This operation only takes a read lock and is highly concurrent.
  ///
  /// # Panics
  ///
  /// Panics if `slot` has never been handed out by [`lookup()`]. Slot
  /// indices only originate from this table, so an out-of-range index is a
  /// bug in the caller, not a recoverable condition.
  ///
  /// [`lookup()`]: Self::lookup
  pub fn get(&self, slot: u32) -> &'static str {
    let guard: RwLockReadGuard<'_, Table> = self.inner.read();

    match guard.slots.get(slot as usize) {
      Some(data) => data,
      None => panic!("invalid atom slot: {slot}"),
    }
  }

  /// Interns a string and returns its table slot.
  ///
  /// If the string is already interned, returns the existing slot without
  /// modification. The empty string always maps to slot 0. Otherwise a new
  /// slot is allocated and the string is stored.
  ///
  /// # Concurrency
  ///
  /// Two-phase locking: an upgradable read lock answers the common case of
  /// an existing atom; only a genuinely new atom upgrades to a write lock.
  /// The presence check is repeated after the upgrade, so a racing insert
  /// of the same string observes the winner's slot instead of allocating
  /// a second one.
  ///
  /// # Errors
  ///
  /// Returns [`AtomTableError::BadArgument`] if the string exceeds
  /// [`MAX_ATOM_BYTES`], and [`AtomTableError::TableFull`] once the table
  /// holds [`MAX_ATOM_COUNT`] atoms.
  pub fn lookup(&self, data: &str) -> Result<u32, AtomTableError> {
    if data.is_empty() {
      return Ok(0);
    }

    if data.len() > MAX_ATOM_BYTES {
      return Err(AtomTableError::BadArgument);
    }

    // -------------------------------------------------------------------------
    // 1. Fast Path - Existing Atom
    // -------------------------------------------------------------------------

    let guard: RwLockUpgradableReadGuard<'_, Table> = self.inner.upgradable_read();

    if let Some(slot) = guard.map.get(data) {
      return Ok(*slot);
    }

    // -------------------------------------------------------------------------
    // 2. Slow Path - New Atom
    // -------------------------------------------------------------------------

    let mut guard: RwLockWriteGuard<'_, Table> = RwLockUpgradableReadGuard::upgrade(guard);

    // The upgrade is not atomic with other upgradable readers racing to
    // write; re-check before allocating a slot.
    if let Some(slot) = guard.map.get(data) {
      return Ok(*slot);
    }

    if guard.slots.len() >= MAX_ATOM_COUNT {
      return Err(AtomTableError::TableFull);
    }

    let slot: u32 = guard.slots.len() as u32;
    let name: &'static str = Box::leak(Box::from(data));

    guard.slots.push(name);
    guard.map.insert(name, slot);

    Ok(slot)
  }

  /// Returns the number of interned atoms, including the empty atom.
  pub fn len(&self) -> usize {
    self.inner.read().slots.len()
  }
}

impl Debug for AtomTable {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let guard: RwLockReadGuard<'_, Table> = self.inner.read();

    f.debug_struct("AtomTable")
      .field("size", &guard.slots.len())
      .finish()
  }
}

impl Default for AtomTable {
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Atom Table - Table
// -----------------------------------------------------------------------------

/// Internal table state protected by the [`AtomTable`]'s lock.
struct Table {
  /// Maps interned strings to their slot indices.
  map: HashMap<&'static str, u32>,
  /// Maps slot indices back to the leaked string data.
  slots: Vec<&'static str>,
}

impl Table {
  fn new() -> Self {
    let mut this: Self = Self {
      map: HashMap::new(),
      slots: Vec::new(),
    };

    // Slot 0 is the empty atom.
    this.slots.push("");
    this.map.insert("", 0);
    this
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
