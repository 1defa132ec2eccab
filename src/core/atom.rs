//! Interned, immutable identifier handles.
//!
//! This module provides the [`Atom`] type, a lightweight handle to strings
//! interned in the process-wide [`AtomTable`]. Atoms enable O(1) equality
//! and 4-byte storage for identifiers that appear throughout terms, control
//! messages, and registered names.
//!
//! # Well-Known Atoms
//!
//! A handful of atoms are pre-seeded at fixed slots so they can be used as
//! constants without touching the table:
//!
//! - [`Atom::EMPTY`]: the empty atom `''`
//! - [`Atom::TRUE`] / [`Atom::FALSE`]: boolean text forms
//! - [`Atom::NORMAL`]: the default close reason `normal`
//! - [`Atom::UNDEFINED`]: the placeholder value `undefined`
//!
//! # Examples
//!
//! ```
//! use exterm::core::Atom;
//!
//! let hello = Atom::new("hello");
//!
//! assert_eq!(hello, Atom::new("hello"));
//! assert_eq!(hello.as_str(), "hello");
//! assert_eq!(Atom::TRUE.as_str(), "true");
//! ```

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::LazyLock;

use crate::consts::MAX_NODE_BYTES;
use crate::core::AtomTable;
use crate::core::AtomTableError;

// -----------------------------------------------------------------------------
// Atom Table
// -----------------------------------------------------------------------------

/// Global atom table initialized with the well-known atoms.
///
/// Lazily initialized on first access; the assertions pin the well-known
/// atoms to their expected slot indices.
static ATOM_TABLE: LazyLock<AtomTable> = LazyLock::new(|| {
  let table: AtomTable = AtomTable::new();

  assert_eq!(table.lookup("").unwrap(), Atom::EMPTY.into_slot());
  assert_eq!(table.lookup("true").unwrap(), Atom::TRUE.into_slot());
  assert_eq!(table.lookup("false").unwrap(), Atom::FALSE.into_slot());
  assert_eq!(table.lookup("normal").unwrap(), Atom::NORMAL.into_slot());
  assert_eq!(table.lookup("undefined").unwrap(), Atom::UNDEFINED.into_slot());

  table
});

// -----------------------------------------------------------------------------
// Atom
// -----------------------------------------------------------------------------

/// Interned identifier handle: a 4-byte slot index into the global table.
///
/// Equality compares slot indices (O(1)); ordering delegates to the
/// underlying strings (lexicographic). The string data is shared and lives
/// for the process lifetime, so [`as_str()`] is zero-copy and `'static`.
///
/// # Examples
///
/// ```
/// use exterm::core::Atom;
///
/// let a1 = Atom::new("node");
/// let a2 = Atom::new("node");
///
/// assert_eq!(a1, a2);
/// assert!(Atom::new("abc") < Atom::new("abd"));
/// ```
///
/// [`as_str()`]: Self::as_str
#[derive(Clone, Copy, Hash, PartialEq, Eq)]
#[repr(transparent)]
pub struct Atom {
  slot: u32,
}

impl Atom {
  /// The empty atom.
  pub const EMPTY: Self = Self::from_slot(0);

  /// The atom `true`.
  pub const TRUE: Self = Self::from_slot(1);

  /// The atom `false`.
  pub const FALSE: Self = Self::from_slot(2);

  /// The atom `normal`, the default mailbox close reason.
  pub const NORMAL: Self = Self::from_slot(3);

  /// The atom `undefined`.
  pub const UNDEFINED: Self = Self::from_slot(4);

  /// Constructs an atom from a raw table slot.
  #[inline]
  pub(crate) const fn from_slot(slot: u32) -> Self {
    Self { slot }
  }

  /// Returns the table slot backing this atom.
  #[inline]
  pub(crate) const fn into_slot(self) -> u32 {
    self.slot
  }

  /// Interns a string and returns its corresponding atom.
  ///
  /// # Panics
  ///
  /// Panics if the string exceeds [`MAX_ATOM_BYTES`] or the table is full.
  /// Use [`try_new()`] when the input is not trusted.
  ///
  /// [`MAX_ATOM_BYTES`]: crate::consts::MAX_ATOM_BYTES
  /// [`try_new()`]: Self::try_new
  #[inline]
  pub fn new(data: &str) -> Self {
    match Self::try_new(data) {
      Ok(atom) => atom,
      Err(error) => panic!("atom intern failed: {error}"),
    }
  }

  /// Interns a string, reporting table errors to the caller.
  ///
  /// # Errors
  ///
  /// Returns [`AtomTableError::BadArgument`] for over-long names and
  /// [`AtomTableError::TableFull`] once the table is saturated.
  #[inline]
  pub fn try_new(data: &str) -> Result<Self, AtomTableError> {
    ATOM_TABLE.lookup(data).map(Self::from_slot)
  }

  /// Interns a node name of the form `alive@host`.
  ///
  /// Node names are atoms with extra constraints: between 1 and
  /// [`MAX_NODE_BYTES`] bytes and containing the `'@'` separator.
  ///
  /// # Errors
  ///
  /// Returns [`AtomTableError::BadArgument`] when the constraints are
  /// violated.
  pub fn node(data: &str) -> Result<Self, AtomTableError> {
    if data.is_empty() || data.len() > MAX_NODE_BYTES || !data.contains('@') {
      return Err(AtomTableError::BadArgument);
    }

    Self::try_new(data)
  }

  /// Returns the string value associated with this atom.
  ///
  /// Zero-copy: the returned slice references the interned `'static` data.
  #[inline]
  pub fn as_str(&self) -> &'static str {
    ATOM_TABLE.get(self.slot)
  }

  /// Returns `true` if this is the empty atom.
  #[inline]
  pub const fn is_empty(&self) -> bool {
    self.slot == 0
  }

  /// Returns `true` if the text form needs single quotes.
  ///
  /// An atom prints bare when it starts with a lowercase ASCII letter and
  /// contains no spaces; everything else (including the empty atom) is
  /// quoted.
  pub fn needs_quotes(&self) -> bool {
    let data: &str = self.as_str();

    match data.as_bytes().first() {
      Some(head) => !head.is_ascii_lowercase() || data.contains(' '),
      None => true,
    }
  }
}

impl Debug for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Debug::fmt(self.as_str(), f)
  }
}

impl Display for Atom {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    if self.needs_quotes() {
      write!(f, "'{}'", self.as_str())
    } else {
      f.write_str(self.as_str())
    }
  }
}

impl Default for Atom {
  #[inline]
  fn default() -> Self {
    Self::EMPTY
  }
}

impl PartialOrd for Atom {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Atom {
  fn cmp(&self, other: &Self) -> Ordering {
    if self.slot == other.slot {
      return Ordering::Equal;
    }

    Ord::cmp(self.as_str(), other.as_str())
  }
}

// -----------------------------------------------------------------------------
// Extensions - From
// -----------------------------------------------------------------------------

impl From<&str> for Atom {
  #[inline]
  fn from(other: &str) -> Atom {
    Atom::new(other)
  }
}

impl From<String> for Atom {
  #[inline]
  fn from(other: String) -> Atom {
    Atom::new(other.as_str())
  }
}

impl From<&String> for Atom {
  #[inline]
  fn from(other: &String) -> Atom {
    Atom::new(other.as_str())
  }
}

impl From<Atom> for &'static str {
  #[inline]
  fn from(other: Atom) -> &'static str {
    other.as_str()
  }
}

impl From<Atom> for String {
  #[inline]
  fn from(other: Atom) -> Self {
    String::from(other.as_str())
  }
}

// -----------------------------------------------------------------------------
// Extensions - PartialEq
// -----------------------------------------------------------------------------

impl PartialEq<str> for Atom {
  #[inline]
  fn eq(&self, other: &str) -> bool {
    self.as_str() == other
  }
}

impl PartialEq<&str> for Atom {
  #[inline]
  fn eq(&self, other: &&str) -> bool {
    self.as_str() == *other
  }
}

impl PartialEq<String> for Atom {
  #[inline]
  fn eq(&self, other: &String) -> bool {
    self.as_str() == other
  }
}

impl PartialEq<Atom> for str {
  #[inline]
  fn eq(&self, other: &Atom) -> bool {
    self == other.as_str()
  }
}

impl PartialEq<Atom> for &str {
  #[inline]
  fn eq(&self, other: &Atom) -> bool {
    *self == other.as_str()
  }
}

impl PartialEq<Atom> for String {
  #[inline]
  fn eq(&self, other: &Atom) -> bool {
    self == other.as_str()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
