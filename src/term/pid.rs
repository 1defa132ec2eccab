//! Process identifiers.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use triomphe::Arc;

use crate::core::Atom;
use crate::term::BadArgument;

/// Mask applied to a pid's id word at construction.
pub(crate) const PID_ID_MASK: u32 = 0x0FFF_FFFF;

// -----------------------------------------------------------------------------
// Pid
// -----------------------------------------------------------------------------

/// A process identifier: originating node, id, serial, and creation.
///
/// The id is masked to its low 28 bits at construction. The creation value
/// is carried at full 32-bit width; only the legacy wire encodings narrow
/// it (to 2 meaningful bits) on their way through the codec.
///
/// The four fields live in one shared payload cell; cloning a `Pid` bumps
/// a reference count rather than copying the fields.
#[derive(Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Pid {
  blob: Arc<PidBody>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct PidBody {
  node: Atom,
  id: u32,
  serial: u32,
  creation: u32,
}

impl Pid {
  /// Creates a pid from its components.
  ///
  /// # Errors
  ///
  /// Returns [`BadArgument`] if `node` is not a valid node name
  /// (`alive@host`, 1..=255 bytes).
  pub fn new(node: &str, id: u32, serial: u32, creation: u32) -> Result<Self, BadArgument> {
    Ok(Self::from_parts(Atom::node(node)?, id, serial, creation))
  }

  /// Creates a pid from an already-validated node atom.
  #[inline]
  pub(crate) fn from_parts(node: Atom, id: u32, serial: u32, creation: u32) -> Self {
    Self {
      blob: Arc::new(PidBody {
        node,
        id: id & PID_ID_MASK,
        serial,
        creation,
      }),
    }
  }

  /// Returns the name of the node that spawned this pid.
  #[inline]
  pub fn node(&self) -> Atom {
    self.blob.node
  }

  /// Returns the id component (28 significant bits).
  #[inline]
  pub fn id(&self) -> u32 {
    self.blob.id
  }

  /// Returns the serial component.
  #[inline]
  pub fn serial(&self) -> u32 {
    self.blob.serial
  }

  /// Returns the creation component at full width.
  #[inline]
  pub fn creation(&self) -> u32 {
    self.blob.creation
  }
}

impl Debug for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Pid {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(
      f,
      "#Pid<{}.{}.{}.{}>",
      self.node(),
      self.id(),
      self.serial(),
      self.creation(),
    )
  }
}

impl PartialOrd for Pid {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Pid {
  fn cmp(&self, other: &Self) -> Ordering {
    Ord::cmp(&self.blob.node, &other.blob.node)
      .then_with(|| Ord::cmp(&self.blob.id, &other.blob.id))
      .then_with(|| Ord::cmp(&self.blob.serial, &other.blob.serial))
      .then_with(|| Ord::cmp(&self.blob.creation, &other.blob.creation))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Atom;
  use crate::term::Pid;

  #[test]
  fn test_components() {
    let pid: Pid = Pid::new("abc@fc12", 1, 2, 3).unwrap();

    assert_eq!(pid.node(), Atom::new("abc@fc12"));
    assert_eq!(pid.id(), 1);
    assert_eq!(pid.serial(), 2);
    assert_eq!(pid.creation(), 3);
  }

  #[test]
  fn test_id_mask() {
    let pid: Pid = Pid::new("a@h", 0xFFFF_FFFF, 0, 0).unwrap();
    assert_eq!(pid.id(), 0x0FFF_FFFF);
  }

  #[test]
  fn test_creation_full_width() {
    let pid: Pid = Pid::new("a@h", 1, 2, 0x0001_0004).unwrap();
    assert_eq!(pid.creation(), 0x0001_0004);
  }

  #[test]
  fn test_bad_node() {
    assert!(Pid::new("nohost", 1, 2, 3).is_err());
    assert!(Pid::new("", 1, 2, 3).is_err());
  }

  #[test]
  fn test_equality() {
    let p1: Pid = Pid::new("a@fc12", 1, 2, 3).unwrap();

    assert_eq!(p1, Pid::new("a@fc12", 1, 2, 3).unwrap());
    assert_ne!(p1, Pid::new("a@fc", 1, 2, 3).unwrap());
    assert_ne!(p1, Pid::new("a@fc12", 4, 2, 3).unwrap());
    assert_ne!(p1, Pid::new("a@fc12", 1, 4, 3).unwrap());
    assert_ne!(p1, Pid::new("a@fc12", 1, 2, 4).unwrap());
  }

  #[test]
  fn test_display() {
    let pid: Pid = Pid::new("abc@fc12", 1, 2, 0).unwrap();
    assert_eq!(pid.to_string(), "#Pid<abc@fc12.1.2.0>");
  }
}
