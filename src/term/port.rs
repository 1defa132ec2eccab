//! Port identifiers.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use triomphe::Arc;

use crate::core::Atom;
use crate::term::BadArgument;
use crate::term::pid::PID_ID_MASK;

/// A port identifier: originating node, id, and creation.
///
/// The id is masked to its low 28 bits at construction; the creation value
/// is carried at full 32-bit width (see [`Pid`] for the rationale).
///
/// [`Pid`]: crate::term::Pid
#[derive(Clone, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Port {
  blob: Arc<PortBody>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
struct PortBody {
  node: Atom,
  id: u32,
  creation: u32,
}

impl Port {
  /// Creates a port from its components.
  ///
  /// # Errors
  ///
  /// Returns [`BadArgument`] if `node` is not a valid node name.
  pub fn new(node: &str, id: u32, creation: u32) -> Result<Self, BadArgument> {
    Ok(Self::from_parts(Atom::node(node)?, id, creation))
  }

  /// Creates a port from an already-validated node atom.
  #[inline]
  pub(crate) fn from_parts(node: Atom, id: u32, creation: u32) -> Self {
    Self {
      blob: Arc::new(PortBody {
        node,
        id: id & PID_ID_MASK,
        creation,
      }),
    }
  }

  /// Returns the name of the node that owns this port.
  #[inline]
  pub fn node(&self) -> Atom {
    self.blob.node
  }

  /// Returns the id component (28 significant bits).
  #[inline]
  pub fn id(&self) -> u32 {
    self.blob.id
  }

  /// Returns the creation component at full width.
  #[inline]
  pub fn creation(&self) -> u32 {
    self.blob.creation
  }
}

impl Debug for Port {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Port {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#Port<{}.{}>", self.node(), self.id())
  }
}

impl PartialOrd for Port {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Port {
  fn cmp(&self, other: &Self) -> Ordering {
    Ord::cmp(&self.blob.node, &other.blob.node)
      .then_with(|| Ord::cmp(&self.blob.id, &other.blob.id))
      .then_with(|| Ord::cmp(&self.blob.creation, &other.blob.creation))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
