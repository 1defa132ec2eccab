//! Pattern variables.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Atom;
use crate::term::TermKind;

/// A pattern variable: a name atom and an optional kind hint.
///
/// Variables only appear inside pattern terms. The anonymous variable `_`
/// matches anything and never binds; a kind hint restricts what the
/// variable may match or be bound to (with numeric hints admitting both
/// integer and float, see the pattern module).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Var {
  name: Atom,
  hint: Option<TermKind>,
}

impl Var {
  /// Creates a named variable without a kind hint.
  #[inline]
  pub fn new(name: Atom) -> Self {
    Self { name, hint: None }
  }

  /// Creates a named variable with a kind hint.
  #[inline]
  pub fn with_hint(name: Atom, hint: TermKind) -> Self {
    Self {
      name,
      hint: Some(hint),
    }
  }

  /// Returns the anonymous variable `_`.
  #[inline]
  pub fn any() -> Self {
    Self::new(Atom::new("_"))
  }

  /// Returns the variable name.
  #[inline]
  pub const fn name(&self) -> Atom {
    self.name
  }

  /// Returns the kind hint, if any.
  #[inline]
  pub const fn hint(&self) -> Option<TermKind> {
    self.hint
  }

  /// Returns `true` for the anonymous variable.
  #[inline]
  pub fn is_any(&self) -> bool {
    self.name == "_"
  }
}

impl Debug for Var {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Var {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str(self.name.as_str())?;

    if let Some(hint) = self.hint {
      write!(f, "::{}()", hint.name())?;
    }

    Ok(())
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
