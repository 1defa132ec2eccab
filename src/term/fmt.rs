//! Canonical text forms.

use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::term::Term;

impl Display for Term {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Undefined => f.write_str("#undefined"),
      Self::Long(value) => Display::fmt(value, f),
      // Debug formatting of f64 is the shortest decimal form that parses
      // back to the same bits, with a forced decimal point.
      Self::Double(value) => write!(f, "{value:?}"),
      Self::Bool(value) => Display::fmt(value, f),
      Self::Atom(value) => Display::fmt(value, f),
      Self::Str(value) => Display::fmt(value, f),
      Self::Binary(value) => Display::fmt(value, f),
      Self::Pid(value) => Display::fmt(value, f),
      Self::Port(value) => Display::fmt(value, f),
      Self::Ref(value) => Display::fmt(value, f),
      Self::Tuple(value) => Display::fmt(value, f),
      Self::List(value) => Display::fmt(value, f),
      Self::Map(value) => Display::fmt(value, f),
      Self::Trace(value) => Display::fmt(value, f),
      Self::Var(value) => Display::fmt(value, f),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
