//! Trace tokens.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use triomphe::Arc;

use crate::term::Pid;
use crate::term::Term;
use crate::term::Tuple;
use crate::term::WrongType;

/// A sequential trace token carried alongside traced control messages.
///
/// Trace tokens have no opcode of their own in the external format; they
/// travel as plain 5-tuples and are only interpreted as tokens in the
/// trace-token slot of a transport message ([`from_term()`]).
///
/// [`from_term()`]: Self::from_term
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Trace {
  blob: Arc<TraceBody>,
}

#[derive(PartialEq, Eq)]
struct TraceBody {
  serial: i64,
  prev: i64,
  label: i64,
  from: Pid,
  flags: i64,
}

impl Trace {
  /// Creates a trace token from its components.
  #[inline]
  pub fn new(serial: i64, prev: i64, label: i64, from: Pid, flags: i64) -> Self {
    Self {
      blob: Arc::new(TraceBody {
        serial,
        prev,
        label,
        from,
        flags,
      }),
    }
  }

  /// Returns the serial counter.
  #[inline]
  pub fn serial(&self) -> i64 {
    self.blob.serial
  }

  /// Returns the previous serial counter.
  #[inline]
  pub fn prev(&self) -> i64 {
    self.blob.prev
  }

  /// Returns the trace label.
  #[inline]
  pub fn label(&self) -> i64 {
    self.blob.label
  }

  /// Returns the originating pid.
  #[inline]
  pub fn from(&self) -> &Pid {
    &self.blob.from
  }

  /// Returns the trace flag word.
  #[inline]
  pub fn flags(&self) -> i64 {
    self.blob.flags
  }

  /// Returns the wire representation: a 5-tuple term.
  pub fn to_term(&self) -> Term {
    Term::from(Tuple::new(vec![
      Term::from(self.blob.serial),
      Term::from(self.blob.prev),
      Term::from(self.blob.label),
      Term::from(self.blob.from.clone()),
      Term::from(self.blob.flags),
    ]))
  }

  /// Reads a trace token out of its 5-tuple wire representation.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] if `term` is not a 5-tuple of the expected
  /// field kinds.
  pub fn from_term(term: &Term) -> Result<Self, WrongType> {
    let tuple: &Tuple = term.to_tuple()?;
    let wrong: _ = || WrongType::new(crate::term::TermKind::Trace, term.kind());

    let [serial, prev, label, from, flags] = tuple.as_slice() else {
      return Err(wrong());
    };

    let serial: i64 = serial.to_long().map_err(|_| wrong())?;
    let prev: i64 = prev.to_long().map_err(|_| wrong())?;
    let label: i64 = label.to_long().map_err(|_| wrong())?;
    let from: &Pid = from.to_pid().map_err(|_| wrong())?;
    let flags: i64 = flags.to_long().map_err(|_| wrong())?;

    Ok(Self::new(serial, prev, label, from.clone(), flags))
  }
}

impl Debug for Trace {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Trace {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(
      f,
      "{{{},{},{},{},{}}}",
      self.blob.serial,
      self.blob.prev,
      self.blob.label,
      self.blob.from,
      self.blob.flags,
    )
  }
}

impl PartialOrd for Trace {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Trace {
  fn cmp(&self, other: &Self) -> Ordering {
    Ord::cmp(&self.blob.serial, &other.blob.serial)
      .then_with(|| Ord::cmp(&self.blob.prev, &other.blob.prev))
      .then_with(|| Ord::cmp(&self.blob.label, &other.blob.label))
      .then_with(|| Ord::cmp(&self.blob.from, &other.blob.from))
      .then_with(|| Ord::cmp(&self.blob.flags, &other.blob.flags))
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
