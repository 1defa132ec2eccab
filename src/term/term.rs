//! The tagged term variant.

use crate::core::Atom;
use crate::term::Binary;
use crate::term::EString;
use crate::term::List;
use crate::term::Map;
use crate::term::Pid;
use crate::term::Port;
use crate::term::Reference;
use crate::term::TermKind;
use crate::term::Trace;
use crate::term::Tuple;
use crate::term::Var;
use crate::term::WrongType;

// -----------------------------------------------------------------------------
// Term
// -----------------------------------------------------------------------------

/// A value in the runtime's term universe.
///
/// Scalar kinds own their payload inline; composite kinds hold a handle to
/// a reference-counted payload cell, so cloning any term is cheap and
/// sharing is structural.
///
/// The default-constructed term is [`Undefined`]: it equals only another
/// default-constructed term, reports `initialized() == false`, and cannot
/// be encoded or matched.
///
/// # Examples
///
/// ```
/// use exterm::term::Term;
///
/// let term = Term::tuple(vec![Term::atom("ok"), Term::from(10)]);
///
/// assert_eq!(term.to_string(), "{ok,10}");
/// assert_eq!(term.to_tuple().unwrap().len(), 2);
/// ```
///
/// [`Undefined`]: Term::Undefined
#[derive(Clone, Debug, Default)]
pub enum Term {
  /// The default-constructed, uninitialized term.
  #[default]
  Undefined,
  /// A 64-bit signed integer.
  Long(i64),
  /// An IEEE-754 double-precision float.
  Double(f64),
  /// A boolean.
  Bool(bool),
  /// An interned atom.
  Atom(Atom),
  /// A text string.
  Str(EString),
  /// A byte vector.
  Binary(Binary),
  /// A process identifier.
  Pid(Pid),
  /// A port identifier.
  Port(Port),
  /// A unique reference.
  Ref(Reference),
  /// A fixed-arity tuple.
  Tuple(Tuple),
  /// A proper or improper list.
  List(List),
  /// A key-ordered map.
  Map(Map),
  /// A trace token.
  Trace(Trace),
  /// A pattern variable.
  Var(Var),
}

impl Term {
  // ---------------------------------------------------------------------------
  // Construction
  // ---------------------------------------------------------------------------

  /// Creates an atom term, interning `name`.
  #[inline]
  pub fn atom(name: &str) -> Self {
    Self::Atom(Atom::new(name))
  }

  /// Creates a string term.
  #[inline]
  pub fn string(data: impl Into<String>) -> Self {
    Self::Str(EString::new(data))
  }

  /// Creates a binary term.
  #[inline]
  pub fn binary(data: impl Into<Vec<u8>>) -> Self {
    Self::Binary(Binary::new(data))
  }

  /// Creates a tuple term from its elements.
  #[inline]
  pub fn tuple(items: Vec<Term>) -> Self {
    Self::Tuple(Tuple::new(items))
  }

  /// Creates a proper list term from its elements.
  #[inline]
  pub fn list(items: Vec<Term>) -> Self {
    Self::List(List::new(items))
  }

  /// Creates the empty list term.
  #[inline]
  pub fn nil() -> Self {
    Self::List(List::nil())
  }

  // ---------------------------------------------------------------------------
  // Inspection
  // ---------------------------------------------------------------------------

  /// Returns the variant tag.
  pub const fn kind(&self) -> TermKind {
    match self {
      Self::Undefined => TermKind::Undefined,
      Self::Long(_) => TermKind::Long,
      Self::Double(_) => TermKind::Double,
      Self::Bool(_) => TermKind::Bool,
      Self::Atom(_) => TermKind::Atom,
      Self::Str(_) => TermKind::String,
      Self::Binary(_) => TermKind::Binary,
      Self::Pid(_) => TermKind::Pid,
      Self::Port(_) => TermKind::Port,
      Self::Ref(_) => TermKind::Ref,
      Self::Tuple(_) => TermKind::Tuple,
      Self::List(_) => TermKind::List,
      Self::Map(_) => TermKind::Map,
      Self::Trace(_) => TermKind::Trace,
      Self::Var(_) => TermKind::Var,
    }
  }

  /// Returns `false` for the default-constructed term.
  ///
  /// Composite terms are always complete by construction, so this is the
  /// only uninitialized state a term can be observed in.
  #[inline]
  pub const fn initialized(&self) -> bool {
    !matches!(self, Self::Undefined)
  }

  /// Returns `true` if the term is an integer.
  #[inline]
  pub const fn is_long(&self) -> bool {
    matches!(self, Self::Long(_))
  }

  /// Returns `true` if the term is a float.
  #[inline]
  pub const fn is_double(&self) -> bool {
    matches!(self, Self::Double(_))
  }

  /// Returns `true` if the term is a boolean.
  #[inline]
  pub const fn is_bool(&self) -> bool {
    matches!(self, Self::Bool(_))
  }

  /// Returns `true` if the term is an atom.
  #[inline]
  pub const fn is_atom(&self) -> bool {
    matches!(self, Self::Atom(_))
  }

  /// Returns `true` if the term is a string.
  #[inline]
  pub const fn is_str(&self) -> bool {
    matches!(self, Self::Str(_))
  }

  /// Returns `true` if the term is a binary.
  #[inline]
  pub const fn is_binary(&self) -> bool {
    matches!(self, Self::Binary(_))
  }

  /// Returns `true` if the term is a pid.
  #[inline]
  pub const fn is_pid(&self) -> bool {
    matches!(self, Self::Pid(_))
  }

  /// Returns `true` if the term is a port.
  #[inline]
  pub const fn is_port(&self) -> bool {
    matches!(self, Self::Port(_))
  }

  /// Returns `true` if the term is a reference.
  #[inline]
  pub const fn is_ref(&self) -> bool {
    matches!(self, Self::Ref(_))
  }

  /// Returns `true` if the term is a tuple.
  #[inline]
  pub const fn is_tuple(&self) -> bool {
    matches!(self, Self::Tuple(_))
  }

  /// Returns `true` if the term is a list.
  #[inline]
  pub const fn is_list(&self) -> bool {
    matches!(self, Self::List(_))
  }

  /// Returns `true` if the term is the empty list.
  #[inline]
  pub fn is_nil(&self) -> bool {
    matches!(self, Self::List(list) if list.is_nil())
  }

  /// Returns `true` if the term is a map.
  #[inline]
  pub const fn is_map(&self) -> bool {
    matches!(self, Self::Map(_))
  }

  /// Returns `true` if the term is a trace token.
  #[inline]
  pub const fn is_trace(&self) -> bool {
    matches!(self, Self::Trace(_))
  }

  /// Returns `true` if the term is a pattern variable.
  #[inline]
  pub const fn is_var(&self) -> bool {
    matches!(self, Self::Var(_))
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  /// Returns the integer payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_long(&self) -> Result<i64, WrongType> {
    match self {
      Self::Long(value) => Ok(*value),
      _ => Err(WrongType::new(TermKind::Long, self.kind())),
    }
  }

  /// Returns the float payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_double(&self) -> Result<f64, WrongType> {
    match self {
      Self::Double(value) => Ok(*value),
      _ => Err(WrongType::new(TermKind::Double, self.kind())),
    }
  }

  /// Returns the boolean payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_bool(&self) -> Result<bool, WrongType> {
    match self {
      Self::Bool(value) => Ok(*value),
      _ => Err(WrongType::new(TermKind::Bool, self.kind())),
    }
  }

  /// Returns the atom payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_atom(&self) -> Result<Atom, WrongType> {
    match self {
      Self::Atom(value) => Ok(*value),
      _ => Err(WrongType::new(TermKind::Atom, self.kind())),
    }
  }

  /// Returns the string payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_str(&self) -> Result<&EString, WrongType> {
    match self {
      Self::Str(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::String, self.kind())),
    }
  }

  /// Returns the binary payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_binary(&self) -> Result<&Binary, WrongType> {
    match self {
      Self::Binary(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Binary, self.kind())),
    }
  }

  /// Returns the pid payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_pid(&self) -> Result<&Pid, WrongType> {
    match self {
      Self::Pid(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Pid, self.kind())),
    }
  }

  /// Returns the port payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_port(&self) -> Result<&Port, WrongType> {
    match self {
      Self::Port(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Port, self.kind())),
    }
  }

  /// Returns the reference payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_ref(&self) -> Result<&Reference, WrongType> {
    match self {
      Self::Ref(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Ref, self.kind())),
    }
  }

  /// Returns the tuple payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_tuple(&self) -> Result<&Tuple, WrongType> {
    match self {
      Self::Tuple(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Tuple, self.kind())),
    }
  }

  /// Returns the list payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_list(&self) -> Result<&List, WrongType> {
    match self {
      Self::List(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::List, self.kind())),
    }
  }

  /// Returns the map payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_map(&self) -> Result<&Map, WrongType> {
    match self {
      Self::Map(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Map, self.kind())),
    }
  }

  /// Returns the trace-token payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_trace(&self) -> Result<&Trace, WrongType> {
    match self {
      Self::Trace(value) => Ok(value),
      _ => Err(WrongType::new(TermKind::Trace, self.kind())),
    }
  }

  /// Returns the variable payload.
  ///
  /// # Errors
  ///
  /// Returns [`WrongType`] for any other tag.
  #[inline]
  pub fn to_var(&self) -> Result<Var, WrongType> {
    match self {
      Self::Var(value) => Ok(*value),
      _ => Err(WrongType::new(TermKind::Var, self.kind())),
    }
  }
}

// -----------------------------------------------------------------------------
// Equality
// -----------------------------------------------------------------------------

impl PartialEq for Term {
  /// Structural equality; tags must match.
  ///
  /// Floats compare bitwise, so `NaN == NaN` and `0.0 != -0.0`: equality
  /// on scalars is payload-bit equality, not IEEE comparison.
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Self::Undefined, Self::Undefined) => true,
      (Self::Long(lhs), Self::Long(rhs)) => lhs == rhs,
      (Self::Double(lhs), Self::Double(rhs)) => lhs.to_bits() == rhs.to_bits(),
      (Self::Bool(lhs), Self::Bool(rhs)) => lhs == rhs,
      (Self::Atom(lhs), Self::Atom(rhs)) => lhs == rhs,
      (Self::Str(lhs), Self::Str(rhs)) => lhs == rhs,
      (Self::Binary(lhs), Self::Binary(rhs)) => lhs == rhs,
      (Self::Pid(lhs), Self::Pid(rhs)) => lhs == rhs,
      (Self::Port(lhs), Self::Port(rhs)) => lhs == rhs,
      (Self::Ref(lhs), Self::Ref(rhs)) => lhs == rhs,
      (Self::Tuple(lhs), Self::Tuple(rhs)) => lhs == rhs,
      (Self::List(lhs), Self::List(rhs)) => lhs == rhs,
      (Self::Map(lhs), Self::Map(rhs)) => lhs == rhs,
      (Self::Trace(lhs), Self::Trace(rhs)) => lhs == rhs,
      (Self::Var(lhs), Self::Var(rhs)) => lhs == rhs,
      _ => false,
    }
  }
}

impl Eq for Term {}

// -----------------------------------------------------------------------------
// Extensions - From
// -----------------------------------------------------------------------------

impl From<i64> for Term {
  #[inline]
  fn from(other: i64) -> Self {
    Self::Long(other)
  }
}

impl From<i32> for Term {
  #[inline]
  fn from(other: i32) -> Self {
    Self::Long(i64::from(other))
  }
}

impl From<u32> for Term {
  #[inline]
  fn from(other: u32) -> Self {
    Self::Long(i64::from(other))
  }
}

impl From<f64> for Term {
  #[inline]
  fn from(other: f64) -> Self {
    Self::Double(other)
  }
}

impl From<bool> for Term {
  #[inline]
  fn from(other: bool) -> Self {
    Self::Bool(other)
  }
}

impl From<&str> for Term {
  #[inline]
  fn from(other: &str) -> Self {
    Self::Str(EString::new(other))
  }
}

impl From<String> for Term {
  #[inline]
  fn from(other: String) -> Self {
    Self::Str(EString::new(other))
  }
}

impl From<Atom> for Term {
  #[inline]
  fn from(other: Atom) -> Self {
    Self::Atom(other)
  }
}

impl From<EString> for Term {
  #[inline]
  fn from(other: EString) -> Self {
    Self::Str(other)
  }
}

impl From<Binary> for Term {
  #[inline]
  fn from(other: Binary) -> Self {
    Self::Binary(other)
  }
}

impl From<Pid> for Term {
  #[inline]
  fn from(other: Pid) -> Self {
    Self::Pid(other)
  }
}

impl From<Port> for Term {
  #[inline]
  fn from(other: Port) -> Self {
    Self::Port(other)
  }
}

impl From<Reference> for Term {
  #[inline]
  fn from(other: Reference) -> Self {
    Self::Ref(other)
  }
}

impl From<Tuple> for Term {
  #[inline]
  fn from(other: Tuple) -> Self {
    Self::Tuple(other)
  }
}

impl From<List> for Term {
  #[inline]
  fn from(other: List) -> Self {
    Self::List(other)
  }
}

impl From<Map> for Term {
  #[inline]
  fn from(other: Map) -> Self {
    Self::Map(other)
  }
}

impl From<Trace> for Term {
  #[inline]
  fn from(other: Trace) -> Self {
    Self::Trace(other)
  }
}

impl From<Var> for Term {
  #[inline]
  fn from(other: Var) -> Self {
    Self::Var(other)
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
