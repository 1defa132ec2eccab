//! Canonical term ordering.
//!
//! Terms of different kinds order by rank:
//!
//! ```text
//! number < atom < reference < port < pid < tuple < map < nil < string
//!        < list < binary < var
//! ```
//!
//! with the refinements the rest of the model requires: `Undefined` sorts
//! before everything, booleans rank with atoms (comparing as their text
//! atoms), trace tokens slot in directly after tuples, and the empty list
//! has its own `nil` rank distinct from non-empty lists.
//!
//! Within a kind the order is the natural one: numeric by value (integers
//! promote to float for mixed comparisons, and an exact tie orders the
//! float first so the order stays antisymmetric), lexicographic for byte
//! data, element-wise for tuples, size-then-element for lists, keywise for
//! maps.

use std::cmp::Ordering;

use crate::core::Atom;
use crate::term::Term;

impl PartialOrd for Term {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Term {
  fn cmp(&self, other: &Self) -> Ordering {
    match (self, other) {
      // Numbers: compare by value across the int/float divide.
      (Self::Long(lhs), Self::Long(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Double(lhs), Self::Double(rhs)) => f64::total_cmp(lhs, rhs),
      (Self::Long(lhs), Self::Double(rhs)) => {
        f64::total_cmp(&(*lhs as f64), rhs).then(Ordering::Greater)
      }
      (Self::Double(lhs), Self::Long(rhs)) => {
        f64::total_cmp(lhs, &(*rhs as f64)).then(Ordering::Less)
      }
      // Booleans rank with atoms, comparing as their text atoms; the bool
      // orders first on an exact tie.
      (Self::Bool(lhs), Self::Bool(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Bool(lhs), Self::Atom(rhs)) => {
        Ord::cmp(&bool_atom(*lhs), rhs).then(Ordering::Less)
      }
      (Self::Atom(lhs), Self::Bool(rhs)) => {
        Ord::cmp(lhs, &bool_atom(*rhs)).then(Ordering::Greater)
      }
      (Self::Atom(lhs), Self::Atom(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Ref(lhs), Self::Ref(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Port(lhs), Self::Port(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Pid(lhs), Self::Pid(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Tuple(lhs), Self::Tuple(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Trace(lhs), Self::Trace(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Map(lhs), Self::Map(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Str(lhs), Self::Str(rhs)) => Ord::cmp(lhs, rhs),
      (Self::List(lhs), Self::List(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Binary(lhs), Self::Binary(rhs)) => Ord::cmp(lhs, rhs),
      (Self::Var(lhs), Self::Var(rhs)) => Ord::cmp(lhs, rhs),
      (lhs, rhs) => Ord::cmp(&rank(lhs), &rank(rhs)),
    }
  }
}

/// Returns the boolean's text atom.
fn bool_atom(value: bool) -> Atom {
  if value {
    Atom::TRUE
  } else {
    Atom::FALSE
  }
}

/// Returns the canonical cross-kind rank.
fn rank(term: &Term) -> u8 {
  match term {
    Term::Undefined => 0,
    Term::Long(_) | Term::Double(_) => 1,
    Term::Bool(_) | Term::Atom(_) => 2,
    Term::Ref(_) => 3,
    Term::Port(_) => 4,
    Term::Pid(_) => 5,
    Term::Tuple(_) => 6,
    Term::Trace(_) => 7,
    Term::Map(_) => 8,
    Term::List(list) if list.is_nil() => 9,
    Term::Str(_) => 10,
    Term::List(_) => 11,
    Term::Binary(_) => 12,
    Term::Var(_) => 13,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::cmp::Ordering;

  use crate::core::Atom;
  use crate::term::Pid;
  use crate::term::Term;
  use crate::term::Var;

  #[test]
  fn test_kind_ranks() {
    let pid: Term = Term::from(Pid::new("a@h", 1, 2, 3).unwrap());
    let nil: Term = Term::nil();

    let ordered: Vec<Term> = vec![
      Term::from(1),
      Term::atom("zzz"),
      pid,
      Term::tuple(vec![Term::from(1)]),
      nil,
      Term::from("abc"),
      Term::list(vec![Term::from(1)]),
      Term::binary(*b"abc"),
      Term::from(Var::new(Atom::new("A"))),
    ];

    for window in ordered.windows(2) {
      assert_eq!(Ord::cmp(&window[0], &window[1]), Ordering::Less);
    }
  }

  #[test]
  fn test_numeric_promotion() {
    assert!(Term::from(1) < Term::from(1.5));
    assert!(Term::from(2.5) < Term::from(3));
    assert!(Term::from(10) < Term::atom("a"));
  }

  #[test]
  fn test_numeric_tie_orders_double_first() {
    let long: Term = Term::from(1);
    let double: Term = Term::from(1.0);

    assert_eq!(Ord::cmp(&double, &long), Ordering::Less);
    assert_eq!(Ord::cmp(&long, &double), Ordering::Greater);
  }

  #[test]
  fn test_equal_implies_cmp_zero() {
    let terms: Vec<Term> = vec![
      Term::default(),
      Term::from(7),
      Term::from(2.5),
      Term::atom("ok"),
      Term::tuple(vec![Term::from(1), Term::atom("x")]),
      Term::list(vec![Term::from(1)]),
    ];

    for term in &terms {
      assert_eq!(Ord::cmp(term, &term.clone()), Ordering::Equal);
    }
  }

  #[test]
  fn test_undefined_sorts_first() {
    assert!(Term::default() < Term::from(i64::MIN));
  }

  #[test]
  fn test_bool_ranks_with_atoms() {
    assert!(Term::from(false) < Term::from(true));
    assert!(Term::from(true) < Term::atom("z"));
    assert!(Term::atom("a") < Term::from(true));
    assert_ne!(
      Ord::cmp(&Term::from(true), &Term::atom("true")),
      Ordering::Equal,
    );
  }
}
