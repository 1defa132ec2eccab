//! Structural pattern matching and substitution.

use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Atom;
use crate::pattern::Binding;
use crate::term::List;
use crate::term::Map;
use crate::term::Term;
use crate::term::TermKind;
use crate::term::Tuple;
use crate::term::Var;

// -----------------------------------------------------------------------------
// Unbound Error
// -----------------------------------------------------------------------------

/// Error returned by [`Term::apply`] for a variable with no binding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Unbound {
  name: Atom,
}

impl Unbound {
  #[inline]
  pub(crate) const fn new(name: Atom) -> Self {
    Self { name }
  }

  /// Returns the unbound variable's name.
  #[inline]
  pub const fn name(&self) -> Atom {
    self.name
  }
}

impl Display for Unbound {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "unbound variable: {}", self.name.as_str())
  }
}

impl Error for Unbound {}

// -----------------------------------------------------------------------------
// Term - Match & Apply
// -----------------------------------------------------------------------------

impl Term {
  /// Matches this pattern term against a concrete `subject`, extending
  /// `binding` with captured variables.
  ///
  /// On failure `binding` is left exactly as it was: the match runs
  /// against a scratch table that is only committed on success.
  ///
  /// # Semantics
  ///
  /// - A variable that is already bound matches only a subject equal to
  ///   its bound value; an unbound variable captures the subject. The
  ///   anonymous `_` matches anything and binds nothing.
  /// - A kind hint restricts the variable, with numeric hints admitting
  ///   both integers and floats (and comparing bound values by promoted
  ///   numeric value).
  /// - Composites recurse: tuples need equal arity, lists match head by
  ///   head with a recursive match on the remaining tail, maps use subset
  ///   semantics (every pattern key must be present with a matching
  ///   value).
  /// - Anything else matches by equality.
  pub fn matches(&self, subject: &Term, binding: &mut Binding) -> bool {
    let mut scratch: Binding = binding.clone();

    if match_into(self, subject, &mut scratch) {
      *binding = scratch;
      true
    } else {
      false
    }
  }

  /// Substitutes bound variables in this pattern, yielding a concrete
  /// term.
  ///
  /// # Errors
  ///
  /// Returns [`Unbound`] for any variable (including the anonymous `_`)
  /// with no entry in `binding`.
  pub fn apply(&self, binding: &Binding) -> Result<Term, Unbound> {
    match self {
      Self::Var(var) => match binding.get(var.name()) {
        Some(term) if !var.is_any() => Ok(term.clone()),
        _ => Err(Unbound::new(var.name())),
      },
      Self::Tuple(tuple) => {
        let mut items: Vec<Term> = Vec::with_capacity(tuple.len());

        for item in tuple.iter() {
          items.push(item.apply(binding)?);
        }

        Ok(Self::Tuple(Tuple::new(items)))
      }
      Self::List(list) => {
        let mut builder: _ = List::builder();

        for item in list.iter() {
          builder.push(item.apply(binding)?);
        }

        if let Some(tail) = list.tail_term() {
          builder.tail(tail.apply(binding)?);
        }

        Ok(Self::List(builder.close()))
      }
      Self::Map(map) => {
        let mut pairs: Vec<(Term, Term)> = Vec::with_capacity(map.len());

        for (key, value) in map.iter() {
          pairs.push((key.apply(binding)?, value.apply(binding)?));
        }

        // Substitution can reorder keys; re-sort on the way out.
        Ok(Self::Map(Map::from_pairs(pairs)))
      }
      _ => Ok(self.clone()),
    }
  }
}

// -----------------------------------------------------------------------------
// Matcher
// -----------------------------------------------------------------------------

fn match_into(pattern: &Term, subject: &Term, binding: &mut Binding) -> bool {
  match pattern {
    Term::Var(var) => match_var(var, subject, binding),
    Term::Tuple(pattern) => match subject {
      Term::Tuple(subject) if pattern.len() == subject.len() => pattern
        .iter()
        .zip(subject.iter())
        .all(|(lhs, rhs)| match_into(lhs, rhs, binding)),
      _ => false,
    },
    Term::List(pattern) => match subject {
      Term::List(subject) => match_list(pattern, subject, binding),
      _ => false,
    },
    Term::Map(pattern) => match subject {
      Term::Map(subject) => pattern.iter().all(|(key, value)| {
        subject
          .get(key)
          .is_some_and(|found| match_into(value, found, binding))
      }),
      _ => false,
    },
    _ => pattern == subject,
  }
}

fn match_var(var: &Var, subject: &Term, binding: &mut Binding) -> bool {
  if let Some(hint) = var.hint() {
    if !hint_admits(hint, subject.kind()) {
      return false;
    }
  }

  if var.is_any() {
    return true;
  }

  match binding.get(var.name()) {
    Some(bound) => bound_equals(bound, subject, var.hint()),
    None => {
      binding.bind(var.name(), subject.clone());
      true
    }
  }
}

/// Heads match element-wise; the pattern's tail then matches whatever
/// remains of the subject.
fn match_list(pattern: &List, subject: &List, binding: &mut Binding) -> bool {
  if pattern.len() > subject.len() {
    return false;
  }

  let heads: bool = pattern
    .iter()
    .zip(subject.iter())
    .all(|(lhs, rhs)| match_into(lhs, rhs, binding));

  if !heads {
    return false;
  }

  match pattern.tail_term() {
    Some(tail) => match_into(tail, &rest_of(subject, pattern.len()), binding),
    None => pattern.len() == subject.len() && subject.is_proper(),
  }
}

/// Returns the subject that remains after consuming `consumed` heads.
fn rest_of(list: &List, consumed: usize) -> Term {
  if list.len() > consumed {
    let items: Vec<Term> = list.as_slice()[consumed..].to_vec();

    match list.tail_term() {
      // The source list's tail is known to be a non-list term, so
      // rebuilding the improper suffix cannot fail.
      Some(tail) => match List::improper(items, tail.clone()) {
        Ok(rest) => Term::List(rest),
        Err(_) => Term::nil(),
      },
      None => Term::List(List::new(items)),
    }
  } else {
    match list.tail_term() {
      Some(tail) => tail.clone(),
      None => Term::nil(),
    }
  }
}

fn hint_admits(hint: TermKind, actual: TermKind) -> bool {
  hint == actual || (hint.is_numeric() && actual.is_numeric())
}

/// Compares a bound value with a new subject; a numeric hint compares by
/// promoted value across the int/float divide.
fn bound_equals(bound: &Term, subject: &Term, hint: Option<TermKind>) -> bool {
  if bound == subject {
    return true;
  }

  if hint.is_some_and(|hint| hint.is_numeric()) {
    let lhs: Option<f64> = numeric(bound);
    let rhs: Option<f64> = numeric(subject);

    return matches!((lhs, rhs), (Some(lhs), Some(rhs)) if lhs == rhs);
  }

  false
}

fn numeric(term: &Term) -> Option<f64> {
  match term {
    Term::Long(value) => Some(*value as f64),
    Term::Double(value) => Some(*value),
    _ => None,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Atom;
  use crate::pattern::Binding;
  use crate::term::List;
  use crate::term::Map;
  use crate::term::Term;
  use crate::term::TermKind;
  use crate::term::Var;

  fn var(name: &str) -> Term {
    Term::from(Var::new(Atom::new(name)))
  }

  #[test]
  fn test_exact_match() {
    let mut binding: Binding = Binding::new();

    assert!(Term::from(1).matches(&Term::from(1), &mut binding));
    assert!(!Term::from(1).matches(&Term::from(2), &mut binding));
    assert!(!Term::from(1).matches(&Term::from(1.0), &mut binding));
    assert!(binding.is_empty());
  }

  #[test]
  fn test_var_binds() {
    let mut binding: Binding = Binding::new();

    assert!(var("A").matches(&Term::from(10), &mut binding));
    assert_eq!(binding.get(Atom::new("A")), Some(&Term::from(10)));
  }

  #[test]
  fn test_bound_var_must_agree() {
    let mut binding: Binding = Binding::new();
    binding.bind(Atom::new("A"), Term::from(10));

    assert!(var("A").matches(&Term::from(10), &mut binding));
    assert!(!var("A").matches(&Term::from(11), &mut binding));
  }

  #[test]
  fn test_anonymous_never_binds() {
    let mut binding: Binding = Binding::new();

    assert!(Term::from(Var::any()).matches(&Term::from(1), &mut binding));
    assert!(Term::from(Var::any()).matches(&Term::atom("x"), &mut binding));
    assert!(binding.is_empty());
  }

  #[test]
  fn test_hint_restricts() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::from(Var::with_hint(Atom::new("A"), TermKind::Atom));

    assert!(!pattern.matches(&Term::from(1), &mut binding));
    assert!(pattern.matches(&Term::atom("ok"), &mut binding));
  }

  #[test]
  fn test_numeric_hint_admits_both() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::from(Var::with_hint(Atom::new("N"), TermKind::Long));

    assert!(pattern.matches(&Term::from(10), &mut binding));
    // Already bound to 10; a float of equal value still agrees.
    assert!(pattern.matches(&Term::from(10.0), &mut binding));
    assert!(!pattern.matches(&Term::from(11.0), &mut binding));
  }

  #[test]
  fn test_tuple_arity_and_elements() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::tuple(vec![Term::atom("ok"), var("A")]);

    assert!(pattern.matches(
      &Term::tuple(vec![Term::atom("ok"), Term::from(10)]),
      &mut binding,
    ));
    assert!(!pattern.matches(&Term::tuple(vec![Term::atom("ok")]), &mut binding));
    assert!(!pattern.matches(
      &Term::tuple(vec![Term::atom("error"), Term::from(10)]),
      &mut binding,
    ));
    assert_eq!(binding.get(Atom::new("A")), Some(&Term::from(10)));
  }

  #[test]
  fn test_list_head_tail() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::List(List::improper(vec![var("H")], var("T")).unwrap());

    let subject: Term = Term::list(vec![Term::from(1), Term::from(2), Term::from(3)]);

    assert!(pattern.matches(&subject, &mut binding));
    assert_eq!(binding.get(Atom::new("H")), Some(&Term::from(1)));
    assert_eq!(
      binding.get(Atom::new("T")),
      Some(&Term::list(vec![Term::from(2), Term::from(3)])),
    );
  }

  #[test]
  fn test_proper_pattern_rejects_longer_subject() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::list(vec![var("A")]);

    assert!(!pattern.matches(
      &Term::list(vec![Term::from(1), Term::from(2)]),
      &mut binding,
    ));
  }

  #[test]
  fn test_map_subset() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::from(Map::from_pairs(vec![(Term::atom("a"), var("A"))]));
    let subject: Term = Term::from(Map::from_pairs(vec![
      (Term::atom("a"), Term::from(1)),
      (Term::atom("b"), Term::from(2)),
    ]));

    assert!(pattern.matches(&subject, &mut binding));
    assert_eq!(binding.get(Atom::new("A")), Some(&Term::from(1)));
  }

  #[test]
  fn test_failure_rolls_back() {
    let mut binding: Binding = Binding::new();

    // A binds to 1 before the mismatch on the second element; the failed
    // match must leave no trace.
    let pattern: Term = Term::tuple(vec![var("A"), Term::atom("x")]);
    let subject: Term = Term::tuple(vec![Term::from(1), Term::atom("y")]);

    assert!(!pattern.matches(&subject, &mut binding));
    assert!(binding.is_empty());
  }

  #[test]
  fn test_apply_unbound() {
    let binding: Binding = Binding::new();

    assert_eq!(
      var("A").apply(&binding).unwrap_err().name(),
      Atom::new("A"),
    );
  }

  #[test]
  fn test_match_then_apply_recovers_subject() {
    let mut binding: Binding = Binding::new();
    let pattern: Term = Term::tuple(vec![Term::atom("ok"), var("A"), var("B")]);
    let subject: Term = Term::tuple(vec![Term::atom("ok"), Term::from(10), Term::from("x")]);

    assert!(pattern.matches(&subject, &mut binding));
    assert_eq!(pattern.apply(&binding).unwrap(), subject);
  }
}
