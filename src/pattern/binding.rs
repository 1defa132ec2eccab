//! Variable binding tables.

use hashbrown::HashMap;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Atom;
use crate::term::Term;

/// A mapping from variable name to bound term.
///
/// Bindings accumulate across successive matches against the same table;
/// [`merge()`] combines tables left-biased, so existing bindings always
/// win over incoming ones.
///
/// [`merge()`]: Self::merge
#[derive(Clone, Default, PartialEq)]
pub struct Binding {
  vars: HashMap<Atom, Term>,
}

impl Binding {
  /// Creates an empty binding table.
  #[inline]
  pub fn new() -> Self {
    Self {
      vars: HashMap::new(),
    }
  }

  /// Binds `name` to `term`, replacing any previous binding.
  #[inline]
  pub fn bind(&mut self, name: Atom, term: Term) {
    self.vars.insert(name, term);
  }

  /// Returns the term bound to `name`.
  #[inline]
  pub fn get(&self, name: Atom) -> Option<&Term> {
    self.vars.get(&name)
  }

  /// Returns the number of bound variables.
  #[inline]
  pub fn count(&self) -> usize {
    self.vars.len()
  }

  /// Returns `true` when no variables are bound.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.vars.is_empty()
  }

  /// Inserts every binding from `other` whose name is not already bound.
  pub fn merge(&mut self, other: &Binding) {
    for (name, term) in other.vars.iter() {
      self.vars.entry(*name).or_insert_with(|| term.clone());
    }
  }

  /// Removes all bindings.
  #[inline]
  pub fn clear(&mut self) {
    self.vars.clear();
  }
}

impl Debug for Binding {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    let mut entries: Vec<(&Atom, &Term)> = self.vars.iter().collect();

    entries.sort_by_key(|entry| *entry.0);

    f.debug_map().entries(entries).finish()
  }
}

impl FromIterator<(Atom, Term)> for Binding {
  fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = (Atom, Term)>,
  {
    Self {
      vars: HashMap::from_iter(iter),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
