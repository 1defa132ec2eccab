//! Key-ordered maps.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::slice::Iter;
use triomphe::Arc;

use crate::term::Term;

/// An ordered mapping from term to term behind a shared payload cell.
///
/// Entries are kept sorted by canonical term order with unique keys;
/// construction from unsorted input sorts on insert and collapses
/// duplicate keys to the last-supplied value.
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct Map {
  body: Arc<Vec<(Term, Term)>>,
}

impl Map {
  /// Returns the empty map.
  #[inline]
  pub fn new() -> Self {
    Self {
      body: Arc::new(Vec::new()),
    }
  }

  /// Creates a map from key-value pairs.
  ///
  /// Pairs need not arrive sorted; duplicate keys collapse to the
  /// last-supplied value.
  pub fn from_pairs(pairs: Vec<(Term, Term)>) -> Self {
    let mut pairs: Vec<(Term, Term)> = pairs;

    // Stable sort keeps duplicate keys in supply order, so keeping the
    // last duplicate implements last-wins.
    pairs.sort_by(|lhs, rhs| Ord::cmp(&lhs.0, &rhs.0));

    let mut dedup: Vec<(Term, Term)> = Vec::with_capacity(pairs.len());

    for pair in pairs {
      match dedup.last_mut() {
        Some(last) if last.0 == pair.0 => *last = pair,
        _ => dedup.push(pair),
      }
    }

    Self {
      body: Arc::new(dedup),
    }
  }

  /// Returns the number of entries.
  #[inline]
  pub fn len(&self) -> usize {
    self.body.len()
  }

  /// Returns `true` if the map has no entries.
  #[inline]
  pub fn is_empty(&self) -> bool {
    self.body.is_empty()
  }

  /// Returns the value stored under `key`.
  pub fn get(&self, key: &Term) -> Option<&Term> {
    self
      .body
      .binary_search_by(|entry| Ord::cmp(&entry.0, key))
      .ok()
      .map(|index| &self.body[index].1)
  }

  /// Returns `true` if `key` is present.
  #[inline]
  pub fn contains_key(&self, key: &Term) -> bool {
    self.get(key).is_some()
  }

  /// Returns an iterator over the entries in key order.
  #[inline]
  pub fn iter(&self) -> Iter<'_, (Term, Term)> {
    self.body.iter()
  }
}

impl Debug for Map {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Map {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("#{")?;

    for (index, (key, value)) in self.body.iter().enumerate() {
      if index > 0 {
        f.write_str(", ")?;
      }

      write!(f, "{key} => {value}")?;
    }

    f.write_str("}")
  }
}

impl Default for Map {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}

impl PartialOrd for Map {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Map {
  /// Keywise comparison: key sequences compare element-wise, a strict
  /// key prefix orders before its extension, and identical key sequences
  /// fall back to pairwise value comparison.
  fn cmp(&self, other: &Self) -> Ordering {
    for (lhs, rhs) in self.body.iter().zip(other.body.iter()) {
      match Ord::cmp(&lhs.0, &rhs.0) {
        Ordering::Equal => {}
        order => return order,
      }
    }

    Ord::cmp(&self.len(), &other.len()).then_with(|| {
      for (lhs, rhs) in self.body.iter().zip(other.body.iter()) {
        match Ord::cmp(&lhs.1, &rhs.1) {
          Ordering::Equal => {}
          order => return order,
        }
      }

      Ordering::Equal
    })
  }
}

impl FromIterator<(Term, Term)> for Map {
  fn from_iter<I>(iter: I) -> Self
  where
    I: IntoIterator<Item = (Term, Term)>,
  {
    Self::from_pairs(iter.into_iter().collect())
  }
}

impl<'a> IntoIterator for &'a Map {
  type Item = &'a (Term, Term);
  type IntoIter = Iter<'a, (Term, Term)>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
