//! Lists, proper and improper.

use std::cmp::Ordering;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::slice::Iter;
use triomphe::Arc;

use crate::term::BadArgument;
use crate::term::Term;

// -----------------------------------------------------------------------------
// List
// -----------------------------------------------------------------------------

/// A sequence of terms behind a shared payload cell, with an optional
/// non-nil tail.
///
/// A list with no tail is *proper* (nil-terminated). A non-nil tail makes
/// the list *improper*. Improper lists are first-class: they print,
/// compare, and encode. Conversions that require a plain sequence reject
/// them.
///
/// Like [`Tuple`], a `List` is complete from the moment it exists; the
/// grow-then-close discipline lives in [`ListBuilder`].
///
/// [`Tuple`]: crate::term::Tuple
#[derive(Clone, PartialEq, Eq)]
#[repr(transparent)]
pub struct List {
  body: Arc<ListBody>,
}

#[derive(PartialEq, Eq)]
struct ListBody {
  items: Vec<Term>,
  tail: Option<Term>,
}

impl List {
  /// Returns the empty (nil) list.
  #[inline]
  pub fn nil() -> Self {
    Self::new(Vec::new())
  }

  /// Creates a proper list from its elements.
  #[inline]
  pub fn new(items: Vec<Term>) -> Self {
    Self {
      body: Arc::new(ListBody { items, tail: None }),
    }
  }

  /// Creates an improper list with the given tail.
  ///
  /// # Errors
  ///
  /// Returns [`BadArgument`] if `items` is empty (a bare tail is not a
  /// list) or if the tail is itself a list (which would simply be a longer
  /// proper or improper list).
  pub fn improper(items: Vec<Term>, tail: Term) -> Result<Self, BadArgument> {
    if items.is_empty() {
      return Err(BadArgument::new("improper list needs at least one element"));
    }

    if tail.is_list() {
      return Err(BadArgument::new("improper list tail must not be a list"));
    }

    Ok(Self {
      body: Arc::new(ListBody {
        items,
        tail: Some(tail),
      }),
    })
  }

  /// Returns a builder for push-back construction.
  #[inline]
  pub fn builder() -> ListBuilder {
    ListBuilder::new()
  }

  /// Returns the number of elements, excluding any improper tail.
  #[inline]
  pub fn len(&self) -> usize {
    self.body.items.len()
  }

  /// Returns `true` for the empty proper list.
  #[inline]
  pub fn is_nil(&self) -> bool {
    self.body.items.is_empty() && self.body.tail.is_none()
  }

  /// Returns `true` when the list is nil-terminated.
  #[inline]
  pub fn is_proper(&self) -> bool {
    self.body.tail.is_none()
  }

  /// Returns the improper tail, if any.
  #[inline]
  pub fn tail_term(&self) -> Option<&Term> {
    self.body.tail.as_ref()
  }

  /// Returns the element at `index`.
  #[inline]
  pub fn nth(&self, index: usize) -> Option<&Term> {
    self.body.items.get(index)
  }

  /// Returns the elements as a slice, excluding any improper tail.
  #[inline]
  pub fn as_slice(&self) -> &[Term] {
    self.body.items.as_slice()
  }

  /// Returns an iterator over the elements.
  #[inline]
  pub fn iter(&self) -> Iter<'_, Term> {
    self.body.items.iter()
  }

  /// Returns the sublist that follows the element at `index`.
  ///
  /// The returned list shares element payloads with `self` and keeps the
  /// improper tail, if any.
  pub fn tail(&self, index: usize) -> Option<List> {
    if index >= self.len() {
      return None;
    }

    let items: Vec<Term> = self.body.items[index + 1..].to_vec();

    Some(Self {
      body: Arc::new(ListBody {
        items,
        tail: self.body.tail.clone(),
      }),
    })
  }
}

impl Debug for List {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for List {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("[")?;

    for (index, item) in self.body.items.iter().enumerate() {
      if index > 0 {
        f.write_str(",")?;
      }

      Display::fmt(item, f)?;
    }

    if let Some(tail) = self.body.tail.as_ref() {
      write!(f, "|{tail}")?;
    }

    f.write_str("]")
  }
}

impl PartialOrd for List {
  #[inline]
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for List {
  /// Size-first comparison, then element-wise, then by tail.
  fn cmp(&self, other: &Self) -> Ordering {
    Ord::cmp(&self.len(), &other.len())
      .then_with(|| Ord::cmp(&self.body.items, &other.body.items))
      .then_with(|| Ord::cmp(&self.body.tail, &other.body.tail))
  }
}

impl From<Vec<Term>> for List {
  #[inline]
  fn from(other: Vec<Term>) -> Self {
    Self::new(other)
  }
}

impl<'a> IntoIterator for &'a List {
  type Item = &'a Term;
  type IntoIter = Iter<'a, Term>;

  #[inline]
  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

// -----------------------------------------------------------------------------
// List Builder
// -----------------------------------------------------------------------------

/// Push-back construction of a [`List`].
///
/// A builder is not a term: the partially-built sequence cannot be printed,
/// compared, or encoded. [`close()`] produces the finished, immutable list.
///
/// # Examples
///
/// ```
/// use exterm::term::List;
/// use exterm::term::Term;
///
/// let mut builder = List::builder();
/// builder.push(Term::atom("abc"));
/// builder.push(Term::atom("efg"));
///
/// let list: List = builder.close();
/// assert_eq!(list.len(), 2);
/// ```
///
/// [`close()`]: Self::close
#[derive(Debug, Default)]
pub struct ListBuilder {
  items: Vec<Term>,
  tail: Option<Term>,
}

impl ListBuilder {
  /// Creates an empty builder.
  #[inline]
  pub fn new() -> Self {
    Self {
      items: Vec::new(),
      tail: None,
    }
  }

  /// Appends an element.
  #[inline]
  pub fn push(&mut self, term: Term) -> &mut Self {
    self.items.push(term);
    self
  }

  /// Sets a non-nil tail, making the closed list improper.
  #[inline]
  pub fn tail(&mut self, term: Term) -> &mut Self {
    self.tail = Some(term);
    self
  }

  /// Closes the builder, producing the finished list.
  pub fn close(self) -> List {
    List {
      body: Arc::new(ListBody {
        items: self.items,
        tail: self.tail,
      }),
    }
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
