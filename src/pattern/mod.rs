//! Pattern matching: variable bindings, structural match, and the textual
//! pattern language.
//!
//! A pattern is an ordinary [`Term`] that may contain [`Var`] leaves.
//! [`Term::matches`] decides whether a pattern covers a concrete term,
//! capturing variables into a [`Binding`]; [`Term::apply`] substitutes a
//! binding back into a pattern; [`parse_pattern`] reads patterns from
//! their textual form.
//!
//! # Examples
//!
//! ```
//! use exterm::core::Atom;
//! use exterm::pattern::Binding;
//! use exterm::term::Term;
//!
//! let pattern = Term::format("{ok, A::int(), B}").unwrap();
//! let subject = Term::tuple(vec![Term::atom("ok"), Term::from(10), Term::from("x")]);
//!
//! let mut binding = Binding::new();
//!
//! assert!(pattern.matches(&subject, &mut binding));
//! assert_eq!(binding.get(Atom::new("A")), Some(&Term::from(10)));
//! assert_eq!(pattern.apply(&binding).unwrap(), subject);
//! ```
//!
//! [`Term`]: crate::term::Term
//! [`Var`]: crate::term::Var
//! [`Term::matches`]: crate::term::Term::matches
//! [`Term::apply`]: crate::term::Term::apply

mod binding;
mod format;
mod matcher;

pub use self::binding::Binding;
pub use self::format::FormatError;
pub use self::format::parse_pattern;
pub use self::matcher::Unbound;
