//! The term model: a tagged variant over the runtime's value universe.
//!
//! Scalars (integers, floats, booleans, atoms) live inline in the variant;
//! composite bodies (strings, binaries, tuples, lists, maps, identifiers,
//! trace tokens) live behind reference-counted payload cells so that
//! cloning a term of any size is cheap and never copies the body.
//!
//! Terms are immutable once constructed. Equality is structural, ordering
//! follows the runtime's canonical term order, and [`Display`] produces
//! the runtime's canonical text forms.
//!
//! [`Display`]: std::fmt::Display

mod binary;
mod fmt;
mod kind;
mod list;
mod map;
mod order;
mod pid;
mod port;
mod reference;
mod string;
mod term;
mod trace;
mod tuple;
mod var;

pub use self::binary::Binary;
pub use self::kind::BadArgument;
pub use self::kind::TermKind;
pub use self::kind::WrongType;
pub use self::list::List;
pub use self::list::ListBuilder;
pub use self::map::Map;
pub use self::pid::Pid;
pub use self::port::Port;
pub use self::reference::Reference;
pub use self::string::EString;
pub use self::term::Term;
pub use self::trace::Trace;
pub use self::tuple::Tuple;
pub use self::var::Var;
