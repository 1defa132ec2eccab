//! The surfaces offered to the connection layer: the [`Node`] broadcast
//! trait and the name [`Registry`].
//!
//! The TCP/handshake machinery lives outside this crate; what it needs
//! from us is the ability to route exit notifications during mailbox
//! close ([`Node`]) and to resolve registered names to mailboxes
//! ([`Registry`]).

use hashbrown::HashMap;
use parking_lot::RwLock;
use std::error::Error;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::sync::Arc;

use crate::consts::CAP_REGISTERED_NAMES;
use crate::core::Atom;
use crate::mailbox::Mailbox;
use crate::term::Pid;
use crate::term::Reference;
use crate::term::Term;

// -----------------------------------------------------------------------------
// Send Error
// -----------------------------------------------------------------------------

/// Error returned by the node surface when a notification cannot be
/// routed.
///
/// Mailbox close broadcasts swallow these per destination; they exist so
/// implementations can report unreachable peers to their own logs.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SendError {
  reason: &'static str,
}

impl SendError {
  /// Creates a send error with the given description.
  #[inline]
  pub const fn new(reason: &'static str) -> Self {
    Self { reason }
  }

  /// Returns the failure description.
  #[inline]
  pub const fn reason(&self) -> &'static str {
    self.reason
  }
}

impl Display for SendError {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str(self.reason)
  }
}

impl Error for SendError {}

// -----------------------------------------------------------------------------
// Node
// -----------------------------------------------------------------------------

/// What a mailbox needs from its owning node.
///
/// Implemented by the connection layer; a closing mailbox uses it to
/// broadcast EXIT and MONITOR_P_EXIT notifications and to deregister
/// itself.
pub trait Node: Send + Sync {
  /// Routes an EXIT notification carrying `reason` from `from` to `to`.
  fn send_exit(&self, from: &Pid, to: &Pid, reason: &Term) -> Result<(), SendError>;

  /// Routes a MONITOR_P_EXIT notification keyed by `eref`.
  fn send_monitor_exit(
    &self,
    from: &Pid,
    to: &Pid,
    eref: &Reference,
    reason: &Term,
  ) -> Result<(), SendError>;

  /// Removes the mailbox from the node's registries.
  fn close_mailbox(&self, mailbox: &Mailbox);
}

// -----------------------------------------------------------------------------
// Registry
// -----------------------------------------------------------------------------

/// Error returned by [`Registry::register`] for a name already in use.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct NameTaken;

impl Display for NameTaken {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("name already registered")
  }
}

impl Error for NameTaken {}

/// Node-wide mapping from registered names to mailboxes.
pub struct Registry {
  names: RwLock<HashMap<Atom, Arc<Mailbox>>>,
}

impl Registry {
  /// Creates an empty registry.
  pub fn new() -> Self {
    Self {
      names: RwLock::new(HashMap::with_capacity(CAP_REGISTERED_NAMES)),
    }
  }

  /// Registers `mailbox` under `name` and stamps the name on the mailbox.
  ///
  /// # Errors
  ///
  /// Returns [`NameTaken`] when the name is already registered; the
  /// existing registration is untouched.
  pub fn register(&self, name: Atom, mailbox: Arc<Mailbox>) -> Result<(), NameTaken> {
    let mut names: _ = self.names.write();

    match names.entry(name) {
      hashbrown::hash_map::Entry::Occupied(_) => Err(NameTaken),
      hashbrown::hash_map::Entry::Vacant(entry) => {
        mailbox.set_name(Some(name));
        entry.insert(mailbox);
        Ok(())
      }
    }
  }

  /// Removes the registration for `name`, clearing the mailbox's name.
  pub fn unregister(&self, name: Atom) -> Option<Arc<Mailbox>> {
    let mailbox: Option<Arc<Mailbox>> = self.names.write().remove(&name);

    if let Some(mailbox) = mailbox.as_ref() {
      mailbox.set_name(None);
    }

    mailbox
  }

  /// Returns the mailbox registered under `name`.
  pub fn lookup(&self, name: Atom) -> Option<Arc<Mailbox>> {
    self.names.read().get(&name).cloned()
  }

  /// Returns the number of registered names.
  pub fn len(&self) -> usize {
    self.names.read().len()
  }

  /// Returns `true` when no names are registered.
  pub fn is_empty(&self) -> bool {
    self.names.read().is_empty()
  }
}

impl Debug for Registry {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.debug_struct("Registry")
      .field("size", &self.len())
      .finish()
  }
}

impl Default for Registry {
  fn default() -> Self {
    Self::new()
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use std::sync::Arc;

  use crate::core::Atom;
  use crate::mailbox::Mailbox;
  use crate::node::Node;
  use crate::node::Registry;
  use crate::node::SendError;
  use crate::term::Pid;
  use crate::term::Reference;
  use crate::term::Term;

  struct NullNode;

  impl Node for NullNode {
    fn send_exit(&self, _from: &Pid, _to: &Pid, _reason: &Term) -> Result<(), SendError> {
      Ok(())
    }

    fn send_monitor_exit(
      &self,
      _from: &Pid,
      _to: &Pid,
      _eref: &Reference,
      _reason: &Term,
    ) -> Result<(), SendError> {
      Ok(())
    }

    fn close_mailbox(&self, _mailbox: &Mailbox) {}
  }

  fn mailbox(id: u32) -> Arc<Mailbox> {
    Arc::new(Mailbox::new(
      Pid::new("a@h", id, 0, 1).unwrap(),
      Arc::new(NullNode),
    ))
  }

  #[test]
  fn test_register_lookup_unregister() {
    let registry: Registry = Registry::new();
    let mbox: Arc<Mailbox> = mailbox(1);
    let name: Atom = Atom::new("server");

    registry.register(name, Arc::clone(&mbox)).unwrap();

    assert_eq!(mbox.name(), Some(name));
    assert!(registry.lookup(name).is_some());

    registry.unregister(name);

    assert_eq!(mbox.name(), None);
    assert!(registry.lookup(name).is_none());
  }

  #[test]
  fn test_duplicate_name_rejected() {
    let registry: Registry = Registry::new();
    let name: Atom = Atom::new("taken");

    registry.register(name, mailbox(1)).unwrap();

    assert!(registry.register(name, mailbox(2)).is_err());
    assert_eq!(registry.len(), 1);
  }
}
