//! Transport message envelopes.

use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;

use crate::core::Atom;
use crate::term::Pid;
use crate::term::Reference;
use crate::term::Term;
use crate::term::Trace;

// -----------------------------------------------------------------------------
// Control Tag
// -----------------------------------------------------------------------------

/// Control message tags of the distribution protocol.
///
/// The discriminants are the wire values of the control-message header
/// tuples exchanged between nodes.
#[derive(Clone, Copy, Debug, Hash, PartialEq, Eq)]
#[repr(u8)]
pub enum ControlTag {
  /// Establish a link between two pids.
  Link = 1,
  /// A plain pid-addressed message.
  Send = 2,
  /// Exit signal propagated over a link.
  Exit = 3,
  /// Remove a link between two pids.
  Unlink = 4,
  /// Node-level link.
  NodeLink = 5,
  /// A message addressed to a registered name.
  RegSend = 6,
  /// Group-leader transfer.
  GroupLeader = 7,
  /// Explicitly requested exit signal.
  Exit2 = 8,
  /// [`Send`] carrying a trace token.
  ///
  /// [`Send`]: Self::Send
  SendTt = 12,
  /// [`Exit`] carrying a trace token.
  ///
  /// [`Exit`]: Self::Exit
  ExitTt = 13,
  /// [`RegSend`] carrying a trace token.
  ///
  /// [`RegSend`]: Self::RegSend
  RegSendTt = 16,
  /// [`Exit2`] carrying a trace token.
  ///
  /// [`Exit2`]: Self::Exit2
  Exit2Tt = 18,
  /// Establish a monitor keyed by a reference.
  MonitorP = 19,
  /// Remove a monitor by its reference.
  DemonitorP = 20,
  /// Notification that a monitored pid terminated.
  MonitorPExit = 21,
}

impl ControlTag {
  /// Returns the wire value.
  #[inline]
  pub const fn code(&self) -> u8 {
    *self as u8
  }

  /// Maps a wire value back to its tag.
  pub const fn from_code(code: u8) -> Option<Self> {
    match code {
      1 => Some(Self::Link),
      2 => Some(Self::Send),
      3 => Some(Self::Exit),
      4 => Some(Self::Unlink),
      5 => Some(Self::NodeLink),
      6 => Some(Self::RegSend),
      7 => Some(Self::GroupLeader),
      8 => Some(Self::Exit2),
      12 => Some(Self::SendTt),
      13 => Some(Self::ExitTt),
      16 => Some(Self::RegSendTt),
      18 => Some(Self::Exit2Tt),
      19 => Some(Self::MonitorP),
      20 => Some(Self::DemonitorP),
      21 => Some(Self::MonitorPExit),
      _ => None,
    }
  }

  /// Returns `true` for every exit form, traced or not.
  #[inline]
  pub const fn is_exit(&self) -> bool {
    matches!(self, Self::Exit | Self::ExitTt | Self::Exit2 | Self::Exit2Tt)
  }
}

// -----------------------------------------------------------------------------
// Address
// -----------------------------------------------------------------------------

/// A message endpoint: a pid or a registered name.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Address {
  /// Addressed by process identifier.
  Pid(Pid),
  /// Addressed by registered name.
  Name(Atom),
}

impl Address {
  /// Returns the pid form, if this address is one.
  #[inline]
  pub const fn pid(&self) -> Option<&Pid> {
    match self {
      Self::Pid(pid) => Some(pid),
      Self::Name(_) => None,
    }
  }

  /// Returns the registered name, if this address is one.
  #[inline]
  pub const fn name(&self) -> Option<Atom> {
    match self {
      Self::Pid(_) => None,
      Self::Name(name) => Some(*name),
    }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    match self {
      Self::Pid(pid) => Display::fmt(pid, f),
      Self::Name(name) => Display::fmt(name, f),
    }
  }
}

impl From<Pid> for Address {
  #[inline]
  fn from(other: Pid) -> Self {
    Self::Pid(other)
  }
}

impl From<Atom> for Address {
  #[inline]
  fn from(other: Atom) -> Self {
    Self::Name(other)
  }
}

// -----------------------------------------------------------------------------
// Transport Message
// -----------------------------------------------------------------------------

/// The envelope a transport hands to the dispatcher: one control tag, the
/// addresses the tag involves, an optional reference and trace token, and
/// up to one payload term.
///
/// The envelope owns its payload. Accessors are total: a field that the
/// tag does not carry reads back as `None` (or the default term for
/// [`payload()`]).
///
/// [`payload()`]: Self::payload
#[derive(Clone, Debug)]
pub struct TransportMsg {
  kind: ControlTag,
  sender: Option<Address>,
  recipient: Option<Address>,
  eref: Option<Reference>,
  token: Option<Trace>,
  payload: Term,
  error: bool,
}

impl TransportMsg {
  fn new(kind: ControlTag) -> Self {
    Self {
      kind,
      sender: None,
      recipient: None,
      eref: None,
      token: None,
      payload: Term::default(),
      error: false,
    }
  }

  // ---------------------------------------------------------------------------
  // Constructors
  // ---------------------------------------------------------------------------

  /// A LINK request from `from` to `to`.
  pub fn link(from: Pid, to: Pid) -> Self {
    let mut msg: Self = Self::new(ControlTag::Link);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Pid(to));
    msg
  }

  /// An UNLINK request from `from` to `to`.
  pub fn unlink(from: Pid, to: Pid) -> Self {
    let mut msg: Self = Self::new(ControlTag::Unlink);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Pid(to));
    msg
  }

  /// A MONITOR_P request keyed by `eref`.
  ///
  /// The recipient may be a pid or a registered name.
  pub fn monitor(from: Pid, to: impl Into<Address>, eref: Reference) -> Self {
    let mut msg: Self = Self::new(ControlTag::MonitorP);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(to.into());
    msg.eref = Some(eref);
    msg
  }

  /// A DEMONITOR_P request keyed by `eref`.
  pub fn demonitor(from: Pid, to: impl Into<Address>, eref: Reference) -> Self {
    let mut msg: Self = Self::new(ControlTag::DemonitorP);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(to.into());
    msg.eref = Some(eref);
    msg
  }

  /// A MONITOR_P_EXIT notification carrying the exit `reason`.
  pub fn monitor_exit(from: Pid, to: Pid, eref: Reference, reason: Term) -> Self {
    let mut msg: Self = Self::new(ControlTag::MonitorPExit);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Pid(to));
    msg.eref = Some(eref);
    msg.payload = reason;
    msg
  }

  /// A link-propagated EXIT signal carrying `reason`.
  pub fn exit(from: Pid, to: Pid, reason: Term) -> Self {
    let mut msg: Self = Self::new(ControlTag::Exit);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Pid(to));
    msg.payload = reason;
    msg
  }

  /// An explicitly requested EXIT2 signal carrying `reason`.
  pub fn exit2(from: Pid, to: Pid, reason: Term) -> Self {
    let mut msg: Self = Self::new(ControlTag::Exit2);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Pid(to));
    msg.payload = reason;
    msg
  }

  /// A plain message to a pid.
  pub fn send(to: Pid, payload: Term) -> Self {
    let mut msg: Self = Self::new(ControlTag::Send);

    msg.recipient = Some(Address::Pid(to));
    msg.payload = payload;
    msg
  }

  /// A message to a registered name.
  pub fn reg_send(from: Pid, to: Atom, payload: Term) -> Self {
    let mut msg: Self = Self::new(ControlTag::RegSend);

    msg.sender = Some(Address::Pid(from));
    msg.recipient = Some(Address::Name(to));
    msg.payload = payload;
    msg
  }

  /// Attaches a trace token, switching the tag to its traced form where
  /// one exists.
  pub fn with_token(mut self, token: Trace) -> Self {
    self.kind = match self.kind {
      ControlTag::Send => ControlTag::SendTt,
      ControlTag::Exit => ControlTag::ExitTt,
      ControlTag::Exit2 => ControlTag::Exit2Tt,
      ControlTag::RegSend => ControlTag::RegSendTt,
      kind => kind,
    };

    self.token = Some(token);
    self
  }

  // ---------------------------------------------------------------------------
  // Accessors
  // ---------------------------------------------------------------------------

  /// Returns the control tag.
  #[inline]
  pub const fn kind(&self) -> ControlTag {
    self.kind
  }

  /// Returns the sender address, when the tag carries one.
  #[inline]
  pub const fn sender(&self) -> Option<&Address> {
    self.sender.as_ref()
  }

  /// Returns the sender pid, when the sender is pid-addressed.
  #[inline]
  pub fn sender_pid(&self) -> Option<&Pid> {
    self.sender.as_ref().and_then(Address::pid)
  }

  /// Returns the recipient address, when the tag carries one.
  #[inline]
  pub const fn recipient(&self) -> Option<&Address> {
    self.recipient.as_ref()
  }

  /// Returns the recipient pid, when the recipient is pid-addressed.
  #[inline]
  pub fn recipient_pid(&self) -> Option<&Pid> {
    self.recipient.as_ref().and_then(Address::pid)
  }

  /// Returns the recipient registered name, when name-addressed.
  #[inline]
  pub fn recipient_name(&self) -> Option<Atom> {
    self.recipient.as_ref().and_then(Address::name)
  }

  /// Returns the reference, when the tag carries one.
  #[inline]
  pub const fn get_ref(&self) -> Option<&Reference> {
    self.eref.as_ref()
  }

  /// Returns the trace token, when the tag carries one.
  #[inline]
  pub const fn token(&self) -> Option<&Trace> {
    self.token.as_ref()
  }

  /// Returns the payload term; the default term when the tag carries no
  /// payload.
  #[inline]
  pub const fn payload(&self) -> &Term {
    &self.payload
  }

  /// Returns `true` when dispatch failed while handling this message.
  #[inline]
  pub const fn is_error(&self) -> bool {
    self.error
  }

  /// Marks the message as having failed dispatch.
  #[inline]
  pub fn set_error_flag(&mut self) {
    self.error = true;
  }
}

impl Display for TransportMsg {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#TransportMsg{{{:?}", self.kind)?;

    if let Some(sender) = self.sender.as_ref() {
      write!(f, ", from={sender}")?;
    }

    if let Some(recipient) = self.recipient.as_ref() {
      write!(f, ", to={recipient}")?;
    }

    if self.payload.initialized() {
      write!(f, ", msg={}", self.payload)?;
    }

    f.write_str("}")
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
  use crate::core::Atom;
  use crate::mailbox::ControlTag;
  use crate::mailbox::TransportMsg;
  use crate::term::Pid;
  use crate::term::Reference;
  use crate::term::Term;
  use crate::term::Trace;

  fn pid(id: u32) -> Pid {
    Pid::new("a@h", id, 0, 1).unwrap()
  }

  #[test]
  fn test_tag_codes_round_trip() {
    for tag in [
      ControlTag::Link,
      ControlTag::Send,
      ControlTag::Exit,
      ControlTag::Unlink,
      ControlTag::RegSend,
      ControlTag::Exit2,
      ControlTag::SendTt,
      ControlTag::ExitTt,
      ControlTag::RegSendTt,
      ControlTag::Exit2Tt,
      ControlTag::MonitorP,
      ControlTag::DemonitorP,
      ControlTag::MonitorPExit,
    ] {
      assert_eq!(ControlTag::from_code(tag.code()), Some(tag));
    }

    assert_eq!(ControlTag::from_code(99), None);
  }

  #[test]
  fn test_accessors_are_total() {
    let msg: TransportMsg = TransportMsg::link(pid(1), pid(2));

    assert_eq!(msg.kind(), ControlTag::Link);
    assert_eq!(msg.sender_pid(), Some(&pid(1)));
    assert_eq!(msg.recipient_pid(), Some(&pid(2)));
    assert!(msg.get_ref().is_none());
    assert!(msg.token().is_none());
    assert!(!msg.payload().initialized());
    assert!(!msg.is_error());
  }

  #[test]
  fn test_monitor_carries_ref() {
    let eref: Reference = Reference::new("a@h", &[1, 2, 3], 0).unwrap();
    let msg: TransportMsg = TransportMsg::monitor(pid(1), Atom::new("server"), eref.clone());

    assert_eq!(msg.get_ref(), Some(&eref));
    assert_eq!(msg.recipient_name(), Some(Atom::new("server")));
    assert!(msg.recipient_pid().is_none());
  }

  #[test]
  fn test_token_switches_tag() {
    let token: Trace = Trace::new(1, 0, 0, pid(9), 0);

    let msg: TransportMsg = TransportMsg::send(pid(1), Term::from(5)).with_token(token.clone());
    assert_eq!(msg.kind(), ControlTag::SendTt);
    assert_eq!(msg.token(), Some(&token));

    let msg: TransportMsg =
      TransportMsg::exit(pid(1), pid(2), Term::atom("normal")).with_token(token);
    assert_eq!(msg.kind(), ControlTag::ExitTt);
  }

  #[test]
  fn test_error_flag() {
    let mut msg: TransportMsg = TransportMsg::send(pid(1), Term::from(5));

    msg.set_error_flag();
    assert!(msg.is_error());
  }
}
