//! The mailbox dispatcher.

use hashbrown::HashMap;
use hashbrown::HashSet;
use parking_lot::Mutex;
use std::fmt::Debug;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::panic;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use std::time::Duration;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;
use tracing::debug;
use tracing::trace;

use crate::consts::CAP_MAILBOX_LINKS;
use crate::consts::CAP_MAILBOX_MONITORS;
use crate::core::Atom;
use crate::mailbox::ControlTag;
use crate::mailbox::Dequeued;
use crate::mailbox::MailboxQueue;
use crate::mailbox::TransportMsg;
use crate::node::Node;
use crate::pattern::Binding;
use crate::term::Pid;
use crate::term::Reference;
use crate::term::Term;

// -----------------------------------------------------------------------------
// Closed Error
// -----------------------------------------------------------------------------

/// Error returned by receive operations on a closed mailbox.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Closed;

impl Display for Closed {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("mailbox is closed")
  }
}

impl std::error::Error for Closed {}

// -----------------------------------------------------------------------------
// Mailbox
// -----------------------------------------------------------------------------

/// A pid-addressed (and optionally name-registered) message endpoint.
///
/// The mailbox sits between the transport and one local consumer. Inbound
/// transport messages go through [`deliver()`], which applies the
/// link/monitor side effects of control messages and enqueues everything
/// the consumer should see. The consumer drains the queue through
/// [`async_receive()`] or [`async_match()`].
///
/// # Lifecycle
///
/// A mailbox is live from construction until [`close()`], which stamps the
/// freed timestamp, cancels any pending receive, broadcasts exit
/// notifications to linked and monitoring pids, and clears the registered
/// name. Receive helpers observe the freed timestamp and stop on a closed
/// mailbox.
///
/// [`deliver()`]: Self::deliver
/// [`async_receive()`]: Self::async_receive
/// [`async_match()`]: Self::async_match
/// [`close()`]: Self::close
pub struct Mailbox {
  pid: Pid,
  node: Arc<dyn Node>,
  queue: MailboxQueue,
  state: Mutex<MailboxState>,
  /// Epoch milliseconds at close; 0 while live.
  freed: AtomicU64,
}

struct MailboxState {
  name: Option<Atom>,
  links: HashSet<Pid>,
  monitors: HashMap<Reference, Pid>,
}

/// What [`Mailbox::dispatch`] decided to do with a message.
enum Deliver {
  Drop,
  Enqueue,
}

impl Mailbox {
  /// Creates a live mailbox owned by `pid` on the given node surface.
  pub fn new(pid: Pid, node: Arc<dyn Node>) -> Self {
    Self {
      pid,
      node,
      queue: MailboxQueue::new(),
      state: Mutex::new(MailboxState {
        name: None,
        links: HashSet::with_capacity(CAP_MAILBOX_LINKS),
        monitors: HashMap::with_capacity(CAP_MAILBOX_MONITORS),
      }),
      freed: AtomicU64::new(0),
    }
  }

  /// Returns this mailbox's pid.
  #[inline]
  pub const fn self_pid(&self) -> &Pid {
    &self.pid
  }

  /// Returns the registered name, if any.
  #[inline]
  pub fn name(&self) -> Option<Atom> {
    self.state.lock().name
  }

  /// Sets or clears the registered name.
  pub(crate) fn set_name(&self, name: Option<Atom>) {
    self.state.lock().name = name;
  }

  /// Returns the close timestamp in epoch milliseconds; 0 while live.
  #[inline]
  pub fn time_freed(&self) -> u64 {
    self.freed.load(Ordering::Acquire)
  }

  /// Returns `true` once the mailbox has been closed.
  #[inline]
  pub fn is_closed(&self) -> bool {
    self.time_freed() != 0
  }

  /// Returns the underlying queue.
  #[inline]
  pub const fn queue(&self) -> &MailboxQueue {
    &self.queue
  }

  /// Returns a snapshot of the linked pids.
  pub fn links(&self) -> Vec<Pid> {
    self.state.lock().links.iter().cloned().collect()
  }

  /// Returns a snapshot of the monitor table.
  pub fn monitors(&self) -> Vec<(Reference, Pid)> {
    self
      .state
      .lock()
      .monitors
      .iter()
      .map(|(eref, pid)| (eref.clone(), pid.clone()))
      .collect()
  }

  // ---------------------------------------------------------------------------
  // Delivery
  // ---------------------------------------------------------------------------

  /// Delivers one inbound transport message.
  ///
  /// Control messages update the link/monitor state; some are consumed by
  /// the mailbox itself, the rest are enqueued for the consumer:
  ///
  /// | Tag | Action |
  /// |-----|--------|
  /// | LINK | insert sender into links; drop |
  /// | UNLINK | remove sender from links; drop |
  /// | MONITOR_P | insert (ref, sender) into monitors; drop |
  /// | DEMONITOR_P | remove by ref; drop |
  /// | MONITOR_P_EXIT | remove by ref; enqueue |
  /// | EXIT / EXIT2 (and traced forms) | remove sender from links; enqueue |
  /// | anything else | enqueue |
  ///
  /// A panic during dispatch never loses the message: it is enqueued with
  /// its error flag set instead.
  pub fn deliver(&self, mut msg: TransportMsg) {
    match panic::catch_unwind(AssertUnwindSafe(|| self.dispatch(&msg))) {
      Ok(Deliver::Drop) => {}
      Ok(Deliver::Enqueue) => self.queue.push(msg),
      Err(_) => {
        debug!(target: "exterm", mbox = %self.pid, %msg, "dispatch panicked");

        msg.set_error_flag();
        self.queue.push(msg);
      }
    }
  }

  fn dispatch(&self, msg: &TransportMsg) -> Deliver {
    let mut state: _ = self.state.lock();

    match msg.kind() {
      ControlTag::Link => {
        if let Some(from) = msg.sender_pid() {
          state.links.insert(from.clone());
          trace!(target: "exterm", mbox = %self.pid, from = %from, "linked");
        }

        Deliver::Drop
      }
      ControlTag::Unlink => {
        if let Some(from) = msg.sender_pid() {
          state.links.remove(from);
          trace!(target: "exterm", mbox = %self.pid, from = %from, "unlinked");
        }

        Deliver::Drop
      }
      ControlTag::MonitorP => {
        if let (Some(eref), Some(from)) = (msg.get_ref(), msg.sender_pid()) {
          state.monitors.insert(eref.clone(), from.clone());
          trace!(target: "exterm", mbox = %self.pid, from = %from, eref = %eref, "monitored");
        }

        Deliver::Drop
      }
      ControlTag::DemonitorP => {
        if let Some(eref) = msg.get_ref() {
          state.monitors.remove(eref);
          trace!(target: "exterm", mbox = %self.pid, eref = %eref, "demonitored");
        }

        Deliver::Drop
      }
      ControlTag::MonitorPExit => {
        if let Some(eref) = msg.get_ref() {
          state.monitors.remove(eref);
        }

        trace!(target: "exterm", mbox = %self.pid, "monitor exit");

        Deliver::Enqueue
      }
      kind if kind.is_exit() => {
        if let Some(from) = msg.sender_pid() {
          state.links.remove(from);
        }

        trace!(target: "exterm", mbox = %self.pid, "exit signal");

        Deliver::Enqueue
      }
      _ => Deliver::Enqueue,
    }
  }

  // ---------------------------------------------------------------------------
  // Close
  // ---------------------------------------------------------------------------

  /// Closes the mailbox with the given exit reason.
  ///
  /// Stamps the freed timestamp, resets the queue (cancelling any pending
  /// receive and dropping queued messages), optionally deregisters via
  /// the node surface, then broadcasts one EXIT per linked pid and one
  /// MONITOR_P_EXIT per monitor, each carrying `reason`. Broadcast
  /// failures are swallowed per destination. Links, monitors, and the
  /// registered name are cleared.
  pub fn close(&self, reason: &Term, deregister: bool) {
    self.freed.store(now_millis(), Ordering::Release);
    self.queue.reset();

    if deregister {
      self.node.close_mailbox(self);
    }

    self.break_links(reason);
    self.state.lock().name = None;

    trace!(target: "exterm", mbox = %self.pid, %reason, "closed");
  }

  /// Broadcasts exit notifications to every linked and monitoring pid.
  fn break_links(&self, reason: &Term) {
    let (links, monitors): (Vec<Pid>, Vec<(Reference, Pid)>) = {
      let mut state: _ = self.state.lock();

      (
        state.links.drain().collect(),
        state.monitors.drain().collect(),
      )
    };

    for to in links {
      if let Err(error) = self.node.send_exit(&self.pid, &to, reason) {
        debug!(target: "exterm", mbox = %self.pid, to = %to, %error, "exit broadcast failed");
      }
    }

    for (eref, to) in monitors {
      if let Err(error) = self.node.send_monitor_exit(&self.pid, &to, &eref, reason) {
        debug!(target: "exterm", mbox = %self.pid, to = %to, %error, "monitor broadcast failed");
      }
    }
  }

  // ---------------------------------------------------------------------------
  // Receive
  // ---------------------------------------------------------------------------

  /// Receives messages asynchronously.
  ///
  /// The handler runs with `Some(msg)` per delivery and `None` when the
  /// per-arm `timeout` elapses, returning whether to re-arm (bounded by
  /// `repeat`; negative means unlimited).
  ///
  /// # Errors
  ///
  /// Returns [`Closed`] when the mailbox was closed by the time a handler
  /// invocation was due; the handler is not invoked for that event.
  pub async fn async_receive<F>(
    &self,
    mut handler: F,
    timeout: Option<Duration>,
    repeat: i64,
  ) -> Result<(), Closed>
  where
    F: FnMut(&Mailbox, Option<TransportMsg>) -> bool,
  {
    let mut closed: bool = false;

    self
      .queue
      .async_dequeue(
        |event| {
          if self.is_closed() {
            closed = true;
            return false;
          }

          match event {
            Dequeued::Message(msg) => handler(self, Some(msg)),
            Dequeued::Timeout => handler(self, None),
            Dequeued::Cancelled => false,
          }
        },
        timeout,
        repeat,
      )
      .await;

    if closed {
      Err(Closed)
    } else {
      Ok(())
    }
  }

  /// Receives messages matching `pattern`.
  ///
  /// Each delivered message's payload is matched against the pattern with
  /// a fresh binding; `on_match` runs on success and returns whether to
  /// keep receiving, while non-matching messages are dropped and the
  /// receive stays armed. An elapsed timeout runs `on_timeout` and ends
  /// the receive.
  ///
  /// # Errors
  ///
  /// Returns [`Closed`] when the mailbox was closed by the time a handler
  /// invocation was due.
  pub async fn async_match<M, T>(
    &self,
    pattern: Term,
    mut on_match: M,
    mut on_timeout: T,
    timeout: Option<Duration>,
    repeat: i64,
  ) -> Result<(), Closed>
  where
    M: FnMut(&Mailbox, TransportMsg, Binding) -> bool,
    T: FnMut(&Mailbox),
  {
    let mut closed: bool = false;

    self
      .queue
      .async_dequeue(
        |event| {
          if self.is_closed() {
            closed = true;
            return false;
          }

          match event {
            Dequeued::Message(msg) => {
              let mut binding: Binding = Binding::new();

              if pattern.matches(msg.payload(), &mut binding) {
                on_match(self, msg, binding)
              } else {
                trace!(target: "exterm", mbox = %self.pid, %msg, "no pattern match");
                true
              }
            }
            Dequeued::Timeout => {
              on_timeout(self);
              false
            }
            Dequeued::Cancelled => false,
          }
        },
        timeout,
        repeat,
      )
      .await;

    if closed {
      Err(Closed)
    } else {
      Ok(())
    }
  }
}

impl Debug for Mailbox {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    Display::fmt(self, f)
  }
}

impl Display for Mailbox {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    write!(f, "#Mbox{{pid={}", self.pid)?;

    if let Some(name) = self.name() {
      write!(f, ", name={name}")?;
    }

    f.write_str("}")
  }
}

fn now_millis() -> u64 {
  SystemTime::now()
    .duration_since(UNIX_EPOCH)
    .map(|elapsed| elapsed.as_millis() as u64)
    .unwrap_or(1)
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
