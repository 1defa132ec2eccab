//! Mailbox behavior end to end: delivery ordering, receive timeouts,
//! pattern receive, close broadcast, and registry interplay.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

use exterm::core::Atom;
use exterm::mailbox::ControlTag;
use exterm::mailbox::Mailbox;
use exterm::mailbox::TransportMsg;
use exterm::node::Node;
use exterm::node::Registry;
use exterm::node::SendError;
use exterm::term::Pid;
use exterm::term::Reference;
use exterm::term::Term;

// -----------------------------------------------------------------------------
// Recording Node
// -----------------------------------------------------------------------------

/// Node surface that records every broadcast it is asked to route.
#[derive(Default)]
struct RecordingNode {
  exits: Mutex<Vec<(Pid, Term)>>,
  monitor_exits: Mutex<Vec<(Pid, Reference, Term)>>,
  registry: Registry,
  fail_sends: bool,
}

impl RecordingNode {
  fn failing() -> Self {
    Self {
      fail_sends: true,
      ..Self::default()
    }
  }
}

impl Node for RecordingNode {
  fn send_exit(&self, _from: &Pid, to: &Pid, reason: &Term) -> Result<(), SendError> {
    if self.fail_sends {
      return Err(SendError::new("peer unreachable"));
    }

    self.exits.lock().push((to.clone(), reason.clone()));
    Ok(())
  }

  fn send_monitor_exit(
    &self,
    _from: &Pid,
    to: &Pid,
    eref: &Reference,
    reason: &Term,
  ) -> Result<(), SendError> {
    if self.fail_sends {
      return Err(SendError::new("peer unreachable"));
    }

    self
      .monitor_exits
      .lock()
      .push((to.clone(), eref.clone(), reason.clone()));
    Ok(())
  }

  fn close_mailbox(&self, mailbox: &Mailbox) {
    if let Some(name) = mailbox.name() {
      self.registry.unregister(name);
    }
  }
}

fn init_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_max_level(tracing::Level::TRACE)
    .with_test_writer()
    .try_init();
}

fn pid(id: u32) -> Pid {
  Pid::new("test@host", id, 0, 1).unwrap()
}

fn eref(id: u32) -> Reference {
  Reference::new("test@host", &[id, 0, 1], 1).unwrap()
}

fn mailbox(node: &Arc<RecordingNode>) -> Arc<Mailbox> {
  let node: Arc<dyn Node> = node.clone();

  Arc::new(Mailbox::new(pid(1), node))
}

// -----------------------------------------------------------------------------
// Delivery & Receive
// -----------------------------------------------------------------------------

#[tokio::test]
async fn receive_preserves_enqueue_order() {
  init_tracing();

  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  for value in 0..10 {
    mbox.deliver(TransportMsg::send(pid(1), Term::from(value)));
  }

  let mut seen: Vec<i64> = Vec::new();

  mbox
    .async_receive(
      |_, msg| {
        seen.push(msg.unwrap().payload().to_long().unwrap());
        true
      },
      None,
      10,
    )
    .await
    .unwrap();

  assert_eq!(seen, (0..10).collect::<Vec<i64>>());
}

#[tokio::test(start_paused = true)]
async fn receive_observes_timeout() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  let mut timed_out: bool = false;

  mbox
    .async_receive(
      |_, msg| {
        timed_out = msg.is_none();
        false
      },
      Some(Duration::from_millis(100)),
      1,
    )
    .await
    .unwrap();

  assert!(timed_out);
}

#[tokio::test]
async fn closed_mailbox_stops_receive() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  mbox.close(&Term::atom("normal"), false);
  mbox.deliver(TransportMsg::send(pid(1), Term::from(1)));

  let mut invoked: bool = false;

  let result: _ = mbox
    .async_receive(
      |_, _| {
        invoked = true;
        true
      },
      Some(Duration::from_millis(10)),
      -1,
    )
    .await;

  // The wrapper observes the freed timestamp and never runs the handler.
  assert_eq!(result, Err(exterm::mailbox::Closed));
  assert!(!invoked);
}

#[tokio::test]
async fn pattern_receive_skips_non_matching() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  mbox.deliver(TransportMsg::send(
    pid(1),
    Term::tuple(vec![Term::atom("error"), Term::from(0)]),
  ));
  mbox.deliver(TransportMsg::send(
    pid(1),
    Term::tuple(vec![Term::atom("ok"), Term::from(42)]),
  ));

  let pattern: Term = Term::format("{ok, A::int()}").unwrap();
  let captured: Mutex<Option<i64>> = Mutex::new(None);

  mbox
    .async_match(
      pattern,
      |_, _, binding| {
        *captured.lock() = binding
          .get(Atom::new("A"))
          .and_then(|term| term.to_long().ok());
        false
      },
      |_| panic!("unexpected timeout"),
      Some(Duration::from_secs(1)),
      -1,
    )
    .await
    .unwrap();

  assert_eq!(*captured.lock(), Some(42));
}

#[tokio::test(start_paused = true)]
async fn pattern_receive_times_out() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  let mut timed_out: bool = false;

  mbox
    .async_match(
      Term::format("{ok, _}").unwrap(),
      |_, _, _| true,
      |_| timed_out = true,
      Some(Duration::from_millis(50)),
      -1,
    )
    .await
    .unwrap();

  assert!(timed_out);
}

// -----------------------------------------------------------------------------
// Close Broadcast
// -----------------------------------------------------------------------------

#[tokio::test]
async fn close_broadcasts_exactly_once_per_peer() {
  init_tracing();

  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  mbox.deliver(TransportMsg::link(pid(2), pid(1)));
  mbox.deliver(TransportMsg::link(pid(3), pid(1)));
  mbox.deliver(TransportMsg::monitor(pid(4), pid(1), eref(1)));
  mbox.deliver(TransportMsg::monitor(pid(5), pid(1), eref(2)));

  let reason: Term = Term::atom("shutdown");

  mbox.close(&reason, false);

  let mut exits: Vec<(Pid, Term)> = node.exits.lock().clone();
  exits.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));

  assert_eq!(exits, vec![(pid(2), reason.clone()), (pid(3), reason.clone())]);

  let mut monitor_exits: Vec<(Pid, Reference, Term)> = node.monitor_exits.lock().clone();
  monitor_exits.sort_by(|lhs, rhs| lhs.0.cmp(&rhs.0));

  assert_eq!(
    monitor_exits,
    vec![
      (pid(4), eref(1), reason.clone()),
      (pid(5), eref(2), reason.clone()),
    ],
  );

  // State is cleared; a second close broadcasts to nobody.
  node.exits.lock().clear();
  mbox.close(&reason, false);
  assert!(node.exits.lock().is_empty());

  assert!(mbox.is_closed());
  assert!(mbox.links().is_empty());
  assert!(mbox.monitors().is_empty());
}

#[tokio::test]
async fn close_swallows_broadcast_failures() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::failing());
  let mbox: Arc<Mailbox> = mailbox(&node);

  mbox.deliver(TransportMsg::link(pid(2), pid(1)));
  mbox.deliver(TransportMsg::monitor(pid(3), pid(1), eref(1)));

  // Every send fails; close must still complete and clear state.
  mbox.close(&Term::atom("normal"), false);

  assert!(mbox.is_closed());
  assert!(mbox.links().is_empty());
  assert!(mbox.monitors().is_empty());
}

#[tokio::test]
async fn close_cancels_pending_receive() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  let pending: _ = {
    let mbox: Arc<Mailbox> = Arc::clone(&mbox);

    tokio::spawn(async move {
      let mut invocations: usize = 0;

      let result: _ = mbox
        .async_receive(
          |_, _| {
            invocations += 1;
            true
          },
          None,
          -1,
        )
        .await;

      assert_eq!(result, Err(exterm::mailbox::Closed));

      invocations
    })
  };

  tokio::task::yield_now().await;
  mbox.close(&Term::atom("normal"), false);

  // The pending receive ends without an extra handler invocation: the
  // cancellation wakes it, the wrapper sees the freed timestamp.
  assert_eq!(pending.await.unwrap(), 0);
}

#[tokio::test]
async fn close_deregisters_name() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);
  let name: Atom = Atom::new("registered_worker");

  node.registry.register(name, Arc::clone(&mbox)).unwrap();

  assert_eq!(mbox.name(), Some(name));
  assert!(node.registry.lookup(name).is_some());

  mbox.close(&Term::atom("normal"), true);

  assert!(node.registry.lookup(name).is_none());
  assert_eq!(mbox.name(), None);
}

#[tokio::test]
async fn queued_messages_drop_on_close() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  mbox.deliver(TransportMsg::send(pid(1), Term::from(1)));
  mbox.deliver(TransportMsg::send(pid(1), Term::from(2)));

  assert_eq!(mbox.queue().len(), 2);

  mbox.close(&Term::atom("normal"), false);

  assert!(mbox.queue().is_empty());
}

// -----------------------------------------------------------------------------
// Control Tags
// -----------------------------------------------------------------------------

#[tokio::test]
async fn exit_variants_unlink_and_enqueue() {
  for build in [
    TransportMsg::exit as fn(Pid, Pid, Term) -> TransportMsg,
    TransportMsg::exit2 as fn(Pid, Pid, Term) -> TransportMsg,
  ] {
    let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
    let mbox: Arc<Mailbox> = mailbox(&node);

    mbox.deliver(TransportMsg::link(pid(2), pid(1)));

    let msg: TransportMsg = build(pid(2), pid(1), Term::atom("boom"));

    mbox.deliver(msg);

    assert!(mbox.links().is_empty());
    assert_eq!(mbox.queue().len(), 1);
  }
}

#[tokio::test]
async fn traced_exit_keeps_token() {
  let node: Arc<RecordingNode> = Arc::new(RecordingNode::default());
  let mbox: Arc<Mailbox> = mailbox(&node);

  let token: exterm::term::Trace = exterm::term::Trace::new(1, 0, 7, pid(2), 0);
  let msg: TransportMsg =
    TransportMsg::exit(pid(2), pid(1), Term::atom("boom")).with_token(token.clone());

  assert_eq!(msg.kind(), ControlTag::ExitTt);

  mbox.deliver(msg);

  let mut token_seen: bool = false;

  mbox
    .async_receive(
      |_, msg| {
        token_seen = msg.unwrap().token() == Some(&token);
        false
      },
      None,
      1,
    )
    .await
    .unwrap();

  assert!(token_seen);
}
