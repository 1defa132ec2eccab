//! The mailbox queue: multi-producer, single-consumer, async dequeue.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::fmt::Formatter;
use std::fmt::Result as FmtResult;
use std::time::Duration;
use tokio::sync::Mutex as AsyncMutex;
use tokio::sync::MutexGuard;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::error::SendError;
use tokio_util::sync::CancellationToken;

use crate::mailbox::TransportMsg;

// -----------------------------------------------------------------------------
// Dequeued
// -----------------------------------------------------------------------------

/// What an [`async_dequeue`] handler is invoked with.
///
/// [`async_dequeue`]: MailboxQueue::async_dequeue
#[derive(Debug)]
pub enum Dequeued {
  /// A message arrived.
  Message(TransportMsg),
  /// The per-arm timeout elapsed before a message arrived.
  Timeout,
  /// The pending dequeue was cancelled by [`reset()`] or mailbox close.
  ///
  /// [`reset()`]: MailboxQueue::reset
  Cancelled,
}

// -----------------------------------------------------------------------------
// Mailbox Queue
// -----------------------------------------------------------------------------

/// FIFO of transport messages with an asynchronous consumer protocol.
///
/// The queue is an unbounded mpsc channel: producers [`push()`] without
/// blocking from any thread, and the receiving half sits behind an async
/// mutex so one consumer at a time runs [`async_dequeue()`]. The consumer
/// delivers messages to a handler in enqueue order, one invocation at a
/// time, racing each arm against an optional timeout and the queue's
/// cancellation token.
///
/// [`push()`]: Self::push
/// [`async_dequeue()`]: Self::async_dequeue
pub struct MailboxQueue {
  send: UnboundedSender<TransportMsg>,
  recv: AsyncMutex<UnboundedReceiver<TransportMsg>>,
  cancel: Mutex<CancellationToken>,
}

impl MailboxQueue {
  /// Creates an empty queue.
  pub fn new() -> Self {
    let channel: (UnboundedSender<TransportMsg>, UnboundedReceiver<TransportMsg>) =
      mpsc::unbounded_channel();

    Self {
      send: channel.0,
      recv: AsyncMutex::new(channel.1),
      cancel: Mutex::new(CancellationToken::new()),
    }
  }

  /// Enqueues a message; never blocks.
  pub fn push(&self, msg: TransportMsg) {
    // The receiving half lives in `self`, so the channel cannot close
    // before the queue itself is dropped.
    let _: Result<(), SendError<TransportMsg>> = self.send.send(msg);
  }

  /// Returns the number of queued messages.
  ///
  /// Reads 0 while a consumer holds the receiving half.
  pub fn len(&self) -> usize {
    self.recv.try_lock().map(|recv| recv.len()).unwrap_or(0)
  }

  /// Returns `true` when no messages are queued.
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Cancels any pending dequeue and drops all queued messages.
  ///
  /// The pending consumer (if any) observes [`Dequeued::Cancelled`]
  /// exactly once and is not re-armed.
  pub fn reset(&self) {
    let old: CancellationToken = {
      let mut slot: _ = self.cancel.lock();
      std::mem::replace(&mut *slot, CancellationToken::new())
    };

    old.cancel();

    // With no consumer active the drain happens here; otherwise the
    // woken consumer drains before delivering the cancellation.
    if let Ok(mut recv) = self.recv.try_lock() {
      while recv.try_recv().is_ok() {}
    }
  }

  /// Registers an n-shot consumer.
  ///
  /// The handler runs once per event and returns whether to re-arm:
  ///
  /// - a message delivers as [`Dequeued::Message`];
  /// - an elapsed `timeout` (measured per arm) delivers as
  ///   [`Dequeued::Timeout`], `None` waits forever;
  /// - cancellation delivers as [`Dequeued::Cancelled`], after which the
  ///   consumer is never re-armed regardless of the handler's return.
  ///
  /// `repeat` bounds the number of handler invocations; negative means
  /// unlimited, and `0` is treated as a single shot. Each invocation runs
  /// to completion before the next delivery. Pending timers are dropped
  /// as soon as the consumer stops or a message wins the race.
  pub async fn async_dequeue<F>(&self, mut handler: F, timeout: Option<Duration>, repeat: i64)
  where
    F: FnMut(Dequeued) -> bool,
  {
    // One consumer at a time.
    let mut recv: MutexGuard<'_, UnboundedReceiver<TransportMsg>> = self.recv.lock().await;

    let token: CancellationToken = self.cancel.lock().clone();
    let mut remaining: i64 = if repeat < 0 { -1 } else { repeat.max(1) };

    loop {
      let event: Dequeued = tokio::select! {
        biased;

        _ = token.cancelled() => Dequeued::Cancelled,
        msg = recv.recv() => match msg {
          Some(msg) => Dequeued::Message(msg),
          None => Dequeued::Cancelled,
        },
        _ = deadline(timeout) => Dequeued::Timeout,
      };

      let cancelled: bool = matches!(event, Dequeued::Cancelled);

      if cancelled {
        // A held receiver keeps `reset()` from draining; drop whatever
        // is still queued before reporting the cancellation.
        while recv.try_recv().is_ok() {}
      }

      let rearm: bool = handler(event);

      if cancelled || !rearm {
        return;
      }

      if remaining > 0 {
        remaining -= 1;

        if remaining == 0 {
          return;
        }
      }
    }
  }
}

impl Debug for MailboxQueue {
  fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
    f.write_str("MailboxQueue(..)")
  }
}

impl Default for MailboxQueue {
  fn default() -> Self {
    Self::new()
  }
}

/// Sleeps for `timeout`, or forever when none is given.
async fn deadline(timeout: Option<Duration>) {
  match timeout {
    Some(timeout) => tokio::time::sleep(timeout).await,
    None => std::future::pending().await,
  }
}

// -----------------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------------
