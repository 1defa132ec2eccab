//! The mailbox layer: transport envelopes, the per-mailbox queue, and the
//! dispatcher that keeps link/monitor state.
//!
//! Inbound flow: the transport calls [`Mailbox::deliver`] with a
//! [`TransportMsg`]; control messages mutate mailbox state, everything the
//! consumer should see lands in the [`MailboxQueue`]; the consumer drains
//! it with [`Mailbox::async_receive`] / [`Mailbox::async_match`].

#[allow(clippy::module_inception)]
mod mailbox;
mod message;
mod queue;

pub use self::mailbox::Closed;
pub use self::mailbox::Mailbox;
pub use self::message::Address;
pub use self::message::ControlTag;
pub use self::message::TransportMsg;
pub use self::queue::Dequeued;
pub use self::queue::MailboxQueue;
