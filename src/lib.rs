//! exterm - external term format codec and mailbox machinery.
//!
//! This crate provides the in-process representation and wire codec for
//! the external term format used between distributed actor-runtime nodes,
//! together with the per-node mailbox machinery that dispatches inbound
//! transport messages to local recipients and keeps link/monitor
//! bookkeeping.
//!
//! # Layers
//!
//! - [`core`](crate::core): process-global atom interning and the
//!   [`Atom`] handle
//! - [`term`](crate::term): the tagged [`Term`] variant, its composite
//!   payloads, canonical ordering, and text forms
//! - [`codec`](crate::codec): decode/encode between terms and the
//!   external binary format, with exact size pre-computation
//! - [`pattern`](crate::pattern): variable bindings, structural matching,
//!   and the textual pattern language
//! - [`mailbox`](crate::mailbox): transport envelopes, the per-mailbox
//!   queue, and the dispatching [`Mailbox`]
//! - [`node`](crate::node): the surfaces the out-of-process connection
//!   layer plugs into
//!
//! The connection layer itself (TCP, epmd, handshake) is deliberately not
//! part of this crate.
//!
//! [`Atom`]: crate::core::Atom
//! [`Term`]: crate::term::Term
//! [`Mailbox`]: crate::mailbox::Mailbox

pub mod codec;
pub mod consts;
pub mod core;
pub mod mailbox;
pub mod node;
pub mod pattern;
pub mod term;
