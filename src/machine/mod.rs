//! Live transition machines.
//!
//! This module is the imperative shell around [`crate::core`]: it owns the
//! mutable node tree, delivers the node-to-node protocol and invokes the
//! caller's callbacks.
//!
//! # Protocol
//!
//! Besides the public events, nodes exchange six internal events:
//!
//! - `#child.add` / `#child.remove`: a parent attaches or detaches a child
//! - `#child.become` / `#child.resign`: the child records or clears its parent
//! - `#child.start`: the parent asks a child to follow its direction
//! - `#child.stop`: a child reports that it finished or was cancelled
//!
//! Entering runs a parent and its children together: the parent fans out
//! `#child.start` as soon as it starts running. Leaving runs bottom-up: a
//! parent with children waits for them before its own running phase.

mod actions;
mod node;

pub use actions::Actions;
pub use node::{create_transition_machine, TransitionMachine};
pub(crate) use node::next_id;
