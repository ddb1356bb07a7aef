//! Transition Tree: hierarchical enter/leave transition coordination
//!
//! Each [`TransitionMachine`] is one transitionable node (a dialog, its
//! backdrop, a panel inside it). Nodes form a tree and coordinate so that:
//!
//! - entering runs a parent and its children at the same time,
//! - leaving runs bottom-up: a parent never finishes before its children,
//! - a transition can be cancelled cleanly mid-flight,
//! - children may be attached or detached while a transition is in progress.
//!
//! The machine knows nothing about rendering or timing. A UI binding drives
//! it with [`Event`]s (`enter`/`leave` when visibility changes, `start` once
//! the animation begins, `stop` when it ends) and reacts to its [`Actions`].
//!
//! # Core Concepts
//!
//! - **Direction**: which transition is in progress (`idle`, `entering`, `leaving`)
//! - **Phase**: progress within that direction (`pending`, `running`, ...)
//! - **Guards**: a `(direction, phase)` precondition per event; events that
//!   do not match are silently ignored
//! - **Cascade**: one call can ripple synchronously through many nodes
//!
//! # Example
//!
//! ```rust
//! use transition_tree::{Actions, Direction, Event, Phase, Status, TransitionMachine};
//!
//! let dialog = TransitionMachine::with_id("dialog", Actions::new());
//! let panel = TransitionMachine::with_id("panel", Actions::new());
//! dialog.add(&panel);
//!
//! dialog.send(Event::Enter);
//! dialog.send(Event::Start);
//! // The panel was asked to enter alongside the dialog.
//! assert_eq!(panel.status(), Status::new(Direction::Entering, Phase::Pending));
//!
//! dialog.send(Event::Stop);
//! assert_eq!(dialog.state(), Phase::WaitingForChildren);
//!
//! panel.send(Event::Start);
//! panel.send(Event::Stop);
//! assert_eq!(dialog.status(), Status::new(Direction::Entering, Phase::Done));
//! ```

pub mod builder;
pub mod checkpoint;
pub mod core;
pub mod machine;

// Re-export commonly used types
pub use builder::{BuildError, TransitionMachineBuilder};
pub use checkpoint::{Checkpoint, CheckpointError};
pub use crate::core::{
    ChildrenState, Direction, Event, EventName, Guard, Phase, ProtocolError, State,
    StateHistory, StateTransition, Status,
};
pub use machine::{create_transition_machine, Actions, TransitionMachine};
