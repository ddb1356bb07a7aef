//! Core transition machine types and logic.
//!
//! This module contains the pure functional core:
//! - State values via the `State` trait
//! - The event vocabulary
//! - Guard predicates and the guarded transition table
//! - Immutable history tracking
//!
//! Nothing in this module touches a machine instance or invokes a callback.

mod event;
mod guard;
mod history;
mod state;
pub mod table;

pub use event::{Event, EventName, ProtocolError};
pub use guard::Guard;
pub use history::{StateHistory, StateTransition};
pub use state::{ChildrenState, Direction, Phase, State, Status};
pub use table::Step;
