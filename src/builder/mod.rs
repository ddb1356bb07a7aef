//! Builder API for ergonomic machine construction.
//!
//! This module provides a fluent builder for transition machines and the
//! `state_enum!` macro used to declare state-like enums.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::TransitionMachineBuilder;

use crate::machine::{Actions, TransitionMachine};

/// Build a machine with the given id and a set of already built children.
///
/// # Example
///
/// ```
/// use transition_tree::builder::tree;
/// use transition_tree::{Actions, TransitionMachine};
///
/// let backdrop = TransitionMachine::with_id("backdrop", Actions::new());
/// let panel = TransitionMachine::with_id("panel", Actions::new());
/// let dialog = tree("dialog", Actions::new(), &[backdrop, panel]).unwrap();
///
/// assert_eq!(dialog.children().len(), 2);
/// ```
pub fn tree(
    id: &str,
    actions: Actions,
    children: &[TransitionMachine],
) -> Result<TransitionMachine, BuildError> {
    children
        .iter()
        .fold(
            TransitionMachineBuilder::new().id(id).actions(actions),
            |builder, child| builder.child(child),
        )
        .build()
}
