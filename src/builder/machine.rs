//! Builder for constructing transition machines.

use crate::builder::error::BuildError;
use crate::machine::{next_id, Actions, TransitionMachine};

/// Builder for constructing transition machines with a fluent API.
///
/// ```
/// use transition_tree::builder::TransitionMachineBuilder;
/// use transition_tree::Actions;
///
/// let panel = TransitionMachineBuilder::new().id("panel").build().unwrap();
/// let dialog = TransitionMachineBuilder::new()
///     .id("dialog")
///     .actions(Actions::new().on_stop(|direction| println!("{direction} finished")))
///     .track_history(true)
///     .child(&panel)
///     .build()
///     .unwrap();
///
/// assert!(dialog.has_child(&panel));
/// assert!(dialog.history().is_some());
/// ```
#[derive(Default)]
pub struct TransitionMachineBuilder {
    id: Option<String>,
    actions: Option<Actions>,
    track_history: bool,
    children: Vec<TransitionMachine>,
}

impl TransitionMachineBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the machine id. Without one an id is generated.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the callbacks. Defaults to no callbacks.
    pub fn actions(mut self, actions: Actions) -> Self {
        self.actions = Some(actions);
        self
    }

    /// Record every status change in a [`StateHistory`](crate::core::StateHistory).
    ///
    /// Each write copies the recorded history, so the total cost grows
    /// quadratically with the number of writes on a long-lived node.
    pub fn track_history(mut self, enabled: bool) -> Self {
        self.track_history = enabled;
        self
    }

    /// Attach a child once the machine is built.
    pub fn child(mut self, child: &TransitionMachine) -> Self {
        self.children.push(child.clone());
        self
    }

    /// Build the machine, attaching children in the order given.
    pub fn build(self) -> Result<TransitionMachine, BuildError> {
        let id = match self.id {
            Some(id) => validate_id(id)?,
            None => next_id(),
        };

        let machine =
            TransitionMachine::from_parts(id, self.actions.unwrap_or_default(), self.track_history);
        for child in &self.children {
            machine.add(child);
        }
        Ok(machine)
    }
}

fn validate_id(id: String) -> Result<String, BuildError> {
    if id.is_empty() {
        return Err(BuildError::EmptyId);
    }
    if id.chars().any(char::is_whitespace) {
        return Err(BuildError::WhitespaceInId(id));
    }
    Ok(id)
}
