//! State values of a transition machine.
//!
//! A machine's position is described by two orthogonal values: the
//! [`Direction`] of the transition in progress and the [`Phase`] reached
//! within it. Together they form a [`Status`].

use crate::state_enum;
use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};

/// Trait for state machine states.
///
/// All methods are pure - no side effects. States represent immutable
/// values that describe the current position in a state machine.
///
/// # Example
///
/// ```rust
/// use transition_tree::core::{Phase, State};
///
/// assert_eq!(Phase::WaitingForChildren.name(), "waiting_for_children");
/// assert!(Phase::Done.is_final());
/// assert!(Phase::Cancelled.is_error());
/// ```
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }

    /// Check if this is an error state.
    ///
    /// Default implementation returns `false`.
    fn is_error(&self) -> bool {
        false
    }
}

state_enum! {
    /// Which transition a node is undergoing.
    pub enum Direction {
        Idle => "idle",
        Entering => "entering",
        Leaving => "leaving",
    }
}

state_enum! {
    /// Progress within the current [`Direction`].
    pub enum Phase {
        Idle => "idle",
        Pending => "pending",
        Running => "running",
        WaitingForChildren => "waiting_for_children",
        Done => "done",
        Cancelled => "cancelled",
    }
    final: [Done, Cancelled]
    error: [Cancelled]
}

state_enum! {
    /// Summary of whether any child is mid-transition.
    pub enum ChildrenState {
        /// The node has no children.
        None => "none",
        /// Every child is idle or done.
        AllIdle => "all_idle",
        /// At least one child has a direction and has not reached `done`.
        SomeActive => "some_active",
    }
}

impl ChildrenState {
    /// Summarise the statuses of a node's children.
    ///
    /// A `cancelled` child is still counted as active; only `done` releases it.
    pub fn of<I>(children: I) -> Self
    where
        I: IntoIterator<Item = Status>,
    {
        let mut statuses = children.into_iter().peekable();
        if statuses.peek().is_none() {
            return ChildrenState::None;
        }
        if statuses.any(|s| s.is_active()) {
            ChildrenState::SomeActive
        } else {
            ChildrenState::AllIdle
        }
    }
}

/// A `(direction, phase)` pair: the full observable position of a machine.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct Status {
    pub direction: Direction,
    pub phase: Phase,
}

impl Status {
    /// The initial status of every machine.
    pub const IDLE: Status = Status {
        direction: Direction::Idle,
        phase: Phase::Idle,
    };

    pub const fn new(direction: Direction, phase: Phase) -> Self {
        Self { direction, phase }
    }

    /// Whether the transition table can ever produce this combination.
    ///
    /// `(idle, idle)` is the only idle combination; every other phase
    /// requires a direction.
    pub fn is_reachable(&self) -> bool {
        match self.direction {
            Direction::Idle => self.phase == Phase::Idle,
            Direction::Entering | Direction::Leaving => self.phase != Phase::Idle,
        }
    }

    /// True while a transition has a direction and has not reached `done`.
    pub fn is_active(&self) -> bool {
        self.direction != Direction::Idle && self.phase != Phase::Done
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::IDLE
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.direction, self.phase)
    }
}

impl State for Status {
    fn name(&self) -> &str {
        self.phase.name()
    }

    fn is_final(&self) -> bool {
        self.phase.is_final()
    }

    fn is_error(&self) -> bool {
        self.phase.is_error()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_use_snake_case_labels() {
        assert_eq!(Direction::Entering.name(), "entering");
        assert_eq!(Phase::WaitingForChildren.name(), "waiting_for_children");
        assert_eq!(ChildrenState::SomeActive.name(), "some_active");
    }

    #[test]
    fn is_final_identifies_terminal_phases() {
        assert!(!Phase::Idle.is_final());
        assert!(!Phase::Pending.is_final());
        assert!(!Phase::Running.is_final());
        assert!(!Phase::WaitingForChildren.is_final());
        assert!(Phase::Done.is_final());
        assert!(Phase::Cancelled.is_final());
    }

    #[test]
    fn only_cancelled_is_an_error() {
        let errors: Vec<_> = Phase::ALL.iter().filter(|p| p.is_error()).collect();
        assert_eq!(errors, vec![&Phase::Cancelled]);
    }

    #[test]
    fn reachable_statuses() {
        let reachable: Vec<Status> = Direction::ALL
            .iter()
            .flat_map(|&d| Phase::ALL.iter().map(move |&p| Status::new(d, p)))
            .filter(Status::is_reachable)
            .collect();

        // (idle, idle) plus five phases for each of the two directions.
        assert_eq!(reachable.len(), 11);
        assert!(reachable.contains(&Status::IDLE));
        assert!(!Status::new(Direction::Idle, Phase::Running).is_reachable());
        assert!(!Status::new(Direction::Leaving, Phase::Idle).is_reachable());
    }

    #[test]
    fn children_state_of_empty_is_none() {
        assert_eq!(ChildrenState::of(Vec::new()), ChildrenState::None);
    }

    #[test]
    fn children_state_ignores_idle_and_done() {
        let children = vec![
            Status::IDLE,
            Status::new(Direction::Entering, Phase::Done),
            Status::new(Direction::Leaving, Phase::Done),
        ];
        assert_eq!(ChildrenState::of(children), ChildrenState::AllIdle);
    }

    #[test]
    fn children_state_counts_cancelled_as_active() {
        let children = vec![
            Status::new(Direction::Leaving, Phase::Done),
            Status::new(Direction::Leaving, Phase::Cancelled),
        ];
        assert_eq!(ChildrenState::of(children), ChildrenState::SomeActive);
    }

    #[test]
    fn status_display_and_serde() {
        let status = Status::new(Direction::Leaving, Phase::WaitingForChildren);
        assert_eq!(status.to_string(), "(leaving, waiting_for_children)");

        let json = serde_json::to_string(&status).unwrap();
        assert_eq!(
            json,
            r#"{"direction":"leaving","phase":"waiting_for_children"}"#
        );
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, status);
    }
}
