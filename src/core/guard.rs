//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that determine whether a transition
//! can fire from the current state.

use super::state::State;
use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can execute.
///
/// # Example
///
/// ```rust
/// use transition_tree::core::{Direction, Guard, Phase, Status};
///
/// let pending_enter = Guard::exact(Status::new(Direction::Entering, Phase::Pending));
///
/// assert!(pending_enter.check(&Status::new(Direction::Entering, Phase::Pending)));
/// assert!(!pending_enter.check(&Status::new(Direction::Leaving, Phase::Pending)));
/// ```
pub struct Guard<S: State> {
    predicate: Box<dyn Fn(&S) -> bool + Send + Sync>,
    _phantom: PhantomData<S>,
}

impl<S: State> Guard<S> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be deterministic and free of side effects.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&S) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Guard that only passes for a state equal to `expected`.
    pub fn exact(expected: S) -> Self
    where
        S: 'static,
    {
        Self::new(move |state| *state == expected)
    }

    /// Guard that passes for every state.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Check if the guard allows a transition from this state.
    pub fn check(&self, state: &S) -> bool {
        (self.predicate)(state)
    }
}

impl<S: State> fmt::Debug for Guard<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}
