//! The guarded transition table.
//!
//! Each rule pairs a public [`Event`] with a [`Guard`] over the current
//! [`Status`] and the [`Step`] to take when the guard passes. Resolution is
//! pure; applying a step (and consulting children) is the machine's job.

use super::event::Event;
use super::guard::Guard;
use super::state::{Direction, Phase, Status};
use std::sync::LazyLock;

/// What a machine does in response to a public event.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Step {
    /// Move to `(entering, pending)`.
    Enter,
    /// Move to `(leaving, pending)`.
    Leave,
    /// Begin the running phase.
    Run,
    /// Run when there are no children, otherwise wait for them first.
    RunOrWait,
    /// Finish when there are no children, otherwise wait for them.
    FinishOrWait,
    /// Move to `done`.
    Finish,
    /// Move to `cancelled`.
    Cancel,
    /// Move to `(idle, idle)`.
    Reset,
}

struct Rule {
    event: Event,
    guard: Guard<Status>,
    step: Step,
}

impl Rule {
    fn new(event: Event, guard: Guard<Status>, step: Step) -> Self {
        Self { event, guard, step }
    }
}

static RULES: LazyLock<Vec<Rule>> = LazyLock::new(|| {
    let entering = |phase| Guard::exact(Status::new(Direction::Entering, phase));
    let leaving = |phase| Guard::exact(Status::new(Direction::Leaving, phase));

    vec![
        Rule::new(Event::Enter, Guard::exact(Status::IDLE), Step::Enter),
        Rule::new(Event::Leave, Guard::exact(Status::IDLE), Step::Leave),
        Rule::new(Event::Start, entering(Phase::Pending), Step::Run),
        Rule::new(Event::Start, leaving(Phase::Pending), Step::RunOrWait),
        Rule::new(Event::Stop, entering(Phase::Running), Step::FinishOrWait),
        Rule::new(Event::Stop, leaving(Phase::Running), Step::Finish),
        Rule::new(
            Event::Cancel,
            Guard::new(|s: &Status| {
                s.direction != Direction::Idle
                    && matches!(
                        s.phase,
                        Phase::Pending | Phase::Running | Phase::WaitingForChildren
                    )
            }),
            Step::Cancel,
        ),
        Rule::new(Event::Reset, Guard::always(), Step::Reset),
    ]
});

/// Find the step `event` triggers from `status`.
///
/// Returns `None` when no rule's guard matches; the event is then ignored.
pub fn resolve(event: Event, status: &Status) -> Option<Step> {
    RULES
        .iter()
        .find(|rule| rule.event == event && rule.guard.check(status))
        .map(|rule| rule.step)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::state::State;

    fn all_statuses() -> impl Iterator<Item = Status> {
        Direction::ALL
            .iter()
            .flat_map(|&d| Phase::ALL.iter().map(move |&p| Status::new(d, p)))
            .filter(Status::is_reachable)
    }

    #[test]
    fn enter_and_leave_only_fire_from_idle() {
        for status in all_statuses() {
            let expected_enter = (status == Status::IDLE).then_some(Step::Enter);
            let expected_leave = (status == Status::IDLE).then_some(Step::Leave);
            assert_eq!(resolve(Event::Enter, &status), expected_enter, "{status}");
            assert_eq!(resolve(Event::Leave, &status), expected_leave, "{status}");
        }
    }

    #[test]
    fn start_depends_on_direction() {
        assert_eq!(
            resolve(Event::Start, &Status::new(Direction::Entering, Phase::Pending)),
            Some(Step::Run)
        );
        assert_eq!(
            resolve(Event::Start, &Status::new(Direction::Leaving, Phase::Pending)),
            Some(Step::RunOrWait)
        );
        assert_eq!(resolve(Event::Start, &Status::IDLE), None);
        assert_eq!(
            resolve(Event::Start, &Status::new(Direction::Entering, Phase::Running)),
            None
        );
    }

    #[test]
    fn stop_depends_on_direction() {
        assert_eq!(
            resolve(Event::Stop, &Status::new(Direction::Entering, Phase::Running)),
            Some(Step::FinishOrWait)
        );
        assert_eq!(
            resolve(Event::Stop, &Status::new(Direction::Leaving, Phase::Running)),
            Some(Step::Finish)
        );
        assert_eq!(
            resolve(Event::Stop, &Status::new(Direction::Leaving, Phase::Pending)),
            None
        );
    }

    #[test]
    fn cancel_fires_only_mid_transition() {
        let cancellable: Vec<Status> = all_statuses()
            .filter(|s| resolve(Event::Cancel, s).is_some())
            .collect();

        assert_eq!(cancellable.len(), 6);
        assert!(cancellable.iter().all(|s| s.direction != Direction::Idle));
        assert!(cancellable.iter().all(|s| !s.phase.is_final()));
    }

    #[test]
    fn reset_always_fires() {
        assert!(all_statuses().all(|s| resolve(Event::Reset, &s) == Some(Step::Reset)));
    }
}
