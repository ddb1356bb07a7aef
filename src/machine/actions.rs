//! Callbacks a machine invokes as it moves.

use super::TransitionMachine;
use crate::core::{Direction, EventName, Status};
use std::fmt;

type DirectionCallback = Box<dyn Fn(Direction)>;
type EventCallback = Box<dyn Fn(EventName, Option<&TransitionMachine>)>;
type ChangeCallback = Box<dyn Fn(Status, Status)>;

/// The bag of optional callbacks attached to a machine.
///
/// Every callback runs synchronously, while the machine is between writes,
/// so it may freely inspect or drive any machine in the tree.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use transition_tree::{Actions, Event, TransitionMachine};
///
/// let started = Rc::new(Cell::new(0));
/// let counter = Rc::clone(&started);
/// let machine = TransitionMachine::new(Actions::new().on_start(move |_| {
///     counter.set(counter.get() + 1);
/// }));
///
/// machine.send(Event::Enter);
/// machine.send(Event::Start);
/// assert_eq!(started.get(), 1);
/// ```
#[derive(Default)]
pub struct Actions {
    on_start: Option<DirectionCallback>,
    on_stop: Option<DirectionCallback>,
    on_cancel: Option<DirectionCallback>,
    on_event: Option<EventCallback>,
    on_change: Option<ChangeCallback>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called when a running phase begins.
    pub fn on_start(mut self, f: impl Fn(Direction) + 'static) -> Self {
        self.on_start = Some(Box::new(f));
        self
    }

    /// Called when a transition completes normally.
    pub fn on_stop(mut self, f: impl Fn(Direction) + 'static) -> Self {
        self.on_stop = Some(Box::new(f));
        self
    }

    /// Called when a transition is cancelled.
    pub fn on_cancel(mut self, f: impl Fn(Direction) + 'static) -> Self {
        self.on_cancel = Some(Box::new(f));
        self
    }

    /// Called first for every dispatched event, public or internal.
    ///
    /// The second argument is the peer machine carried by the
    /// `#child.add`, `#child.remove`, `#child.become` and `#child.resign`
    /// events.
    pub fn on_event(mut self, f: impl Fn(EventName, Option<&TransitionMachine>) + 'static) -> Self {
        self.on_event = Some(Box::new(f));
        self
    }

    /// Called with `(previous, current)` on every status write.
    pub fn on_change(mut self, f: impl Fn(Status, Status) + 'static) -> Self {
        self.on_change = Some(Box::new(f));
        self
    }

    pub(crate) fn started(&self, direction: Direction) {
        if let Some(f) = &self.on_start {
            f(direction);
        }
    }

    pub(crate) fn stopped(&self, direction: Direction) {
        if let Some(f) = &self.on_stop {
            f(direction);
        }
    }

    pub(crate) fn cancelled(&self, direction: Direction) {
        if let Some(f) = &self.on_cancel {
            f(direction);
        }
    }

    pub(crate) fn dispatched(&self, event: EventName, payload: Option<&TransitionMachine>) {
        if let Some(f) = &self.on_event {
            f(event, payload);
        }
    }

    pub(crate) fn changed(&self, previous: Status, current: Status) {
        if let Some(f) = &self.on_change {
            f(previous, current);
        }
    }
}

impl fmt::Debug for Actions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Actions")
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .field("on_cancel", &self.on_cancel.is_some())
            .field("on_event", &self.on_event.is_some())
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn empty_actions_ignore_every_call() {
        let actions = Actions::new();
        actions.started(Direction::Entering);
        actions.stopped(Direction::Leaving);
        actions.cancelled(Direction::Leaving);
        actions.dispatched(EventName::Enter, None);
        actions.changed(Status::IDLE, Status::IDLE);
    }

    #[test]
    fn callbacks_receive_their_arguments() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let (a, b, c) = (Rc::clone(&log), Rc::clone(&log), Rc::clone(&log));

        let actions = Actions::new()
            .on_start(move |d| a.borrow_mut().push(format!("start {d}")))
            .on_event(move |e, _| b.borrow_mut().push(format!("event {e}")))
            .on_change(move |p, n| c.borrow_mut().push(format!("change {p} -> {n}")));

        actions.dispatched(EventName::ChildStop, None);
        actions.started(Direction::Leaving);
        actions.changed(Status::IDLE, Status::IDLE);

        assert_eq!(
            *log.borrow(),
            vec![
                "event #child.stop",
                "start leaving",
                "change (idle, idle) -> (idle, idle)",
            ]
        );
    }

    #[test]
    fn debug_reports_configured_callbacks() {
        let actions = Actions::new().on_stop(|_| {});
        let debug = format!("{actions:?}");
        assert!(debug.contains("on_stop: true"));
        assert!(debug.contains("on_start: false"));
    }
}
