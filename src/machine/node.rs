//! The transition machine node and its event dispatch.

use super::actions::Actions;
use crate::core::table::{self, Step};
use crate::core::{
    ChildrenState, Direction, Event, EventName, Phase, ProtocolError, StateHistory,
    StateTransition, Status,
};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Generate a process-unique machine id of the form `transition-<n>`.
pub(crate) fn next_id() -> String {
    format!("transition-{}", NEXT_ID.fetch_add(1, Ordering::Relaxed))
}

/// Everything a machine can be sent: the public events plus the
/// node-to-node protocol.
#[derive(Clone)]
enum Message {
    Public(Event),
    ChildAdd(TransitionMachine),
    ChildRemove(TransitionMachine),
    ChildBecome(TransitionMachine),
    ChildResign(TransitionMachine),
    ChildStart,
    ChildStop,
}

impl Message {
    fn name(&self) -> EventName {
        match self {
            Message::Public(event) => EventName::from(*event),
            Message::ChildAdd(_) => EventName::ChildAdd,
            Message::ChildRemove(_) => EventName::ChildRemove,
            Message::ChildBecome(_) => EventName::ChildBecome,
            Message::ChildResign(_) => EventName::ChildResign,
            Message::ChildStart => EventName::ChildStart,
            Message::ChildStop => EventName::ChildStop,
        }
    }

    fn payload(&self) -> Option<&TransitionMachine> {
        match self {
            Message::ChildAdd(peer)
            | Message::ChildRemove(peer)
            | Message::ChildBecome(peer)
            | Message::ChildResign(peer) => Some(peer),
            Message::Public(_) | Message::ChildStart | Message::ChildStop => None,
        }
    }
}

struct Node {
    id: String,
    status: Status,
    parent: Option<Weak<RefCell<Node>>>,
    children: Vec<TransitionMachine>,
    actions: Rc<Actions>,
    history: Option<StateHistory<Status>>,
}

/// One node in a tree of coordinated enter/leave transitions.
///
/// `TransitionMachine` is a handle: clones refer to the same node. A node
/// owns its children and holds a weak reference to its parent, so dropping
/// every handle to a root releases the whole subtree.
///
/// Every call runs to completion, including the cascade of protocol events
/// it triggers on parents and children, before returning. The parent/child
/// graph must stay acyclic.
///
/// ```
/// use transition_tree::{Actions, Direction, Event, Phase, TransitionMachine};
///
/// let root = TransitionMachine::new(Actions::new());
/// let child = TransitionMachine::new(Actions::new());
/// root.add(&child);
///
/// root.send(Event::Leave);
/// root.send(Event::Start);
/// assert_eq!(root.state(), Phase::WaitingForChildren);
/// assert_eq!(child.direction(), Direction::Leaving);
///
/// child.send(Event::Start);
/// child.send(Event::Stop);
/// assert_eq!(root.state(), Phase::Running);
///
/// root.send(Event::Stop);
/// assert_eq!(root.state(), Phase::Done);
/// ```
#[derive(Clone)]
pub struct TransitionMachine {
    inner: Rc<RefCell<Node>>,
}

impl TransitionMachine {
    /// Create a machine with an auto-generated id.
    pub fn new(actions: Actions) -> Self {
        Self::with_id(next_id(), actions)
    }

    /// Create a machine with a caller-supplied id.
    pub fn with_id(id: impl Into<String>, actions: Actions) -> Self {
        Self::from_parts(id.into(), actions, false)
    }

    pub(crate) fn from_parts(id: String, actions: Actions, track_history: bool) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Node {
                id,
                status: Status::IDLE,
                parent: None,
                children: Vec::new(),
                actions: Rc::new(actions),
                history: track_history.then(StateHistory::new),
            })),
        }
    }

    pub fn id(&self) -> String {
        self.inner.borrow().id.clone()
    }

    pub fn status(&self) -> Status {
        self.inner.borrow().status
    }

    pub fn direction(&self) -> Direction {
        self.status().direction
    }

    /// Progress within the current direction.
    pub fn state(&self) -> Phase {
        self.status().phase
    }

    /// True while a transition has a direction and has not reached `done`.
    pub fn is_active(&self) -> bool {
        self.status().is_active()
    }

    pub fn parent(&self) -> Option<TransitionMachine> {
        self.inner
            .borrow()
            .parent
            .as_ref()
            .and_then(Weak::upgrade)
            .map(|inner| TransitionMachine { inner })
    }

    pub fn children(&self) -> Vec<TransitionMachine> {
        self.inner.borrow().children.clone()
    }

    pub fn has_child(&self, child: &TransitionMachine) -> bool {
        self.inner.borrow().children.iter().any(|c| c.ptr_eq(child))
    }

    pub fn children_state(&self) -> ChildrenState {
        ChildrenState::of(self.children().iter().map(TransitionMachine::status))
    }

    /// Recorded status changes, when history tracking is enabled.
    pub fn history(&self) -> Option<StateHistory<Status>> {
        self.inner.borrow().history.clone()
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &TransitionMachine) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Attach `child` to this machine.
    ///
    /// The child is not detached from a previous parent: callers must
    /// `remove` it there first, or the old parent keeps listing it.
    pub fn add(&self, child: &TransitionMachine) {
        self.dispatch(Message::ChildAdd(child.clone()));
    }

    /// Cancel and detach `child`.
    ///
    /// `child` is cancelled and sent `#child.resign` even when it is not one
    /// of this machine's children. A parent left waiting is not re-evaluated.
    pub fn remove(&self, child: &TransitionMachine) {
        self.dispatch(Message::ChildRemove(child.clone()));
    }

    /// Dispatch a public event. Events whose guard does not match the
    /// current status are ignored.
    pub fn send(&self, event: Event) {
        self.dispatch(Message::Public(event));
    }

    /// Dispatch a public event by name.
    ///
    /// Names outside the public vocabulary, including the internal
    /// `#child.*` protocol, are rejected.
    pub fn send_named(&self, name: &str) -> Result<(), ProtocolError> {
        let event: Event = name.parse()?;
        self.send(event);
        Ok(())
    }

    fn actions(&self) -> Rc<Actions> {
        Rc::clone(&self.inner.borrow().actions)
    }

    fn dispatch(&self, message: Message) {
        let name = message.name();
        trace!(machine = %self.id(), event = %name, "dispatch");
        self.actions().dispatched(name, message.payload());

        match message {
            Message::Public(event) => self.apply(event),
            Message::ChildAdd(child) => self.adopt(child),
            Message::ChildRemove(child) => self.release(child),
            Message::ChildBecome(parent) => self.become_child_of(parent),
            Message::ChildResign(_) => self.inner.borrow_mut().parent = None,
            Message::ChildStart => self.join_parent(),
            Message::ChildStop => {
                if self.state() == Phase::WaitingForChildren {
                    self.settle();
                }
            }
        }
    }

    fn apply(&self, event: Event) {
        let step = table::resolve(event, &self.status());
        match step {
            Some(Step::Enter) => self.move_to(Phase::Pending, Direction::Entering),
            Some(Step::Leave) => self.move_to(Phase::Pending, Direction::Leaving),
            Some(Step::Run) => self.to_running(),
            Some(Step::RunOrWait) => match self.children_state() {
                ChildrenState::None => self.to_running(),
                _ => self.to_waiting_for_children(),
            },
            Some(Step::FinishOrWait) => match self.children_state() {
                ChildrenState::None => self.to_done(),
                _ => self.to_waiting_for_children(),
            },
            Some(Step::Finish) => self.to_done(),
            Some(Step::Cancel) => self.to_cancelled(),
            Some(Step::Reset) => self.move_to(Phase::Idle, Direction::Idle),
            None => {
                trace!(machine = %self.id(), %event, status = %self.status(), "event ignored");
            }
        }

        // A cancel always notifies the parent, on top of any notification
        // from entering the cancelled phase.
        if event == Event::Cancel {
            self.notify_parent();
        }
    }

    fn adopt(&self, child: TransitionMachine) {
        debug_assert!(
            !self.has_ancestor(&child),
            "adding an ancestor as a child would form a cycle"
        );
        if !self.has_child(&child) {
            self.inner.borrow_mut().children.push(child.clone());
        }
        child.dispatch(Message::ChildBecome(self.clone()));
    }

    fn release(&self, child: TransitionMachine) {
        child.send(Event::Cancel);
        self.inner
            .borrow_mut()
            .children
            .retain(|c| !c.ptr_eq(&child));
        child.dispatch(Message::ChildResign(self.clone()));
    }

    fn become_child_of(&self, parent: TransitionMachine) {
        self.inner.borrow_mut().parent = Some(Rc::downgrade(&parent.inner));
        if parent.state() == Phase::WaitingForChildren {
            self.dispatch(Message::ChildStart);
        }
    }

    /// Follow the parent's direction when it is ready for children to move.
    fn join_parent(&self) {
        let Some(parent) = self.parent() else {
            return;
        };
        let status = parent.status();
        let accepting = status.phase == Phase::WaitingForChildren
            || status == Status::new(Direction::Entering, Phase::Running);
        if !accepting {
            return;
        }
        match status.direction {
            Direction::Entering => self.send(Event::Enter),
            Direction::Leaving => self.send(Event::Leave),
            Direction::Idle => {}
        }
    }

    /// Resolve a wait once no child is active any more.
    fn settle(&self) {
        if self.children_state() == ChildrenState::SomeActive {
            self.to_waiting_for_children();
            return;
        }
        match self.direction() {
            Direction::Entering => self.to_done(),
            Direction::Leaving => self.to_running(),
            Direction::Idle => {}
        }
    }

    fn to_running(&self) {
        let direction = self.direction();
        self.actions().started(direction);
        self.move_to(Phase::Running, direction);
        if direction == Direction::Entering {
            self.broadcast(Message::ChildStart);
        }
    }

    fn to_waiting_for_children(&self) {
        if self.state() == Phase::WaitingForChildren {
            return;
        }
        self.move_to(Phase::WaitingForChildren, self.direction());
        self.broadcast(Message::ChildStart);

        // Children that could not follow (already done) must not strand us.
        if self.state() == Phase::WaitingForChildren
            && self.children_state() != ChildrenState::SomeActive
        {
            self.settle();
        }
    }

    fn to_done(&self) {
        let direction = self.direction();
        self.move_to(Phase::Done, direction);
        self.actions().stopped(direction);
        self.notify_parent();
    }

    fn to_cancelled(&self) {
        let direction = self.direction();
        self.move_to(Phase::Cancelled, direction);
        self.actions().cancelled(direction);
        self.notify_parent();
    }

    fn notify_parent(&self) {
        if let Some(parent) = self.parent() {
            parent.dispatch(Message::ChildStop);
        }
    }

    fn broadcast(&self, message: Message) {
        for child in self.children() {
            child.dispatch(message.clone());
        }
    }

    /// Write a new status, record it and report `(previous, current)`.
    fn move_to(&self, phase: Phase, direction: Direction) {
        let current = Status::new(direction, phase);
        let previous = {
            let mut node = self.inner.borrow_mut();
            let previous = node.status;
            node.status = current;
            if let Some(history) = node.history.as_mut() {
                *history = history.record(StateTransition::now(previous, current));
            }
            previous
        };
        debug!(machine = %self.id(), %previous, %current, "status changed");
        self.actions().changed(previous, current);
    }

    /// Whether `other` is this machine or one of its ancestors.
    fn has_ancestor(&self, other: &TransitionMachine) -> bool {
        let mut cursor = Some(self.clone());
        while let Some(node) = cursor {
            if node.ptr_eq(other) {
                return true;
            }
            cursor = node.parent();
        }
        false
    }

    /// Overwrite the status without firing callbacks. Used when rebuilding
    /// a tree from a checkpoint.
    pub(crate) fn restore_status(&self, status: Status, history: Option<StateHistory<Status>>) {
        let mut node = self.inner.borrow_mut();
        node.status = status;
        if history.is_some() {
            node.history = history;
        }
    }
}

impl fmt::Debug for TransitionMachine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.inner.borrow();
        f.debug_struct("TransitionMachine")
            .field("id", &node.id)
            .field("status", &node.status)
            .field("children", &node.children.len())
            .finish()
    }
}

/// Create a machine, generating an id when none is supplied.
pub fn create_transition_machine(actions: Actions, id: Option<&str>) -> TransitionMachine {
    match id {
        Some(id) => TransitionMachine::with_id(id, actions),
        None => TransitionMachine::new(actions),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    fn machine(id: &str) -> TransitionMachine {
        TransitionMachine::with_id(id, Actions::new())
    }

    fn status(direction: Direction, phase: Phase) -> Status {
        Status::new(direction, phase)
    }

    #[test]
    fn starts_idle() {
        let m = machine("m");
        assert_eq!(m.status(), Status::IDLE);
        assert!(m.parent().is_none());
        assert_eq!(m.children_state(), ChildrenState::None);
        assert!(m.history().is_none());
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = TransitionMachine::new(Actions::new());
        let b = TransitionMachine::new(Actions::new());
        assert_ne!(a.id(), b.id());
        assert!(a.id().starts_with("transition-"));
    }

    #[test]
    fn factory_uses_supplied_id() {
        let m = create_transition_machine(Actions::new(), Some("dialog"));
        assert_eq!(m.id(), "dialog");

        let generated = create_transition_machine(Actions::new(), None);
        assert!(generated.id().starts_with("transition-"));
    }

    #[test]
    fn enter_is_ignored_outside_idle() {
        let m = machine("m");
        m.send(Event::Leave);
        m.send(Event::Enter);
        assert_eq!(m.status(), status(Direction::Leaving, Phase::Pending));
    }

    #[test]
    fn stop_before_start_is_ignored() {
        let m = machine("m");
        m.send(Event::Enter);
        m.send(Event::Stop);
        assert_eq!(m.status(), status(Direction::Entering, Phase::Pending));
    }

    #[test]
    fn add_links_both_ways() {
        let parent = machine("parent");
        let child = machine("child");
        parent.add(&child);

        assert!(parent.has_child(&child));
        assert!(child.parent().is_some_and(|p| p.ptr_eq(&parent)));
    }

    #[test]
    fn adding_twice_keeps_one_entry() {
        let parent = machine("parent");
        let child = machine("child");
        parent.add(&child);
        parent.add(&child);
        assert_eq!(parent.children().len(), 1);
    }

    #[test]
    fn remove_cancels_and_unlinks() {
        let parent = machine("parent");
        let child = machine("child");
        parent.add(&child);
        child.send(Event::Enter);

        parent.remove(&child);

        assert_eq!(child.status(), status(Direction::Entering, Phase::Cancelled));
        assert!(child.parent().is_none());
        assert!(parent.children().is_empty());
    }

    #[test]
    fn parent_is_weak() {
        let child = machine("child");
        {
            let parent = machine("parent");
            parent.add(&child);
            assert!(child.parent().is_some());
        }
        assert!(child.parent().is_none());
    }

    #[test]
    fn history_records_every_write() {
        let m = TransitionMachine::from_parts("m".into(), Actions::new(), true);
        m.send(Event::Enter);
        m.send(Event::Start);
        m.send(Event::Stop);
        m.send(Event::Reset);

        let history = m.history().unwrap();
        assert_eq!(
            history.get_path(),
            vec![
                &Status::IDLE,
                &status(Direction::Entering, Phase::Pending),
                &status(Direction::Entering, Phase::Running),
                &status(Direction::Entering, Phase::Done),
                &Status::IDLE,
            ]
        );
    }

    #[test]
    fn on_change_fires_even_when_unchanged() {
        let changes = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&changes);
        let m = TransitionMachine::new(
            Actions::new().on_change(move |prev, next| sink.borrow_mut().push((prev, next))),
        );

        m.send(Event::Reset);

        assert_eq!(*changes.borrow(), vec![(Status::IDLE, Status::IDLE)]);
    }

    #[test]
    fn on_start_fires_before_the_running_write() {
        let m = Rc::new(RefCell::new(None::<TransitionMachine>));
        let seen = Rc::new(RefCell::new(None));
        let (handle, sink) = (Rc::clone(&m), Rc::clone(&seen));

        let machine = TransitionMachine::new(Actions::new().on_start(move |_| {
            if let Some(machine) = handle.borrow().as_ref() {
                *sink.borrow_mut() = Some(machine.state());
            }
        }));
        *m.borrow_mut() = Some(machine.clone());

        machine.send(Event::Enter);
        machine.send(Event::Start);

        assert_eq!(*seen.borrow(), Some(Phase::Pending));
        assert_eq!(machine.state(), Phase::Running);
        m.borrow_mut().take();
    }

    #[test]
    fn send_named_rejects_internal_events() {
        let m = machine("m");
        assert_eq!(
            m.send_named("#child.start"),
            Err(ProtocolError::InternalEvent(EventName::ChildStart))
        );
        assert!(m.send_named("vanish").is_err());
        assert_eq!(m.status(), Status::IDLE);

        m.send_named("leave").unwrap();
        assert_eq!(m.status(), status(Direction::Leaving, Phase::Pending));
    }

    #[test]
    #[should_panic(expected = "cycle")]
    #[cfg(debug_assertions)]
    fn adding_an_ancestor_panics_in_debug_builds() {
        let root = machine("root");
        let child = machine("child");
        root.add(&child);
        child.add(&root);
    }
}
