use crate::core::{BodyHandle, ConstraintKind};
use std::collections::VecDeque;

/// Types of structural events raised by the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverEventType {
    /// A body has been added to the solver
    BodyAdded,

    /// A body has been removed from the solver
    BodyRemoved,

    /// A constraint has been created
    ConstraintAdded,

    /// A constraint has been erased
    ConstraintRemoved,
}

/// A structural change in the solver's storage
#[derive(Debug, Clone, PartialEq)]
pub struct SolverEvent {
    /// The type of event
    pub event_type: SolverEventType,

    /// The body the event refers to, if it is a body event
    pub body: Option<BodyHandle>,

    /// The constraint arena the event refers to, if it is a constraint event
    pub constraint: Option<ConstraintKind>,
}

impl SolverEvent {
    pub(crate) fn body(event_type: SolverEventType, body: BodyHandle) -> Self {
        Self {
            event_type,
            body: Some(body),
            constraint: None,
        }
    }

    pub(crate) fn constraint(event_type: SolverEventType, kind: ConstraintKind) -> Self {
        Self {
            event_type,
            body: None,
            constraint: Some(kind),
        }
    }
}

/// A queue of solver events, drained by the caller between frames
#[derive(Debug, Default)]
pub struct EventQueue {
    events: VecDeque<SolverEvent>,
}

impl EventQueue {
    /// Creates a new empty event queue
    pub fn new() -> Self {
        Self {
            events: VecDeque::new(),
        }
    }

    /// Adds an event to the queue
    pub fn push(&mut self, event: SolverEvent) {
        self.events.push_back(event);
    }

    /// Gets the next event from the queue
    pub fn next_event(&mut self) -> Option<SolverEvent> {
        self.events.pop_front()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Returns the number of pending events
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Clears all events from the queue
    pub fn clear(&mut self) {
        self.events.clear();
    }

    /// Drains every pending event in order
    pub fn drain(&mut self) -> impl Iterator<Item = SolverEvent> + '_ {
        self.events.drain(..)
    }

    /// Gets all events of a specific type
    pub fn events_of_type(&self, event_type: SolverEventType) -> Vec<&SolverEvent> {
        self.events
            .iter()
            .filter(|e| e.event_type == event_type)
            .collect()
    }

    /// Gets all events for a specific body
    pub fn events_for_body(&self, body: BodyHandle) -> Vec<&SolverEvent> {
        self.events
            .iter()
            .filter(|e| e.body == Some(body))
            .collect()
    }
}
