//! Scheduled node events.

use std::cmp::Ordering;
use std::fmt;

use crate::heap::{Handle, Prioritized};
use crate::node::NodeId;
use crate::value::Value;

/// What an event does to its node.
///
/// The declaration order is the tie-break order: at equal times a
/// contamination is delivered before a propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum EventKind {
    /// The node stops being trustworthy and goes to X.
    Contaminate,
    /// The node settles to a new value.
    Propagate,
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventKind::Contaminate => write!(f, "contaminate"),
            EventKind::Propagate => write!(f, "propagate"),
        }
    }
}

/// An immutable record of a future change to a node.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Event {
    /// Simulated time at which the event fires (s).
    pub time: f64,
    /// Contamination or propagation.
    pub kind: EventKind,
    /// Node the event is delivered to.
    pub node: NodeId,
    /// Value the node takes when the event fires.
    pub value: Value,
    /// Record history and notify fanouts even if the value is unchanged.
    pub forced: bool,
}

impl Event {
    /// A contamination event; the node goes to X.
    pub fn contaminate(time: f64, node: NodeId) -> Self {
        Self {
            time,
            kind: EventKind::Contaminate,
            node,
            value: Value::X,
            forced: false,
        }
    }

    /// A propagation event to `value`.
    pub fn propagate(time: f64, node: NodeId, value: Value) -> Self {
        Self {
            time,
            kind: EventKind::Propagate,
            node,
            value,
            forced: false,
        }
    }

    /// Mark the event as forced.
    pub fn forced(mut self) -> Self {
        self.forced = true;
        self
    }
}

impl Prioritized for Event {
    fn priority(&self, other: &Self) -> Ordering {
        self.time
            .total_cmp(&other.time)
            .then(self.kind.cmp(&other.kind))
    }
}

/// A node's back-reference to one of its own events still in the heap.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingEvent {
    /// Heap handle used to cancel the event.
    pub handle: Handle,
    /// When the event fires.
    pub time: f64,
    /// Value the event carries.
    pub value: Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contaminate_before_propagate_at_equal_time() {
        let n = NodeId::new(0);
        let c = Event::contaminate(1e-9, n);
        let p = Event::propagate(1e-9, n, Value::One);
        assert_eq!(c.priority(&p), Ordering::Less);
        assert_eq!(p.priority(&c), Ordering::Greater);
    }

    #[test]
    fn test_time_dominates_kind() {
        let n = NodeId::new(0);
        let p = Event::propagate(1e-9, n, Value::Zero);
        let c = Event::contaminate(2e-9, n);
        assert_eq!(p.priority(&c), Ordering::Less);
        assert_eq!(c.value, Value::X);
        assert!(!c.forced);
        assert!(p.forced().forced);
    }
}
