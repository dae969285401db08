//! Simulated time, the node arena and the event heap.
//!
//! The timeline is the part of a network that devices are allowed to touch
//! while they process an event: they read node values and pending events
//! and ask for new contamination or propagation events. The scheduling
//! rules keep at most one pending event of each kind per node.

use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::event::{Event, EventKind, PendingEvent};
use crate::heap::{Handle, Heap};
use crate::node::{Node, NodeId};
use crate::value::Value;

/// Node arena plus the time-ordered event queue.
#[derive(Debug, Default)]
pub struct Timeline {
    time: f64,
    nodes: Vec<Node>,
    names: IndexMap<String, NodeId>,
    queue: Heap<Event>,
}

impl Timeline {
    /// Create an empty timeline at t=0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current simulated time (s).
    pub fn time(&self) -> f64 {
        self.time
    }

    /// Return the node with the given name, creating it on first use.
    pub fn node_or_insert(&mut self, name: &str) -> NodeId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(name));
        self.names.insert(name.to_string(), id);
        id
    }

    /// Add a node whose name must not exist yet.
    pub fn add_node(&mut self, name: impl Into<String>) -> Result<NodeId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(Error::DuplicateNode(name));
        }
        Ok(self.node_or_insert(&name))
    }

    /// Look up a node by name.
    pub fn node_id(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    /// Get a node.
    ///
    /// # Panics
    /// If `id` did not come from this timeline.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Get a node mutably.
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Get a node by name.
    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.node_id(name).map(|id| self.node(id))
    }

    /// Iterate over all nodes in creation order.
    pub fn nodes(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of nodes.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of events waiting in the heap.
    pub fn pending_events(&self) -> usize {
        self.queue.len()
    }

    /// Time of the next event, if any.
    pub fn next_event_time(&self) -> Option<f64> {
        self.queue.peek().map(|(_, e)| e.time)
    }

    /// Rewind to t=0: empty the heap and reset every node.
    pub fn reset(&mut self) {
        self.time = 0.0;
        self.queue.clear();
        for node in &mut self.nodes {
            node.initialize();
        }
    }

    /// Pop the next event and advance time to it.
    pub fn pop_event(&mut self) -> Option<(Handle, Event)> {
        let (handle, event) = self.queue.pop()?;
        self.time = event.time;
        Some((handle, event))
    }

    /// Schedule a contamination of `node` at `time + tcd`.
    ///
    /// A pending propagation at or after that time can no longer be
    /// trusted and is cancelled. An earlier pending contamination wins over
    /// this one.
    pub fn c_event(&mut self, node: NodeId, tcd: f64) {
        let t = self.time + tcd;
        let idx = node.index();

        if let Some(pd) = self.nodes[idx].pending_propagate().copied() {
            if pd.time >= t {
                self.queue.remove(pd.handle);
                self.nodes[idx].set_pending_propagate(None);
            }
        }

        if let Some(cd) = self.nodes[idx].pending_contaminate().copied() {
            if cd.time <= t {
                return;
            }
            self.queue.remove(cd.handle);
        }

        let handle = self.queue.push(Event::contaminate(t, node));
        self.nodes[idx].set_pending_contaminate(Some(PendingEvent {
            handle,
            time: t,
            value: Value::X,
        }));
    }

    /// Schedule `node` to settle to `value` at
    /// `time + tpd + drive * capacitance`.
    ///
    /// With `lenient`, a pending propagation to the same value that fires
    /// no later is kept instead.
    pub fn p_event(&mut self, node: NodeId, tpd: f64, value: Value, drive: f64, lenient: bool) {
        let idx = node.index();
        let t = self.time + tpd + drive * self.nodes[idx].capacitance();

        if let Some(pd) = self.nodes[idx].pending_propagate().copied() {
            if lenient && pd.value == value && t >= pd.time {
                return;
            }
            self.queue.remove(pd.handle);
        }

        let handle = self.queue.push(Event::propagate(t, node, value));
        self.nodes[idx].set_pending_propagate(Some(PendingEvent {
            handle,
            time: t,
            value,
        }));
    }

    /// Queue a forced propagation at the current time.
    ///
    /// Forced events are not tracked as pending and cannot be cancelled.
    pub fn schedule_forced(&mut self, node: NodeId, value: Value) -> Handle {
        self.queue.push(Event::propagate(self.time, node, value).forced())
    }

    /// Apply a popped event to its node.
    ///
    /// Clears the node's matching pending reference and returns whether the
    /// node changed, in which case its fanouts must be notified.
    pub fn apply(&mut self, handle: Handle, event: &Event) -> bool {
        let node = &mut self.nodes[event.node.index()];
        match event.kind {
            EventKind::Contaminate => {
                if node.pending_contaminate().is_some_and(|p| p.handle == handle) {
                    node.set_pending_contaminate(None);
                }
            }
            EventKind::Propagate => {
                if node.pending_propagate().is_some_and(|p| p.handle == handle) {
                    node.set_pending_propagate(None);
                }
            }
        }
        node.update(event.time, event.value, event.forced)
    }

    /// Move time forward without delivering anything. Never moves back.
    pub fn advance_to(&mut self, time: f64) {
        self.time = self.time.max(time);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn timeline_with(names: &[&str]) -> (Timeline, Vec<NodeId>) {
        let mut tl = Timeline::new();
        let ids = names.iter().map(|n| tl.node_or_insert(n)).collect();
        tl.reset();
        (tl, ids)
    }

    /// Every node has at most one queued event of each kind.
    fn assert_single_pending(tl: &Timeline) {
        for (id, _) in tl.nodes() {
            let count = |kind| {
                tl.queue
                    .iter()
                    .filter(|(_, e)| e.node == id && e.kind == kind && !e.forced)
                    .count()
            };
            assert!(count(EventKind::Contaminate) <= 1);
            assert!(count(EventKind::Propagate) <= 1);
        }
    }

    #[test]
    fn test_node_or_insert_is_idempotent() {
        let mut tl = Timeline::new();
        let a = tl.node_or_insert("a");
        assert_eq!(tl.node_or_insert("a"), a);
        assert_eq!(tl.node_count(), 1);
        assert!(matches!(tl.add_node("a"), Err(Error::DuplicateNode(_))));
        assert_eq!(tl.node_by_name("a").map(|n| n.name()), Some("a"));
    }

    #[test]
    fn test_c_event_keeps_earlier_contamination() {
        let (mut tl, ids) = timeline_with(&["a"]);
        let a = ids[0];

        tl.c_event(a, 1e-9);
        let first = *tl.node(a).pending_contaminate().unwrap();
        tl.c_event(a, 2e-9);

        let kept = tl.node(a).pending_contaminate().unwrap();
        assert_eq!(kept.handle, first.handle);
        assert_eq!(tl.pending_events(), 1);
        assert_single_pending(&tl);
    }

    #[test]
    fn test_c_event_replaces_later_contamination() {
        let (mut tl, ids) = timeline_with(&["a"]);
        let a = ids[0];

        tl.c_event(a, 2e-9);
        tl.c_event(a, 1e-9);

        assert_eq!(tl.node(a).pending_contaminate().unwrap().time, 1e-9);
        assert_eq!(tl.pending_events(), 1);
    }

    #[test]
    fn test_c_event_cancels_later_propagation() {
        let (mut tl, ids) = timeline_with(&["a", "b"]);
        let (a, b) = (ids[0], ids[1]);

        tl.p_event(a, 3e-9, Value::One, 0.0, false);
        tl.c_event(a, 1e-9);
        assert!(tl.node(a).pending_propagate().is_none());

        // A propagation that lands before the contamination survives.
        tl.p_event(b, 1e-9, Value::One, 0.0, false);
        tl.c_event(b, 2e-9);
        assert!(tl.node(b).pending_propagate().is_some());
        assert_eq!(tl.pending_events(), 3);
        assert_single_pending(&tl);
    }

    #[test]
    fn test_p_event_includes_drive_term() {
        let (mut tl, ids) = timeline_with(&["a"]);
        let a = ids[0];
        tl.node_mut(a).set_capacitance(2e-12);
        tl.advance_to(1e-9);

        tl.p_event(a, 1e-9, Value::One, 1000.0, false);
        let pd = tl.node(a).pending_propagate().unwrap();
        assert!((pd.time - 4e-9).abs() < 1e-18, "t = {}", pd.time);
    }

    #[test]
    fn test_p_event_lenient_keeps_earlier_same_value() {
        let (mut tl, ids) = timeline_with(&["a"]);
        let a = ids[0];

        tl.p_event(a, 1e-9, Value::One, 0.0, true);
        let first = tl.node(a).pending_propagate().unwrap().handle;
        tl.p_event(a, 2e-9, Value::One, 0.0, true);
        assert_eq!(tl.node(a).pending_propagate().unwrap().handle, first);

        // A different value always replaces.
        tl.p_event(a, 2e-9, Value::Zero, 0.0, true);
        assert_eq!(tl.node(a).pending_propagate().unwrap().value, Value::Zero);
        assert_eq!(tl.pending_events(), 1);

        // Non-lenient always replaces.
        tl.p_event(a, 3e-9, Value::Zero, 0.0, false);
        assert_eq!(tl.node(a).pending_propagate().unwrap().time, 3e-9);
        assert_eq!(tl.pending_events(), 1);
    }

    #[test]
    fn test_pop_and_apply() {
        let (mut tl, ids) = timeline_with(&["a"]);
        let a = ids[0];

        tl.c_event(a, 1e-9);
        tl.p_event(a, 1e-9, Value::One, 0.0, false);

        // Contamination first at equal times.
        let (h, e) = tl.pop_event().unwrap();
        assert_eq!(e.kind, EventKind::Contaminate);
        assert_eq!(tl.time(), 1e-9);
        assert!(!tl.apply(h, &e), "X -> X is not a change");
        assert!(tl.node(a).pending_contaminate().is_none());

        let (h, e) = tl.pop_event().unwrap();
        assert!(tl.apply(h, &e));
        assert!(tl.node(a).pending_propagate().is_none());
        assert_eq!(tl.node(a).value(), Value::One);
        assert_eq!(tl.node(a).history().len(), 1);
        assert_eq!(tl.next_event_time(), None);
    }

    #[test]
    fn test_forced_event_records_history() {
        let (mut tl, ids) = timeline_with(&["gnd"]);
        let g = ids[0];
        tl.schedule_forced(g, Value::X);
        assert!(!tl.node(g).has_pending());

        let (h, e) = tl.pop_event().unwrap();
        assert!(tl.apply(h, &e));
        assert_eq!(tl.node(g).history()[0].code(), 10);
    }
}
