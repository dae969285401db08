//! Node representation for the simulation graph.

use std::fmt;

use crate::device::DeviceId;
use crate::event::PendingEvent;
use crate::value::{Transition, Value};

/// Index of a node in its network's node arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Create a new NodeId from a raw value.
    pub fn new(id: u32) -> Self {
        NodeId(id)
    }

    /// Get the raw node ID value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Who controls a node's value.
///
/// Before finalization a node collects every device that wants to drive
/// it; finalization resolves that list to a single device.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Drivers {
    /// Candidate drivers, in connection order.
    Unresolved(Vec<DeviceId>),
    /// The one device that sets this node.
    Resolved(DeviceId),
}

impl Default for Drivers {
    fn default() -> Self {
        Drivers::Unresolved(Vec::new())
    }
}

/// A simulated wire.
#[derive(Debug, Clone)]
pub struct Node {
    name: String,
    value: Value,
    capacitance: f64,
    drivers: Drivers,
    fanouts: Vec<DeviceId>,
    history: Vec<Transition>,
    contaminate: Option<PendingEvent>,
    propagate: Option<PendingEvent>,
}

impl Node {
    /// Create an undriven node with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: Value::X,
            capacitance: 0.0,
            drivers: Drivers::default(),
            fanouts: Vec::new(),
            history: Vec::new(),
            contaminate: None,
            propagate: None,
        }
    }

    /// Get the node's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current logic value.
    pub fn value(&self) -> Value {
        self.value
    }

    /// Total capacitance seen by the node's driver (F).
    pub fn capacitance(&self) -> f64 {
        self.capacitance
    }

    /// Set the node capacitance.
    pub fn set_capacitance(&mut self, capacitance: f64) {
        self.capacitance = capacitance;
    }

    /// Driver state.
    pub fn drivers(&self) -> &Drivers {
        &self.drivers
    }

    /// The resolved driver, once finalized.
    pub fn driver(&self) -> Option<DeviceId> {
        match self.drivers {
            Drivers::Resolved(d) => Some(d),
            Drivers::Unresolved(_) => None,
        }
    }

    /// Whether finalization has resolved this node's driver.
    pub fn is_finalized(&self) -> bool {
        matches!(self.drivers, Drivers::Resolved(_))
    }

    /// Number of devices that have been attached as drivers.
    pub fn driver_count(&self) -> usize {
        match &self.drivers {
            Drivers::Unresolved(list) => list.len(),
            Drivers::Resolved(_) => 1,
        }
    }

    /// Record a device that wants to drive this node.
    ///
    /// Ignored once the node has been finalized.
    pub fn add_driver(&mut self, device: DeviceId) {
        if let Drivers::Unresolved(list) = &mut self.drivers {
            list.push(device);
        }
    }

    /// Commit the node's single driver.
    pub fn resolve_driver(&mut self, device: DeviceId) {
        self.drivers = Drivers::Resolved(device);
    }

    /// Devices reading this node.
    pub fn fanouts(&self) -> &[DeviceId] {
        &self.fanouts
    }

    /// Record a device reading this node; duplicates are ignored.
    pub fn add_fanout(&mut self, device: DeviceId) {
        if !self.fanouts.contains(&device) {
            self.fanouts.push(device);
        }
    }

    /// Transitions recorded since the last [`Node::initialize`].
    pub fn history(&self) -> &[Transition] {
        &self.history
    }

    /// Value of the node at time `t` according to its history.
    ///
    /// Changes at exactly `t` are included.
    pub fn value_at(&self, t: f64) -> Value {
        let idx = self.history.partition_point(|tr| tr.time <= t);
        match idx {
            0 => Value::X,
            i => self.history[i - 1].to,
        }
    }

    /// Pending contamination event, if any.
    pub fn pending_contaminate(&self) -> Option<&PendingEvent> {
        self.contaminate.as_ref()
    }

    /// Pending propagation event, if any.
    pub fn pending_propagate(&self) -> Option<&PendingEvent> {
        self.propagate.as_ref()
    }

    /// Whether any event for this node is still in the heap.
    pub fn has_pending(&self) -> bool {
        self.contaminate.is_some() || self.propagate.is_some()
    }

    pub(crate) fn set_pending_contaminate(&mut self, pending: Option<PendingEvent>) {
        self.contaminate = pending;
    }

    pub(crate) fn set_pending_propagate(&mut self, pending: Option<PendingEvent>) {
        self.propagate = pending;
    }

    /// Reset to X with no history and nothing pending.
    pub fn initialize(&mut self) {
        self.value = Value::X;
        self.history.clear();
        self.contaminate = None;
        self.propagate = None;
    }

    /// Record a change to `value` at `time` if it is one (or if forced).
    ///
    /// Returns whether the node changed, i.e. whether fanouts must be told.
    pub(crate) fn update(&mut self, time: f64, value: Value, force: bool) -> bool {
        if !force && value == self.value {
            return false;
        }
        self.history.push(Transition::new(time, self.value, value));
        self.value = value;
        true
    }
}
