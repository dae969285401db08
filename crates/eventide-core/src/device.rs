//! The device seam between the engine and the device models.

use std::fmt;

use crate::event::Event;
use crate::node::NodeId;
use crate::timeline::Timeline;

/// Index of a device in its network's device arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DeviceId(pub(crate) u32);

impl DeviceId {
    /// Create a new DeviceId from a raw value.
    pub fn new(id: u32) -> Self {
        DeviceId(id)
    }

    /// Get the raw device ID value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Arena index.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "d{}", self.0)
    }
}

/// An active element: observes events on its input nodes and schedules
/// events on its output node.
///
/// Devices refer to nodes by [`NodeId`] and never own them; all node state
/// lives in the [`Timeline`] handed to each call.
pub trait Device: fmt::Debug {
    /// Instance name (e.g. "U3").
    fn name(&self) -> &str;

    /// Netlist type this device was built from (e.g. "nand2").
    fn device_type(&self) -> &str;

    /// Capacitance this device adds to `node` through its terminal (F).
    fn capacitance(&self, node: NodeId) -> f64;

    /// Whether `node` is a tristate output of this device.
    fn tristate(&self, _node: NodeId) -> bool {
        false
    }

    /// Nodes this device drives.
    fn outputs(&self) -> Vec<NodeId>;

    /// Queue this device's t=0 events. Nodes have already been reset.
    fn initialize(&self, timeline: &mut Timeline);

    /// React to an event delivered to one of the nodes this device reads.
    fn process_event(&self, event: &Event, timeline: &mut Timeline);

    /// Drive `to` instead of `from`. Used when a shared bus is split into
    /// per-driver nodes.
    fn redirect_output(&mut self, _from: NodeId, _to: NodeId) {}
}
