//! Core simulation state for Eventide.
//!
//! This crate provides the pieces every other Eventide crate builds on:
//! four-valued logic values, scheduled events, the event heap, nodes, and
//! the [`Timeline`] that ties nodes and the heap to simulated time. The
//! [`Device`] trait is the seam device models plug into.

pub mod device;
pub mod error;
pub mod event;
pub mod heap;
pub mod node;
pub mod timeline;
pub mod units;
pub mod value;

pub use device::{Device, DeviceId};
pub use error::{Error, Result};
pub use event::{Event, EventKind, PendingEvent};
pub use heap::{Handle, Heap, Prioritized};
pub use node::{Drivers, Node, NodeId};
pub use timeline::Timeline;
pub use value::{Transition, Value};
