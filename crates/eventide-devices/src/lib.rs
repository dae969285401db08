//! Device models for Eventide.
//!
//! This crate provides:
//! - Static decision tables for four-valued logic
//! - Combinational logic gates, including tristate buffers and the bus
//!   resolver that merges tristate drivers
//! - Waveform sources with threshold-crossing events

pub mod error;
pub mod gate;
pub mod source;
pub mod table;
pub mod waveforms;

pub use error::{Error, Result};
pub use gate::{
    BUS, CONSTANT0, CONSTANT1, GROUND, GateFamily, GateTiming, LogicGate, gate_families,
    gate_family,
};
pub use source::Source;
pub use table::Table;
pub use waveforms::{Thresholds, Waveform};
