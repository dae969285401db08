//! # Eventide
//!
//! A discrete-event, gate-level logic simulator written in Rust.
//!
//! Eventide computes, for every wire in a circuit, the sequence of
//! four-valued (0, 1, X, Z) transitions over simulated time:
//! - JSON netlists of logic gates, tristate buffers and waveform sources
//! - Contamination and propagation delays with capacitive loading
//! - Automatic bus resolution for nodes shared by tristate outputs
//! - Resumable simulation slices with progress reporting and cancellation
//!
//! ## Quick Start
//!
//! ```rust
//! use eventide::prelude::*;
//!
//! let netlist = Netlist::from_json(r#"[
//!     {"type": "constant1", "connections": {"z": "vdd"}},
//!     {"type": "inv", "connections": {"a": "vdd", "z": "out"},
//!      "properties": {"tpdr": "20ps", "tpdf": "15ps"}}
//! ]"#).unwrap();
//!
//! let network = transient_analysis(&netlist, 1e-9, &["out"], |_| Control::Continue, None)
//!     .unwrap();
//! assert_eq!(network.value_at("out", 1e-9), Some(Value::Zero));
//! ```

// Re-export member crates
pub use eventide_core as core;
pub use eventide_devices as devices;
pub use eventide_netlist as netlist;
pub use eventide_sim as sim;

// ============================================================================
// Convenient re-exports from eventide_core
// ============================================================================

pub use eventide_core::{
    Device,
    DeviceId,
    // Errors
    Error as CoreError,
    Event,
    EventKind,
    Node,
    NodeId,
    Timeline,
    Transition,
    Value,
};

pub use eventide_core::units::{format_value, parse_value};

// ============================================================================
// Convenient re-exports from eventide_devices
// ============================================================================

pub use eventide_devices::{
    // Errors
    Error as DeviceError,
    GateFamily,
    GateTiming,
    LogicGate,
    Source,
    Table,
    Thresholds,
    Waveform,
    gate_family,
};

// ============================================================================
// Convenient re-exports from eventide_netlist
// ============================================================================

pub use eventide_netlist::{
    Component,
    // Errors
    Error as NetlistError,
    Netlist,
    Properties,
    SimOptions,
    SourceValue,
};

// ============================================================================
// Convenient re-exports from eventide_sim
// ============================================================================

pub use eventide_sim::{
    Control,
    // Errors
    Error as SimError,
    Network,
    Progress,
    Slice,
    ac_analysis,
    dc_analysis,
    transient_analysis,
};

// ============================================================================
// Prelude module for convenient imports
// ============================================================================

/// Prelude module containing commonly used types.
///
/// ```rust
/// use eventide::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::{NodeId, Transition, Value};

    // Netlist
    pub use crate::{Component, Netlist, SimOptions, SourceValue};

    // Simulation
    pub use crate::{Control, Network, Progress, Slice, transient_analysis};
}
