//! Event-driven gate-level simulation for Eventide.
//!
//! This crate provides:
//! - [`Network`]: loads a netlist, resolves drivers (synthesizing buses for
//!   tristate outputs) and runs the event loop in resumable slices
//! - [`transient_analysis`]: drives a network to its stop time, reporting
//!   progress through a callback
//! - DC and AC entry points that fail immediately

pub mod analysis;
pub mod error;
pub mod network;

pub use analysis::{Control, Progress, ac_analysis, dc_analysis, transient_analysis};
pub use error::{Error, Result};
pub use eventide_netlist::SimOptions;
pub use network::{Network, Slice};
