//! Error types for eventide-sim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Core(#[from] eventide_core::Error),

    #[error(transparent)]
    Device(#[from] eventide_devices::Error),

    #[error(transparent)]
    Netlist(#[from] eventide_netlist::Error),

    #[error("unrecognized device type {0:?}")]
    UnrecognizedDevice(String),

    #[error("device {0} not yet implemented in the gate-level simulator")]
    NotImplemented(String),

    #[error("{device}: terminal {terminal:?} is not connected")]
    MissingTerminal { device: String, terminal: String },

    #[error("{0}: voltage source has no value")]
    MissingValue(String),

    #[error("node {0} is not connected to any output")]
    Unconnected(String),

    #[error("node {node} connects to more than one non-tristate output (devices: {devices})")]
    MultipleDrivers { node: String, devices: String },

    #[error("no {0} analysis with gate-level simulation")]
    Unsupported(&'static str),

    #[error("netlist has no components")]
    EmptyNetlist,

    #[error("stop time must be positive, got {0}")]
    InvalidStopTime(f64),
}

pub type Result<T> = std::result::Result<T, Error>;
