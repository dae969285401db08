//! Error types for eventide-devices.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("unrecognized source type {0}")]
    UnknownWaveform(String),

    #[error("invalid source waveform: {0}")]
    InvalidWaveform(String),

    #[error("{device}: expected {expected} inputs, got {got}")]
    InputCount {
        device: String,
        expected: usize,
        got: usize,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
