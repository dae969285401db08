//! Analysis runners.

pub mod transient;

pub use transient::run_transient;
