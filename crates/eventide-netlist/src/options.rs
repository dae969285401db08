//! Simulation options.

use serde::Deserialize;

use crate::quantity::quantity;

/// Tunables for a simulation run.
///
/// Read from the `options` object of a netlist file; any field left out
/// takes its default.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SimOptions {
    /// Highest source voltage read as logic 0 (V).
    #[serde(deserialize_with = "quantity")]
    pub vil: f64,
    /// Lowest source voltage read as logic 1 (V).
    #[serde(deserialize_with = "quantity")]
    pub vih: f64,
    /// Interconnect capacitance per terminal on a node (F).
    #[serde(deserialize_with = "quantity")]
    pub c_slope: f64,
    /// Fixed interconnect capacitance per node (F).
    #[serde(deserialize_with = "quantity")]
    pub c_intercept: f64,
    /// Wall-clock time between progress reports (ms).
    pub update_interval_ms: u64,
    /// Events delivered between wall-clock checks.
    pub events_per_check: usize,
    /// Consecutive events at one instant before the run is declared a
    /// combinational cycle. `None` disables the check.
    pub max_events_per_instant: Option<u64>,
}

impl Default for SimOptions {
    fn default() -> Self {
        Self {
            vil: 0.1,
            vih: 0.9,
            c_slope: 0.0,
            c_intercept: 0.0,
            update_interval_ms: 250,
            events_per_check: 1000,
            max_events_per_instant: Some(1_000_000),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let opts: SimOptions = serde_json::from_str("{}").unwrap();
        assert_eq!(opts, SimOptions::default());
        assert_eq!(opts.update_interval_ms, 250);
        assert_eq!(opts.max_events_per_instant, Some(1_000_000));
    }

    #[test]
    fn test_partial_with_units() {
        let opts: SimOptions =
            serde_json::from_str(r#"{"vil": "0.2V", "c_slope": "1f", "max_events_per_instant": null}"#)
                .unwrap();
        assert!((opts.vil - 0.2).abs() < 1e-12);
        assert_eq!(opts.vih, 0.9);
        assert!((opts.c_slope - 1e-15).abs() < 1e-27);
        assert_eq!(opts.max_events_per_instant, None);
    }
}
