//! Source waveforms and their logic-threshold crossings.
//!
//! A source drives a digital node from an analog waveform. The node reads
//! 0 at or below `vil`, 1 at or above `vih`, and X in between, so the only
//! instants that matter are where the waveform crosses a threshold.

use eventide_core::Value;

use crate::error::{Error, Result};

/// Crossings closer than this to the current time are treated as already
/// past.
pub const CROSSING_EPSILON: f64 = 1e-13;

/// Logic thresholds (V).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thresholds {
    /// Highest voltage read as 0.
    pub vil: f64,
    /// Lowest voltage read as 1.
    pub vih: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self { vil: 0.1, vih: 0.9 }
    }
}

impl Thresholds {
    /// Thresholds reading `v <= vil` as 0 and `v >= vih` as 1.
    pub fn new(vil: f64, vih: f64) -> Self {
        Self { vil, vih }
    }

    /// Logic value of a voltage.
    pub fn classify(&self, v: f64) -> Value {
        if v <= self.vil {
            Value::Zero
        } else if v >= self.vih {
            Value::One
        } else {
            Value::X
        }
    }
}

/// A time-varying source waveform.
#[derive(Debug, Clone, PartialEq)]
pub enum Waveform {
    /// Constant value.
    Dc(f64),

    /// Piecewise linear: (time, value) breakpoints, linear in between and
    /// held flat outside.
    Pwl(Vec<(f64, f64)>),
}

impl Waveform {
    /// Build a waveform from a netlist descriptor such as
    /// `{"type": "pwl", "args": [0, 0, 1e-9, 1]}`.
    pub fn from_descriptor(kind: &str, args: &[f64]) -> Result<Self> {
        match kind {
            "dc" => match args.first() {
                Some(&v) => Ok(Waveform::Dc(v)),
                None => Err(Error::InvalidWaveform(
                    "dc source needs a value".to_string(),
                )),
            },
            "pwl" => {
                if args.is_empty() || args.len() % 2 != 0 {
                    return Err(Error::InvalidWaveform(format!(
                        "pwl source needs time/value pairs, got {} numbers",
                        args.len()
                    )));
                }
                let points: Vec<(f64, f64)> =
                    args.chunks_exact(2).map(|p| (p[0], p[1])).collect();
                if points.windows(2).any(|w| w[1].0 < w[0].0) {
                    return Err(Error::InvalidWaveform(
                        "pwl times must be non-decreasing".to_string(),
                    ));
                }
                Ok(Waveform::Pwl(points))
            }
            other => Err(Error::UnknownWaveform(other.to_string())),
        }
    }

    /// Value of the first breakpoint.
    pub fn initial_value(&self) -> f64 {
        match self {
            Waveform::Dc(v) => *v,
            Waveform::Pwl(points) => points.first().map_or(0.0, |p| p.1),
        }
    }

    /// First instant after `time` where the waveform leaves a valid logic
    /// level: falling below `vih` from 1, or rising above `vil` from 0.
    pub fn next_contamination(&self, time: f64, th: &Thresholds) -> Option<f64> {
        self.next_crossing(time, |v0, v1| {
            if v0 >= th.vih && v1 < th.vih {
                Some((th.vih, Value::X))
            } else if v0 <= th.vil && v1 > th.vil {
                Some((th.vil, Value::X))
            } else {
                None
            }
        })
        .map(|(t, _)| t)
    }

    /// First instant after `time` where the waveform reaches a valid logic
    /// level, with that level.
    pub fn next_propagation(&self, time: f64, th: &Thresholds) -> Option<(f64, Value)> {
        self.next_crossing(time, |v0, v1| {
            if v0 < th.vih && v1 >= th.vih {
                Some((th.vih, Value::One))
            } else if v0 > th.vil && v1 <= th.vil {
                Some((th.vil, Value::Zero))
            } else {
                None
            }
        })
    }

    /// Walk segments ending after `time` and return the first crossing that
    /// `crosses` recognizes and that lies strictly after `time`.
    fn next_crossing<F>(&self, time: f64, crosses: F) -> Option<(f64, Value)>
    where
        F: Fn(f64, f64) -> Option<(f64, Value)>,
    {
        let Waveform::Pwl(points) = self else {
            return None;
        };
        let time = time + CROSSING_EPSILON;

        points.windows(2).find_map(|w| {
            let ((t0, v0), (t1, v1)) = (w[0], w[1]);
            if time > t1 {
                return None;
            }
            let (level, value) = crosses(v0, v1)?;
            let t = t0 + (t1 - t0) * (level - v0) / (v1 - v0);
            (t > time).then_some((t, value))
        })
    }
}
