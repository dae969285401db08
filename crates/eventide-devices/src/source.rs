//! Waveform-driven voltage sources.

use eventide_core::{Device, Event, EventKind, NodeId, Timeline, Value};

use crate::waveforms::{Thresholds, Waveform};

/// Drives one node from a waveform, producing an event at each threshold
/// crossing.
///
/// The source listens to its own output: each time the output settles it
/// schedules the next contamination and the next propagation.
#[derive(Debug, Clone)]
pub struct Source {
    name: String,
    output: NodeId,
    waveform: Waveform,
    thresholds: Thresholds,
    initial: Value,
}

impl Source {
    /// Create a source; its initial logic value is read from the first
    /// breakpoint through `thresholds`.
    pub fn new(
        name: impl Into<String>,
        output: NodeId,
        waveform: Waveform,
        thresholds: Thresholds,
    ) -> Self {
        let initial = thresholds.classify(waveform.initial_value());
        Self {
            name: name.into(),
            output,
            waveform,
            thresholds,
            initial,
        }
    }

    /// Node this source drives.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Logic value of the first breakpoint.
    pub fn initial_value(&self) -> Value {
        self.initial
    }

    fn schedule_next(&self, timeline: &mut Timeline) {
        let now = timeline.time();
        if let Some(t) = self.waveform.next_contamination(now, &self.thresholds) {
            timeline.c_event(self.output, t - now);
        }
        if let Some((t, v)) = self.waveform.next_propagation(now, &self.thresholds) {
            log::trace!("{}: next crossing to {} at {:e}", self.name, v, t);
            timeline.p_event(self.output, t - now, v, 0.0, false);
        }
    }
}

impl Device for Source {
    fn name(&self) -> &str {
        &self.name
    }

    fn device_type(&self) -> &str {
        "voltage source"
    }

    fn capacitance(&self, _node: NodeId) -> f64 {
        0.0
    }

    fn outputs(&self) -> Vec<NodeId> {
        vec![self.output]
    }

    fn initialize(&self, timeline: &mut Timeline) {
        if self.initial == Value::X {
            // The output never settles at t=0, so nothing would trigger the
            // first crossing search.
            self.schedule_next(timeline);
        } else {
            timeline.p_event(self.output, 0.0, self.initial, 0.0, false);
        }
    }

    fn process_event(&self, event: &Event, timeline: &mut Timeline) {
        if event.kind == EventKind::Propagate && event.node == self.output {
            self.schedule_next(timeline);
        }
    }

    fn redirect_output(&mut self, from: NodeId, to: NodeId) {
        if self.output == from {
            self.output = to;
        }
    }
}
