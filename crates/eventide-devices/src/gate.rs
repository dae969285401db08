//! Combinational logic gates.

use std::sync::LazyLock;

use eventide_core::{Device, Event, EventKind, NodeId, Timeline, Value};
use indexmap::IndexMap;

use crate::error::{Error, Result};
use crate::table::{self, Table};

/// A kind of gate: terminal names plus the decision table shared by every
/// instance.
#[derive(Debug)]
pub struct GateFamily {
    /// Netlist type name (e.g. "nand2").
    pub name: &'static str,
    /// Input terminal names, in table order.
    pub inputs: &'static [&'static str],
    /// Output terminal name.
    pub output: &'static str,
    /// Decision table.
    pub table: &'static Table,
    /// Whether the output can float (Z).
    pub tristate: bool,
    /// Whether any number of inputs is accepted.
    pub variadic: bool,
}

impl GateFamily {
    const fn new(
        name: &'static str,
        inputs: &'static [&'static str],
        table: &'static Table,
    ) -> Self {
        Self {
            name,
            inputs,
            output: "z",
            table,
            tristate: false,
            variadic: false,
        }
    }

    /// Whether an instance may have `count` inputs.
    pub fn accepts(&self, count: usize) -> bool {
        self.variadic || count == self.inputs.len()
    }
}

/// Ground symbol: drives its `gnd` terminal to 0.
pub static GROUND: GateFamily = GateFamily {
    name: "ground",
    inputs: &[],
    output: "gnd",
    table: &table::LOW,
    tristate: false,
    variadic: false,
};

/// Constant 0 driver.
pub static CONSTANT0: GateFamily = GateFamily::new("constant0", &[], &table::LOW);

/// Constant 1 driver.
pub static CONSTANT1: GateFamily = GateFamily::new("constant1", &[], &table::HIGH);

/// Resolution device added when several tristate outputs share a node.
/// Its inputs are the per-driver nodes, so it has no fixed terminal list.
pub static BUS: GateFamily = GateFamily {
    variadic: true,
    ..GateFamily::new("BUS", &[], &table::BUS)
};

static GATES: LazyLock<IndexMap<&'static str, GateFamily>> = LazyLock::new(|| {
    const AB: &[&str] = &["a", "b"];
    const ABC: &[&str] = &["a", "b", "c"];
    const ABCD: &[&str] = &["a", "b", "c", "d"];

    [
        GateFamily::new("and2", AB, &table::AND),
        GateFamily::new("and3", ABC, &table::AND),
        GateFamily::new("and4", ABCD, &table::AND),
        GateFamily::new("buffer", &["a"], &table::AND),
        GateFamily::new("inv", &["a"], &table::NAND),
        GateFamily::new("mux2", &["s", "d0", "d1"], &table::MUX2),
        GateFamily::new("mux4", &["s0", "s1", "d0", "d1", "d2", "d3"], &table::MUX4),
        GateFamily::new("nand2", AB, &table::NAND),
        GateFamily::new("nand3", ABC, &table::NAND),
        GateFamily::new("nand4", ABCD, &table::NAND),
        GateFamily::new("nor2", AB, &table::NOR),
        GateFamily::new("nor3", ABC, &table::NOR),
        GateFamily::new("nor4", ABCD, &table::NOR),
        GateFamily::new("or2", AB, &table::OR),
        GateFamily::new("or3", ABC, &table::OR),
        GateFamily::new("or4", ABCD, &table::OR),
        GateFamily {
            tristate: true,
            ..GateFamily::new("tristate", &["e", "a"], &table::TRISTATE_BUFFER)
        },
        GateFamily::new("xor2", AB, &table::XOR),
        GateFamily::new("xnor2", AB, &table::XNOR),
    ]
    .into_iter()
    .map(|f| (f.name, f))
    .collect()
});

/// Look up a combinational gate family by netlist type.
pub fn gate_family(name: &str) -> Option<&'static GateFamily> {
    GATES.get(name)
}

/// All combinational gate families, in registry order.
pub fn gate_families() -> impl Iterator<Item = &'static GateFamily> {
    GATES.values()
}

/// Per-instance timing and loading.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GateTiming {
    /// Contamination delay (s).
    pub tcd: f64,
    /// Rising propagation delay (s).
    pub tpdr: f64,
    /// Falling propagation delay (s).
    pub tpdf: f64,
    /// Rising drive: extra delay per farad of load (s/F).
    pub tr: f64,
    /// Falling drive (s/F).
    pub tf: f64,
    /// Input terminal capacitance (F).
    pub cin: f64,
    /// Output terminal capacitance (F).
    pub cout: f64,
}

impl GateTiming {
    /// Propagation delay and drive for an output heading to `value`.
    pub fn delay_for(&self, value: Value) -> (f64, f64) {
        match value {
            Value::One => (self.tpdr, self.tr),
            Value::Zero => (self.tpdf, self.tf),
            Value::X | Value::Z => (self.tpdr.min(self.tpdf), 0.0),
        }
    }
}

/// A combinational gate instance.
#[derive(Debug, Clone)]
pub struct LogicGate {
    name: String,
    family: &'static GateFamily,
    inputs: Vec<NodeId>,
    output: NodeId,
    timing: GateTiming,
    lenient: bool,
}

impl LogicGate {
    /// Create a gate. Registering it as a driver and fanout of its nodes is
    /// up to the caller.
    pub fn new(
        name: impl Into<String>,
        family: &'static GateFamily,
        inputs: Vec<NodeId>,
        output: NodeId,
        timing: GateTiming,
        lenient: bool,
    ) -> Result<Self> {
        let name = name.into();
        if !family.accepts(inputs.len()) {
            return Err(Error::InputCount {
                device: name,
                expected: family.inputs.len(),
                got: inputs.len(),
            });
        }
        Ok(Self {
            name,
            family,
            inputs,
            output,
            timing,
            lenient,
        })
    }

    /// Family this gate belongs to.
    pub fn family(&self) -> &'static GateFamily {
        self.family
    }

    /// Input nodes in table order.
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Output node.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Timing parameters.
    pub fn timing(&self) -> &GateTiming {
        &self.timing
    }

    /// Whether the gate may drop events that cannot change its output.
    pub fn is_lenient(&self) -> bool {
        self.lenient
    }

    /// Evaluate the decision table against the current input values.
    pub fn logic_eval(&self, timeline: &Timeline) -> Value {
        self.family
            .table
            .eval(self.inputs.iter().map(|&n| timeline.node(n).value()))
    }

    /// A lenient gate leaves the output alone when an input goes X but the
    /// output is already headed for (or sitting at) the value the gate
    /// computes anyway.
    fn contamination_is_invisible(&self, timeline: &Timeline) -> bool {
        if !self.lenient {
            return false;
        }
        let v = self.logic_eval(timeline);
        let out = timeline.node(self.output);
        match out.pending_propagate() {
            None => out.pending_contaminate().is_none() && v == out.value(),
            Some(pd) => pd.value == v,
        }
    }
}

impl Device for LogicGate {
    fn name(&self) -> &str {
        &self.name
    }

    fn device_type(&self) -> &str {
        self.family.name
    }

    fn capacitance(&self, node: NodeId) -> f64 {
        if node == self.output {
            self.timing.cout
        } else if self.inputs.contains(&node) {
            self.timing.cin
        } else {
            0.0
        }
    }

    fn tristate(&self, node: NodeId) -> bool {
        self.family.tristate && node == self.output
    }

    fn outputs(&self) -> Vec<NodeId> {
        vec![self.output]
    }

    fn initialize(&self, timeline: &mut Timeline) {
        if self.inputs.is_empty() {
            let v = self.family.table.result();
            timeline.schedule_forced(self.output, v);
        }
    }

    fn process_event(&self, event: &Event, timeline: &mut Timeline) {
        match event.kind {
            EventKind::Contaminate => {
                if !self.contamination_is_invisible(timeline) {
                    timeline.c_event(self.output, self.timing.tcd);
                }
            }
            EventKind::Propagate => {
                let v = self.logic_eval(timeline);
                let out = timeline.node(self.output);
                if !self.lenient || v != out.value() || out.has_pending() {
                    let (tpd, drive) = self.timing.delay_for(v);
                    timeline.p_event(self.output, tpd, v, drive, self.lenient);
                }
            }
        }
    }

    fn redirect_output(&mut self, from: NodeId, to: NodeId) {
        if self.output == from {
            self.output = to;
        }
    }
}
