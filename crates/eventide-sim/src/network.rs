//! The simulated circuit: nodes, devices and the event loop.

use std::time::Instant;

use eventide_core::units::format_value;
use eventide_core::{
    Device, DeviceId, Drivers, Event, Handle, Node, NodeId, Timeline, Transition, Value,
};
use eventide_devices::{
    BUS, CONSTANT0, CONSTANT1, GROUND, GateFamily, GateTiming, LogicGate, Source, Thresholds,
    Waveform, gate_family,
};
use eventide_netlist::{Component, Netlist, Properties, SimOptions};
use indexmap::IndexMap;

use crate::error::{Error, Result};

/// Device types that are recognized but have no gate-level model.
const UNIMPLEMENTED: [&str; 4] = ["dlatch", "dlatchn", "dreg", "memory"];

/// Outcome of one [`Network::simulate`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum Slice {
    /// The wall-clock deadline passed; call `simulate` again to resume.
    Suspended {
        /// Simulated time reached, as a percentage of the stop time.
        percent: u8,
    },
    /// The run is over: stop time reached, queue drained, or cancelled.
    Finished {
        /// Why the run ended early, if it did for a reason worth reporting.
        message: Option<String>,
    },
}

/// Gate timing from component properties; anything absent is zero.
fn gate_timing(props: &Properties) -> GateTiming {
    GateTiming {
        tcd: props.tcd.unwrap_or(0.0),
        tpdr: props.tpdr.unwrap_or(0.0),
        tpdf: props.tpdf.unwrap_or(0.0),
        tr: props.tr.unwrap_or(0.0),
        tf: props.tf.unwrap_or(0.0),
        cin: props.cin.unwrap_or(0.0),
        cout: props.cout.unwrap_or(0.0),
    }
}

/// A loaded circuit and its simulation state.
#[derive(Debug)]
pub struct Network {
    timeline: Timeline,
    devices: Vec<Box<dyn Device>>,
    device_names: IndexMap<String, DeviceId>,
    type_counts: IndexMap<String, usize>,
    options: SimOptions,
    tstop: f64,
    stop_requested: bool,
    finished: bool,
    events_delivered: u64,
    instant: f64,
    instant_events: u64,
}

impl Network {
    /// Build a network from a netlist.
    ///
    /// Components are processed in declaration order. Every node is then
    /// finalized: each ends up with exactly one driver, with tristate
    /// drivers merged through a synthesized bus device.
    pub fn load(netlist: &Netlist, options: SimOptions) -> Result<Self> {
        let mut network = Self {
            timeline: Timeline::new(),
            devices: Vec::new(),
            device_names: IndexMap::new(),
            type_counts: IndexMap::new(),
            options,
            tstop: 0.0,
            stop_requested: false,
            finished: false,
            events_delivered: 0,
            instant: 0.0,
            instant_events: 0,
        };

        for (index, component) in netlist.components.iter().enumerate() {
            network.add_component(index, component)?;
        }

        let loaded = network.timeline.node_count();
        for index in 0..loaded {
            network.finalize_node(NodeId::new(index as u32))?;
        }

        let mut summary = format!("{} nodes", network.timeline.node_count());
        for (kind, count) in &network.type_counts {
            summary.push_str(&format!(", {count} {kind}"));
        }
        log::info!("{summary}");

        Ok(network)
    }

    fn add_component(&mut self, index: usize, component: &Component) -> Result<()> {
        let kind = component.kind.as_str();
        let name = component
            .name()
            .map(str::to_string)
            .unwrap_or_else(|| format!("{kind}#{index}"));
        *self.type_counts.entry(kind.to_string()).or_insert(0) += 1;

        // Every connection names a node, used by this device or not.
        let nodes: IndexMap<&str, NodeId> = component
            .connections
            .iter()
            .map(|(terminal, node)| (terminal.as_str(), self.timeline.node_or_insert(node)))
            .collect();
        let terminal = |t: &str| {
            nodes.get(t).copied().ok_or_else(|| Error::MissingTerminal {
                device: name.clone(),
                terminal: t.to_string(),
            })
        };

        let props = &component.properties;
        if let Some(family) = gate_family(kind) {
            let inputs = family
                .inputs
                .iter()
                .map(|&t| terminal(t))
                .collect::<Result<Vec<_>>>()?;
            let output = terminal(family.output)?;
            let lenient = props.lenient.unwrap_or(false);
            let gate = LogicGate::new(
                name.clone(),
                family,
                inputs.clone(),
                output,
                gate_timing(props),
                lenient,
            )?;
            self.attach(name, Box::new(gate), &inputs);
            return Ok(());
        }

        match kind {
            k if UNIMPLEMENTED.contains(&k) => Err(Error::NotImplemented(k.to_string())),
            "ground" | "constant0" | "constant1" => {
                let family = match kind {
                    "ground" => &GROUND,
                    "constant0" => &CONSTANT0,
                    _ => &CONSTANT1,
                };
                let output = terminal(family.output)?;
                self.add_constant(name, family, output, props)
            }
            "voltage source" => {
                let output = terminal("nplus")?;
                if self.timeline.node(output).driver_count() > 0 {
                    return Ok(());
                }
                let value = props
                    .value
                    .as_ref()
                    .ok_or_else(|| Error::MissingValue(name.clone()))?;
                let waveform = Waveform::from_descriptor(&value.kind, &value.args)?;
                let thresholds = Thresholds::new(self.options.vil, self.options.vih);
                let source = Source::new(name.clone(), output, waveform, thresholds);
                // The source listens to its own output.
                self.attach(name, Box::new(source), &[output]);
                Ok(())
            }
            other => Err(Error::UnrecognizedDevice(other.to_string())),
        }
    }

    /// Add a zero-input driver unless the node already has one, so repeated
    /// ground or supply symbols collapse to a single device.
    fn add_constant(
        &mut self,
        name: String,
        family: &'static GateFamily,
        output: NodeId,
        props: &Properties,
    ) -> Result<()> {
        if self.timeline.node(output).driver_count() > 0 {
            return Ok(());
        }
        let gate = LogicGate::new(name.clone(), family, Vec::new(), output, gate_timing(props), false)?;
        self.attach(name, Box::new(gate), &[]);
        Ok(())
    }

    /// Store a device and wire it to its nodes.
    fn attach(&mut self, name: String, device: Box<dyn Device>, fanins: &[NodeId]) -> DeviceId {
        let id = DeviceId::new(self.devices.len() as u32);
        for &node in fanins {
            self.timeline.node_mut(node).add_fanout(id);
        }
        for node in device.outputs() {
            self.timeline.node_mut(node).add_driver(id);
        }
        self.devices.push(device);
        if self.device_names.contains_key(&name) {
            log::warn!("duplicate device name {name}; lookups return the first");
        } else {
            self.device_names.insert(name, id);
        }
        id
    }

    fn finalize_node(&mut self, id: NodeId) -> Result<()> {
        let node = self.timeline.node(id);
        let drivers = match node.drivers() {
            Drivers::Unresolved(list) => list.clone(),
            Drivers::Resolved(_) => return Ok(()),
        };
        let fanouts = node.fanouts().to_vec();
        let name = node.name().to_string();

        if drivers.is_empty() && !fanouts.is_empty() {
            return Err(Error::Unconnected(name));
        }

        let mut capacitance = node.capacitance();
        if capacitance == 0.0 {
            let terminals = (drivers.len() + fanouts.len()) as f64;
            capacitance = self.options.c_intercept + self.options.c_slope * terminals;
        }
        capacitance += drivers
            .iter()
            .chain(&fanouts)
            .map(|d| self.devices[d.index()].capacitance(id))
            .sum::<f64>();
        self.timeline.node_mut(id).set_capacitance(capacitance);

        if let [driver] = drivers.as_slice() {
            if !self.devices[driver.index()].tristate(id) {
                self.timeline.node_mut(id).resolve_driver(*driver);
                return Ok(());
            }
        }

        if drivers.iter().any(|d| !self.devices[d.index()].tristate(id)) {
            let devices = drivers
                .iter()
                .map(|d| self.devices[d.index()].name())
                .collect::<Vec<_>>()
                .join(", ");
            return Err(Error::MultipleDrivers {
                node: name,
                devices,
            });
        }

        // Each tristate driver gets a private node; a bus device merges them
        // back onto this one.
        let mut inputs = Vec::with_capacity(drivers.len());
        for (i, &driver) in drivers.iter().enumerate() {
            let sub_name = self.unused_node_name(format!("{name}%{i}"));
            let sub = self.timeline.add_node(sub_name)?;
            self.timeline.node_mut(sub).set_capacitance(capacitance);
            self.devices[driver.index()].redirect_output(id, sub);
            self.timeline.node_mut(sub).resolve_driver(driver);
            inputs.push(sub);
        }

        let mut bus_name = format!("{name}%bus");
        while self.device_names.contains_key(&bus_name) {
            bus_name.push('%');
        }
        let bus = LogicGate::new(
            bus_name.clone(),
            &BUS,
            inputs.clone(),
            id,
            GateTiming::default(),
            false,
        )?;
        let bus_id = DeviceId::new(self.devices.len() as u32);
        for &sub in &inputs {
            self.timeline.node_mut(sub).add_fanout(bus_id);
        }
        self.devices.push(Box::new(bus));
        self.device_names.insert(bus_name, bus_id);
        self.timeline.node_mut(id).resolve_driver(bus_id);

        log::debug!("node {name}: {} tristate drivers merged by bus", inputs.len());
        Ok(())
    }

    /// `base`, or `base` with `%` appended until no netlist node has the name.
    fn unused_node_name(&self, mut base: String) -> String {
        while self.timeline.node_id(&base).is_some() {
            base.push('%');
        }
        base
    }

    /// Reset to t=0 and queue every device's initial events.
    ///
    /// The graph is kept, so a network can be run again from scratch.
    pub fn initialize(&mut self, tstop: f64) {
        self.tstop = tstop;
        self.stop_requested = false;
        self.finished = false;
        self.events_delivered = 0;
        self.instant = 0.0;
        self.instant_events = 0;

        self.timeline.reset();
        for device in &self.devices {
            device.initialize(&mut self.timeline);
        }
    }

    /// Deliver events in time order until the queue is empty, the next
    /// event lies beyond the stop time, or `deadline` passes.
    ///
    /// The wall clock is only consulted every
    /// [`events_per_check`](SimOptions::events_per_check) events. A
    /// suspended run resumes exactly where it left off on the next call.
    pub fn simulate(&mut self, deadline: Instant) -> Slice {
        if self.finished {
            return Slice::Finished { message: None };
        }
        if self.stop_requested {
            log::warn!("simulation stopped at t={}s", format_value(self.time()));
            return self.finish(None);
        }

        let mut since_check = 0;
        while let Some(t) = self.timeline.next_event_time() {
            if t > self.tstop {
                break;
            }
            let Some((handle, event)) = self.timeline.pop_event() else {
                break;
            };

            if let Some(message) = self.check_instant(event.time) {
                log::warn!("{message}");
                return self.finish(Some(message));
            }

            self.deliver(handle, &event);

            since_check += 1;
            if since_check >= self.options.events_per_check {
                since_check = 0;
                if Instant::now() >= deadline {
                    let percent = self.percent_complete();
                    log::debug!("suspended at {percent}% after {} events", self.events_delivered);
                    return Slice::Suspended { percent };
                }
            }
        }

        if self.timeline.pending_events() > 0 {
            self.timeline.advance_to(self.tstop);
        }
        log::info!(
            "simulation finished at t={}s after {} events",
            format_value(self.time()),
            self.events_delivered
        );
        self.finish(None)
    }

    /// Count deliveries at one instant. Too many means the circuit keeps
    /// re-triggering itself without time advancing.
    fn check_instant(&mut self, time: f64) -> Option<String> {
        if time == self.instant {
            self.instant_events += 1;
        } else {
            self.instant = time;
            self.instant_events = 1;
        }
        let limit = self.options.max_events_per_instant?;
        (self.instant_events > limit).then(|| {
            format!(
                "more than {limit} events at t={}s, probably a combinational cycle",
                format_value(time)
            )
        })
    }

    /// Apply an event and, if its node changed, hand it to every device
    /// reading that node.
    fn deliver(&mut self, handle: Handle, event: &Event) {
        self.events_delivered += 1;
        if !self.timeline.apply(handle, event) {
            return;
        }
        let count = self.timeline.node(event.node).fanouts().len();
        for i in 0..count {
            let device = self.timeline.node(event.node).fanouts()[i];
            self.devices[device.index()].process_event(event, &mut self.timeline);
        }
    }

    fn finish(&mut self, message: Option<String>) -> Slice {
        self.finished = true;
        Slice::Finished { message }
    }

    fn percent_complete(&self) -> u8 {
        if self.tstop <= 0.0 {
            return 100;
        }
        (100.0 * self.time() / self.tstop).round().clamp(0.0, 100.0) as u8
    }

    /// Ask the run to stop at its next suspension point.
    pub fn cancel(&mut self) {
        self.stop_requested = true;
    }

    /// Whether [`cancel`](Self::cancel) was called during this run.
    pub fn is_cancelled(&self) -> bool {
        self.stop_requested
    }

    /// Whether the last run has ended.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Current simulated time (s).
    pub fn time(&self) -> f64 {
        self.timeline.time()
    }

    /// Stop time of the current run (s).
    pub fn tstop(&self) -> f64 {
        self.tstop
    }

    /// Options the network was loaded with.
    pub fn options(&self) -> &SimOptions {
        &self.options
    }

    /// Events delivered since [`initialize`](Self::initialize).
    pub fn events_delivered(&self) -> u64 {
        self.events_delivered
    }

    /// Node state, for inspection.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&Node> {
        self.timeline.node_by_name(name)
    }

    /// Number of nodes, including synthesized bus nodes.
    pub fn node_count(&self) -> usize {
        self.timeline.node_count()
    }

    /// Transitions of a node since the run started.
    pub fn history(&self, name: &str) -> Option<&[Transition]> {
        self.node(name).map(Node::history)
    }

    /// Value of a node at time `t` according to its history.
    pub fn value_at(&self, name: &str, t: f64) -> Option<Value> {
        self.node(name).map(|n| n.value_at(t))
    }

    /// Look up a device by instance name.
    pub fn device(&self, name: &str) -> Option<&dyn Device> {
        self.device_names
            .get(name)
            .map(|id| self.devices[id.index()].as_ref())
    }

    /// Number of devices, including synthesized bus devices.
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// Device counts by netlist type, in first-seen order.
    pub fn type_counts(&self) -> &IndexMap<String, usize> {
        &self.type_counts
    }

    /// Names from `probes` that do not match any node.
    pub fn unknown_probes<'a>(&self, probes: &[&'a str]) -> Vec<&'a str> {
        probes
            .iter()
            .copied()
            .filter(|p| self.timeline.node_id(p).is_none())
            .collect()
    }
}
