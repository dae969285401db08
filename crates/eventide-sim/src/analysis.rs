//! Analysis entry points.

use std::time::{Duration, Instant};

use eventide_netlist::{Netlist, SimOptions};

use crate::error::{Error, Result};
use crate::network::{Network, Slice};

/// What the progress callback is told.
#[derive(Debug)]
pub enum Progress<'a> {
    /// The run paused to let the host breathe.
    Running {
        /// Simulated time reached, as a percentage of the stop time.
        percent: u8,
    },
    /// The run is over. Sent exactly once.
    Finished {
        network: &'a Network,
        /// Why the run ended early, if it did for a reason worth reporting.
        message: Option<&'a str>,
    },
}

/// The callback's answer to [`Progress::Running`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Control {
    #[default]
    Continue,
    /// Stop at the next suspension point.
    Stop,
}

/// Run a transient simulation from t=0 to `tstop`.
///
/// `callback` sees a [`Progress::Running`] report whenever the run pauses
/// (every [`update_interval_ms`](SimOptions::update_interval_ms) of wall
/// clock) and one final [`Progress::Finished`]. `probes` name the nodes the
/// caller intends to inspect; unknown names are logged. `options` default to
/// the ones carried by the netlist.
///
/// Faults in the netlist are returned as `Err` before any callback; once
/// the run starts it always ends in exactly one [`Progress::Finished`]. The
/// finished network is returned for history queries.
pub fn transient_analysis<F>(
    netlist: &Netlist,
    tstop: f64,
    probes: &[&str],
    mut callback: F,
    options: Option<&SimOptions>,
) -> Result<Network>
where
    F: FnMut(Progress<'_>) -> Control,
{
    if netlist.is_empty() {
        return Err(Error::EmptyNetlist);
    }
    if !(tstop > 0.0 && tstop.is_finite()) {
        return Err(Error::InvalidStopTime(tstop));
    }

    let options = options.unwrap_or(&netlist.options).clone();
    let interval = Duration::from_millis(options.update_interval_ms);
    let mut network = Network::load(netlist, options)?;

    for probe in network.unknown_probes(probes) {
        log::warn!("probe {probe} does not name a node");
    }

    network.initialize(tstop);
    loop {
        match network.simulate(Instant::now() + interval) {
            Slice::Suspended { percent } => {
                if callback(Progress::Running { percent }) == Control::Stop {
                    network.cancel();
                }
            }
            Slice::Finished { message } => {
                callback(Progress::Finished {
                    network: &network,
                    message: message.as_deref(),
                });
                return Ok(network);
            }
        }
    }
}

/// DC analysis has no meaning at gate level.
pub fn dc_analysis(_netlist: &Netlist, _options: Option<&SimOptions>) -> Result<Network> {
    Err(Error::Unsupported("DC"))
}

/// AC analysis has no meaning at gate level.
pub fn ac_analysis(
    _netlist: &Netlist,
    _fstart: f64,
    _fstop: f64,
    _source: &str,
    _options: Option<&SimOptions>,
) -> Result<Network> {
    Err(Error::Unsupported("AC"))
}

#[cfg(test)]
mod tests {
    use eventide_netlist::Component;

    use super::*;

    fn one_gate() -> Netlist {
        Netlist::new()
            .with(Component::new("constant1").connect("z", "vdd"))
            .with(Component::new("inv").connect("a", "vdd").connect("z", "out"))
    }

    #[test]
    fn test_dc_and_ac_fail() {
        let netlist = one_gate();
        assert!(matches!(dc_analysis(&netlist, None), Err(Error::Unsupported("DC"))));
        assert!(matches!(
            ac_analysis(&netlist, 1.0, 1e6, "V1", None),
            Err(Error::Unsupported("AC"))
        ));
    }

    #[test]
    fn test_rejects_bad_arguments() {
        let noop = |_: Progress<'_>| Control::Continue;
        assert!(matches!(
            transient_analysis(&Netlist::new(), 1e-9, &[], noop, None),
            Err(Error::EmptyNetlist)
        ));
        assert!(matches!(
            transient_analysis(&one_gate(), 0.0, &[], noop, None),
            Err(Error::InvalidStopTime(_))
        ));
        assert!(matches!(
            transient_analysis(&one_gate(), f64::NAN, &[], noop, None),
            Err(Error::InvalidStopTime(_))
        ));
    }

    #[test]
    fn test_single_finished_callback() {
        let mut finished = 0;
        let network = transient_analysis(
            &one_gate(),
            1e-9,
            &["out", "nowhere"],
            |progress| {
                if let Progress::Finished { message, .. } = progress {
                    assert_eq!(message, None);
                    finished += 1;
                }
                Control::Continue
            },
            None,
        )
        .unwrap();
        assert_eq!(finished, 1);
        assert_eq!(network.value_at("out", 1e-9), Some(eventide_core::Value::Zero));
    }

    #[test]
    fn test_finished_once_after_many_pauses() {
        let options = SimOptions {
            update_interval_ms: 0,
            events_per_check: 1,
            ..SimOptions::default()
        };
        let (mut running, mut finished) = (0, 0);
        let network = transient_analysis(
            &one_gate(),
            1e-9,
            &[],
            |progress| {
                match progress {
                    Progress::Running { .. } => running += 1,
                    Progress::Finished { .. } => finished += 1,
                }
                Control::Continue
            },
            Some(&options),
        )
        .unwrap();
        assert!(running >= 2, "running = {running}");
        assert_eq!(finished, 1);
        assert!(network.is_finished());
    }
}
