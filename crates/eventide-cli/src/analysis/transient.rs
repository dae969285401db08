//! Transient analysis.

use anyhow::Result;
use eventide_core::units::format_value;
use eventide_netlist::{Netlist, SimOptions};
use eventide_sim::{Control, Progress, transient_analysis};

use crate::output::{print_histories, report_nodes};

/// Run transient analysis and print the histories of the probed nodes.
pub fn run_transient(
    netlist: &Netlist,
    tstop: f64,
    probes: &[&str],
    options: &SimOptions,
) -> Result<()> {
    println!("Transient Analysis (tstop = {}s)", format_value(tstop));
    println!("==========================================");
    println!();

    let mut outcome = None;
    let network = transient_analysis(
        netlist,
        tstop,
        probes,
        |progress| {
            match progress {
                Progress::Running { percent } => log::info!("{percent}% complete"),
                Progress::Finished { message, .. } => outcome = message.map(str::to_string),
            }
            Control::Continue
        },
        Some(options),
    )?;

    if let Some(message) = outcome {
        eprintln!("Warning: {message}");
    }

    let nodes = report_nodes(&network, probes);
    print_histories(&network, &nodes);

    println!();
    println!(
        "Simulation complete ({} events, t = {}s).",
        network.events_delivered(),
        format_value(network.time())
    );
    Ok(())
}
