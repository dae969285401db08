//! Eventide command-line interface.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use eventide_core::units::parse_value;
use eventide_netlist::{Netlist, SimOptions};

mod analysis;
mod output;

#[derive(Parser)]
#[command(name = "eventide")]
#[command(about = "An event-driven gate-level logic simulator", long_about = None)]
#[command(version)]
struct Cli {
    /// Input netlist file (JSON)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Stop time, e.g. 100ns or 1e-6
    #[arg(short, long, default_value = "100ns")]
    tstop: String,

    /// Node to report; repeat for several (default: every named node)
    #[arg(short, long = "probe", value_name = "NODE")]
    probes: Vec<String>,

    /// Highest source voltage read as 0 (overrides the netlist)
    #[arg(long)]
    vil: Option<String>,

    /// Lowest source voltage read as 1 (overrides the netlist)
    #[arg(long)]
    vih: Option<String>,

    /// Events at one instant before reporting a combinational cycle
    /// (0 disables the check)
    #[arg(long, value_name = "COUNT")]
    max_events_per_instant: Option<u64>,

    /// Run DC operating point analysis instead (not supported at gate level)
    #[arg(short = 'o', long = "op")]
    dc_op: bool,

    /// Verbose output; repeat for more
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    if let Some(ref input) = cli.input {
        run_simulation(input, &cli)?;
    } else {
        println!("Eventide - Gate-Level Logic Simulator");
        println!();
        println!("Usage: eventide <netlist.json> [options]");
        println!();
        println!("Options:");
        println!("  -t, --tstop <TIME>   Stop time (default 100ns)");
        println!("  -p, --probe <NODE>   Node to report (repeatable)");
        println!("  --vil, --vih <V>     Logic thresholds for sources");
        println!("  -o, --op             DC operating point (unsupported)");
        println!("  -v, --verbose        Verbose output");
        println!("  -h, --help           Show help");
        println!("  -V, --version        Show version");
    }

    Ok(())
}

fn run_simulation(input: &Path, cli: &Cli) -> Result<()> {
    let netlist = Netlist::from_path(input)
        .with_context(|| format!("Failed to load netlist: {}", input.display()))?;
    let options = build_options(&netlist.options, cli)?;

    if cli.dc_op {
        eventide_sim::dc_analysis(&netlist, Some(&options))?;
        return Ok(());
    }

    let tstop = parse_quantity(&cli.tstop, "--tstop")?;
    let probes: Vec<&str> = cli.probes.iter().map(String::as_str).collect();
    analysis::run_transient(&netlist, tstop, &probes, &options)
}

/// Netlist options with command-line overrides applied.
fn build_options(base: &SimOptions, cli: &Cli) -> Result<SimOptions> {
    let mut options = base.clone();
    if let Some(ref vil) = cli.vil {
        options.vil = parse_quantity(vil, "--vil")?;
    }
    if let Some(ref vih) = cli.vih {
        options.vih = parse_quantity(vih, "--vih")?;
    }
    if let Some(max) = cli.max_events_per_instant {
        options.max_events_per_instant = (max > 0).then_some(max);
    }
    if options.vil >= options.vih {
        bail!("vil ({}) must be below vih ({})", options.vil, options.vih);
    }
    Ok(options)
}

fn parse_quantity(text: &str, flag: &str) -> Result<f64> {
    parse_value(text).with_context(|| format!("Invalid value for {flag}: {text:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("eventide").chain(args.iter().copied()))
    }

    #[test]
    fn test_defaults() {
        let args = cli(&["circuit.json"]);
        assert_eq!(args.tstop, "100ns");
        assert!(args.probes.is_empty());
        let options = build_options(&SimOptions::default(), &args).unwrap();
        assert_eq!(options, SimOptions::default());
    }

    #[test]
    fn test_overrides() {
        let args = cli(&[
            "circuit.json",
            "-p",
            "a",
            "--probe",
            "b",
            "--vil",
            "0.3V",
            "--max-events-per-instant",
            "0",
            "-vv",
        ]);
        assert_eq!(args.probes, vec!["a", "b"]);
        assert_eq!(args.verbose, 2);

        let options = build_options(&SimOptions::default(), &args).unwrap();
        assert!((options.vil - 0.3).abs() < 1e-12);
        assert_eq!(options.vih, 0.9);
        assert_eq!(options.max_events_per_instant, None);
    }

    #[test]
    fn test_bad_thresholds() {
        let inverted = cli(&["circuit.json", "--vil", "0.95"]);
        assert!(build_options(&SimOptions::default(), &inverted).is_err());

        let garbled = cli(&["circuit.json", "--vih", "high"]);
        assert!(build_options(&SimOptions::default(), &garbled).is_err());
    }
}
