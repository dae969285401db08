//! Output formatting for simulation results.

use eventide_core::Transition;
use eventide_core::units::format_value;
use eventide_sim::Network;

/// Nodes to print: the probes that exist, or every node except the private
/// ones synthesized for tristate buses.
pub fn report_nodes<'a>(network: &'a Network, probes: &[&'a str]) -> Vec<&'a str> {
    if probes.is_empty() {
        network
            .timeline()
            .nodes()
            .map(|(_, node)| node.name())
            .filter(|name| !name.contains('%'))
            .collect()
    } else {
        probes
            .iter()
            .copied()
            .filter(|p| network.node(p).is_some())
            .collect()
    }
}

/// One history line: time and the old and new values.
pub fn format_transition(t: &Transition) -> String {
    format!("{:>12}s  {} -> {}", format_value(t.time), t.from, t.to)
}

pub fn print_histories(network: &Network, nodes: &[&str]) {
    for name in nodes {
        let Some(history) = network.history(name) else {
            continue;
        };
        println!("{name}: {} transitions", history.len());
        for t in history {
            println!("  {}", format_transition(t));
        }
    }
}

#[cfg(test)]
mod tests {
    use eventide_core::Value;

    use super::*;

    #[test]
    fn test_format_transition() {
        let t = Transition::new(1.5e-9, Value::X, Value::One);
        assert_eq!(format_transition(&t), "     1.5000ns  X -> 1");
    }
}
