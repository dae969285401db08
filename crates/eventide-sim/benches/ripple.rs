//! Benchmarks for the event loop on a ripple-carry adder.

use std::time::{Duration, Instant};

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use eventide_netlist::{Component, Netlist, SimOptions, SourceValue};
use eventide_sim::{Network, Slice};

const NS: f64 = 1e-9;

fn gate(kind: &str, name: String, pins: &[(&str, String)]) -> Component {
    pins.iter()
        .fold(Component::new(kind).named(name), |c, (t, n)| c.connect(*t, n.clone()))
        .delays(10e-12, 50e-12, 40e-12)
}

/// An n-bit adder computing all-ones + 0, with b0 rising at 1ns so the
/// carry ripples through every stage.
fn ripple_adder(bits: usize) -> Netlist {
    let mut netlist = Netlist::new().with(Component::new("ground").connect("gnd", "gnd"));

    for i in 0..bits {
        netlist.push(
            Component::new("voltage source")
                .named(format!("Va{i}"))
                .connect("nplus", format!("a{i}"))
                .value(SourceValue::dc(1.0)),
        );
        let b = if i == 0 {
            SourceValue::pwl(&[(0.0, 0.0), (NS, 0.0), (1.1 * NS, 1.0)])
        } else {
            SourceValue::dc(0.0)
        };
        netlist.push(
            Component::new("voltage source")
                .named(format!("Vb{i}"))
                .connect("nplus", format!("b{i}"))
                .value(b),
        );
    }

    for i in 0..bits {
        let (a, b) = (format!("a{i}"), format!("b{i}"));
        let cin = if i == 0 { "gnd".to_string() } else { format!("c{i}") };
        let cout = format!("c{}", i + 1);
        let p = format!("p{i}");

        netlist.push(gate("xor2", format!("X{i}"), &[("a", a.clone()), ("b", b.clone()), ("z", p.clone())]));
        netlist.push(gate("xor2", format!("S{i}"), &[("a", p.clone()), ("b", cin.clone()), ("z", format!("s{i}"))]));
        netlist.push(gate("and2", format!("G{i}"), &[("a", a), ("b", b), ("z", format!("g{i}"))]));
        netlist.push(gate("and2", format!("P{i}"), &[("a", p), ("b", cin), ("z", format!("t{i}"))]));
        netlist.push(gate("or2", format!("C{i}"), &[("a", format!("g{i}")), ("b", format!("t{i}")), ("z", cout)]));
    }
    netlist
}

fn bench_ripple(c: &mut Criterion) {
    let mut group = c.benchmark_group("ripple_adder");

    for bits in [8, 32, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(bits), &bits, |bencher, &bits| {
            let netlist = ripple_adder(bits);
            let mut network = Network::load(&netlist, SimOptions::default()).unwrap();

            bencher.iter(|| {
                network.initialize(black_box(100.0 * NS));
                let deadline = Instant::now() + Duration::from_secs(60);
                let slice = network.simulate(deadline);
                assert!(matches!(slice, Slice::Finished { message: None }));
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_ripple);
criterion_main!(benches);
