//! Benchmarks for the stacking and force layout engines.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use sentiscope_layout::{jitter, AxisForce, Collide, Node, Simulation, Stack};

// =============================================================================
// Force Layout Benchmarks
// =============================================================================

fn clustered_nodes(count: u64) -> Vec<Node<u64>> {
    (0..count)
        .map(|i| {
            let (jx, jy) = jitter(42, i);
            Node::new(i % 3, 400.0 + jx * 50.0, 350.0 + jy * 50.0)
        })
        .collect()
}

fn bench_force_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("force_run_120");

    for size in [10u64, 100, 500, 1000].iter() {
        group.bench_with_input(BenchmarkId::from_parameter(size), size, |b, &size| {
            b.iter(|| {
                let mut sim = Simulation::new(clustered_nodes(size), (400.0, 350.0))
                    .with_force("x", AxisForce::x(400.0).strength(0.05))
                    .with_force(
                        "y",
                        AxisForce::y(350.0)
                            .target(|g: &u64| Some(150.0 + *g as f64 * 200.0))
                            .strength(0.3),
                    )
                    .with_force("collide", Collide::new(8.0));
                black_box(sim.run(120))
            });
        });
    }

    group.finish();
}

// =============================================================================
// Stacking Benchmarks
// =============================================================================

fn bench_stack_wiggle(c: &mut Criterion) {
    let mut group = c.benchmark_group("stack_wiggle");
    let keys = ["GPT-4", "Gemini", "PaLM-2", "Claude", "LLaMA-3.1"];

    for columns in [12usize, 120, 1200].iter() {
        let rows: Vec<(f64, Vec<f64>)> = (0..*columns)
            .map(|j| {
                let values: Vec<f64> = (0..keys.len()).map(|k| ((j * 7 + k * 3) % 11) as f64).collect();
                (j as f64, values)
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(columns), &rows, |b, rows| {
            let stack = Stack::new(keys);
            b.iter(|| {
                stack.compute(
                    black_box(rows.as_slice()),
                    |row| row.0,
                    |row, key| {
                        let k = keys.iter().position(|name| *name == key).unwrap_or(0);
                        row.1[k]
                    },
                )
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_force_run, bench_stack_wiggle);
criterion_main!(benches);
