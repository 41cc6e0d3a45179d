//! Benchmarks for the concurrent-flow solver

use concurrent_flow::{maximum_concurrent_flow, two_approx, Commodity, ConcurrentFlowProblem, SolverOptions};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use petgraph::graph::DiGraph;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn random_problem(nodes: usize, edges: usize, commodities: usize, seed: u64) -> ConcurrentFlowProblem<usize> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut graph: DiGraph<usize, f64> = DiGraph::new();

    let indices: Vec<_> = (0..nodes).map(|n| graph.add_node(n)).collect();

    // spine for connectivity, chords for route choice
    for node in 0..nodes - 1 {
        graph.add_edge(indices[node], indices[node + 1], rng.gen_range(4.0..10.0));
    }
    while graph.edge_count() < edges {
        let from = rng.gen_range(0..nodes);
        let to = rng.gen_range(0..nodes);
        if from != to && graph.find_edge(indices[from], indices[to]).is_none() {
            graph.add_edge(indices[from], indices[to], rng.gen_range(2.0..10.0));
        }
    }

    let commodities = (0..commodities)
        .map(|i| {
            let source = i * (nodes / 8).max(1) % (nodes / 2);
            let sink = source + rng.gen_range(3..nodes / 2);
            Commodity::new(source, sink, rng.gen_range(1.0..3.0)).unwrap()
        })
        .collect();

    ConcurrentFlowProblem::from_petgraph(&graph, commodities).unwrap()
}

fn bench_maximum_concurrent_flow(c: &mut Criterion) {
    let mut group = c.benchmark_group("maximum_concurrent_flow");

    for (nodes, edges) in [(20, 60), (40, 120)] {
        let problem = random_problem(nodes, edges, 4, 42);
        let options = SolverOptions::with_error(0.5);

        group.bench_with_input(
            BenchmarkId::new("nodes", nodes),
            &problem,
            |b, p| b.iter(|| maximum_concurrent_flow(black_box(p), &options)),
        );
    }

    group.finish();
}

fn bench_karakostas(c: &mut Criterion) {
    let mut group = c.benchmark_group("karakostas");

    let problem = random_problem(40, 120, 8, 7);
    for karakostas in [false, true] {
        let options = SolverOptions {
            error: 0.5,
            scale_beta: false,
            karakostas,
        };
        group.bench_with_input(
            BenchmarkId::new("grouped", karakostas),
            &problem,
            |b, p| b.iter(|| maximum_concurrent_flow(black_box(p), &options)),
        );
    }

    group.finish();
}

fn bench_two_approx(c: &mut Criterion) {
    let problem = random_problem(20, 60, 4, 42);
    let options = SolverOptions::with_error(0.1);

    c.bench_function("two_approx", |b| {
        b.iter(|| two_approx(black_box(&problem), &options))
    });
}

criterion_group!(
    benches,
    bench_maximum_concurrent_flow,
    bench_karakostas,
    bench_two_approx
);
criterion_main!(benches);
