use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use molec_bench::bench_implementation::runner::parse_timings;

fn criterion_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_molec_output");

    for nb_trailing_fields in [0, 10, 100] {
        let mut line = String::from("q_g_avx\tforce\t183920\tintegrator\t2210\tperiodic\t931\tsimulation\t187061");
        for i in 0..nb_trailing_fields {
            line.push_str(&format!("\textra_{}", i));
        }
        line.push('\n');

        group.bench_with_input(
            BenchmarkId::new("parse_timings", nb_trailing_fields),
            &line,
            |b, l| b.iter(|| parse_timings(black_box(l)).unwrap()),
        );
    }
    group.finish();
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
