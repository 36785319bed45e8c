use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

pub fn conversion_throughput_bench(c: &mut Criterion) {
    let kb = match std::env::var("CONVERSION_THROUGHPUT_KB") {
        Ok(val) => match val.parse::<usize>() {
            Ok(val) => val,
            Err(_) => panic![
                "Failed to parse env var CONVERSION_THROUGHPUT_KB={} as an integer",
                val
            ],
        },
        Err(_) => 500,
    };
    let registry = jtex_stdlib::registry();
    let mut group = c.benchmark_group("conversion-throughput");

    for (name, weights) in [
        ("text_heavy", performance::Weights::default()),
        (
            "math_heavy",
            performance::Weights {
                inline_math: 200,
                block_math: 20,
                matrix: 10,
                ..Default::default()
            },
        ),
    ] {
        let mut rng = rand::prelude::StdRng::seed_from_u64(17);
        let input =
            performance::generate_random_jtex_document(&mut rng, kb * 1000, (80, 100), &weights);
        group.bench_function(name, |b| {
            b.iter(|| performance::run_conversion(&input, &registry))
        });
    }
}

criterion_group!(benches, conversion_throughput_bench);
criterion_main!(benches);
