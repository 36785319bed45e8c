use criterion::{criterion_group, criterion_main, Criterion};
use rand::SeedableRng;

pub fn lexer_throughput_bench(c: &mut Criterion) {
    let mb = match std::env::var("LEXER_THROUGHPUT_MB") {
        Ok(val) => match val.parse::<usize>() {
            Ok(val) => val,
            Err(_) => panic!["Failed to parse env var LEXER_THROUGHPUT_MB={} as an integer", val],
        },
        Err(_) => 5,
    };
    let weights = Default::default();
    let mut rng = rand::prelude::StdRng::seed_from_u64(43);
    let input = performance::generate_random_jtex_document(
        &mut rng,
        mb * 1000 * 1000,
        (80, 100),
        &weights,
    );

    let mut group = c.benchmark_group("lexer-throughput");
    group.bench_function("lexer_throughput_jtex", |b| {
        b.iter(|| performance::run_lexer(&input))
    });
}

criterion_group!(benches, lexer_throughput_bench);
criterion_main!(benches);
