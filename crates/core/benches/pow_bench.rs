//! Benchmarks for digest throughput and nonce search

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use multipow_core::{
    Algorithm, Challenge, Preimage, SearchMode, SearchOptions, Searcher, generate,
};

fn bench_digests(c: &mut Criterion) {
    let mut group = c.benchmark_group("digest");
    let mut buffer = Preimage::new(b"benchmark input for multipow");

    // One representative per family
    for algorithm in [
        Algorithm::Md5,
        Algorithm::Nt,
        Algorithm::Has160,
        Algorithm::Ripemd160,
        Algorithm::Blake2b512,
        Algorithm::Blake2s256,
        Algorithm::Blake3,
        Algorithm::Sha0,
        Algorithm::Sha2_256,
        Algorithm::Sha3_256,
        Algorithm::Keccak256,
        Algorithm::Shake128,
        Algorithm::Whirlpool,
        Algorithm::Md2,
    ] {
        group.bench_function(BenchmarkId::from_parameter(algorithm), |b| {
            let mut nonce: u64 = 0;
            b.iter(|| {
                nonce = nonce.wrapping_add(1);
                algorithm.compute(black_box(buffer.with_nonce(nonce)))
            })
        });
    }
    group.finish();
}

fn bench_generate(c: &mut Criterion) {
    let challenge = Challenge::single("hello world", Algorithm::Md5, 12, 0, 100_000_000)
        .expect("valid challenge");
    c.bench_function("generate_md5_d12", |b| b.iter(|| generate(black_box(&challenge))));

    let combined = Challenge::new("hello world", &multipow_core::fastest(4), 4, 0, 100_000_000)
        .expect("valid challenge");
    let searcher = Searcher::new(SearchOptions::default().with_mode(SearchMode::parallel(
        std::thread::available_parallelism().map_or(1, |n| n.get()),
    )))
    .expect("worker pool");
    c.bench_function("generate_fastest4_d4_parallel", |b| {
        b.iter(|| searcher.run(black_box(&combined)))
    });
}

criterion_group!(benches, bench_digests, bench_generate);
criterion_main!(benches);
