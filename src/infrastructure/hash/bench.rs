use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::Rng;

// Reference the main crate
extern crate farmbucket;

use farmbucket::bucket::Bucketer;
use farmbucket::infrastructure::hash::fingerprint64;

// Generate a random string of specified length
fn generate_random_string(length: usize) -> String {
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";
    let mut rng = rand::thread_rng();
    let mut s = String::with_capacity(length);

    for _ in 0..length {
        let idx = rng.gen_range(0..CHARSET.len());
        s.push(CHARSET[idx] as char);
    }

    s
}

// One group per length band, compared against xxh64 and crc32
pub fn bench_length_bands(c: &mut Criterion) {
    let mut group = c.benchmark_group("LengthBands");

    for length in [8usize, 24, 48, 100, 1000] {
        let s = generate_random_string(length);
        let bytes = s.as_bytes();
        group.throughput(Throughput::Bytes(length as u64));

        group.bench_with_input(BenchmarkId::new("fingerprint64", length), &bytes, |b, data| {
            b.iter(|| fingerprint64(black_box(data)))
        });
        group.bench_with_input(BenchmarkId::new("xxh64", length), &bytes, |b, data| {
            b.iter(|| xxhash_rust::xxh64::xxh64(black_box(data), 0))
        });
        group.bench_with_input(BenchmarkId::new("crc32", length), &bytes, |b, data| {
            b.iter(|| crc32fast::hash(black_box(data)))
        });
    }

    group.finish();
}

// Bucket typical advertising IDs, including payload construction
pub fn bench_bucketing(c: &mut Criterion) {
    let count = 1000;
    let bucketer = Bucketer::default();
    let ids: Vec<String> = (0..count).map(|_| generate_random_string(36)).collect();

    let mut group = c.benchmark_group("Bucketing");

    group.bench_function("bucket_1000_ids", |b: &mut criterion::Bencher| {
        b.iter(|| {
            let mut sum = 0u64;
            for id in &ids {
                sum += bucketer.bucket(black_box(id)) as u64;
            }
            sum
        })
    });

    group.finish();
}

// Export the benchmark group for criterion
criterion_group!(benches, bench_length_bands, bench_bucketing);

// Only run the benchmark group when this file is executed directly
criterion_main!(benches);
