//! Benchmarks for the cache hot path outside I/O
//!
//! This benchmark measures:
//! - Header encoding/decoding for typical response header sets
//! - Cache key derivation for GET and form POST requests

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use response_cache::cache::{decode_headers, encode_headers, CacheKey};
use response_cache::types::{Headers, HttpRequest};

fn sample_headers(n: usize) -> Headers {
    (0..n)
        .map(|i| {
            (
                format!("X-Header-{i}"),
                format!("value-{i}; max-age=3600; charset=utf-8"),
            )
        })
        .collect()
}

fn bench_header_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("header_codec");
    for n in [4usize, 16, 64] {
        let headers = sample_headers(n);
        let encoded = encode_headers(&headers);
        group.throughput(Throughput::Bytes(encoded.len() as u64));
        group.bench_with_input(BenchmarkId::new("encode", n), &headers, |b, h| {
            b.iter(|| encode_headers(black_box(h)))
        });
        group.bench_with_input(BenchmarkId::new("decode", n), &encoded, |b, e| {
            b.iter(|| decode_headers(black_box(Some(e.as_str()))))
        });
    }
    group.finish();
}

fn bench_cache_key(c: &mut Criterion) {
    let get = HttpRequest::get("https://api.example.com/v1/items?page=2").cached();
    let post = HttpRequest::post("https://api.example.com/v1/search")
        .cached()
        .with_form((0..10).map(|i| (format!("field{i}"), format!("some value {i}"))));

    c.bench_function("cache_key/get", |b| {
        b.iter(|| CacheKey::from_request(black_box(&get)))
    });
    c.bench_function("cache_key/form_post", |b| {
        b.iter(|| CacheKey::from_request(black_box(&post)))
    });
}

criterion_group!(benches, bench_header_codec, bench_cache_key);
criterion_main!(benches);
