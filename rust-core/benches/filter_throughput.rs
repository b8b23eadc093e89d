//! Per-chunk throughput of every topology on 20 ms telephony chunks

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::f64::consts::PI;
use telefilter::codec;
use telefilter::filters::FilterConfig;

const CHUNK: usize = 160;

fn chunk() -> Vec<i16> {
    (0..CHUNK)
        .map(|n| (9000.0 * (2.0 * PI * 1000.0 * n as f64 / 8000.0).sin()) as i16)
        .collect()
}

fn bench_filters(c: &mut Criterion) {
    let input = chunk();
    let configs = [
        FilterConfig::high_pass(300.0, 8000.0),
        FilterConfig::low_pass(3400.0, 8000.0),
        FilterConfig::band_pass(300.0, 3400.0, 8000.0),
        FilterConfig::biquad_band_pass(1000.0, 1.0, 8000.0),
        FilterConfig::biquad_high_pass(300.0, 0.707, 8000.0),
        FilterConfig::fir_low_pass(3400.0, 31, 8000.0),
        FilterConfig::fir_low_pass(3400.0, 101, 8000.0),
    ];

    let mut group = c.benchmark_group("filter_chunk");
    group.throughput(Throughput::Elements(CHUNK as u64));

    for config in configs.iter() {
        let Ok(filter) = config.design() else {
            continue;
        };
        let label = match config.tap_count {
            Some(taps) => format!("{}-{}", config.topology, taps),
            None => config.topology.to_string(),
        };

        group.bench_with_input(BenchmarkId::from_parameter(label), &input, |b, input| {
            let mut state = Some(filter.create_state());
            b.iter(|| {
                let current = state.take().unwrap_or_else(|| filter.create_state());
                if let Ok((out, next)) = filter.process(black_box(input), current) {
                    black_box(out);
                    state = Some(next);
                }
            });
        });
    }

    group.finish();
}

fn bench_codec(c: &mut Criterion) {
    let input = chunk();
    let encoded = codec::encode_buffer(&input);

    let mut group = c.benchmark_group("codec_chunk");
    group.throughput(Throughput::Elements(CHUNK as u64));
    group.bench_function("decode", |b| b.iter(|| codec::decode_buffer(black_box(&encoded))));
    group.bench_function("encode", |b| b.iter(|| codec::encode_buffer(black_box(&input))));
    group.finish();
}

criterion_group!(benches, bench_filters, bench_codec);
criterion_main!(benches);
