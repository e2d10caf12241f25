//! Criterion benchmarks for encode/decode throughput.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sdaudio_wave_io::{decode, encode, riff, SampleFormat, Signal};
use std::io::Cursor;

fn one_second_stereo() -> Signal<f32> {
    let sample_rate = 44100usize;
    let mut interleaved = Vec::with_capacity(sample_rate * 2);
    for i in 0..sample_rate {
        let t = i as f32 / sample_rate as f32;
        let x = libm::sinf(2.0 * std::f32::consts::PI * 440.0 * t);
        interleaved.push(0.5 * x);
        interleaved.push(-0.5 * x);
    }
    Signal::from_interleaved(interleaved, 2).unwrap()
}

fn bench_encode(c: &mut Criterion) {
    let signal = one_second_stereo();
    let mut group = c.benchmark_group("encode");
    for format in [SampleFormat::Int16, SampleFormat::Int24, SampleFormat::Float32] {
        group.bench_function(format!("{format:?}"), |b| {
            b.iter(|| encode(black_box(&signal), 44100, format).unwrap());
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let signal = one_second_stereo();
    let mut group = c.benchmark_group("decode");
    for format in [SampleFormat::Int16, SampleFormat::Int24, SampleFormat::Float32] {
        let bytes = encode(&signal, 44100, format).unwrap();
        group.bench_function(format!("{format:?}"), |b| {
            b.iter(|| {
                let mut reader = Cursor::new(&bytes);
                let index = riff::scan(&mut reader).unwrap();
                let decoded: Signal<f32> = decode(&index, &mut reader).unwrap();
                black_box(decoded)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
