//! End-to-end generator tests.

use proptest::prelude::*;
use sdaudio_synth::{
    draw, Chorus, Circular, Constant, Interpolation, Oscillator, WaveTable,
};

#[test]
fn test_drawn_cycle_plays_back_periodically() {
    let sr = 64.0;
    let cycle = draw::sine(sr, 1.0f32, &mut Constant::new(1.0)).unwrap();
    let table = WaveTable::new(sr, cycle.clone()).unwrap();

    let mut osc = Oscillator::new(&table, Interpolation::Nearest);
    let out = osc.generate(128usize, &mut Constant::new(1.0)).unwrap();

    // Two cycles of the stored table, reproduced entry for entry.
    assert_eq!(&out[..64], &cycle[..]);
    assert_eq!(&out[64..], &cycle[..]);
}

#[test]
fn test_frequency_sweep_from_automation_stream() {
    let sr = 512.0;
    let cycle = draw::sine(sr, 1.0f32, &mut Constant::new(1.0)).unwrap();
    let table = WaveTable::new(sr, cycle).unwrap();

    let sweep = draw::line(sr, 1.0f32, 40.0, 200.0).unwrap();
    let mut osc = Oscillator::new(&table, Interpolation::Linear);
    let out = osc
        .generate(1.0f32, &mut Circular::new(sweep).unwrap())
        .unwrap();

    assert_eq!(out.len(), 512);
    for &s in &out {
        assert!(s.abs() <= 1.0 + 1e-5);
    }
}

#[test]
fn test_chorus_voices_against_manual_sum() {
    let sr = 128.0;
    let cycle = draw::sawtooth(sr, 1.0f32, &mut Constant::new(1.0), 5).unwrap();
    let table = WaveTable::new(sr, cycle).unwrap();
    let ratios = [0.991_234_1, 1.012_983_5];

    let mut chorus = Chorus::new(&table, &ratios).unwrap();
    let summed = chorus.generate(256usize, &Constant::new(7.0)).unwrap();

    let mut manual = vec![0.0f32; 256];
    for &ratio in &ratios {
        let mut osc = Oscillator::new(&table, Interpolation::Linear);
        let voice = osc
            .generate(256usize, &mut Constant::new(7.0 * ratio))
            .unwrap();
        for (m, v) in manual.iter_mut().zip(&voice) {
            *m += *v;
        }
    }

    for (a, b) in summed.iter().zip(&manual) {
        assert!((a - b).abs() < 1e-5, "{a} vs {b}");
    }
}

proptest! {
    /// Interpolated samples never leave the range of the table entries they
    /// blend, for any position and rate.
    #[test]
    fn prop_linear_output_bounded_by_table(
        table in prop::collection::vec(-1.0f32..=1.0, 2..64),
        freq in 0.01f32..500.0,
        phase in -4.0f32..4.0,
    ) {
        let lo = table.iter().cloned().fold(f32::INFINITY, f32::min);
        let hi = table.iter().cloned().fold(f32::NEG_INFINITY, f32::max);

        let wt = WaveTable::new(64.0, table).unwrap();
        let mut osc = Oscillator::new(&wt, Interpolation::Linear);
        let out = osc
            .generate_with_phase(
                128usize,
                &mut Constant::new(freq),
                &mut Constant::new(phase),
            )
            .unwrap();

        for &s in &out {
            prop_assert!(s >= lo - 1e-5 && s <= hi + 1e-5, "{} outside [{}, {}]", s, lo, hi);
        }
    }

    /// Nearest mode only ever emits values stored in the table.
    #[test]
    fn prop_nearest_output_is_a_table_entry(
        table in prop::collection::vec(-1.0f32..=1.0, 1..32),
        freq in 0.01f32..100.0,
    ) {
        let wt = WaveTable::new(32.0, table.clone()).unwrap();
        let mut osc = Oscillator::new(&wt, Interpolation::Nearest);
        let out = osc.generate(64usize, &mut Constant::new(freq)).unwrap();

        for &s in &out {
            prop_assert!(table.contains(&s));
        }
    }
}
