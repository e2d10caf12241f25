//! Wavetable oscillators.
//!
//! A [`WaveTable`] stores exactly one cycle of a periodic waveform. An
//! [`Oscillator`] resamples that cycle at an arbitrary, time-varying
//! frequency and phase: the stored shape and the playback pitch are
//! independent knobs, so one table serves every note. Table resolution
//! bounds the shape's fidelity; the interpolation mode trades lookup cost
//! against resampling error between table entries.

use std::sync::Arc;

use tracing::debug;

use crate::control::{Constant, Control};
use crate::duration::Duration;
use crate::error::{Error, Result};

/// One cycle of a waveform, shared read-only between oscillators.
///
/// Construction fixes the position scale `len / sample_rate`; the samples
/// are immutable for the table's lifetime. Cloning shares the underlying
/// buffer.
#[derive(Debug, Clone)]
pub struct WaveTable {
    samples: Arc<[f32]>,
    sample_rate: f32,
    scale: f32,
}

impl WaveTable {
    /// Create a table from one waveform cycle.
    ///
    /// Fails with an invalid-argument error when the table is empty or the
    /// reference sample rate is not positive.
    pub fn new(sample_rate: f32, samples: Vec<f32>) -> Result<Self> {
        if !(sample_rate > 0.0) {
            return Err(Error::invalid_argument(format!(
                "sample rate must be positive, got {sample_rate}"
            )));
        }
        if samples.is_empty() {
            return Err(Error::invalid_argument("wavetable is empty"));
        }
        let scale = samples.len() as f32 / sample_rate;
        Ok(WaveTable {
            samples: samples.into(),
            sample_rate,
            scale,
        })
    }

    /// Number of samples in the stored cycle.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always false; construction rejects empty tables.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// The reference sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// The stored cycle.
    pub fn samples(&self) -> &[f32] {
        &self.samples
    }
}

/// How table positions between entries are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Interpolation {
    /// Take the entry at the floor of the read position.
    Nearest,
    /// Blend the two entries around the read position, wrapping the upper
    /// neighbor to the table start.
    #[default]
    Linear,
}

/// Resamples a shared [`WaveTable`] under frequency and phase control.
///
/// The fractional position accumulator is owned exclusively by the
/// oscillator, advances on every generated sample, and is never reset:
/// consecutive [`Oscillator::generate`] calls continue the waveform
/// seamlessly. Not safe for concurrent mutation; use one oscillator per
/// thread.
#[derive(Debug, Clone)]
pub struct Oscillator {
    table: WaveTable,
    interpolation: Interpolation,
    pos: f32,
}

impl Oscillator {
    /// Create an oscillator over a shared table.
    pub fn new(table: &WaveTable, interpolation: Interpolation) -> Self {
        Oscillator {
            table: table.clone(),
            interpolation,
            pos: 0.0,
        }
    }

    /// The interpolation mode.
    pub fn interpolation(&self) -> Interpolation {
        self.interpolation
    }

    /// Generate samples with an unshifted phase.
    pub fn generate<F>(&mut self, dur: impl Into<Duration>, freq: &mut F) -> Result<Vec<f32>>
    where
        F: Control + ?Sized,
    {
        self.generate_with_phase(dur, freq, &mut Constant::new(0.0))
    }

    /// Generate samples, querying frequency and phase once per sample.
    ///
    /// The phase source is expressed in units of π: 0.0 is no shift, 1.0
    /// shifts by half a cycle. In `Nearest` mode the accumulator advances by
    /// the raw frequency value each sample; in `Linear` mode the advance is
    /// additionally scaled by `len / sample_rate`, so the two modes produce
    /// different pitches for the same control input whenever the table
    /// length differs from the reference rate.
    pub fn generate_with_phase<F, P>(
        &mut self,
        dur: impl Into<Duration>,
        freq: &mut F,
        phase: &mut P,
    ) -> Result<Vec<f32>>
    where
        F: Control + ?Sized,
        P: Control + ?Sized,
    {
        let sample_rate = self.table.sample_rate;
        let n = dur.into().sample_count(sample_rate)?;

        let table = &self.table.samples;
        let span = table.len() as f32;
        let scale = self.table.scale;

        debug!(
            samples = n,
            table_len = table.len(),
            mode = ?self.interpolation,
            "generating"
        );

        let mut out = Vec::with_capacity(n);
        for _ in 0..n {
            let offset = phase.next() * sample_rate / 2.0 + 0.5;
            let mut pos2 = scale * (self.pos + offset);

            // Wrap into [0, span); handles offsets any number of periods out
            // of range, not just one.
            while pos2 >= span {
                pos2 -= span;
            }
            while pos2 < 0.0 {
                pos2 += span;
            }

            let i0 = libm::floorf(pos2) as usize;
            let sample = match self.interpolation {
                Interpolation::Nearest => table[i0],
                Interpolation::Linear => {
                    let i1 = (i0 + 1) % table.len();
                    let beta = pos2 - i0 as f32;
                    (1.0 - beta) * table[i0] + beta * table[i1]
                }
            };

            self.pos += match self.interpolation {
                Interpolation::Nearest => freq.next(),
                Interpolation::Linear => scale * freq.next(),
            };

            out.push(sample);
        }

        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_table(len: usize) -> Vec<f32> {
        (0..len).map(|i| i as f32).collect()
    }

    #[test]
    fn test_table_rejects_empty() {
        assert!(matches!(
            WaveTable::new(8.0, Vec::new()).unwrap_err(),
            Error::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_table_rejects_bad_sample_rate() {
        assert!(WaveTable::new(0.0, vec![0.0]).is_err());
        assert!(WaveTable::new(-8.0, vec![0.0]).is_err());
    }

    #[test]
    fn test_nearest_reproduces_table_at_unit_frequency() {
        // One cycle per second at a rate equal to the table length: the
        // built-in half-sample centering lands each read exactly on an
        // entry, so the table comes back verbatim.
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Nearest);
        let out = osc.generate(8usize, &mut Constant::new(1.0)).unwrap();
        assert_eq!(out, ramp_table(8));
    }

    #[test]
    fn test_nearest_wraps_across_cycles() {
        let table = WaveTable::new(4.0, ramp_table(4)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Nearest);
        let out = osc.generate(12usize, &mut Constant::new(1.0)).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_phase_shift_of_pi_reads_half_a_cycle_ahead() {
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Nearest);
        let out = osc
            .generate_with_phase(8usize, &mut Constant::new(1.0), &mut Constant::new(1.0))
            .unwrap();
        // Offset is sr/2 + 0.5 = 4.5 table samples.
        assert_eq!(out, vec![4.0, 5.0, 6.0, 7.0, 0.0, 1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_linear_blends_neighboring_entries() {
        let table = WaveTable::new(2.0, vec![0.0, 1.0]).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Linear);
        let out = osc.generate(4usize, &mut Constant::new(0.5)).unwrap();
        // Read positions 0.5, 1.0, 1.5, 0.0: the 1.5 read blends back into
        // the wrapped first entry.
        assert_eq!(out, vec![0.5, 1.0, 0.5, 0.0]);
    }

    #[test]
    fn test_modal_advance_scaling_differs() {
        // Table of 4 at a rate of 8: scale is 0.5, so linear mode advances
        // half as fast as nearest for the same frequency input.
        let table = WaveTable::new(8.0, ramp_table(4)).unwrap();

        let mut nearest = Oscillator::new(&table, Interpolation::Nearest);
        let near_out = nearest.generate(16usize, &mut Constant::new(1.0)).unwrap();
        for i in 0..8 {
            assert_eq!(near_out[i], near_out[i + 8], "nearest period is 8 samples");
        }

        let mut linear = Oscillator::new(&table, Interpolation::Linear);
        let lin_out = linear.generate(32usize, &mut Constant::new(1.0)).unwrap();
        for i in 0..16 {
            assert!(
                (lin_out[i] - lin_out[i + 16]).abs() < 1e-6,
                "linear period is 16 samples"
            );
        }
    }

    #[test]
    fn test_accumulator_persists_across_calls() {
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();

        let mut split = Oscillator::new(&table, Interpolation::Nearest);
        let mut a = split.generate(3usize, &mut Constant::new(1.0)).unwrap();
        let b = split.generate(5usize, &mut Constant::new(1.0)).unwrap();
        a.extend(b);

        let mut whole = Oscillator::new(&table, Interpolation::Nearest);
        let expected = whole.generate(8usize, &mut Constant::new(1.0)).unwrap();
        assert_eq!(a, expected);
    }

    #[test]
    fn test_negative_frequency_runs_backwards_safely() {
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Nearest);
        let out = osc.generate(24usize, &mut Constant::new(-1.0)).unwrap();
        assert_eq!(out.len(), 24);
        for &s in &out {
            assert!((0.0..8.0).contains(&s));
        }
    }

    #[test]
    fn test_large_phase_offsets_wrap_fully() {
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Nearest);
        // A phase many periods out of range still lands inside the table.
        let out = osc
            .generate_with_phase(8usize, &mut Constant::new(1.0), &mut Constant::new(25.0))
            .unwrap();
        assert_eq!(out.len(), 8);
        for &s in &out {
            assert!((0.0..8.0).contains(&s));
        }
    }

    #[test]
    fn test_duration_in_seconds() {
        let table = WaveTable::new(100.0, ramp_table(10)).unwrap();
        let mut osc = Oscillator::new(&table, Interpolation::Linear);
        let out = osc.generate(0.25f32, &mut Constant::new(440.0)).unwrap();
        assert_eq!(out.len(), 25);
    }

    #[test]
    fn test_shared_table_feeds_many_oscillators() {
        let table = WaveTable::new(8.0, ramp_table(8)).unwrap();
        let mut a = Oscillator::new(&table, Interpolation::Nearest);
        let mut b = Oscillator::new(&table, Interpolation::Nearest);
        let out_a = a.generate(8usize, &mut Constant::new(1.0)).unwrap();
        let out_b = b.generate(8usize, &mut Constant::new(2.0)).unwrap();
        assert_eq!(out_a.len(), 8);
        assert_eq!(out_b.len(), 8);
        assert_ne!(out_a, out_b);
    }
}
