//! Waveform and ramp drawing.
//!
//! Small generators for one-cycle tables and control ramps: a linear ramp
//! for automation sequences, a frequency-controlled sine, and an additive
//! sawtooth. Drawing a single cycle (duration 1.0 at frequency 1.0) yields a
//! table ready for [`crate::WaveTable::new`].

use std::f32::consts::PI;

use crate::control::{Constant, Control};
use crate::duration::Duration;
use crate::error::{Error, Result};

/// A straight line from `v0` to `v1` over the duration, endpoints included.
pub fn line(sample_rate: f32, dur: impl Into<Duration>, v0: f32, v1: f32) -> Result<Vec<f32>> {
    let n = dur.into().sample_count(sample_rate)?;
    if n == 1 {
        return Ok(vec![v0]);
    }
    let step = (v1 - v0) / (n - 1) as f32;
    Ok((0..n).map(|i| v0 + step * i as f32).collect())
}

/// A sine wave under frequency control with no phase shift.
pub fn sine<F>(sample_rate: f32, dur: impl Into<Duration>, freq: &mut F) -> Result<Vec<f32>>
where
    F: Control + ?Sized,
{
    sine_with_phase(sample_rate, dur, freq, &mut Constant::new(0.0))
}

/// A sine wave under frequency and phase control.
///
/// The time accumulator advances by the frequency value each sample, so a
/// varying source sweeps the pitch. Phase is expressed in units of π.
pub fn sine_with_phase<F, P>(
    sample_rate: f32,
    dur: impl Into<Duration>,
    freq: &mut F,
    phase: &mut P,
) -> Result<Vec<f32>>
where
    F: Control + ?Sized,
    P: Control + ?Sized,
{
    let n = dur.into().sample_count(sample_rate)?;
    let tau = 1.0 / sample_rate;

    let mut t = 0.0f32;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        out.push(libm::sinf(2.0 * PI * t * tau + PI * phase.next()));
        t += freq.next();
    }
    Ok(out)
}

/// An additive sawtooth with `harmonics` partials under frequency control.
///
/// Sums `sin(k·x)/k` with alternating signs and rescales by `2/π`, which
/// converges toward an ideal `[-1, 1]` sawtooth as the partial count grows.
/// Fails with an invalid-argument error when `harmonics` is zero.
pub fn sawtooth<F>(
    sample_rate: f32,
    dur: impl Into<Duration>,
    freq: &mut F,
    harmonics: usize,
) -> Result<Vec<f32>>
where
    F: Control + ?Sized,
{
    if harmonics == 0 {
        return Err(Error::invalid_argument("sawtooth needs at least one harmonic"));
    }

    let n = dur.into().sample_count(sample_rate)?;
    let tau = 1.0 / sample_rate;

    let mut t = 0.0f32;
    let mut out = Vec::with_capacity(n);
    for _ in 0..n {
        let x = 2.0 * PI * t * tau;
        let mut acc = 0.0f32;
        for k in 1..=harmonics {
            let kf = k as f32;
            let term = libm::sinf(kf * x) / kf;
            if k % 2 == 0 {
                acc -= term;
            } else {
                acc += term;
            }
        }
        out.push(acc * 2.0 / PI);
        t += freq.next();
    }
    Ok(out)
}
