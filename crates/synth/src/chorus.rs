//! Chorus ensembles of detuned wavetable voices.

use crate::control::Control;
use crate::duration::Duration;
use crate::error::{Error, Result};
use crate::wavetable::{Interpolation, Oscillator, WaveTable};

/// Scales another control source by a fixed ratio.
#[derive(Debug, Clone)]
struct Detuned<C> {
    inner: C,
    ratio: f32,
}

impl<C: Control> Control for Detuned<C> {
    fn next(&mut self) -> f32 {
        self.ratio * self.inner.next()
    }
}

/// N linearly-interpolated voices over one shared table, each detuned by a
/// fixed ratio, summed sample-wise.
///
/// The sum is not averaged; with all voices near full scale the output can
/// exceed `[-1, 1]`, so callers attenuate before encoding.
#[derive(Debug, Clone)]
pub struct Chorus {
    ratios: Vec<f32>,
    voices: Vec<Oscillator>,
}

impl Chorus {
    /// Create one voice per detune ratio, all sharing `table`.
    ///
    /// Fails with an invalid-argument error when the ratio list is empty.
    pub fn new(table: &WaveTable, ratios: &[f32]) -> Result<Self> {
        if ratios.is_empty() {
            return Err(Error::invalid_argument("chorus has no detune ratios"));
        }
        let voices = ratios
            .iter()
            .map(|_| Oscillator::new(table, Interpolation::Linear))
            .collect();
        Ok(Chorus {
            ratios: ratios.to_vec(),
            voices,
        })
    }

    /// Number of voices.
    pub fn voices(&self) -> usize {
        self.voices.len()
    }

    /// Generate the summed ensemble output.
    ///
    /// Every voice drives its oscillator with its own clone of `base`, so a
    /// stateful source (such as a cyclic automation stream) is consumed once
    /// per sample per voice instead of being drained N times faster through
    /// a shared cursor.
    pub fn generate<C>(&mut self, dur: impl Into<Duration>, base: &C) -> Result<Vec<f32>>
    where
        C: Control + Clone,
    {
        let dur = dur.into();
        let mut sum: Vec<f32> = Vec::new();

        for (osc, &ratio) in self.voices.iter_mut().zip(&self.ratios) {
            let mut freq = Detuned {
                inner: base.clone(),
                ratio,
            };
            let voice = osc.generate(dur, &mut freq)?;
            if sum.is_empty() {
                sum = voice;
            } else {
                for (acc, s) in sum.iter_mut().zip(&voice) {
                    *acc += *s;
                }
            }
        }

        Ok(sum)
    }
}
