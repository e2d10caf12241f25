//! # sdaudio-synth
//!
//! Wavetable oscillators, chorus ensembles, and the control-value sources
//! that drive them.
//!
//! One stored waveform cycle ([`WaveTable`]) is resampled by an
//! [`Oscillator`] at any frequency and phase, in nearest-neighbor or
//! linearly-interpolated mode. A [`Chorus`] runs several detuned
//! linear-mode voices over one shared table and sums them. Frequency and
//! phase are supplied per sample by [`Control`] sources: a [`Constant`], a
//! cyclic [`Circular`] automation stream, or any closure wrapped in
//! [`Func`].
//!
//! ## Example
//!
//! ```
//! use sdaudio_synth::{draw, Chorus, Constant, WaveTable};
//!
//! // One sawtooth cycle drawn at the output rate.
//! let sr = 8000.0;
//! let table = WaveTable::new(sr, draw::sawtooth(sr, 1.0f32, &mut Constant::new(1.0), 5)?)?;
//!
//! let mut chorus = Chorus::new(&table, &[0.99, 1.0, 1.01])?;
//! let out = chorus.generate(0.5f32, &Constant::new(60.0))?;
//! assert_eq!(out.len(), 4000);
//! # Ok::<(), sdaudio_synth::Error>(())
//! ```

pub mod chorus;
pub mod control;
pub mod draw;
pub mod duration;
pub mod error;
pub mod wavetable;

pub use chorus::Chorus;
pub use control::{Circular, Constant, Control, Func};
pub use duration::Duration;
pub use error::{Error, Result};
pub use wavetable::{Interpolation, Oscillator, WaveTable};
