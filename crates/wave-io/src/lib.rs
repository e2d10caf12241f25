//! # sdaudio-wave-io
//!
//! RIFF WAVE chunk scanning, sample decoding, and encoding.
//!
//! ## Format overview
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ RIFF header: 'RIFF', uint32 size, 'WAVE'    │
//! ├─────────────────────────────────────────────┤
//! │ fmt  chunk (16-byte body)                   │
//! │   format code, channels, sample rate,       │
//! │   byte rate, block align, bits per sample   │
//! ├─────────────────────────────────────────────┤
//! │ data chunk                                  │
//! │   interleaved PCM or IEEE-float frames      │
//! ├─────────────────────────────────────────────┤
//! │ ... any other tagged chunks, inventoried    │
//! │     but not decoded                         │
//! ├─────────────────────────────────────────────┤
//! │ optional 128-byte 'tag' trailer (ID3v1-     │
//! │     style, non-conformant, presence only)   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Reading is split into a cheap indexing pass ([`scan`], [`scan_file`])
//! that locates chunks without buffering payloads, and a decode pass
//! ([`decode`], [`read`]) that streams the `data` chunk into a normalized
//! float [`Signal`]. Writing ([`encode`], [`write`], [`write_as`]) quantizes
//! a normalized float signal into linear PCM (8/16/24/32/64-bit) or IEEE
//! float (32/64-bit).
//!
//! ## Example
//!
//! ```no_run
//! use sdaudio_wave_io::{read, write_as, SampleFormat};
//!
//! let (signal, sample_rate) = read("in.wav")?;
//! write_as("out.wav", &signal, sample_rate, SampleFormat::Int24)?;
//! # Ok::<(), sdaudio_wave_io::Error>(())
//! ```

pub mod error;
pub mod format;
pub mod reader;
pub mod riff;
pub mod signal;
pub mod writer;

pub use error::{Error, Result};
pub use format::{format_name, FormatChunk, SampleFormat, FORMAT_IEEE_FLOAT, FORMAT_PCM};
pub use reader::{decode, decode_raw, read, read_f64, read_raw};
pub use riff::{scan, scan_file, ChunkIndex, DataChunkRef, RiffHeader, TrailerTag, UnhandledChunk};
pub use signal::{RawSignal, Sample, Signal};
pub use writer::{encode, write, write_as};
