//! Decoding sample frames into normalized float signals.
//!
//! Decoding is two-phase: [`crate::riff::scan`] indexes the chunks without
//! touching the payload, then [`decode`] seeks back to the `data` chunk and
//! streams it. [`read`] bundles both phases over one scoped file handle.

use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::format::SampleFormat;
use crate::riff::{self, ChunkIndex};
use crate::signal::{RawSignal, Sample, Signal};

/// Decode offset and divisor for unsigned 8-bit samples.
const U8_CENTER: f64 = 127.0;
const U8_SCALE: f64 = 128.0;

const I16_SCALE: f64 = 32768.0; // 2^15
const I24_SCALE: f64 = 8_388_608.0; // 2^23
const I32_SCALE: f64 = 2_147_483_648.0; // 2^31
const I64_SCALE: f64 = 9_223_372_036_854_775_808.0; // 2^63

/// Sign-adjustment constant for 24-bit samples, one less than `1 << 24`.
///
/// Not the two's-complement bias; kept because the matching encoder applies
/// the exact inverse, making 24-bit round trips bit-stable.
pub(crate) const I24_SIGN_ADJUST: i32 = 0x0FF_FFFF;

/// Read a WAV file into a normalized `f32` signal.
///
/// Returns the signal and its sample rate. Integer formats are scaled into
/// `[-1, 1]`; float formats pass through unscaled.
pub fn read<P: AsRef<Path>>(path: P) -> Result<(Signal<f32>, u32)> {
    read_normalized(path)
}

/// Read a WAV file into a normalized `f64` signal.
pub fn read_f64<P: AsRef<Path>>(path: P) -> Result<(Signal<f64>, u32)> {
    read_normalized(path)
}

/// Read a WAV file without normalizing, keeping the stored element type.
pub fn read_raw<P: AsRef<Path>>(path: P) -> Result<(RawSignal, u32)> {
    let mut reader = BufReader::new(File::open(path)?);
    let index = riff::scan(&mut reader)?;
    let sample_rate = index.require_format()?.sample_rate;
    let signal = decode_raw(&index, &mut reader)?;
    Ok((signal, sample_rate))
}

fn read_normalized<T: Sample, P: AsRef<Path>>(path: P) -> Result<(Signal<T>, u32)> {
    let mut reader = BufReader::new(File::open(path)?);
    let index = riff::scan(&mut reader)?;
    let sample_rate = index.require_format()?.sample_rate;
    let signal = decode(&index, &mut reader)?;
    Ok((signal, sample_rate))
}

/// Decode the indexed `data` chunk into a normalized float signal.
///
/// The stream must be the same one the index was scanned from (or a clone of
/// it); the payload is re-read by seeking, never from a cached copy.
///
/// Fails with [`Error::UnsupportedEncoding`] when the index lacks a `fmt `
/// or `data` chunk, or when the format/bit-depth combination has no sample
/// mapping.
pub fn decode<T: Sample, R: Read + Seek>(index: &ChunkIndex, reader: &mut R) -> Result<Signal<T>> {
    let (format, channels, raw) = read_payload(index, reader)?;
    let elem = format.bytes_per_sample();

    let mut samples = Vec::with_capacity(raw.len() / elem);
    for bytes in raw.chunks_exact(elem) {
        let value = match format {
            SampleFormat::Uint8 => (f64::from(bytes[0]) - U8_CENTER) / U8_SCALE,
            SampleFormat::Int16 => {
                f64::from(i16::from_le_bytes([bytes[0], bytes[1]])) / I16_SCALE
            }
            SampleFormat::Int24 => f64::from(decode_i24(bytes)) / I24_SCALE,
            SampleFormat::Int32 => {
                f64::from(i32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])) / I32_SCALE
            }
            SampleFormat::Int64 => {
                let v = i64::from_le_bytes([
                    bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
                ]);
                v as f64 / I64_SCALE
            }
            SampleFormat::Float32 => {
                f64::from(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
            }
            SampleFormat::Float64 => f64::from_le_bytes([
                bytes[0], bytes[1], bytes[2], bytes[3], bytes[4], bytes[5], bytes[6], bytes[7],
            ]),
        };
        samples.push(T::from_f64(value));
    }

    Signal::from_interleaved(samples, channels)
}

/// Decode the indexed `data` chunk, keeping the stored element type.
pub fn decode_raw<R: Read + Seek>(index: &ChunkIndex, reader: &mut R) -> Result<RawSignal> {
    let (format, channels, raw) = read_payload(index, reader)?;

    let signal = match format {
        SampleFormat::Uint8 => RawSignal::Uint8(Signal::from_interleaved(raw, channels)?),
        SampleFormat::Int16 => {
            let samples = raw
                .chunks_exact(2)
                .map(|b| i16::from_le_bytes([b[0], b[1]]))
                .collect();
            RawSignal::Int16(Signal::from_interleaved(samples, channels)?)
        }
        SampleFormat::Int24 => {
            let samples = raw.chunks_exact(3).map(decode_i24).collect();
            RawSignal::Int32(Signal::from_interleaved(samples, channels)?)
        }
        SampleFormat::Int32 => {
            let samples = raw
                .chunks_exact(4)
                .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            RawSignal::Int32(Signal::from_interleaved(samples, channels)?)
        }
        SampleFormat::Int64 => {
            let samples = raw
                .chunks_exact(8)
                .map(|b| i64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect();
            RawSignal::Int64(Signal::from_interleaved(samples, channels)?)
        }
        SampleFormat::Float32 => {
            let samples = raw
                .chunks_exact(4)
                .map(|b| f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
                .collect();
            RawSignal::Float32(Signal::from_interleaved(samples, channels)?)
        }
        SampleFormat::Float64 => {
            let samples = raw
                .chunks_exact(8)
                .map(|b| f64::from_le_bytes([b[0], b[1], b[2], b[3], b[4], b[5], b[6], b[7]]))
                .collect();
            RawSignal::Float64(Signal::from_interleaved(samples, channels)?)
        }
    };

    Ok(signal)
}

/// Fetch the data payload, truncated to whole frames.
fn read_payload<R: Read + Seek>(
    index: &ChunkIndex,
    reader: &mut R,
) -> Result<(SampleFormat, usize, Vec<u8>)> {
    let fmt = index.require_format()?;
    let data = index.require_data()?;

    let format = fmt.sample_format().ok_or_else(|| {
        Error::unsupported(format!(
            "no sample mapping for format 0x{:04X} ({}) at {} bits per sample",
            fmt.format_tag,
            fmt.format_name(),
            fmt.bits_per_sample
        ))
    })?;

    let frame_size = fmt.frame_size();
    if frame_size == 0 {
        return Err(Error::unsupported("fmt chunk declares a zero-byte frame"));
    }

    reader.seek(SeekFrom::Start(data.offset))?;
    let mut raw = Vec::with_capacity(data.size as usize);
    reader
        .by_ref()
        .take(u64::from(data.size))
        .read_to_end(&mut raw)?;

    let whole = raw.len() / frame_size * frame_size;
    if whole < raw.len() {
        warn!(
            dropped = raw.len() - whole,
            frame_size, "data chunk ends mid-frame, dropping partial frame"
        );
        raw.truncate(whole);
    }

    debug!(
        format = fmt.format_name(),
        frames = whole / frame_size,
        channels = fmt.channels,
        "decoding data chunk"
    );

    Ok((format, usize::from(fmt.channels), raw))
}

/// Reassemble a 24-bit sample from three little-endian bytes.
fn decode_i24(bytes: &[u8]) -> i32 {
    let mut value =
        i32::from(bytes[0]) | (i32::from(bytes[1]) << 8) | (i32::from(bytes[2]) << 16);
    if value & 0x80_0000 != 0 {
        value -= I24_SIGN_ADJUST;
    }
    value
}
