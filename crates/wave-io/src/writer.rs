//! Encoding float signals into RIFF WAVE byte streams.
//!
//! Input samples are assumed to already be in the normalized `[-1, 1]`
//! domain; integer-sourced data must be pre-normalized with the decode-side
//! scale factors before encoding. The emitted container is minimal: the
//! 12-byte header, a fixed 16-byte `fmt ` body, and the `data` chunk. No
//! optional chunks and no padding byte after odd-length data.

use std::fs;
use std::path::Path;

use byteorder::{LittleEndian, WriteBytesExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::SampleFormat;
use crate::reader::I24_SIGN_ADJUST;
use crate::riff::{DATA_CHUNK_ID, FMT_CHUNK_ID, RIFF_ID, WAVE_ID};
use crate::signal::{Sample, Signal};

/// Write a signal to a WAV file as 16-bit PCM.
pub fn write<S: Sample, P: AsRef<Path>>(
    path: P,
    signal: &Signal<S>,
    sample_rate: u32,
) -> Result<()> {
    write_as(path, signal, sample_rate, SampleFormat::Int16)
}

/// Write a signal to a WAV file in the given sample format.
///
/// The byte stream is fully built in memory before the destination is
/// created, so a rejected parameter never leaves a partial file behind.
pub fn write_as<S: Sample, P: AsRef<Path>>(
    path: P,
    signal: &Signal<S>,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<()> {
    let bytes = encode(signal, sample_rate, format)?;
    fs::write(path.as_ref(), &bytes)?;
    debug!(
        path = %path.as_ref().display(),
        bytes = bytes.len(),
        bits = format.bits(),
        "wrote WAV file"
    );
    Ok(())
}

/// Encode a signal into a complete RIFF WAVE byte stream.
///
/// Per-sample quantization is the exact inverse of the decode scaling,
/// including the unsigned-8-bit `+127` centering and the 24-bit sign
/// adjustment constant.
pub fn encode<S: Sample>(
    signal: &Signal<S>,
    sample_rate: u32,
    format: SampleFormat,
) -> Result<Vec<u8>> {
    if sample_rate == 0 {
        return Err(Error::invalid_argument("sample rate must be positive"));
    }

    let channels = signal.channels();
    let frame_size = channels * format.bytes_per_sample();
    let data_len = signal.frames() * frame_size;
    let byte_rate = sample_rate * frame_size as u32;

    let mut out = Vec::with_capacity(44 + data_len);

    // Container header. The size field excludes the 8 bytes of tag + size.
    out.extend_from_slice(&RIFF_ID);
    out.write_u32::<LittleEndian>((36 + data_len) as u32)?;
    out.extend_from_slice(&WAVE_ID);

    // Fixed 16-byte fmt body.
    out.extend_from_slice(&FMT_CHUNK_ID);
    out.write_u32::<LittleEndian>(16)?;
    out.write_u16::<LittleEndian>(format.format_tag())?;
    out.write_u16::<LittleEndian>(channels as u16)?;
    out.write_u32::<LittleEndian>(sample_rate)?;
    out.write_u32::<LittleEndian>(byte_rate)?;
    out.write_u16::<LittleEndian>(frame_size as u16)?;
    out.write_u16::<LittleEndian>(format.bits())?;

    out.extend_from_slice(&DATA_CHUNK_ID);
    out.write_u32::<LittleEndian>(data_len as u32)?;
    for &sample in signal.samples() {
        encode_element(format, sample.to_f64(), &mut out)?;
    }

    Ok(out)
}

fn encode_element(format: SampleFormat, x: f64, out: &mut Vec<u8>) -> Result<()> {
    match format {
        SampleFormat::Uint8 => {
            out.write_u8(libm::round(x * 127.0 + 127.0) as u8)?;
        }
        SampleFormat::Int16 => {
            out.write_i16::<LittleEndian>(libm::round(x * 32768.0) as i16)?;
        }
        SampleFormat::Int24 => {
            let mut v = libm::round(x * 8_388_608.0) as i32;
            if v < 0 {
                v += I24_SIGN_ADJUST;
            }
            let v = v & 0x00FF_FFFF;
            out.write_u8((v & 0xFF) as u8)?;
            out.write_u8(((v >> 8) & 0xFF) as u8)?;
            out.write_u8(((v >> 16) & 0xFF) as u8)?;
        }
        SampleFormat::Int32 => {
            out.write_i32::<LittleEndian>(libm::round(x * 2_147_483_648.0) as i32)?;
        }
        SampleFormat::Int64 => {
            out.write_i64::<LittleEndian>(libm::round(x * 9_223_372_036_854_775_808.0) as i64)?;
        }
        SampleFormat::Float32 => {
            out.write_f32::<LittleEndian>(x as f32)?;
        }
        SampleFormat::Float64 => {
            out.write_f64::<LittleEndian>(x)?;
        }
    }
    Ok(())
}
