//! RIFF WAVE chunk scanning.
//!
//! A RIFF WAVE stream opens with a 12-byte header:
//!
//! ```text
//! byte 0:3   'R' 'I' 'F' 'F'
//! byte 4:7   uint32 total size (excludes the 8 bytes of tag + size)
//! byte 8:11  'W' 'A' 'V' 'E'
//! ```
//!
//! followed by any number of chunks, each `(4-byte tag, uint32 size, size
//! payload bytes)`. The scanner walks the chunk sequence and builds a
//! [`ChunkIndex`] without buffering any payload: the `data` chunk is recorded
//! as an offset/length pair and re-read on demand by the decoder, so indexing
//! a file costs memory proportional to the index, not the audio.
//!
//! Unknown chunk tags are inventoried rather than rejected, which keeps the
//! scanner forward-compatible with chunk types it has never seen. A legacy
//! ID3v1-style block (3-byte `tag` prefix, 128 bytes total, not
//! length-prefixed and therefore not RIFF-conformant) is recognized at the
//! end of the stream by its prefix only.

use std::fs::File;
use std::io::{self, BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use byteorder::{LittleEndian, ReadBytesExt};
use tracing::debug;

use crate::error::{Error, Result};
use crate::format::FormatChunk;

/// The FourCC identifier of the RIFF container.
pub const RIFF_ID: [u8; 4] = *b"RIFF";

/// The FourCC identifier of the WAVE form type.
pub const WAVE_ID: [u8; 4] = *b"WAVE";

/// The FourCC identifier of the format chunk.
pub const FMT_CHUNK_ID: [u8; 4] = *b"fmt ";

/// The FourCC identifier of the data chunk.
pub const DATA_CHUNK_ID: [u8; 4] = *b"data";

/// Prefix of the legacy ID3v1-style trailer block.
const TRAILER_PREFIX: [u8; 3] = *b"tag";

/// Total size of the trailer block, including its 3-byte prefix.
const TRAILER_LEN: i64 = 128;

/// The validated RIFF container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RiffHeader {
    /// Declared total size: the file length minus the 8 bytes of
    /// `RIFF` + size field.
    pub size: u32,
}

/// Location of the `data` chunk payload within the stream.
///
/// The payload itself is not read during scanning; decoding seeks back to
/// `offset` and streams `size` bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataChunkRef {
    /// Byte offset of the first payload byte.
    pub offset: u64,
    /// Declared payload length in bytes.
    pub size: u32,
}

/// A chunk the scanner recognized only by its framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnhandledChunk {
    /// The chunk's FourCC tag.
    pub id: [u8; 4],
    /// Declared payload length in bytes.
    pub size: u32,
}

impl UnhandledChunk {
    /// The tag as a lossy string, for diagnostics.
    pub fn id_str(&self) -> String {
        String::from_utf8_lossy(&self.id).into_owned()
    }
}

/// A legacy trailer block recognized by its `tag` prefix.
///
/// Only presence is recorded; the 128-byte payload is never decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrailerTag {
    /// The first four bytes of the block.
    pub id: [u8; 4],
}

/// Structured index of the chunks in a RIFF WAVE stream.
#[derive(Debug, Clone)]
pub struct ChunkIndex {
    /// The container header, validated before anything else is read.
    pub riff: RiffHeader,
    /// The `fmt ` chunk, if present.
    pub format: Option<FormatChunk>,
    /// The `data` chunk location, if present.
    pub data: Option<DataChunkRef>,
    /// Legacy ID3v1-style trailer, if present.
    pub trailer: Option<TrailerTag>,
    /// Chunks with unrecognized tags, in stream order.
    pub unhandled: Vec<UnhandledChunk>,
}

impl ChunkIndex {
    /// The `fmt ` chunk, or an error if the stream has none.
    pub fn require_format(&self) -> Result<&FormatChunk> {
        self.format
            .as_ref()
            .ok_or_else(|| Error::unsupported("stream has no fmt chunk"))
    }

    /// The `data` chunk location, or an error if the stream has none.
    pub fn require_data(&self) -> Result<&DataChunkRef> {
        self.data
            .as_ref()
            .ok_or_else(|| Error::unsupported("stream has no data chunk"))
    }
}

/// Scan a RIFF WAVE stream and index its chunks.
///
/// Fails with [`Error::NotRiffWave`] before reading past the 12-byte header
/// when the `RIFF`/`WAVE` framing is absent. After the header, chunk tags
/// are read until the stream is exhausted; running out of bytes on a tag
/// read is the normal termination condition.
///
/// Every chunk branch repositions the cursor to `payload_start +
/// declared_size`. Only the declared size is honored; no even-byte padding
/// is assumed, so a misdeclared chunk cannot silently desynchronize its
/// successors.
pub fn scan<R: Read + Seek>(reader: &mut R) -> Result<ChunkIndex> {
    let riff = read_riff_header(reader)?;

    let mut index = ChunkIndex {
        riff,
        format: None,
        data: None,
        trailer: None,
        unhandled: Vec::new(),
    };

    while let Some(id) = read_chunk_id(reader)? {
        if id == FMT_CHUNK_ID {
            let format = FormatChunk::read(reader)?;
            debug!(
                format = format.format_name(),
                channels = format.channels,
                sample_rate = format.sample_rate,
                bits = format.bits_per_sample,
                "fmt chunk"
            );
            index.format = Some(format);
        } else if id == DATA_CHUNK_ID {
            let size = reader.read_u32::<LittleEndian>()?;
            let offset = reader.stream_position()?;
            reader.seek(SeekFrom::Start(offset + u64::from(size)))?;
            debug!(offset, size, "data chunk");
            index.data = Some(DataChunkRef { offset, size });
        } else if id[..3] == TRAILER_PREFIX {
            // Not length-prefixed; skip the fixed-size remainder of the
            // block so a conformant chunk after it would still parse.
            reader.seek(SeekFrom::Current(TRAILER_LEN - 4))?;
            debug!("trailer tag block");
            index.trailer = Some(TrailerTag { id });
        } else {
            let size = reader.read_u32::<LittleEndian>()?;
            reader.seek(SeekFrom::Current(i64::from(size)))?;
            let chunk = UnhandledChunk { id, size };
            debug!(tag = %chunk.id_str(), size, "unhandled chunk");
            index.unhandled.push(chunk);
        }
    }

    Ok(index)
}

/// Scan a RIFF WAVE file by path.
///
/// The file handle is scoped to this call and released on every exit path,
/// including parse failures partway through the stream.
pub fn scan_file<P: AsRef<Path>>(path: P) -> Result<ChunkIndex> {
    let mut reader = BufReader::new(File::open(path)?);
    scan(&mut reader)
}

fn read_riff_header<R: Read>(reader: &mut R) -> Result<RiffHeader> {
    let mut header = [0u8; 12];
    reader.read_exact(&mut header).map_err(|e| {
        if e.kind() == io::ErrorKind::UnexpectedEof {
            Error::NotRiffWave
        } else {
            Error::Io(e)
        }
    })?;

    if header[0..4] != RIFF_ID || header[8..12] != WAVE_ID {
        return Err(Error::NotRiffWave);
    }

    let size = u32::from_le_bytes([header[4], header[5], header[6], header[7]]);
    Ok(RiffHeader { size })
}

/// Read the next 4-byte chunk tag, or `None` at end of stream.
///
/// A truncated tail shorter than one tag also terminates the scan; the
/// bytes cannot frame a chunk.
fn read_chunk_id<R: Read>(reader: &mut R) -> Result<Option<[u8; 4]>> {
    let mut id = [0u8; 4];
    let mut filled = 0;
    while filled < id.len() {
        let n = reader.read(&mut id[filled..])?;
        if n == 0 {
            break;
        }
        filled += n;
    }
    if filled == id.len() {
        Ok(Some(id))
    } else {
        Ok(None)
    }
}
