//! Minimal RIFF/WAVE container for 16-bit PCM
//!
//! 44-byte canonical header followed by little-endian samples.

use byteorder::{LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Size of the canonical header in bytes
pub const HEADER_LEN: usize = 44;

const PCM_FORMAT: u16 = 1;
const BITS_PER_SAMPLE: u16 = 16;

/// Largest data chunk whose RIFF size (`36 + data`) still fits in 32 bits
const MAX_DATA_LEN: u32 = u32::MAX - 36;

fn too_large(what: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidInput, format!("{} does not fit a WAV header", what))
}

/// Byte length of the data chunk for `sample_count` 16-bit samples
fn data_len(sample_count: usize) -> io::Result<u32> {
    sample_count
        .checked_mul(2)
        .and_then(|len| u32::try_from(len).ok())
        .filter(|&len| len <= MAX_DATA_LEN)
        .ok_or_else(|| too_large("sample data"))
}

/// Write header and samples to `writer`
///
/// # Arguments
/// * `samples` - Interleaved 16-bit samples
/// * `sample_rate` - Sample rate in Hz
/// * `channels` - Channel count
///
/// # Errors
/// Writer failures, or a recording too long for the 32-bit RIFF sizes
pub fn write_wav<W: Write>(
    writer: &mut W,
    samples: &[i16],
    sample_rate: u32,
    channels: u16,
) -> io::Result<()> {
    let block_align = channels
        .checked_mul(BITS_PER_SAMPLE / 8)
        .ok_or_else(|| too_large("channel count"))?;
    let byte_rate = sample_rate
        .checked_mul(block_align as u32)
        .ok_or_else(|| too_large("byte rate"))?;
    let data_len = data_len(samples.len())?;

    writer.write_all(b"RIFF")?;
    writer.write_u32::<LittleEndian>(36 + data_len)?;
    writer.write_all(b"WAVE")?;

    writer.write_all(b"fmt ")?;
    writer.write_u32::<LittleEndian>(16)?;
    writer.write_u16::<LittleEndian>(PCM_FORMAT)?;
    writer.write_u16::<LittleEndian>(channels)?;
    writer.write_u32::<LittleEndian>(sample_rate)?;
    writer.write_u32::<LittleEndian>(byte_rate)?;
    writer.write_u16::<LittleEndian>(block_align)?;
    writer.write_u16::<LittleEndian>(BITS_PER_SAMPLE)?;

    writer.write_all(b"data")?;
    writer.write_u32::<LittleEndian>(data_len)?;
    for &sample in samples {
        writer.write_i16::<LittleEndian>(sample)?;
    }

    Ok(())
}

/// Encode samples into an in-memory WAV file
pub fn encode_wav(samples: &[i16], sample_rate: u32, channels: u16) -> io::Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(HEADER_LEN + samples.len() * 2);
    write_wav(&mut bytes, samples, sample_rate, channels)?;
    Ok(bytes)
}
