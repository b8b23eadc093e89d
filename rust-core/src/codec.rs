//! µ-law ⇄ linear PCM conversion
//!
//! 8-bit companded telephony samples to signed 16-bit PCM and back.
//! Pure functions, no state.

/// Sign bit of a (complemented) µ-law byte
const SIGN_BIT: u8 = 0x80;

/// Largest magnitude the encoder represents (exponent 7, mantissa 15)
const MAX_MAGNITUDE: i32 = 0x7fff;

/// Decode one µ-law byte to a linear PCM sample
///
/// Reconstructs the midpoint of the quantization step, so every code
/// (including 0xFF and 0x7F) decodes to a non-zero value of ±8 or more.
#[inline]
pub fn decode(byte: u8) -> i16 {
    let u = !byte;

    let exponent = (u >> 4) & 0x07;
    let mantissa = (u & 0x0f) as i32;

    let mut magnitude = (mantissa << 4) + 0x08;
    if exponent > 0 {
        magnitude += 0x100;
    }
    if exponent > 1 {
        magnitude <<= exponent - 1;
    }

    // Largest magnitude is (0xf0 + 0x108) << 6 = 32256, always fits
    if u & SIGN_BIT != 0 {
        -magnitude as i16
    } else {
        magnitude as i16
    }
}

/// Encode one linear PCM sample to a µ-law byte
///
/// Exact inverse of [`decode`]: segments are found by searching on
/// `magnitude >> 4`, so `encode(decode(b)) == b` for every byte.
///
/// # Arguments
/// * `sample` - PCM value; anything outside [-32768, 32767] is clamped first
///
/// # Returns
/// The code whose decoded value is nearest to `sample`
#[inline]
pub fn encode(sample: i32) -> u8 {
    let sample = sample.clamp(i16::MIN as i32, i16::MAX as i32);

    let sign = if sample < 0 { SIGN_BIT } else { 0 };
    let magnitude = sample.unsigned_abs().min(MAX_MAGNITUDE as u32);

    // Segment search: one shift per doubling above 0x1f, then one more
    // segment if bit 4 is still set after the shifts
    let mut m = magnitude >> 4;
    let mut exponent: u8 = 0;
    while m > 0x1f {
        m >>= 1;
        exponent += 1;
    }
    if m > 0x0f {
        exponent += 1;
    }
    let mantissa = (m & 0x0f) as u8;

    !(sign | (exponent << 4) | mantissa)
}

/// Decode a buffer of µ-law bytes (order and length preserved)
pub fn decode_buffer(bytes: &[u8]) -> Vec<i16> {
    bytes.iter().map(|&b| decode(b)).collect()
}

/// Encode a buffer of PCM samples (order and length preserved)
pub fn encode_buffer(samples: &[i16]) -> Vec<u8> {
    samples.iter().map(|&s| encode(s as i32)).collect()
}
