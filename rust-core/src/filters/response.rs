//! Frequency response of designed filters

use super::biquad::BiquadCoefficients;
use num_complex::Complex64;
use std::f64::consts::PI;

/// Angular frequency in rad/sample
fn omega(freq_hz: f64, sample_rate_hz: f64) -> f64 {
    2.0 * PI * freq_hz / sample_rate_hz
}

/// Complex response H(e^jω) of FIR taps at `freq_hz`
pub fn fir_response(h: &[f64], freq_hz: f64, sample_rate_hz: f64) -> Complex64 {
    let w = omega(freq_hz, sample_rate_hz);

    h.iter()
        .enumerate()
        .map(|(n, &h_n)| h_n * Complex64::from_polar(1.0, -w * n as f64))
        .sum()
}

/// Complex response of a biquad at `freq_hz`
///
/// H(z) = (a0 + a1·z⁻¹ + a2·z⁻²) / (1 + b1·z⁻¹ + b2·z⁻²)
pub fn biquad_response(c: &BiquadCoefficients, freq_hz: f64, sample_rate_hz: f64) -> Complex64 {
    let w = omega(freq_hz, sample_rate_hz);
    let z1 = Complex64::from_polar(1.0, -w);
    let z2 = Complex64::from_polar(1.0, -2.0 * w);

    let numerator = c.a0 + c.a1 * z1 + c.a2 * z2;
    let denominator = 1.0 + c.b1 * z1 + c.b2 * z2;

    numerator / denominator
}

/// Complex response of the single-pole high-pass y[n] = α(y[n-1] + x[n] - x[n-1])
pub fn high_pass_response(alpha: f64, freq_hz: f64, sample_rate_hz: f64) -> Complex64 {
    let z1 = Complex64::from_polar(1.0, -omega(freq_hz, sample_rate_hz));
    alpha * (1.0 - z1) / (1.0 - alpha * z1)
}

/// Complex response of the single-pole low-pass y[n] = y[n-1] + α(x[n] - y[n-1])
pub fn low_pass_response(alpha: f64, freq_hz: f64, sample_rate_hz: f64) -> Complex64 {
    let z1 = Complex64::from_polar(1.0, -omega(freq_hz, sample_rate_hz));
    alpha / (1.0 - (1.0 - alpha) * z1)
}

/// Magnitude in dB, floored at -200 dB
pub fn magnitude_db(response: Complex64) -> f64 {
    20.0 * response.norm().max(1e-10).log10()
}
