//! FIR filter design using the windowing method

use super::windows::Window;
use std::f64::consts::PI;

/// Design a Hamming-windowed sinc low-pass FIR filter with unity DC gain
///
/// # Algorithm
/// 1. Ideal impulse response sin(ω(n-m)) / (π(n-m)) centered at m = (N-1)/2
/// 2. Multiply the off-center taps by the Hamming window
/// 3. Divide every tap by the sum of taps so the DC gain is exactly 1
///
/// # Arguments
/// * `cutoff_hz` - Cutoff frequency
/// * `sample_rate_hz` - Sample rate
/// * `num_taps` - Filter length N (odd for a Type I linear-phase filter)
///
/// # Returns
/// Vector of filter coefficients h[n] for n = 0..N-1
pub fn design_hamming_lowpass(cutoff_hz: f64, sample_rate_hz: f64, num_taps: usize) -> Vec<f64> {
    let omega = 2.0 * PI * cutoff_hz / sample_rate_hz;
    let center = num_taps.saturating_sub(1) as f64 / 2.0;

    let mut h: Vec<f64> = (0..num_taps)
        .map(|n| {
            let n_shifted = n as f64 - center;
            if n_shifted.abs() < 1e-10 {
                // At center point: limit as n -> 0
                omega / PI
            } else {
                (omega * n_shifted).sin() / (PI * n_shifted) * Window::Hamming.at(n, num_taps)
            }
        })
        .collect();

    // Normalize to unity gain at DC
    let sum: f64 = h.iter().sum();
    for tap in h.iter_mut() {
        *tap /= sum;
    }

    h
}
