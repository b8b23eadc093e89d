//! Windowing applied to analysis frames before the FFT

use crate::filters::windows::Window;

/// Apply window to signal
///
/// # Returns
/// Windowed copy of `signal`
pub fn apply_window(signal: &[f64], window: Window) -> Vec<f64> {
    let length = signal.len();

    signal
        .iter()
        .enumerate()
        .map(|(n, &s)| s * window.at(n, length))
        .collect()
}

/// Sum of squared window coefficients, the power normalization for a frame
pub fn window_energy(window: Window, length: usize) -> f64 {
    window.coefficients(length).iter().map(|&w| w * w).sum()
}
