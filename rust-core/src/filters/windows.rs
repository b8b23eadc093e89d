//! Raised-cosine windows: Hamming for FIR design, Hann for analysis frames

use std::f64::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    /// 0.5 - 0.5·cos(2πn/(M-1)), zero at both ends
    Hann,

    /// 0.54 - 0.46·cos(2πn/(M-1)), endpoints at 0.08
    Hamming,
}

impl Window {
    /// (a0, a1) in a0 - a1·cos(2πn/(M-1))
    fn weights(self) -> (f64, f64) {
        match self {
            Window::Hann => (0.5, 0.5),
            Window::Hamming => (0.54, 0.46),
        }
    }

    /// Coefficient `n` of a window spanning `length` samples
    pub fn at(self, n: usize, length: usize) -> f64 {
        if length <= 1 {
            return 1.0;
        }
        let (a0, a1) = self.weights();
        a0 - a1 * (2.0 * PI * n as f64 / (length - 1) as f64).cos()
    }

    /// All `length` coefficients; lengths 0 and 1 have no shape
    pub fn coefficients(self, length: usize) -> Vec<f64> {
        (0..length).map(|n| self.at(n, length)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_symmetric_with_unit_peak() {
        let length = 161;
        for window in [Window::Hann, Window::Hamming] {
            let w = window.coefficients(length);
            assert_eq!(w.len(), length);
            assert!((w[0] - w[length - 1]).abs() < 1e-10);
            assert!((w[length / 2] - 1.0).abs() < 1e-10);
        }
    }

    #[test]
    fn test_endpoints() {
        let hann = Window::Hann.coefficients(64);
        let hamming = Window::Hamming.coefficients(64);
        assert!(hann[0].abs() < 1e-12);
        assert!((hamming[0] - 0.08).abs() < 1e-12);
    }

    #[test]
    fn test_degenerate_lengths() {
        assert!(Window::Hamming.coefficients(0).is_empty());
        assert_eq!(Window::Hamming.coefficients(1), vec![1.0]);
    }
}
