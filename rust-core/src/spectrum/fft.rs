//! FFT engine using realfft for real-valued signals

use num_complex::Complex64;
use realfft::{RealFftPlanner, RealToComplex};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SpectrumError {
    #[error("FFT size must be at least 2 (got {0})")]
    InvalidFftSize(usize),

    #[error("FFT processing failed: {0}")]
    Fft(String),
}

/// FFT engine for real-valued signals
pub struct FftEngine {
    fft_size: usize,

    r2c: Arc<dyn RealToComplex<f64>>,

    /// Reusable input buffer
    input_buffer: Vec<f64>,

    /// Reusable output buffer (positive-frequency half of the spectrum)
    output_buffer: Vec<Complex64>,
}

impl FftEngine {
    /// Create new FFT engine
    ///
    /// # Arguments
    /// * `fft_size` - FFT size (number of samples)
    pub fn new(fft_size: usize) -> Result<Self, SpectrumError> {
        if fft_size < 2 {
            return Err(SpectrumError::InvalidFftSize(fft_size));
        }

        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(fft_size);

        Ok(Self {
            fft_size,
            r2c,
            input_buffer: vec![0.0; fft_size],
            output_buffer: vec![Complex64::new(0.0, 0.0); fft_size / 2 + 1],
        })
    }

    /// Compute FFT and return the power spectrum |X[k]|²
    ///
    /// # Arguments
    /// * `frame` - Input frame, zero-padded if shorter than fft_size
    ///
    /// # Returns
    /// Power for k = 0..fft_size/2
    pub fn compute_power(&mut self, frame: &[f64]) -> Result<Vec<f64>, SpectrumError> {
        let copy_len = frame.len().min(self.fft_size);
        self.input_buffer[..copy_len].copy_from_slice(&frame[..copy_len]);
        self.input_buffer[copy_len..].fill(0.0);

        self.r2c
            .process(&mut self.input_buffer, &mut self.output_buffer)
            .map_err(|e| SpectrumError::Fft(e.to_string()))?;

        Ok(self.output_buffer.iter().map(|c| c.norm_sqr()).collect())
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of frequency bins (fft_size/2 + 1 for real FFT)
    pub fn num_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    /// Center frequency of `bin` in Hz
    pub fn bin_to_hz(&self, bin: usize, sample_rate: f64) -> f64 {
        bin as f64 * sample_rate / self.fft_size as f64
    }
}
