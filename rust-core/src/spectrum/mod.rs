//! Spectral analysis of recorded call audio

pub mod fft;
pub mod windowing;
pub mod analysis;

pub use fft::{FftEngine, SpectrumError};
pub use windowing::apply_window;
pub use analysis::{AnalyzerConfig, BandPower, BandReport, SpectrumAnalyzer};
