//! Averaged power spectra and band power comparison
//!
//! Used to check a finished call: how much energy the filter removed outside
//! the pass band and how much it kept inside.

use super::fft::{FftEngine, SpectrumError};
use super::windowing::{apply_window, window_energy};
use crate::filters::windows::Window;
use std::fmt;

/// Spectrum analyzer configuration
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// FFT size (number of samples per frame)
    pub fft_size: usize,

    pub window: Window,

    /// Sample rate in Hz
    pub sample_rate: f64,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            fft_size: 512,
            window: Window::Hann,
            sample_rate: 8000.0,
        }
    }
}

/// Mean power inside and outside a frequency band
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandPower {
    pub in_band: f64,
    pub out_of_band: f64,
}

fn power_db(power: f64) -> f64 {
    10.0 * power.max(1e-20).log10()
}

impl BandPower {
    pub fn in_band_db(&self) -> f64 {
        power_db(self.in_band)
    }

    pub fn out_of_band_db(&self) -> f64 {
        power_db(self.out_of_band)
    }
}

/// Band power of the raw and filtered versions of the same audio
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandReport {
    pub low_hz: f64,
    pub high_hz: f64,
    pub raw: BandPower,
    pub filtered: BandPower,
}

impl BandReport {
    /// Filtered minus raw in-band power, in dB
    pub fn in_band_gain_db(&self) -> f64 {
        self.filtered.in_band_db() - self.raw.in_band_db()
    }

    /// Filtered minus raw out-of-band power, in dB
    pub fn out_of_band_gain_db(&self) -> f64 {
        self.filtered.out_of_band_db() - self.raw.out_of_band_db()
    }
}

impl fmt::Display for BandReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "band {:.0}-{:.0} Hz: in-band {:+.1} dB, out-of-band {:+.1} dB",
            self.low_hz,
            self.high_hz,
            self.in_band_gain_db(),
            self.out_of_band_gain_db()
        )
    }
}

/// Welch-style spectrum analyzer (half-overlapping windowed frames)
pub struct SpectrumAnalyzer {
    config: AnalyzerConfig,
    fft_engine: FftEngine,
    window_energy: f64,
}

impl SpectrumAnalyzer {
    pub fn new(config: AnalyzerConfig) -> Result<Self, SpectrumError> {
        let fft_engine = FftEngine::new(config.fft_size)?;
        let window_energy = window_energy(config.window, config.fft_size);

        Ok(Self {
            config,
            fft_engine,
            window_energy,
        })
    }

    /// Average power spectrum of `signal`
    ///
    /// Signals shorter than one frame are zero-padded into a single frame;
    /// an empty signal yields all-zero power.
    pub fn power_spectrum(&mut self, signal: &[f64]) -> Result<Vec<f64>, SpectrumError> {
        let size = self.config.fft_size;
        let mut average = vec![0.0; self.fft_engine.num_bins()];

        if signal.is_empty() {
            return Ok(average);
        }

        let hop = (size / 2).max(1);
        let mut starts: Vec<usize> = (0..)
            .map(|i| i * hop)
            .take_while(|&start| start + size <= signal.len())
            .collect();
        if starts.is_empty() {
            starts.push(0);
        }

        let mut frame = vec![0.0; size];
        for &start in &starts {
            let end = (start + size).min(signal.len());
            frame.fill(0.0);
            frame[..end - start].copy_from_slice(&signal[start..end]);

            let windowed = apply_window(&frame, self.config.window);
            let power = self.fft_engine.compute_power(&windowed)?;
            for (acc, p) in average.iter_mut().zip(power) {
                *acc += p;
            }
        }

        let scale = 1.0 / (starts.len() as f64 * self.window_energy);
        for p in average.iter_mut() {
            *p *= scale;
        }

        Ok(average)
    }

    /// Split the averaged spectrum of `samples` at `[low_hz, high_hz]`
    pub fn band_power(
        &mut self,
        samples: &[i16],
        low_hz: f64,
        high_hz: f64,
    ) -> Result<BandPower, SpectrumError> {
        let signal: Vec<f64> = samples.iter().map(|&s| s as f64).collect();
        let spectrum = self.power_spectrum(&signal)?;

        let mut band = BandPower::default();
        for (bin, p) in spectrum.iter().enumerate() {
            let freq = self.fft_engine.bin_to_hz(bin, self.config.sample_rate);
            if freq >= low_hz && freq <= high_hz {
                band.in_band += p;
            } else {
                band.out_of_band += p;
            }
        }

        Ok(band)
    }

    /// Compare raw and filtered audio around the band `[low_hz, high_hz]`
    pub fn band_report(
        &mut self,
        raw: &[i16],
        filtered: &[i16],
        low_hz: f64,
        high_hz: f64,
    ) -> Result<BandReport, SpectrumError> {
        Ok(BandReport {
            low_hz,
            high_hz,
            raw: self.band_power(raw, low_hz, high_hz)?,
            filtered: self.band_power(filtered, low_hz, high_hz)?,
        })
    }

    /// Get frequency bins in Hz
    pub fn frequency_bins_hz(&self) -> Vec<f64> {
        (0..self.fft_engine.num_bins())
            .map(|bin| self.fft_engine.bin_to_hz(bin, self.config.sample_rate))
            .collect()
    }

    pub fn config(&self) -> &AnalyzerConfig {
        &self.config
    }
}
