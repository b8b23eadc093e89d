//! Per-stream filter configuration and validation
//!
//! A configuration is chosen once per stream. Validation happens here, before
//! any coefficients are designed; the processing code assumes valid input.

use super::band_pass::BandPass;
use super::bank::Filter;
use super::biquad::{Biquad, BiquadCoefficients};
use super::design::design_hamming_lowpass;
use super::fir::FirFilter;
use super::single_pole::{HighPass, LowPass};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Filter topology selector
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Topology {
    #[serde(rename = "highpass")]
    HighPass,
    #[serde(rename = "lowpass")]
    LowPass,
    #[serde(rename = "bandpass")]
    BandPass,
    #[serde(rename = "biquad-bandpass")]
    BiquadBandPass,
    #[serde(rename = "biquad-highpass")]
    BiquadHighPass,
    #[serde(rename = "fir-lowpass")]
    FirLowPass,
}

impl Topology {
    pub fn as_str(&self) -> &'static str {
        match self {
            Topology::HighPass => "highpass",
            Topology::LowPass => "lowpass",
            Topology::BandPass => "bandpass",
            Topology::BiquadBandPass => "biquad-bandpass",
            Topology::BiquadHighPass => "biquad-highpass",
            Topology::FirLowPass => "fir-lowpass",
        }
    }
}

impl FromStr for Topology {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, ConfigError> {
        let topology = match s.trim().to_ascii_lowercase().as_str() {
            "highpass" => Topology::HighPass,
            "lowpass" => Topology::LowPass,
            "bandpass" => Topology::BandPass,
            "biquad-bandpass" => Topology::BiquadBandPass,
            "biquad-highpass" => Topology::BiquadHighPass,
            "fir-lowpass" => Topology::FirLowPass,
            _ => return Err(ConfigError::UnknownTopology(s.to_string())),
        };
        Ok(topology)
    }
}

impl fmt::Display for Topology {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("Unknown filter topology '{0}'")]
    UnknownTopology(String),

    #[error("Sample rate must be positive and finite (got {0} Hz)")]
    InvalidSampleRate(f64),

    #[error("Topology {topology} requires `{parameter}`")]
    MissingParameter {
        topology: Topology,
        parameter: &'static str,
    },

    #[error("Cutoff {cutoff_hz} Hz must lie strictly between 0 and Nyquist ({nyquist_hz} Hz)")]
    InvalidCutoff { cutoff_hz: f64, nyquist_hz: f64 },

    #[error("Band edges inverted: low {low_cutoff_hz} Hz >= high {high_cutoff_hz} Hz")]
    InvertedBand {
        low_cutoff_hz: f64,
        high_cutoff_hz: f64,
    },

    #[error("Q must be positive and finite (got {0})")]
    InvalidQ(f64),

    #[error("FIR tap count must be odd and at least 1 (got {0})")]
    InvalidTapCount(usize),
}

/// Filter configuration for one stream
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    pub topology: Topology,

    /// Corner (single-pole, biquad high-pass, FIR) or center (biquad band-pass)
    #[serde(default)]
    pub cutoff_hz: Option<f64>,

    /// Lower band edge (band-pass cascade)
    #[serde(default)]
    pub low_cutoff_hz: Option<f64>,

    /// Upper band edge (band-pass cascade)
    #[serde(default)]
    pub high_cutoff_hz: Option<f64>,

    pub sample_rate_hz: f64,

    /// Quality factor (biquad only)
    #[serde(default)]
    pub q: Option<f64>,

    /// Number of taps (FIR only)
    #[serde(default)]
    pub tap_count: Option<usize>,
}

impl Default for FilterConfig {
    /// 300 Hz single-pole high-pass on an 8 kHz stream
    fn default() -> Self {
        Self::high_pass(300.0, 8000.0)
    }
}

impl FilterConfig {
    fn with_topology(topology: Topology, sample_rate_hz: f64) -> Self {
        Self {
            topology,
            cutoff_hz: None,
            low_cutoff_hz: None,
            high_cutoff_hz: None,
            sample_rate_hz,
            q: None,
            tap_count: None,
        }
    }

    pub fn high_pass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self {
            cutoff_hz: Some(cutoff_hz),
            ..Self::with_topology(Topology::HighPass, sample_rate_hz)
        }
    }

    pub fn low_pass(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self {
            cutoff_hz: Some(cutoff_hz),
            ..Self::with_topology(Topology::LowPass, sample_rate_hz)
        }
    }

    pub fn band_pass(low_cutoff_hz: f64, high_cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self {
            low_cutoff_hz: Some(low_cutoff_hz),
            high_cutoff_hz: Some(high_cutoff_hz),
            ..Self::with_topology(Topology::BandPass, sample_rate_hz)
        }
    }

    pub fn biquad_band_pass(center_hz: f64, q: f64, sample_rate_hz: f64) -> Self {
        Self {
            cutoff_hz: Some(center_hz),
            q: Some(q),
            ..Self::with_topology(Topology::BiquadBandPass, sample_rate_hz)
        }
    }

    pub fn biquad_high_pass(cutoff_hz: f64, q: f64, sample_rate_hz: f64) -> Self {
        Self {
            cutoff_hz: Some(cutoff_hz),
            q: Some(q),
            ..Self::with_topology(Topology::BiquadHighPass, sample_rate_hz)
        }
    }

    pub fn fir_low_pass(cutoff_hz: f64, tap_count: usize, sample_rate_hz: f64) -> Self {
        Self {
            cutoff_hz: Some(cutoff_hz),
            tap_count: Some(tap_count),
            ..Self::with_topology(Topology::FirLowPass, sample_rate_hz)
        }
    }

    pub fn nyquist_hz(&self) -> f64 {
        self.sample_rate_hz / 2.0
    }

    fn require<T: Copy>(&self, value: Option<T>, parameter: &'static str) -> Result<T, ConfigError> {
        value.ok_or(ConfigError::MissingParameter {
            topology: self.topology,
            parameter,
        })
    }

    fn checked_cutoff(&self, value: Option<f64>, parameter: &'static str) -> Result<f64, ConfigError> {
        let cutoff_hz = self.require(value, parameter)?;
        let nyquist_hz = self.nyquist_hz();

        if !cutoff_hz.is_finite() || cutoff_hz <= 0.0 || cutoff_hz >= nyquist_hz {
            return Err(ConfigError::InvalidCutoff { cutoff_hz, nyquist_hz });
        }
        Ok(cutoff_hz)
    }

    fn checked_q(&self) -> Result<f64, ConfigError> {
        let q = self.require(self.q, "q")?;
        if !q.is_finite() || q <= 0.0 {
            return Err(ConfigError::InvalidQ(q));
        }
        Ok(q)
    }

    fn checked_tap_count(&self) -> Result<usize, ConfigError> {
        let taps = self.require(self.tap_count, "tap_count")?;
        if taps == 0 || taps % 2 == 0 {
            return Err(ConfigError::InvalidTapCount(taps));
        }
        Ok(taps)
    }

    /// Reject degenerate configurations before any filter is built
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.design().map(|_| ())
    }

    /// Validate and compute coefficients
    pub fn design(&self) -> Result<Filter, ConfigError> {
        let rate = self.sample_rate_hz;
        if !rate.is_finite() || rate <= 0.0 {
            return Err(ConfigError::InvalidSampleRate(rate));
        }

        let filter = match self.topology {
            Topology::HighPass => {
                let cutoff = self.checked_cutoff(self.cutoff_hz, "cutoff_hz")?;
                Filter::HighPass(HighPass::new(cutoff, rate))
            }
            Topology::LowPass => {
                let cutoff = self.checked_cutoff(self.cutoff_hz, "cutoff_hz")?;
                Filter::LowPass(LowPass::new(cutoff, rate))
            }
            Topology::BandPass => {
                let low = self.checked_cutoff(self.low_cutoff_hz, "low_cutoff_hz")?;
                let high = self.checked_cutoff(self.high_cutoff_hz, "high_cutoff_hz")?;
                if low >= high {
                    return Err(ConfigError::InvertedBand {
                        low_cutoff_hz: low,
                        high_cutoff_hz: high,
                    });
                }
                Filter::BandPass(BandPass::new(low, high, rate))
            }
            Topology::BiquadBandPass => {
                let center = self.checked_cutoff(self.cutoff_hz, "cutoff_hz")?;
                let q = self.checked_q()?;
                Filter::Biquad(Biquad::new(BiquadCoefficients::band_pass(center, q, rate)))
            }
            Topology::BiquadHighPass => {
                let cutoff = self.checked_cutoff(self.cutoff_hz, "cutoff_hz")?;
                let q = self.checked_q()?;
                Filter::Biquad(Biquad::new(BiquadCoefficients::high_pass(cutoff, q, rate)))
            }
            Topology::FirLowPass => {
                let cutoff = self.checked_cutoff(self.cutoff_hz, "cutoff_hz")?;
                let taps = self.checked_tap_count()?;
                Filter::Fir(FirFilter::new(design_hamming_lowpass(cutoff, rate, taps)))
            }
        };

        Ok(filter)
    }
}
