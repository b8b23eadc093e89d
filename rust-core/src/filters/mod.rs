//! Streaming filters for 16-bit telephony audio

pub mod windows;
pub mod design;
pub mod single_pole;
pub mod band_pass;
pub mod biquad;
pub mod fir;
pub mod response;
pub mod config;
pub mod bank;

pub use windows::Window;
pub use design::design_hamming_lowpass;
pub use single_pole::{HighPass, HighPassState, LowPass, LowPassState};
pub use band_pass::{BandPass, BandPassState};
pub use biquad::{Biquad, BiquadCoefficients, BiquadState};
pub use fir::{FirFilter, FirState};
pub use config::{ConfigError, FilterConfig, Topology};
pub use bank::{Filter, FilterError, FilterState, StreamFilter};
