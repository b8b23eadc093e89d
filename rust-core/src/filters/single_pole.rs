//! First-order IIR (RC) high-pass and low-pass filters
//!
//! Also provides the cutoff → α mapping used by the band-pass cascade.

use std::f64::consts::PI;

/// Smoothing factor for the RC high-pass: α = RC / (RC + dt)
///
/// # Arguments
/// * `cutoff_hz` - -3 dB corner frequency
/// * `sample_rate_hz` - Sample rate of the stream
pub fn alpha_high_pass(cutoff_hz: f64, sample_rate_hz: f64) -> f64 {
    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    let dt = 1.0 / sample_rate_hz;
    rc / (rc + dt)
}

/// Smoothing factor for the RC low-pass: α = dt / (RC + dt)
///
/// Computed on its own rather than as `1 - alpha_high_pass`, which rounds
/// differently in the last bits.
pub fn alpha_low_pass(cutoff_hz: f64, sample_rate_hz: f64) -> f64 {
    let dt = 1.0 / sample_rate_hz;
    let rc = 1.0 / (2.0 * PI * cutoff_hz);
    dt / (rc + dt)
}

/// Convert a filter output to a PCM sample: truncate toward zero, saturate
#[inline]
pub(crate) fn truncate_to_sample(y: f64) -> i16 {
    y as i16
}

/// Carried state of the high-pass: last input and last (unconverted) output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HighPassState {
    pub prev_in: f64,
    pub prev_out: f64,
}

/// Carried state of the low-pass: last (unconverted) output
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LowPassState {
    pub prev_out: f64,
}

/// Single-pole high-pass filter coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HighPass {
    alpha: f64,
}

impl HighPass {
    /// Design from a corner frequency
    pub fn new(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self::from_alpha(alpha_high_pass(cutoff_hz, sample_rate_hz))
    }

    pub fn from_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fresh zero state for a new stream
    pub fn create_state(&self) -> HighPassState {
        HighPassState::default()
    }

    /// y[n] = α·(y[n-1] + x[n] - x[n-1])
    #[inline]
    pub fn process_sample(&self, x: f64, state: &mut HighPassState) -> f64 {
        let y = self.alpha * (state.prev_out + x - state.prev_in);
        state.prev_in = x;
        state.prev_out = y;
        y
    }

    /// Filter one chunk
    ///
    /// # Arguments
    /// * `input` - PCM chunk (may be empty)
    /// * `state` - State left by the previous chunk of the same stream
    ///
    /// # Returns
    /// Filtered chunk of the same length, and the state for the next chunk
    pub fn process(&self, input: &[i16], mut state: HighPassState) -> (Vec<i16>, HighPassState) {
        let output = input
            .iter()
            .map(|&x| truncate_to_sample(self.process_sample(x as f64, &mut state)))
            .collect();
        (output, state)
    }
}

/// Single-pole low-pass filter coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LowPass {
    alpha: f64,
}

impl LowPass {
    /// Design from a corner frequency
    pub fn new(cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self::from_alpha(alpha_low_pass(cutoff_hz, sample_rate_hz))
    }

    pub fn from_alpha(alpha: f64) -> Self {
        Self { alpha }
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Fresh zero state for a new stream
    pub fn create_state(&self) -> LowPassState {
        LowPassState::default()
    }

    /// y[n] = y[n-1] + α·(x[n] - y[n-1])
    #[inline]
    pub fn process_sample(&self, x: f64, state: &mut LowPassState) -> f64 {
        let y = state.prev_out + self.alpha * (x - state.prev_out);
        state.prev_out = y;
        y
    }

    /// Filter one chunk, returning the output and the state for the next chunk
    pub fn process(&self, input: &[i16], mut state: LowPassState) -> (Vec<i16>, LowPassState) {
        let output = input
            .iter()
            .map(|&x| truncate_to_sample(self.process_sample(x as f64, &mut state)))
            .collect();
        (output, state)
    }
}
