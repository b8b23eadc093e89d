//! Second-order IIR section (biquad)
//!
//! Coefficient designers follow the RBJ audio EQ cookbook, normalized so the
//! leading feedback coefficient is 1. Naming: `a*` feed-forward, `b*` feedback.

use std::f64::consts::PI;

/// Normalized biquad coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BiquadCoefficients {
    /// Current input
    pub a0: f64,
    /// Input delayed by 1
    pub a1: f64,
    /// Input delayed by 2
    pub a2: f64,
    /// Output delayed by 1
    pub b1: f64,
    /// Output delayed by 2
    pub b2: f64,
}

impl BiquadCoefficients {
    /// Band-pass with constant 0 dB peak gain at `center_hz`
    ///
    /// # Arguments
    /// * `center_hz` - Center frequency
    /// * `q` - Quality factor (bandwidth = center / Q)
    /// * `sample_rate_hz` - Sample rate
    pub fn band_pass(center_hz: f64, q: f64, sample_rate_hz: f64) -> Self {
        let w0 = 2.0 * PI * center_hz / sample_rate_hz;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();

        let norm = 1.0 / (1.0 + alpha);

        Self {
            a0: alpha * norm,
            a1: 0.0,
            a2: -alpha * norm,
            b1: -2.0 * cos_w0 * norm,
            b2: (1.0 - alpha) * norm,
        }
    }

    /// High-pass with -3 dB point at `cutoff_hz` for Q = 1/√2
    pub fn high_pass(cutoff_hz: f64, q: f64, sample_rate_hz: f64) -> Self {
        let w0 = 2.0 * PI * cutoff_hz / sample_rate_hz;
        let alpha = w0.sin() / (2.0 * q);
        let cos_w0 = w0.cos();

        let norm = 1.0 / (1.0 + alpha);

        Self {
            a0: (1.0 + cos_w0) / 2.0 * norm,
            a1: -(1.0 + cos_w0) * norm,
            a2: (1.0 + cos_w0) / 2.0 * norm,
            b1: -2.0 * cos_w0 * norm,
            b2: (1.0 - alpha) * norm,
        }
    }

    /// Poles lie inside the unit circle (Jury criterion for a 2nd-order denominator)
    pub fn is_stable(&self) -> bool {
        self.b2.abs() < 1.0 && self.b1.abs() < 1.0 + self.b2
    }
}

/// Delay line: two past inputs and two past (unrounded) outputs
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BiquadState {
    pub x1: f64,
    pub x2: f64,
    pub y1: f64,
    pub y2: f64,
}

/// Convert a filter output to a PCM sample: round half away from zero, saturate
#[inline]
pub(crate) fn round_to_sample(y: f64) -> i16 {
    y.round() as i16
}

/// Biquad filter over 16-bit PCM chunks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Biquad {
    coefficients: BiquadCoefficients,
}

impl Biquad {
    pub fn new(coefficients: BiquadCoefficients) -> Self {
        Self { coefficients }
    }

    pub fn coefficients(&self) -> &BiquadCoefficients {
        &self.coefficients
    }

    pub fn create_state(&self) -> BiquadState {
        BiquadState::default()
    }

    /// y0 = a0·x0 + a1·x1 + a2·x2 − b1·y1 − b2·y2
    #[inline]
    pub fn process_sample(&self, x0: f64, state: &mut BiquadState) -> f64 {
        let c = &self.coefficients;
        let y0 = c.a0 * x0 + c.a1 * state.x1 + c.a2 * state.x2 - c.b1 * state.y1 - c.b2 * state.y2;

        // Shift delay line
        state.x2 = state.x1;
        state.x1 = x0;
        state.y2 = state.y1;
        state.y1 = y0;

        y0
    }

    /// Filter one chunk, returning the output and the state for the next chunk
    pub fn process(&self, input: &[i16], mut state: BiquadState) -> (Vec<i16>, BiquadState) {
        let output = input
            .iter()
            .map(|&x| round_to_sample(self.process_sample(x as f64, &mut state)))
            .collect();
        (output, state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sine(freq_hz: f64, amplitude: f64, len: usize) -> Vec<i16> {
        (0..len)
            .map(|n| (amplitude * (2.0 * PI * freq_hz * n as f64 / 8000.0).sin()).round() as i16)
            .collect()
    }

    fn peak(samples: &[i16]) -> f64 {
        samples.iter().map(|&s| (s as f64).abs()).fold(0.0, f64::max)
    }

    #[test]
    fn test_band_pass_coefficients() {
        let c = BiquadCoefficients::band_pass(1000.0, 1.0, 8000.0);

        // w0 = π/4: alpha = sin(π/4)/2
        let alpha = (PI / 4.0).sin() / 2.0;
        let norm = 1.0 / (1.0 + alpha);
        assert!((c.a0 - alpha * norm).abs() < 1e-12);
        assert_eq!(c.a1, 0.0);
        assert!((c.a2 + c.a0).abs() < 1e-12);
        assert!((c.b1 + 2.0 * (PI / 4.0).cos() * norm).abs() < 1e-12);
        assert!((c.b2 - (1.0 - alpha) * norm).abs() < 1e-12);
    }

    #[test]
    fn test_band_pass_passes_center() {
        let filter = Biquad::new(BiquadCoefficients::band_pass(1000.0, 1.0, 8000.0));
        let input = sine(1000.0, 10000.0, 4000);

        let (output, _) = filter.process(&input, filter.create_state());

        // Skip the settling transient, then the tone should come through at ~0 dB
        let amplitude = peak(&output[50..]);
        assert!(amplitude > 9500.0 && amplitude < 10500.0, "amplitude {}", amplitude);
    }

    #[test]
    fn test_band_pass_rejects_far_tones() {
        let filter = Biquad::new(BiquadCoefficients::band_pass(1000.0, 4.0, 8000.0));

        let (low, _) = filter.process(&sine(100.0, 10000.0, 4000), filter.create_state());
        let (high, _) = filter.process(&sine(3500.0, 10000.0, 4000), filter.create_state());

        assert!(peak(&low[400..]) < 1000.0);
        assert!(peak(&high[400..]) < 1000.0);
    }

    #[test]
    fn test_high_pass_blocks_dc_passes_high() {
        let filter = Biquad::new(BiquadCoefficients::high_pass(300.0, std::f64::consts::FRAC_1_SQRT_2, 8000.0));

        let (dc, _) = filter.process(&vec![8000i16; 2000], filter.create_state());
        assert!(dc[1999].abs() <= 1);

        let (tone, _) = filter.process(&sine(2000.0, 10000.0, 2000), filter.create_state());
        let amplitude = peak(&tone[200..]);
        assert!(amplitude > 9500.0 && amplitude < 10500.0, "amplitude {}", amplitude);
    }

    #[test]
    fn test_designs_are_stable() {
        for &q in &[0.1, 0.5, 0.707, 1.0, 5.0, 30.0] {
            for &f in &[20.0, 300.0, 1000.0, 2500.0, 3900.0] {
                let bp = BiquadCoefficients::band_pass(f, q, 8000.0);
                let hp = BiquadCoefficients::high_pass(f, q, 8000.0);
                assert!(bp.b2.abs() < 1.0 && bp.is_stable(), "band-pass f={} q={}", f, q);
                assert!(hp.b2.abs() < 1.0 && hp.is_stable(), "high-pass f={} q={}", f, q);
            }
        }
    }

    #[test]
    fn test_rounds_half_away_from_zero() {
        let filter = Biquad::new(BiquadCoefficients { a0: 0.5, a1: 0.0, a2: 0.0, b1: 0.0, b2: 0.0 });
        let (output, _) = filter.process(&[3, -3, 5], filter.create_state());
        assert_eq!(output, vec![2, -2, 3]);
    }

    #[test]
    fn test_chunked_matches_whole() {
        let filter = Biquad::new(BiquadCoefficients::band_pass(1000.0, 2.0, 8000.0));
        let input = sine(1100.0, 9000.0, 999);

        let (whole, whole_state) = filter.process(&input, filter.create_state());
        let (a, mid) = filter.process(&input[..500], filter.create_state());
        let (b, end) = filter.process(&input[500..], mid);

        assert_eq!([a, b].concat(), whole);
        assert_eq!(end, whole_state);
    }

    #[test]
    fn test_empty_chunk_keeps_state() {
        let filter = Biquad::new(BiquadCoefficients::band_pass(1000.0, 1.0, 8000.0));
        let state = BiquadState { x1: 1.0, x2: 2.0, y1: 3.0, y2: 4.0 };

        let (output, next) = filter.process(&[], state);
        assert!(output.is_empty());
        assert_eq!(next, state);
    }
}
