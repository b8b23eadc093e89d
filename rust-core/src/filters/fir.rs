//! Streaming FIR filter with a circular input history
//!
//! Direct convolution, O(N) per sample. Coefficients are immutable; the ring
//! buffer lives in a separate state value owned by the stream.

/// Ring buffer of the last N raw inputs plus the next write position
#[derive(Debug, Clone, PartialEq)]
pub struct FirState {
    /// Previous N input samples, zero-filled at stream start
    history: Vec<f64>,

    /// Current write position in the ring buffer
    cursor: usize,
}

impl FirState {
    /// Zero history for a filter of `length` taps
    pub fn new(length: usize) -> Self {
        Self {
            history: vec![0.0; length],
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.history.len()
    }

    pub fn is_empty(&self) -> bool {
        self.history.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }
}

/// FIR filter coefficients h[n]
#[derive(Debug, Clone, PartialEq)]
pub struct FirFilter {
    coefficients: Vec<f64>,
}

impl FirFilter {
    /// Create a new FIR filter with given coefficients
    ///
    /// # Arguments
    /// * `coefficients` - Filter coefficients h[n] for n = 0..M-1, M >= 1
    pub fn new(coefficients: Vec<f64>) -> Self {
        Self { coefficients }
    }

    /// Fresh zero-filled state; the first N-1 outputs carry the cold-start transient
    pub fn create_state(&self) -> FirState {
        FirState::new(self.coefficients.len())
    }

    /// Process single sample
    ///
    /// `state` must come from `create_state` of a filter with the same length.
    #[inline]
    pub fn process_sample(&self, input: f64, state: &mut FirState) -> f64 {
        let length = state.history.len();
        debug_assert_eq!(length, self.coefficients.len());

        // Write new sample to current cursor position
        state.history[state.cursor] = input;

        // y[n] = Σ h[k] * x[n-k], reading backwards through the ring
        let mut output = 0.0;
        for (k, &coeff) in self.coefficients.iter().enumerate() {
            let idx = (state.cursor + length - k) % length;
            output += coeff * state.history[idx];
        }

        state.cursor = (state.cursor + 1) % length;

        output
    }

    /// Filter one chunk
    ///
    /// # Returns
    /// Outputs rounded half away from zero and saturated to 16 bits, and the
    /// state for the next chunk
    pub fn process(&self, input: &[i16], mut state: FirState) -> (Vec<i16>, FirState) {
        let output = input
            .iter()
            .map(|&x| super::biquad::round_to_sample(self.process_sample(x as f64, &mut state)))
            .collect();
        (output, state)
    }

    /// Get filter coefficients
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Get filter length
    pub fn length(&self) -> usize {
        self.coefficients.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::design::design_hamming_lowpass;
    use std::f64::consts::PI;

    #[test]
    fn test_fir_filter_basic() {
        // Simple 3-tap moving average: [1/3, 1/3, 1/3]
        let filter = FirFilter::new(vec![1.0 / 3.0; 3]);
        let mut state = filter.create_state();

        // Feed impulse
        let output1 = filter.process_sample(3.0, &mut state);
        let output2 = filter.process_sample(0.0, &mut state);
        let output3 = filter.process_sample(0.0, &mut state);
        let output4 = filter.process_sample(0.0, &mut state);

        assert!((output1 - 1.0).abs() < 1e-10);
        assert!((output2 - 1.0).abs() < 1e-10);
        assert!((output3 - 1.0).abs() < 1e-10);
        assert!(output4.abs() < 1e-10);
    }

    #[test]
    fn test_fir_filter_block_processing() {
        let filter = FirFilter::new(vec![0.5, 0.5]);

        let (output, state) = filter.process(&[1, 2, 3, 4], filter.create_state());

        // 0.5, 1.5, 2.5, 3.5 rounded half away from zero
        assert_eq!(output, vec![1, 2, 3, 4]);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn test_ring_buffer_wraparound() {
        // Tap current and third-previous samples
        let filter = FirFilter::new(vec![1.0, 0.0, 0.0, 1.0]);

        let (output, _) = filter.process(&[1, 2, 3, 4, 5], filter.create_state());

        // Last output wraps: h[0]*5 + h[3]*2
        assert_eq!(output, vec![1, 2, 3, 5, 7]);
    }

    #[test]
    fn test_dc_passes_after_transient() {
        let filter = FirFilter::new(design_hamming_lowpass(1000.0, 8000.0, 31));

        let (output, _) = filter.process(&vec![5000i16; 200], filter.create_state());

        // Cold start ramps up over the first N-1 samples
        assert!(output[0].abs() < 5000);
        for &y in &output[30..] {
            assert!((y as i32 - 5000).abs() <= 1, "output {}", y);
        }
    }

    #[test]
    fn test_lowpass_attenuates_high_tone() {
        let filter = FirFilter::new(design_hamming_lowpass(800.0, 8000.0, 63));
        let tone: Vec<i16> = (0..2000)
            .map(|n| (10000.0 * (2.0 * PI * 3000.0 * n as f64 / 8000.0).sin()) as i16)
            .collect();

        let (output, _) = filter.process(&tone, filter.create_state());

        let peak = output[100..].iter().map(|&s| (s as i32).abs()).max().unwrap_or(0);
        assert!(peak < 100, "peak {}", peak);
    }

    #[test]
    fn test_chunked_matches_whole() {
        let filter = FirFilter::new(design_hamming_lowpass(1200.0, 8000.0, 21));
        let input: Vec<i16> = (0..777).map(|n| ((n * 7919) % 30000) as i16 - 15000).collect();

        let (whole, whole_state) = filter.process(&input, filter.create_state());

        // Chunks shorter than, equal to and longer than the tap count
        let mut state = filter.create_state();
        let mut chunked = Vec::new();
        let mut offset = 0;
        for size in [5usize, 21, 100, 651] {
            let (out, next) = filter.process(&input[offset..offset + size], state);
            chunked.extend(out);
            state = next;
            offset += size;
        }

        assert_eq!(offset, input.len());
        assert_eq!(chunked, whole);
        assert_eq!(state, whole_state);
    }

    #[test]
    fn test_empty_chunk_keeps_state() {
        let filter = FirFilter::new(vec![0.25; 4]);
        let (_, state) = filter.process(&[10, 20, 30], filter.create_state());

        let (output, next) = filter.process(&[], state.clone());
        assert!(output.is_empty());
        assert_eq!(next, state);
    }
}
