//! Band-pass as a cascade of the single-pole high-pass and low-pass

use super::single_pole::{HighPass, HighPassState, LowPass, LowPassState};

/// Carried state of both stages
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BandPassState {
    pub prev_in_hp: f64,
    pub prev_out_hp: f64,
    pub prev_out_lp: f64,
}

impl BandPassState {
    fn split(self) -> (HighPassState, LowPassState) {
        (
            HighPassState {
                prev_in: self.prev_in_hp,
                prev_out: self.prev_out_hp,
            },
            LowPassState {
                prev_out: self.prev_out_lp,
            },
        )
    }

    fn join(hp: HighPassState, lp: LowPassState) -> Self {
        Self {
            prev_in_hp: hp.prev_in,
            prev_out_hp: hp.prev_out,
            prev_out_lp: lp.prev_out,
        }
    }
}

/// High-pass at the lower band edge followed by low-pass at the upper edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BandPass {
    high_pass: HighPass,
    low_pass: LowPass,
}

impl BandPass {
    /// Design from the band edges
    ///
    /// # Arguments
    /// * `low_cutoff_hz` - Lower edge (high-pass corner)
    /// * `high_cutoff_hz` - Upper edge (low-pass corner)
    /// * `sample_rate_hz` - Sample rate of the stream
    pub fn new(low_cutoff_hz: f64, high_cutoff_hz: f64, sample_rate_hz: f64) -> Self {
        Self {
            high_pass: HighPass::new(low_cutoff_hz, sample_rate_hz),
            low_pass: LowPass::new(high_cutoff_hz, sample_rate_hz),
        }
    }

    /// Build from precomputed smoothing factors
    pub fn from_alphas(alpha_hp: f64, alpha_lp: f64) -> Self {
        Self {
            high_pass: HighPass::from_alpha(alpha_hp),
            low_pass: LowPass::from_alpha(alpha_lp),
        }
    }

    pub fn high_pass(&self) -> &HighPass {
        &self.high_pass
    }

    pub fn low_pass(&self) -> &LowPass {
        &self.low_pass
    }

    pub fn create_state(&self) -> BandPassState {
        BandPassState::default()
    }

    /// Filter one chunk
    ///
    /// The low-pass stage sees the high-pass output after conversion to
    /// 16-bit samples, exactly as a downstream consumer would.
    pub fn process(&self, input: &[i16], state: BandPassState) -> (Vec<i16>, BandPassState) {
        let (hp_state, lp_state) = state.split();

        let (high_passed, hp_state) = self.high_pass.process(input, hp_state);
        let (output, lp_state) = self.low_pass.process(&high_passed, lp_state);

        (output, BandPassState::join(hp_state, lp_state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn tone(freq_hz: f64, amplitude: f64, len: usize) -> Vec<i16> {
        (0..len)
            .map(|n| (amplitude * (2.0 * PI * freq_hz * n as f64 / 8000.0).sin()) as i16)
            .collect()
    }

    fn peak(samples: &[i16]) -> i32 {
        samples.iter().map(|&s| (s as i32).abs()).max().unwrap_or(0)
    }

    #[test]
    fn test_cascade_equals_stages() {
        let filter = BandPass::new(300.0, 3400.0, 8000.0);
        let input = tone(1000.0, 8000.0, 400);

        let (output, _) = filter.process(&input, filter.create_state());

        let hp = filter.high_pass();
        let lp = filter.low_pass();
        let (stage1, _) = hp.process(&input, hp.create_state());
        let (stage2, _) = lp.process(&stage1, lp.create_state());
        assert_eq!(output, stage2);
    }

    #[test]
    fn test_attenuates_outside_band() {
        let filter = BandPass::new(500.0, 1500.0, 8000.0);

        let (low, _) = filter.process(&tone(50.0, 10000.0, 4000), filter.create_state());
        let (mid, _) = filter.process(&tone(900.0, 10000.0, 4000), filter.create_state());

        assert!(peak(&low[1000..]) < peak(&mid[1000..]) / 3);
    }

    #[test]
    fn test_chunked_matches_whole() {
        let filter = BandPass::new(300.0, 3000.0, 8000.0);
        let input = tone(700.0, 12000.0, 1601);

        let (whole, whole_state) = filter.process(&input, filter.create_state());

        let mut state = filter.create_state();
        let mut chunked = Vec::new();
        for chunk in input.chunks(160) {
            let (out, next) = filter.process(chunk, state);
            chunked.extend(out);
            state = next;
        }

        assert_eq!(chunked, whole);
        assert_eq!(state, whole_state);
    }

    #[test]
    fn test_empty_chunk_keeps_state() {
        let filter = BandPass::new(300.0, 3000.0, 8000.0);
        let state = BandPassState { prev_in_hp: 1.0, prev_out_hp: 2.0, prev_out_lp: 3.0 };

        let (output, next) = filter.process(&[], state);
        assert!(output.is_empty());
        assert_eq!(next, state);
    }
}
