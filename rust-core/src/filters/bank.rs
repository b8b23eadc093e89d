//! Uniform interface over the four filter topologies
//!
//! Coefficients are immutable and shared; each stream threads its own state
//! value through successive `process` calls.

use super::band_pass::{BandPass, BandPassState};
use super::biquad::{Biquad, BiquadState};
use super::fir::{FirFilter, FirState};
use super::response::{biquad_response, fir_response, high_pass_response, low_pass_response};
use super::single_pole::{HighPass, HighPassState, LowPass, LowPassState};
use num_complex::Complex64;
use thiserror::Error;

/// Chunked filtering with caller-owned state
///
/// Splitting a stream into chunks and threading the returned state between
/// calls produces exactly the output of one call over the whole stream.
pub trait StreamFilter {
    type State;

    /// Zero state for the first chunk of a stream
    fn create_state(&self) -> Self::State;

    /// Filter one chunk; an empty chunk returns the state unchanged
    fn process(&self, input: &[i16], state: Self::State) -> (Vec<i16>, Self::State);
}

impl StreamFilter for HighPass {
    type State = HighPassState;

    fn create_state(&self) -> HighPassState {
        HighPass::create_state(self)
    }

    fn process(&self, input: &[i16], state: HighPassState) -> (Vec<i16>, HighPassState) {
        HighPass::process(self, input, state)
    }
}

impl StreamFilter for LowPass {
    type State = LowPassState;

    fn create_state(&self) -> LowPassState {
        LowPass::create_state(self)
    }

    fn process(&self, input: &[i16], state: LowPassState) -> (Vec<i16>, LowPassState) {
        LowPass::process(self, input, state)
    }
}

impl StreamFilter for BandPass {
    type State = BandPassState;

    fn create_state(&self) -> BandPassState {
        BandPass::create_state(self)
    }

    fn process(&self, input: &[i16], state: BandPassState) -> (Vec<i16>, BandPassState) {
        BandPass::process(self, input, state)
    }
}

impl StreamFilter for Biquad {
    type State = BiquadState;

    fn create_state(&self) -> BiquadState {
        Biquad::create_state(self)
    }

    fn process(&self, input: &[i16], state: BiquadState) -> (Vec<i16>, BiquadState) {
        Biquad::process(self, input, state)
    }
}

impl StreamFilter for FirFilter {
    type State = FirState;

    fn create_state(&self) -> FirState {
        FirFilter::create_state(self)
    }

    fn process(&self, input: &[i16], state: FirState) -> (Vec<i16>, FirState) {
        FirFilter::process(self, input, state)
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FilterError {
    #[error("State of a {state} filter passed to a {filter} filter")]
    StateMismatch {
        filter: &'static str,
        state: &'static str,
    },

    #[error("FIR history holds {found} samples, filter has {expected} taps")]
    HistoryLength { expected: usize, found: usize },
}

/// A designed filter of any topology
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    HighPass(HighPass),
    LowPass(LowPass),
    BandPass(BandPass),
    Biquad(Biquad),
    Fir(FirFilter),
}

/// Carried state matching one `Filter` variant
#[derive(Debug, Clone, PartialEq)]
pub enum FilterState {
    HighPass(HighPassState),
    LowPass(LowPassState),
    BandPass(BandPassState),
    Biquad(BiquadState),
    Fir(FirState),
}

impl FilterState {
    pub fn kind(&self) -> &'static str {
        match self {
            FilterState::HighPass(_) => "high-pass",
            FilterState::LowPass(_) => "low-pass",
            FilterState::BandPass(_) => "band-pass",
            FilterState::Biquad(_) => "biquad",
            FilterState::Fir(_) => "FIR",
        }
    }
}

impl Filter {
    pub fn kind(&self) -> &'static str {
        match self {
            Filter::HighPass(_) => "high-pass",
            Filter::LowPass(_) => "low-pass",
            Filter::BandPass(_) => "band-pass",
            Filter::Biquad(_) => "biquad",
            Filter::Fir(_) => "FIR",
        }
    }

    pub fn create_state(&self) -> FilterState {
        match self {
            Filter::HighPass(f) => FilterState::HighPass(f.create_state()),
            Filter::LowPass(f) => FilterState::LowPass(f.create_state()),
            Filter::BandPass(f) => FilterState::BandPass(f.create_state()),
            Filter::Biquad(f) => FilterState::Biquad(f.create_state()),
            Filter::Fir(f) => FilterState::Fir(f.create_state()),
        }
    }

    /// Whether `state` can be threaded through this filter
    ///
    /// # Errors
    /// The state was created by a filter of another topology or FIR length
    pub fn check_state(&self, state: &FilterState) -> Result<(), FilterError> {
        match (self, state) {
            (Filter::Fir(f), FilterState::Fir(s)) if s.len() != f.length() => {
                Err(FilterError::HistoryLength {
                    expected: f.length(),
                    found: s.len(),
                })
            }
            (Filter::HighPass(_), FilterState::HighPass(_))
            | (Filter::LowPass(_), FilterState::LowPass(_))
            | (Filter::BandPass(_), FilterState::BandPass(_))
            | (Filter::Biquad(_), FilterState::Biquad(_))
            | (Filter::Fir(_), FilterState::Fir(_)) => Ok(()),
            (filter, state) => Err(FilterError::StateMismatch {
                filter: filter.kind(),
                state: state.kind(),
            }),
        }
    }

    /// Filter one chunk with the state left by the previous chunk
    ///
    /// # Errors
    /// Same conditions as [`Filter::check_state`]
    pub fn process(
        &self,
        input: &[i16],
        state: FilterState,
    ) -> Result<(Vec<i16>, FilterState), FilterError> {
        self.check_state(&state)?;

        let result = match (self, state) {
            (Filter::HighPass(f), FilterState::HighPass(s)) => {
                let (out, s) = f.process(input, s);
                (out, FilterState::HighPass(s))
            }
            (Filter::LowPass(f), FilterState::LowPass(s)) => {
                let (out, s) = f.process(input, s);
                (out, FilterState::LowPass(s))
            }
            (Filter::BandPass(f), FilterState::BandPass(s)) => {
                let (out, s) = f.process(input, s);
                (out, FilterState::BandPass(s))
            }
            (Filter::Biquad(f), FilterState::Biquad(s)) => {
                let (out, s) = f.process(input, s);
                (out, FilterState::Biquad(s))
            }
            (Filter::Fir(f), FilterState::Fir(s)) => {
                let (out, s) = f.process(input, s);
                (out, FilterState::Fir(s))
            }
            (filter, state) => {
                return Err(FilterError::StateMismatch {
                    filter: filter.kind(),
                    state: state.kind(),
                })
            }
        };

        Ok(result)
    }

    /// Designed coefficients, flattened
    ///
    /// Single-pole: `[α]`; band-pass: `[α_hp, α_lp]`; biquad: `[a0, a1, a2, b1, b2]`;
    /// FIR: the taps.
    pub fn coefficients(&self) -> Vec<f64> {
        match self {
            Filter::HighPass(f) => vec![f.alpha()],
            Filter::LowPass(f) => vec![f.alpha()],
            Filter::BandPass(f) => vec![f.high_pass().alpha(), f.low_pass().alpha()],
            Filter::Biquad(f) => {
                let c = f.coefficients();
                vec![c.a0, c.a1, c.a2, c.b1, c.b2]
            }
            Filter::Fir(f) => f.coefficients().to_vec(),
        }
    }

    /// Complex frequency response at `freq_hz`
    pub fn response(&self, freq_hz: f64, sample_rate_hz: f64) -> Complex64 {
        match self {
            Filter::HighPass(f) => high_pass_response(f.alpha(), freq_hz, sample_rate_hz),
            Filter::LowPass(f) => low_pass_response(f.alpha(), freq_hz, sample_rate_hz),
            Filter::BandPass(f) => {
                high_pass_response(f.high_pass().alpha(), freq_hz, sample_rate_hz)
                    * low_pass_response(f.low_pass().alpha(), freq_hz, sample_rate_hz)
            }
            Filter::Biquad(f) => biquad_response(f.coefficients(), freq_hz, sample_rate_hz),
            Filter::Fir(f) => fir_response(f.coefficients(), freq_hz, sample_rate_hz),
        }
    }
}
