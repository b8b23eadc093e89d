//! Python bindings for streaming filters

use crate::filters::response::magnitude_db;
use crate::filters::{Filter, FilterConfig, FilterState, Topology};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;
use std::mem;

/// Filter plus its carried state, one instance per stream
#[pyclass(name = "StreamFilter")]
pub struct PyStreamFilter {
    filter: Filter,
    state: FilterState,
    sample_rate: f64,
}

#[pymethods]
impl PyStreamFilter {
    /// Design a filter
    ///
    /// Args:
    ///     topology: highpass, lowpass, bandpass, biquad-bandpass,
    ///         biquad-highpass or fir-lowpass
    ///     sample_rate: Sample rate in Hz
    ///     cutoff_hz: Corner or center frequency
    ///     low_cutoff_hz: Lower band edge (bandpass)
    ///     high_cutoff_hz: Upper band edge (bandpass)
    ///     q: Quality factor (biquad)
    ///     tap_count: Odd number of taps (fir-lowpass)
    #[new]
    #[pyo3(signature = (topology, sample_rate=8000.0, cutoff_hz=None, low_cutoff_hz=None, high_cutoff_hz=None, q=None, tap_count=None))]
    fn new(
        topology: &str,
        sample_rate: f64,
        cutoff_hz: Option<f64>,
        low_cutoff_hz: Option<f64>,
        high_cutoff_hz: Option<f64>,
        q: Option<f64>,
        tap_count: Option<usize>,
    ) -> PyResult<Self> {
        let topology: Topology = topology
            .parse()
            .map_err(|e: crate::filters::ConfigError| PyValueError::new_err(e.to_string()))?;

        let config = FilterConfig {
            topology,
            cutoff_hz,
            low_cutoff_hz,
            high_cutoff_hz,
            sample_rate_hz: sample_rate,
            q,
            tap_count,
        };
        let filter = config
            .design()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        let state = filter.create_state();

        Ok(Self {
            filter,
            state,
            sample_rate,
        })
    }

    /// Filter the next chunk of the stream
    fn process<'py>(
        &mut self,
        py: Python<'py>,
        samples: PyReadonlyArray1<i16>,
    ) -> PyResult<&'py PyArray1<i16>> {
        let input = samples
            .as_slice()
            .map_err(|e| PyValueError::new_err(e.to_string()))?;

        let state = mem::replace(&mut self.state, self.filter.create_state());
        let (output, state) = self
            .filter
            .process(input, state)
            .map_err(|e| PyRuntimeError::new_err(e.to_string()))?;
        self.state = state;

        Ok(PyArray1::from_vec(py, output))
    }

    /// Start a new stream
    fn reset(&mut self) {
        self.state = self.filter.create_state();
    }

    /// Designed coefficients, flattened
    fn coefficients<'py>(&self, py: Python<'py>) -> &'py PyArray1<f64> {
        PyArray1::from_vec(py, self.filter.coefficients())
    }

    /// Gain at `freq_hz` in dB
    fn magnitude_db(&self, freq_hz: f64) -> f64 {
        magnitude_db(self.filter.response(freq_hz, self.sample_rate))
    }

    fn __repr__(&self) -> String {
        format!("StreamFilter({}, {} Hz)", self.filter.kind(), self.sample_rate)
    }
}
