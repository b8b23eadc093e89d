//! Python bindings for the µ-law codec and WAV container

use crate::{codec, wav};
use numpy::{PyArray1, PyReadonlyArray1};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyBytes;

/// Decode µ-law bytes to an int16 array
#[pyfunction]
pub fn decode_mulaw<'py>(py: Python<'py>, data: &[u8]) -> &'py PyArray1<i16> {
    PyArray1::from_vec(py, codec::decode_buffer(data))
}

/// Encode an int16 array to µ-law bytes
#[pyfunction]
pub fn encode_mulaw<'py>(py: Python<'py>, samples: PyReadonlyArray1<i16>) -> PyResult<&'py PyBytes> {
    let samples = samples
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyBytes::new(py, &codec::encode_buffer(samples)))
}

/// Wrap an int16 array in a WAV container
///
/// Args:
///     samples: Interleaved samples
///     sample_rate: Sample rate in Hz
///     channels: Channel count
#[pyfunction]
#[pyo3(signature = (samples, sample_rate=8000, channels=1))]
pub fn encode_wav<'py>(
    py: Python<'py>,
    samples: PyReadonlyArray1<i16>,
    sample_rate: u32,
    channels: u16,
) -> PyResult<&'py PyBytes> {
    let samples = samples
        .as_slice()
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    let bytes = wav::encode_wav(samples, sample_rate, channels)
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(PyBytes::new(py, &bytes))
}
