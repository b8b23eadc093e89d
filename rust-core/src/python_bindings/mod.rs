//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod codec_bindings;
mod filter_bindings;

/// Python module definition
#[pymodule]
fn telefilter(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(codec_bindings::decode_mulaw, m)?)?;
    m.add_function(wrap_pyfunction!(codec_bindings::encode_mulaw, m)?)?;
    m.add_function(wrap_pyfunction!(codec_bindings::encode_wav, m)?)?;

    m.add_class::<filter_bindings::PyStreamFilter>()?;

    Ok(())
}
