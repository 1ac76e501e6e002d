//! PyO3 bindings for Python integration

use pyo3::prelude::*;

mod psd_bindings;

/// Python module definition
#[pymodule]
fn iq_psd(_py: Python, m: &PyModule) -> PyResult<()> {
    m.add_class::<psd_bindings::PyPsdReport>()?;
    m.add_function(wrap_pyfunction!(psd_bindings::analyze_capture, m)?)?;

    Ok(())
}
