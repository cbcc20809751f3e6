use pyo3::exceptions::{PyRuntimeError, PyValueError};
use pyo3::prelude::*;

use crate::config::CodecConfig;
use crate::gf::{Symbol, DEFAULT_EXPONENT};
use crate::signature::{Comparator, MasterSignature};

fn codec_for(nsym: usize, field_exponent: u8) -> PyResult<Comparator> {
    let config = CodecConfig::new(field_exponent, nsym).map_err(|e| PyValueError::new_err(e.to_string()))?;
    Comparator::new(&config).map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
#[pyo3(signature = (nsym, message, field_exponent = DEFAULT_EXPONENT))]
fn encode(nsym: usize, message: Vec<Symbol>, field_exponent: u8) -> PyResult<Vec<Symbol>> {
    codec_for(nsym, field_exponent)?
        .codec()
        .encode(&message)
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

#[pyfunction]
#[pyo3(signature = (nsym, codeword, field_exponent = DEFAULT_EXPONENT))]
fn decode(nsym: usize, codeword: Vec<Symbol>, field_exponent: u8) -> PyResult<(Vec<Symbol>, Vec<usize>)> {
    let cmp = codec_for(nsym, field_exponent)?;
    let k = codeword.len().checked_sub(nsym).ok_or_else(|| {
        PyValueError::new_err(format!("codeword length {} is shorter than nsym={}", codeword.len(), nsym))
    })?;

    match cmp.codec().decode(&codeword, k) {
        Ok(decoded) => Ok((decoded.message, decoded.positions)),
        Err(e) => Err(PyRuntimeError::new_err(e.to_string())),
    }
}

/// A part type represented by its enrolled master signature.
#[pyclass(name = "Part", frozen)]
struct PyPart {
    comparator: Comparator,
    master: MasterSignature,
}

#[pymethods]
impl PyPart {
    #[new]
    #[pyo3(signature = (master, nsym, field_exponent = DEFAULT_EXPONENT))]
    fn new(master: Vec<Symbol>, nsym: usize, field_exponent: u8) -> PyResult<Self> {
        let comparator = codec_for(nsym, field_exponent)?;
        let master = comparator.enroll(master).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { comparator, master })
    }

    fn check_candidate(&self, candidate: Vec<Symbol>) -> PyResult<bool> {
        self.comparator
            .check_candidate(&self.master, &candidate)
            .map(|result| result.is_match())
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    fn num_differences(&self, candidate: Vec<Symbol>) -> PyResult<usize> {
        self.master.num_differences(&candidate).map_err(|e| PyValueError::new_err(e.to_string()))
    }

    #[getter]
    fn check_symbols(&self) -> Vec<Symbol> {
        self.master.check_symbols().to_vec()
    }
}

#[pymodule]
fn piezo_rs(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(encode, m)?)?;
    m.add_function(wrap_pyfunction!(decode, m)?)?;
    m.add_class::<PyPart>()?;
    Ok(())
}
