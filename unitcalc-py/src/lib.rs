use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use std::fmt::Display;
use unitcalc_rs::{Outcome, UnitTable, VariableStore};

#[pyclass(frozen, eq)]
#[derive(Debug, PartialEq, Clone)]
struct Quantity {
    #[pyo3(get)]
    value: f64,
    #[pyo3(get)]
    unit: String,
}

impl Quantity {
    fn from_core(quantity: &unitcalc_rs::Quantity, units: &UnitTable) -> Self {
        Quantity {
            value: quantity.value,
            unit: quantity.unit.display(units).to_string(),
        }
    }
}

#[pymethods]
impl Quantity {
    fn __repr__(&self) -> String {
        format!("Quantity({}, {:?})", self.value, self.unit)
    }

    fn __str__(&self) -> String {
        if self.unit.is_empty() {
            self.value.to_string()
        } else {
            format!("{} {}", self.value, self.unit)
        }
    }
}

#[pyclass(frozen)]
#[derive(Debug)]
struct CalcError {
    message: String,
}

impl<T: Display> From<T> for CalcError {
    fn from(err: T) -> Self {
        CalcError {
            message: err.to_string(),
        }
    }
}

impl From<CalcError> for PyErr {
    fn from(err: CalcError) -> Self {
        PyValueError::new_err(err.message)
    }
}

/// A session keeping variables and user units between calls.
#[pyclass]
#[derive(Debug, Default)]
struct Calculator {
    inner: unitcalc_rs::Calculator,
}

#[pymethods]
impl Calculator {
    #[new]
    fn new() -> Self {
        Self::default()
    }

    /// Evaluates one line. Commands and empty lines return `None`.
    fn evaluate(&mut self, py: Python<'_>, line: &str) -> Result<Option<Quantity>, CalcError> {
        let inner = &mut self.inner;
        let outcome = py.allow_threads(|| inner.eval_line(line))?;
        let units = self.inner.units();
        Ok(match outcome {
            Outcome::Value(quantity) | Outcome::Assigned { quantity, .. } => {
                Some(Quantity::from_core(&quantity, units))
            }
            _ => None,
        })
    }

    fn define_unit(&mut self, name: &str) -> Result<(), CalcError> {
        self.inner.define_unit(name)?;
        Ok(())
    }

    /// The `name = value unit` listing of every stored variable.
    fn memory(&self) -> String {
        self.inner.memory().show_all()
    }

    fn units(&self) -> Vec<String> {
        let units = self.inner.units();
        units.all().map(|t| units.name(t).to_string()).collect()
    }
}

#[pyfunction]
fn evaluate(py: Python<'_>, line: &str) -> Result<Quantity, CalcError> {
    let mut calc = unitcalc_rs::Calculator::new();
    match py.allow_threads(|| calc.eval_line(line))? {
        Outcome::Value(quantity) => Ok(Quantity::from_core(&quantity, calc.units())),
        _ => Err(CalcError::from(format!("'{}' does not produce a value", line.trim()))),
    }
}

#[pymodule]
fn _core(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(evaluate, m)?)?;
    m.add_class::<Quantity>()?;
    m.add_class::<Calculator>()?;
    m.add_class::<CalcError>()?;
    Ok(())
}
