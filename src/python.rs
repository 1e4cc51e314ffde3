//! Python bindings: rows cross the boundary as JSON-compatible values
use crate::config::ReconcilerConfig;
use crate::errors::ReconcilerError;
use crate::json_items::{items_from_json, section_entries_from_json};
use crate::reconcile::{NoopSink, SectionReconciler};
use crate::types::EditScript;
use crate::DiffEngine;
use log::info;
use pyo3::prelude::*;
use pyo3::types::PyModule;
use serde::Serialize;
use serde_json::Value;

/// Python value -> JSON, via `json.dumps` on the Python side.
fn to_json<'py>(py: Python<'py>, obj: &Bound<'py, PyAny>) -> Result<Value, ReconcilerError> {
    let json = PyModule::import(py, "json")?;
    let text = json
        .call_method1("dumps", (obj,))?
        .extract::<String>()
        .map_err(|e| ReconcilerError::PythonError(e.to_string()))?;
    serde_json::from_str(&text).map_err(|e| ReconcilerError::TypeConversionError {
        expected: "JSON-serializable value".into(),
        actual: e.to_string(),
    })
}

/// Rust value -> Python, via `json.loads`.
fn to_python<'py, T: Serialize>(py: Python<'py>, value: &T) -> PyResult<Bound<'py, PyAny>> {
    let text = serde_json::to_string(value).map_err(ReconcilerError::from)?;
    let json = PyModule::import(py, "json")?;
    json.call_method1("loads", (text,))
}

#[pyfunction]
#[pyo3(name = "diff", signature = (old, new, section = 0, identity_field = "id"))]
pub fn py_diff<'py>(
    py: Python<'py>,
    old: &Bound<'py, PyAny>,
    new: &Bound<'py, PyAny>,
    section: usize,
    identity_field: &str,
) -> PyResult<Bound<'py, PyAny>> {
    let config = ReconcilerConfig::default().with_identity_field(identity_field);
    config.validate()?;

    let old_rows = items_from_json(to_json(py, old)?, &config)?;
    let new_rows = items_from_json(to_json(py, new)?, &config)?;

    let script = DiffEngine::new(&old_rows, &new_rows).in_section(section).diff();
    to_python(py, &script)
}

#[pyfunction]
#[pyo3(name = "to_batch_safe")]
pub fn py_to_batch_safe<'py>(py: Python<'py>, script: &Bound<'py, PyAny>) -> PyResult<Bound<'py, PyAny>> {
    let raw: EditScript = serde_json::from_value(to_json(py, script)?).map_err(ReconcilerError::from)?;
    to_python(py, &raw.for_batch_updates())
}

#[pyclass(name = "Reconciler")]
pub struct PyReconciler {
    inner: SectionReconciler,
}

#[pymethods]
impl PyReconciler {
    #[new]
    #[pyo3(signature = (config_json = None))]
    fn new(config_json: Option<&str>) -> PyResult<Self> {
        let config = match config_json {
            Some(source) => ReconcilerConfig::from_json(source)?,
            None => ReconcilerConfig::default(),
        };
        info!(
            "Reconciler initialized (identity field '{}', batch updates {})",
            config.identity_field, config.batch_updates
        );
        Ok(PyReconciler {
            inner: SectionReconciler::new(config),
        })
    }

    /// Returns one report per section, as plain dicts.
    fn reconcile<'py>(
        &self,
        py: Python<'py>,
        old: &Bound<'py, PyAny>,
        new: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let config = self.inner.config();
        let old_entries = section_entries_from_json(to_json(py, old)?, config)?;
        let new_entries = section_entries_from_json(to_json(py, new)?, config)?;

        let reports = self.inner.reconcile(&old_entries, &new_entries, &mut NoopSink);
        to_python(py, &reports)
    }

    /// Flattened patches for each section, in view application order.
    fn patches<'py>(
        &self,
        py: Python<'py>,
        old: &Bound<'py, PyAny>,
        new: &Bound<'py, PyAny>,
    ) -> PyResult<Bound<'py, PyAny>> {
        let config = self.inner.config();
        let old_entries = section_entries_from_json(to_json(py, old)?, config)?;
        let new_entries = section_entries_from_json(to_json(py, new)?, config)?;

        let patches: Vec<_> = self
            .inner
            .reconcile(&old_entries, &new_entries, &mut NoopSink)
            .into_iter()
            .map(|report| report.batch.unwrap_or_else(|| report.raw.for_batch_updates()).patches())
            .collect();
        to_python(py, &patches)
    }
}
