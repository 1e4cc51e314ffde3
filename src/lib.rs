//! Identity-keyed list diffing for sectioned list views
//!
//! [`diff`] computes the raw edit script between two row lists,
//! [`to_batch_safe`] rewrites it so it can be applied as one animated batch,
//! and [`zip_sections`] pairs up old and new sections whose count may differ.
//! [`SectionReconciler`] runs all three for a whole sectioned data source.
//!
//! With the `python` feature the crate also builds the `list_reconciler`
//! Python extension module.
mod batch;
mod config;
mod diff_engine;
mod errors;
mod json_items;
mod reconcile;
mod section;
mod types;
mod zip;

#[cfg(feature = "python")]
mod python;

pub use batch::to_batch_safe;
pub use config::ReconcilerConfig;
pub use diff_engine::{DiffEngine, diff};
pub use errors::ReconcilerError;
pub use json_items::{JsonItem, items_from_json, section_entries_from_json};
pub use reconcile::{BatchSink, NoopSink, SectionReconciler};
pub use section::SectionEntry;
pub use types::{
    BatchEditScript, Change, Diffable, EditScript, IndexPath, Move, Patch, PatchAction, SectionReport,
};
pub use zip::{PaddedZip, zip_sections};

#[cfg(feature = "python")]
use pyo3::prelude::*;

#[cfg(feature = "python")]
#[pymodule]
fn list_reconciler(_py: Python, m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyReconciler>()?;
    m.add_function(wrap_pyfunction!(python::py_diff, m)?)?;
    m.add_function(wrap_pyfunction!(python::py_to_batch_safe, m)?)?;

    // Export patch actions as constants
    m.add("INSERT", PatchAction::Insert.to_string())?;
    m.add("REMOVE", PatchAction::Remove.to_string())?;
    m.add("MOVE", PatchAction::Move.to_string())?;

    Ok(())
}
