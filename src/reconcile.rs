//! Drives a full sectioned update: zip, flatten, diff, batch, apply
use crate::config::ReconcilerConfig;
use crate::diff_engine::DiffEngine;
use crate::section::SectionEntry;
use crate::types::{BatchEditScript, Diffable, EditScript, SectionReport};
use crate::zip::zip_sections;
use log::debug;

/// The list view a reconciliation is applied to.
///
/// Everything between `begin_updates` and `end_updates` is expected to be
/// applied as one atomic transaction. Deletions and move sources refer to
/// pre-batch rows; insertions and move targets refer to post-batch rows.
pub trait BatchSink {
    fn begin_updates(&mut self) {}

    fn apply(&mut self, section: usize, script: &BatchEditScript);

    /// Called instead of `apply` when batch conversion is turned off.
    fn apply_raw(&mut self, section: usize, script: &EditScript) {
        self.apply(section, &script.for_batch_updates());
    }

    fn end_updates(&mut self) {}
}

/// Sink for callers that only want the returned reports.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl BatchSink for NoopSink {
    fn apply(&mut self, _section: usize, _script: &BatchEditScript) {}

    fn apply_raw(&mut self, _section: usize, _script: &EditScript) {}
}

#[derive(Debug, Clone, Default)]
pub struct SectionReconciler {
    config: ReconcilerConfig,
}

impl SectionReconciler {
    pub fn new(config: ReconcilerConfig) -> Self {
        SectionReconciler { config }
    }

    pub fn config(&self) -> &ReconcilerConfig {
        &self.config
    }

    /// Diff every top-level entry of `old` against the entry at the same
    /// position in `new` and hand the result to `sink`, one section at a time.
    ///
    /// Entries missing on one side count as empty sections.
    pub fn reconcile<T, S>(
        &self,
        old: &[SectionEntry<T>],
        new: &[SectionEntry<T>],
        sink: &mut S,
    ) -> Vec<SectionReport>
    where
        T: Diffable,
        S: BatchSink + ?Sized,
    {
        debug!(
            "SectionReconciler: reconciling {} old / {} new sections",
            old.len(),
            new.len()
        );

        sink.begin_updates();

        let mut reports = Vec::with_capacity(old.len().max(new.len()));
        for (index, (old_entry, new_entry)) in zip_sections(old, new).enumerate() {
            let old_rows = old_entry.map(SectionEntry::as_slice).unwrap_or_default();
            let new_rows = new_entry.map(SectionEntry::as_slice).unwrap_or_default();

            let raw = DiffEngine::new(old_rows, new_rows).in_section(index).diff();

            let batch = if self.config.batch_updates {
                let batch = raw.for_batch_updates();
                sink.apply(index, &batch);
                Some(batch)
            } else {
                sink.apply_raw(index, &raw);
                None
            };

            debug!(
                "SectionReconciler: section {} ({} -> {} rows) applied",
                index,
                old_rows.len(),
                new_rows.len()
            );

            reports.push(SectionReport {
                section: index,
                pre_count: old_rows.len(),
                post_count: new_rows.len(),
                raw,
                batch,
            });
        }

        sink.end_updates();
        reports
    }
}
