//! Core list diffing engine: linear-time, identity-keyed, multiplicity-aware
//!
//! The engine runs the classic symbol-table diff in four passes:
//!
//! 1. walk the new list forward, counting each identity and pushing an
//!    "unmatched" marker onto its position stack;
//! 2. walk the old list backward, counting each identity and pushing its old
//!    position, so the top of every stack holds the smallest old position left;
//! 3. walk the new list forward again and pop one value per row, pairing the
//!    k-th new occurrence of an identity with its k-th old occurrence;
//! 4. turn the pairing into inserts, deletes, updates and moves using running
//!    insert/delete offsets.
use crate::types::{Diffable, EditScript, IndexPath, Move};
use indexmap::IndexMap;
use log::{debug, trace};
use std::borrow::Cow;

/// Per-identity bookkeeping for a single diff call.
#[derive(Debug, Default)]
struct Entry {
    old_counter: usize,
    new_counter: usize,
    /// `None` is the unmatched marker pushed by the new-list pass.
    old_indexes: Vec<Option<usize>>,
    updated: bool,
}

/// Per-row link to the entry table and to the row's counterpart, if any.
#[derive(Debug, Clone, Copy)]
struct Record {
    entry: usize,
    index: Option<usize>,
}

pub struct DiffEngine<'a, T> {
    old: &'a [T],
    new: &'a [T],
    from_section: usize,
    to_section: usize,
}

impl<'a, T: Diffable> DiffEngine<'a, T> {
    pub fn new(old: &'a [T], new: &'a [T]) -> Self {
        DiffEngine {
            old,
            new,
            from_section: 0,
            to_section: 0,
        }
    }

    /// Section tag for deleted, updated and moved-from paths.
    pub fn from_section(mut self, section: usize) -> Self {
        self.from_section = section;
        self
    }

    /// Section tag for inserted and moved-to paths.
    pub fn to_section(mut self, section: usize) -> Self {
        self.to_section = section;
        self
    }

    pub fn in_section(self, section: usize) -> Self {
        self.from_section(section).to_section(section)
    }

    /// Compute the raw edit script.
    ///
    /// # Panics
    ///
    /// Panics if the matching pass leaves the tables inconsistent, i.e. when
    /// `old.len() + inserted - deleted != new.len()`. That can only happen if
    /// the algorithm itself is broken; it is never caused by the input.
    pub fn diff(&self) -> EditScript {
        let old_count = self.old.len();
        let new_count = self.new.len();

        if new_count == 0 {
            return EditScript {
                deleted: self.paths(self.from_section, old_count),
                ..Default::default()
            };
        }

        if old_count == 0 {
            return EditScript {
                inserted: self.paths(self.to_section, new_count),
                ..Default::default()
            };
        }

        let mut table: IndexMap<Cow<'a, str>, Entry> = IndexMap::new();

        let mut new_records = Vec::with_capacity(new_count);
        for item in self.new {
            let entry = table_entry(&mut table, item.diff_identifier());
            let slot = &mut table[entry];
            slot.new_counter += 1;
            slot.old_indexes.push(None);
            new_records.push(Record { entry, index: None });
        }

        let mut old_records = vec![Record { entry: 0, index: None }; old_count];
        for (i, item) in self.old.iter().enumerate().rev() {
            let entry = table_entry(&mut table, item.diff_identifier());
            let slot = &mut table[entry];
            slot.old_counter += 1;
            slot.old_indexes.push(Some(i));
            old_records[i].entry = entry;
        }
        trace!(
            "DiffEngine: symbol table built with {} identities for {} old / {} new rows",
            table.len(),
            old_count,
            new_count
        );

        for (i, record) in new_records.iter_mut().enumerate() {
            let slot = &mut table[record.entry];
            let Some(original) = slot.old_indexes.pop() else {
                panic!("old indexes is empty while resolving new row {i}; expected at least the unmatched marker");
            };

            if let Some(old_index) = original {
                if !self.new[i].is_equal(&self.old[old_index]) {
                    slot.updated = true;
                }
                if slot.new_counter > 0 && slot.old_counter > 0 {
                    record.index = Some(old_index);
                    old_records[old_index].index = Some(i);
                }
            }
        }

        let mut inserted = Vec::new();
        let mut deleted = Vec::new();
        let mut updated = Vec::new();
        let mut moved = Vec::new();

        let mut delete_offsets = vec![0; old_count];
        let mut running_offset = 0;
        for (i, record) in old_records.iter().enumerate() {
            delete_offsets[i] = running_offset;
            if record.index.is_none() {
                deleted.push(IndexPath::new(self.from_section, i));
                running_offset += 1;
            }
        }

        running_offset = 0;
        for (i, record) in new_records.iter().enumerate() {
            let insert_offset = running_offset;
            let Some(old_index) = record.index else {
                inserted.push(IndexPath::new(self.to_section, i));
                running_offset += 1;
                continue;
            };

            if table[record.entry].updated {
                updated.push(IndexPath::new(self.from_section, old_index));
            }

            // Where the old row lands if only deletions and insertions happened.
            if old_index - delete_offsets[old_index] + insert_offset != i {
                moved.push(Move::new(
                    IndexPath::new(self.from_section, old_index),
                    IndexPath::new(self.to_section, i),
                ));
            }
        }

        assert!(
            old_count + inserted.len() - deleted.len() == new_count,
            "sanity check failed applying {} inserts and {} deletes to old count {} equaling new count {}",
            inserted.len(),
            deleted.len(),
            old_count,
            new_count
        );

        debug!(
            "DiffEngine: section {}->{}: {} inserted, {} deleted, {} updated, {} moved",
            self.from_section,
            self.to_section,
            inserted.len(),
            deleted.len(),
            updated.len(),
            moved.len()
        );

        EditScript {
            inserted,
            deleted,
            updated,
            moved,
        }
    }

    fn paths(&self, section: usize, count: usize) -> Vec<IndexPath> {
        (0..count).map(|row| IndexPath::new(section, row)).collect()
    }
}

/// Fetch-or-create the entry for `key`, returning its slot in the table.
fn table_entry<'a>(table: &mut IndexMap<Cow<'a, str>, Entry>, key: Cow<'a, str>) -> usize {
    let slot = table.entry(key);
    let index = slot.index();
    slot.or_default();
    index
}

/// Diff two row lists, tagging every path with section 0.
pub fn diff<T: Diffable>(old: &[T], new: &[T]) -> EditScript {
    DiffEngine::new(old, new).diff()
}
