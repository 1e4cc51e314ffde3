//! Conversion of raw edit scripts into scripts safe for one animated batch
use crate::types::{BatchEditScript, EditScript};
use log::trace;
use std::collections::BTreeSet;

impl EditScript {
    /// Split every update into a delete/insert pair.
    ///
    /// A slot that moved and changed content is deleted at its old path and
    /// inserted at its new path, and its move is dropped. A slot that only
    /// changed content is deleted and re-inserted at the same path.
    pub fn for_batch_updates(&self) -> BatchEditScript {
        let mut inserted: BTreeSet<_> = self.inserted.iter().copied().collect();
        let mut deleted: BTreeSet<_> = self.deleted.iter().copied().collect();
        let mut updated: BTreeSet<_> = self.updated.iter().copied().collect();

        let mut moved = Vec::with_capacity(self.moved.len());
        for mv in &self.moved {
            if updated.remove(&mv.from) {
                deleted.insert(mv.from);
                inserted.insert(mv.to);
            } else {
                moved.push(*mv);
            }
        }

        for path in updated {
            deleted.insert(path);
            inserted.insert(path);
        }

        trace!(
            "batch: {} moves kept of {}, {} deletes, {} inserts",
            moved.len(),
            self.moved.len(),
            deleted.len(),
            inserted.len()
        );

        BatchEditScript {
            inserted,
            deleted,
            moved,
        }
    }
}

pub fn to_batch_safe(script: &EditScript) -> BatchEditScript {
    script.for_batch_updates()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diff_engine::diff;
    use crate::types::{IndexPath, Move};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn at(row: usize) -> IndexPath {
        IndexPath::new(0, row)
    }

    fn set(paths: &[IndexPath]) -> BTreeSet<IndexPath> {
        paths.iter().copied().collect()
    }

    #[test]
    fn moved_and_updated_becomes_delete_insert() {
        let raw = EditScript {
            updated: vec![at(0)],
            moved: vec![Move::new(at(0), at(2)), Move::new(at(1), at(0))],
            ..Default::default()
        };

        let batch = to_batch_safe(&raw);

        assert_eq!(batch.deleted, set(&[at(0)]));
        assert_eq!(batch.inserted, set(&[at(2)]));
        assert_eq!(batch.moved, vec![Move::new(at(1), at(0))]);
    }

    #[test]
    fn plain_update_is_deleted_and_inserted_in_place() {
        let raw = EditScript {
            updated: vec![at(3)],
            moved: vec![Move::new(at(0), at(1))],
            ..Default::default()
        };

        let batch = raw.for_batch_updates();

        assert_eq!(batch.deleted, set(&[at(3)]));
        assert_eq!(batch.inserted, set(&[at(3)]));
        assert_eq!(batch.moved, raw.moved);
    }

    #[test]
    fn existing_inserts_and_deletes_are_deduplicated() {
        let raw = EditScript {
            inserted: vec![at(1), at(1)],
            deleted: vec![at(2)],
            updated: vec![at(2)],
            moved: vec![],
        };

        let batch = raw.for_batch_updates();

        assert_eq!(batch.deleted, set(&[at(2)]));
        assert_eq!(batch.inserted, set(&[at(1), at(2)]));
    }

    #[rstest]
    #[case(&["a", "b", "c"], &["b", "d", "a"])]
    #[case(&["a", "b"], &["b", "a"])]
    #[case(&["x", "x", "y"], &["x", "y", "x"])]
    #[case(&[], &["a"])]
    #[case(&["a"], &[])]
    fn batch_from_diff_keeps_row_counts(#[case] old: &[&str], #[case] new: &[&str]) {
        let batch = diff(old, new).for_batch_updates();
        assert!(batch.is_consistent(old.len(), new.len()));
    }

    #[test]
    fn content_change_with_move_from_real_diff() {
        let old = [("1", "kevin"), ("2", "mike")];
        let new = [("2", "mike"), ("1", "kev")];
        let raw = diff(&Keyed::wrap(&old), &Keyed::wrap(&new));
        assert_eq!(raw.updated, vec![at(0)]);

        let batch = raw.for_batch_updates();
        assert_eq!(batch.deleted, set(&[at(0)]));
        assert_eq!(batch.inserted, set(&[at(1)]));
        assert_eq!(batch.moved, vec![Move::new(at(1), at(0))]);
        assert!(batch.is_consistent(2, 2));
    }

    struct Keyed(&'static str, &'static str);

    impl Keyed {
        fn wrap(rows: &[(&'static str, &'static str)]) -> Vec<Keyed> {
            rows.iter().map(|&(k, v)| Keyed(k, v)).collect()
        }
    }

    impl crate::types::Diffable for Keyed {
        fn diff_identifier(&self) -> std::borrow::Cow<'_, str> {
            self.0.into()
        }

        fn is_equal(&self, other: &Self) -> bool {
            self.1 == other.1
        }
    }
}
