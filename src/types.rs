//! Value types shared by the diff engine, the batch pass and the bindings
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fmt;

/// An item that can take part in a list diff.
///
/// `diff_identifier` decides which old and new positions are "the same slot";
/// `is_equal` is only consulted for matched slots and decides whether the slot
/// was updated in place.
pub trait Diffable {
    fn diff_identifier(&self) -> Cow<'_, str>;

    fn is_equal(&self, other: &Self) -> bool;
}

impl Diffable for str {
    fn diff_identifier(&self) -> Cow<'_, str> {
        Cow::Borrowed(self)
    }

    fn is_equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl Diffable for String {
    fn diff_identifier(&self) -> Cow<'_, str> {
        Cow::Borrowed(self.as_str())
    }

    fn is_equal(&self, other: &Self) -> bool {
        self == other
    }
}

impl<T: Diffable + ?Sized> Diffable for &T {
    fn diff_identifier(&self) -> Cow<'_, str> {
        (**self).diff_identifier()
    }

    fn is_equal(&self, other: &Self) -> bool {
        (**self).is_equal(*other)
    }
}

/// Row address inside a multi-section list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IndexPath {
    pub section: usize,
    pub row: usize,
}

impl IndexPath {
    pub const fn new(section: usize, row: usize) -> Self {
        IndexPath { section, row }
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.row)
    }
}

/// A row that keeps its identity but changes position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub from: IndexPath,
    pub to: IndexPath,
}

impl Move {
    pub const fn new(from: IndexPath, to: IndexPath) -> Self {
        Move { from, to }
    }
}

/// One group of changes, used to assemble an [`EditScript`] piecewise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    Inserted(Vec<IndexPath>),
    Deleted(Vec<IndexPath>),
    Updated(Vec<IndexPath>),
    Moved(Vec<Move>),
}

/// Raw result of diffing one old section against one new section.
///
/// `inserted` holds new-side paths; `deleted` and `updated` hold old-side
/// paths. A slot that both moved and changed content appears in `moved` and
/// in `updated` at the same time; [`EditScript::for_batch_updates`] splits it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditScript {
    #[serde(default)]
    pub inserted: Vec<IndexPath>,
    #[serde(default)]
    pub deleted: Vec<IndexPath>,
    #[serde(default)]
    pub updated: Vec<IndexPath>,
    #[serde(default)]
    pub moved: Vec<Move>,
}

impl EditScript {
    pub fn from_changes(changes: impl IntoIterator<Item = Change>) -> Self {
        let mut script = EditScript::default();
        for change in changes {
            match change {
                Change::Inserted(paths) => script.inserted.extend(paths),
                Change::Deleted(paths) => script.deleted.extend(paths),
                Change::Updated(paths) => script.updated.extend(paths),
                Change::Moved(moves) => script.moved.extend(moves),
            }
        }
        script
    }

    /// Append another script, typically the one computed for the next section.
    pub fn merge(&mut self, other: EditScript) {
        self.inserted.extend(other.inserted);
        self.deleted.extend(other.deleted);
        self.updated.extend(other.updated);
        self.moved.extend(other.moved);
    }

    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty()
            && self.deleted.is_empty()
            && self.updated.is_empty()
            && self.moved.is_empty()
    }

    /// Moves whose slot also changed content.
    pub fn updated_moves(&self) -> impl Iterator<Item = &Move> {
        self.moved
            .iter()
            .filter(|mv| self.updated.contains(&mv.from))
    }
}

/// Edit script that can be applied as one animated batch.
///
/// There is no `updated` field: every update has been turned into a
/// delete/insert pair. Deletions and move sources address pre-batch rows,
/// insertions and move targets address post-batch rows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchEditScript {
    pub inserted: BTreeSet<IndexPath>,
    pub deleted: BTreeSet<IndexPath>,
    pub moved: Vec<Move>,
}

impl BatchEditScript {
    pub fn is_empty(&self) -> bool {
        self.inserted.is_empty() && self.deleted.is_empty() && self.moved.is_empty()
    }

    /// Whether applying this batch to `pre_count` rows leaves `post_count` rows.
    pub fn is_consistent(&self, pre_count: usize, post_count: usize) -> bool {
        (pre_count + self.inserted.len()).checked_sub(self.deleted.len()) == Some(post_count)
    }

    /// Flatten into the order a list view applies them: removals, insertions, moves.
    pub fn patches(&self) -> Vec<Patch> {
        let removals = self.deleted.iter().map(|path| Patch {
            action: PatchAction::Remove,
            at: *path,
            to: None,
        });
        let insertions = self.inserted.iter().map(|path| Patch {
            action: PatchAction::Insert,
            at: *path,
            to: None,
        });
        let moves = self.moved.iter().map(|mv| Patch {
            action: PatchAction::Move,
            at: mv.from,
            to: Some(mv.to),
        });
        removals.chain(insertions).chain(moves).collect()
    }
}

/// Patch action enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PatchAction {
    Insert,
    Remove,
    Move,
}

impl fmt::Display for PatchAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PatchAction::Insert => "INSERT",
            PatchAction::Remove => "REMOVE",
            PatchAction::Move => "MOVE",
        };
        f.write_str(name)
    }
}

/// Single row operation of a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Patch {
    pub action: PatchAction,
    pub at: IndexPath,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to: Option<IndexPath>,
}

/// Per-section outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionReport {
    pub section: usize,
    pub pre_count: usize,
    pub post_count: usize,
    pub raw: EditScript,
    pub batch: Option<BatchEditScript>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn at(row: usize) -> IndexPath {
        IndexPath::new(0, row)
    }

    #[test]
    fn from_changes_collects_every_group() {
        let script = EditScript::from_changes([
            Change::Inserted(vec![at(1)]),
            Change::Moved(vec![Move::new(at(0), at(2))]),
            Change::Deleted(vec![at(3)]),
            Change::Inserted(vec![at(4)]),
        ]);

        assert_eq!(script.inserted, vec![at(1), at(4)]);
        assert_eq!(script.deleted, vec![at(3)]);
        assert!(script.updated.is_empty());
        assert_eq!(script.moved, vec![Move::new(at(0), at(2))]);
    }

    #[test]
    fn updated_moves_only_yields_changed_slots() {
        let script = EditScript {
            updated: vec![at(2)],
            moved: vec![Move::new(at(0), at(1)), Move::new(at(2), at(0))],
            ..Default::default()
        };

        let both: Vec<_> = script.updated_moves().copied().collect();
        assert_eq!(both, vec![Move::new(at(2), at(0))]);
    }

    #[test]
    fn merge_keeps_section_tags() {
        let mut first = EditScript::from_changes([Change::Inserted(vec![at(0)])]);
        first.merge(EditScript::from_changes([Change::Deleted(vec![IndexPath::new(1, 3)])]));

        assert_eq!(first.inserted, vec![at(0)]);
        assert_eq!(first.deleted, vec![IndexPath::new(1, 3)]);
    }

    #[test]
    fn patches_follow_view_order() {
        let batch = BatchEditScript {
            inserted: [at(0)].into(),
            deleted: [at(2)].into(),
            moved: vec![Move::new(at(1), at(2))],
        };

        let actions: Vec<_> = batch.patches().iter().map(|p| p.action.to_string()).collect();
        assert_eq!(actions, vec!["REMOVE", "INSERT", "MOVE"]);
        assert!(batch.is_consistent(3, 3));
        assert!(!batch.is_consistent(3, 4));
    }

    #[test]
    fn index_path_orders_by_section_then_row() {
        let mut paths = vec![IndexPath::new(1, 0), IndexPath::new(0, 5), IndexPath::new(0, 1)];
        paths.sort();
        assert_eq!(paths, vec![IndexPath::new(0, 1), IndexPath::new(0, 5), IndexPath::new(1, 0)]);
        assert_eq!(IndexPath::new(2, 7).to_string(), "[2, 7]");
    }

    #[test]
    fn edit_script_serializes_as_plain_json() {
        let script = EditScript::from_changes([Change::Moved(vec![Move::new(at(0), at(1))])]);
        let value = serde_json::to_value(&script).unwrap();

        assert_eq!(
            value,
            serde_json::json!({
                "inserted": [],
                "deleted": [],
                "updated": [],
                "moved": [{"from": {"section": 0, "row": 0}, "to": {"section": 0, "row": 1}}],
            })
        );
    }
}
