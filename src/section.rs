//! Top-level list entries: a single row or a whole group of rows
use crate::types::Diffable;
use std::borrow::Cow;

/// One top-level entry of a sectioned data source.
///
/// A `Group` stands for an entire section; a `Single` item becomes a
/// one-row section of its own.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionEntry<T> {
    Single(T),
    Group(Vec<T>),
}

impl<T> SectionEntry<T> {
    /// Rows of this entry, in order.
    pub fn as_slice(&self) -> &[T] {
        match self {
            SectionEntry::Single(item) => std::slice::from_ref(item),
            SectionEntry::Group(items) => items,
        }
    }

    pub fn flatten(self) -> Vec<T> {
        match self {
            SectionEntry::Single(item) => vec![item],
            SectionEntry::Group(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.as_slice().len()
    }

    pub fn is_empty(&self) -> bool {
        self.as_slice().is_empty()
    }
}

impl<T> From<Vec<T>> for SectionEntry<T> {
    fn from(items: Vec<T>) -> Self {
        SectionEntry::Group(items)
    }
}

// A group is identified by the concatenated identities of its rows, so two
// groups are "equal" exactly when they hold the same rows in the same order.
impl<T: Diffable> Diffable for SectionEntry<T> {
    fn diff_identifier(&self) -> Cow<'_, str> {
        match self {
            SectionEntry::Single(item) => item.diff_identifier(),
            SectionEntry::Group(items) => Cow::Owned(
                items
                    .iter()
                    .map(|item| item.diff_identifier())
                    .collect::<String>(),
            ),
        }
    }

    fn is_equal(&self, other: &Self) -> bool {
        match (self, other) {
            (SectionEntry::Single(a), SectionEntry::Single(b)) => a.is_equal(b),
            _ => self.diff_identifier() == other.diff_identifier(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn single_flattens_to_one_row() {
        let entry = SectionEntry::Single("a");
        assert_eq!(entry.as_slice(), &["a"]);
        assert_eq!(entry.flatten(), vec!["a"]);
    }

    #[test]
    fn group_flattens_to_its_rows() {
        let entry: SectionEntry<&str> = vec!["a", "b"].into();
        assert_eq!(entry.len(), 2);
        assert_eq!(entry.flatten(), vec!["a", "b"]);
    }

    #[test]
    fn group_identity_concatenates_rows() {
        let left = SectionEntry::Group(vec!["a", "b"]);
        let right = SectionEntry::Group(vec!["a", "b"]);
        let swapped = SectionEntry::Group(vec!["b", "a"]);

        assert_eq!(left.diff_identifier(), "ab");
        assert!(left.is_equal(&right));
        assert!(!left.is_equal(&swapped));
    }
}
