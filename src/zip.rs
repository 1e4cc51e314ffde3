//! Padded zip over old and new section lists of unequal length
use std::iter::FusedIterator;

/// Pairs up two sequences position by position, yielding `None` for the side
/// that ran out until the longer one is exhausted.
///
/// Each source iterator is dropped as soon as it returns `None`, so a source
/// is never polled again after it ended. The zip is single-pass; zip fresh
/// inputs to traverse again.
#[derive(Debug)]
pub struct PaddedZip<A, B> {
    left: Option<A>,
    right: Option<B>,
}

impl<A: Iterator, B: Iterator> Iterator for PaddedZip<A, B> {
    type Item = (Option<A::Item>, Option<B::Item>);

    fn next(&mut self) -> Option<Self::Item> {
        let left = self.left.as_mut().and_then(Iterator::next);
        let right = self.right.as_mut().and_then(Iterator::next);

        if left.is_none() {
            self.left = None;
        }
        if right.is_none() {
            self.right = None;
        }

        match (left, right) {
            (None, None) => None,
            pair => Some(pair),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (left_low, left_high) = self.left.as_ref().map_or((0, Some(0)), Iterator::size_hint);
        let (right_low, right_high) = self.right.as_ref().map_or((0, Some(0)), Iterator::size_hint);

        let high = match (left_high, right_high) {
            (Some(l), Some(r)) => Some(l.max(r)),
            _ => None,
        };
        (left_low.max(right_low), high)
    }
}

impl<A: Iterator, B: Iterator> FusedIterator for PaddedZip<A, B> {}

/// Zip old and new sections, padding the shorter side with `None`.
///
/// ```
/// use list_reconciler::zip_sections;
///
/// let pairs: Vec<_> = zip_sections(["a", "b"], ["x"]).collect();
/// assert_eq!(pairs, vec![(Some("a"), Some("x")), (Some("b"), None)]);
/// ```
pub fn zip_sections<A, B>(old: A, new: B) -> PaddedZip<A::IntoIter, B::IntoIter>
where
    A: IntoIterator,
    B: IntoIterator,
{
    PaddedZip {
        left: Some(old.into_iter()),
        right: Some(new.into_iter()),
    }
}
