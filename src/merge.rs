//! Merging of two posting streams (AND, OR, ANDNOT)
//!
//! All operations are merge-joins over document IDs: both inputs must be
//! ordered by strictly increasing document ID, and the output is produced
//! lazily with at most one posting held ahead per input.
//!
//! When a document appears in both inputs, the posting from the left operand
//! is returned unchanged.

use std::cmp::Ordering;
use std::iter::FusedIterator;

use crate::base::{Posting, PostingCursor};

/// AND(A, B)
pub struct Intersection<A, B> {
    left: PostingCursor<A>,
    right: PostingCursor<B>,
}

/// OR(A, B)
pub struct Union<A, B> {
    left: PostingCursor<A>,
    right: PostingCursor<B>,
}

/// ANDNOT(A, B)
pub struct Difference<A, B> {
    left: PostingCursor<A>,
    right: PostingCursor<B>,
}

/// Postings whose document appears in both streams
pub fn intersect<A, B>(a: A, b: B) -> Intersection<A::IntoIter, B::IntoIter>
where
    A: IntoIterator<Item = Posting>,
    B: IntoIterator<Item = Posting>,
{
    Intersection {
        left: PostingCursor::new(a.into_iter()),
        right: PostingCursor::new(b.into_iter()),
    }
}

/// Postings whose document appears in at least one of the streams
pub fn union<A, B>(a: A, b: B) -> Union<A::IntoIter, B::IntoIter>
where
    A: IntoIterator<Item = Posting>,
    B: IntoIterator<Item = Posting>,
{
    Union {
        left: PostingCursor::new(a.into_iter()),
        right: PostingCursor::new(b.into_iter()),
    }
}

/// Postings of `a` whose document does not appear in `b`
pub fn difference<A, B>(a: A, b: B) -> Difference<A::IntoIter, B::IntoIter>
where
    A: IntoIterator<Item = Posting>,
    B: IntoIterator<Item = Posting>,
{
    Difference {
        left: PostingCursor::new(a.into_iter()),
        right: PostingCursor::new(b.into_iter()),
    }
}

impl<A, B> Iterator for Intersection<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        loop {
            // Stops as soon as one side is exhausted, the other one is not drained
            let left = self.left.current()?;
            let right = self.right.current()?;

            match left.docid.cmp(&right.docid) {
                Ordering::Less => self.left.advance(),
                Ordering::Greater => self.right.advance(),
                Ordering::Equal => {
                    self.left.advance();
                    self.right.advance();
                    return Some(left);
                }
            }
        }
    }
}

impl<A, B> Iterator for Union<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        match (self.left.current(), self.right.current()) {
            (None, None) => None,
            (Some(_), None) => self.left.take(),
            (None, Some(_)) => self.right.take(),
            (Some(left), Some(right)) => match left.docid.cmp(&right.docid) {
                Ordering::Less => self.left.take(),
                Ordering::Greater => self.right.take(),
                Ordering::Equal => {
                    self.right.advance();
                    self.left.take()
                }
            },
        }
    }
}

impl<A, B> Iterator for Difference<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
    type Item = Posting;

    fn next(&mut self) -> Option<Posting> {
        loop {
            let left = self.left.current()?;

            // Right side exhausted: the rest of A goes through unchanged
            let Some(right) = self.right.current() else {
                return self.left.take();
            };

            match left.docid.cmp(&right.docid) {
                Ordering::Less => return self.left.take(),
                Ordering::Greater => self.right.advance(),
                Ordering::Equal => {
                    self.left.advance();
                    self.right.advance();
                }
            }
        }
    }
}

impl<A, B> FusedIterator for Intersection<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
}

impl<A, B> FusedIterator for Union<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
}

impl<A, B> FusedIterator for Difference<A, B>
where
    A: Iterator<Item = Posting>,
    B: Iterator<Item = Posting>,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::DocId;

    fn postings(docids: &[DocId]) -> Vec<Posting> {
        docids.iter().map(|&d| Posting::new(d, 0)).collect()
    }

    fn docids(iter: impl Iterator<Item = Posting>) -> Vec<DocId> {
        iter.map(|p| p.docid).collect()
    }

    #[test]
    fn test_empty_lists() {
        let one = postings(&[123]);
        assert!(docids(intersect(postings(&[]), postings(&[]))).is_empty());
        assert!(docids(intersect(postings(&[]), one.clone())).is_empty());
        assert!(docids(intersect(one.clone(), postings(&[]))).is_empty());
        assert!(docids(union(postings(&[]), postings(&[]))).is_empty());
        assert!(docids(difference(postings(&[]), postings(&[]))).is_empty());
        assert_eq!(docids(union(postings(&[]), one.clone())), vec![123]);
        assert_eq!(docids(union(one.clone(), postings(&[]))), vec![123]);
        assert_eq!(docids(difference(one.clone(), postings(&[]))), vec![123]);
        assert!(docids(difference(postings(&[]), one)).is_empty());
    }

    #[test]
    fn test_difference_is_order_dependent() {
        let a = postings(&[1, 2, 3, 9]);
        let b = postings(&[2, 3, 6, 8]);
        assert_eq!(docids(difference(a.clone(), b.clone())), vec![1, 9]);
        assert_eq!(docids(difference(b, a)), vec![6, 8]);
    }

    #[test]
    fn test_ends_with_same_document() {
        let a = postings(&[1, 2, 6]);
        let b = postings(&[2, 3, 6]);
        assert_eq!(docids(intersect(a.clone(), b.clone())), vec![2, 6]);
        assert_eq!(docids(union(a.clone(), b.clone())), vec![1, 2, 3, 6]);
        assert_eq!(docids(difference(a.clone(), b.clone())), vec![1]);
        assert_eq!(docids(difference(b, a)), vec![3]);
    }

    #[test]
    fn test_difference_both_exhaust_on_match() {
        // Both streams end on the same document: nothing should leak out
        let a = postings(&[4, 7]);
        let b = postings(&[7]);
        assert_eq!(docids(difference(a, b)), vec![4]);

        let a = postings(&[7]);
        let b = postings(&[7]);
        assert!(docids(difference(a, b)).is_empty());
    }

    #[test]
    fn test_left_operand_wins() {
        let a = vec![Posting::new(1, 10), Posting::new(2, 20)];
        let b = vec![Posting::new(2, 99), Posting::new(3, 30)];

        let and: Vec<_> = intersect(a.clone(), b.clone()).collect();
        assert_eq!(and, vec![Posting::new(2, 20)]);

        let or: Vec<_> = union(a, b).collect();
        assert_eq!(
            or,
            vec![Posting::new(1, 10), Posting::new(2, 20), Posting::new(3, 30)]
        );
    }

    #[test]
    fn test_intersection_does_not_drain_survivor() {
        let mut pulled = 0;
        let long = (0..1000).map(|d| Posting::new(d, 1)).inspect(|_| pulled += 1);
        let result = docids(intersect(postings(&[0, 1]), long));
        assert_eq!(result, vec![0, 1]);
        assert!(pulled <= 3, "pulled {} postings", pulled);
    }

    #[test]
    fn test_fused() {
        let mut or = union(postings(&[1]), postings(&[]));
        assert_eq!(or.next().map(|p| p.docid), Some(1));
        assert!(or.next().is_none());
        assert!(or.next().is_none());
    }
}
