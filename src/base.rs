use std::fmt;

use serde::{Deserialize, Serialize};

pub type DocId = u64;
pub type TermFrequency = u32;
pub type Score = f64;

/// Result type returned by external collaborators (index, ranker)
pub type BoxResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// Posting = document ID + term frequency
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub struct Posting {
    pub docid: DocId,
    pub term_frequency: TermFrequency,
}

impl Posting {
    pub fn new(docid: DocId, term_frequency: TermFrequency) -> Self {
        Self {
            docid,
            term_frequency,
        }
    }
}

impl std::fmt::Display for Posting {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.docid, self.term_frequency)
    }
}

/// A single-pass stream of postings, ordered by increasing document ID
pub type PostingStream<'a> = Box<dyn Iterator<Item = Posting> + 'a>;

/// Explicit cursor over a posting stream: either positioned on a posting or
/// exhausted.
///
/// The cursor is lazy: nothing is pulled from the underlying stream until
/// [`PostingCursor::current`] is called, and at most one posting is held
/// ahead of the consumer. In debug builds, it checks that document IDs are
/// strictly increasing.
pub struct PostingCursor<I> {
    iterator: I,
    /// `None` when the head has not been pulled yet, `Some(None)` once the
    /// stream is exhausted
    head: Option<Option<Posting>>,
    last_docid: Option<DocId>,
}

impl<I: Iterator<Item = Posting>> PostingCursor<I> {
    pub fn new(iterator: I) -> Self {
        Self {
            iterator,
            head: None,
            last_docid: None,
        }
    }

    /// Returns the current posting, pulling it from the stream if needed
    #[inline]
    pub fn current(&mut self) -> Option<Posting> {
        if self.head.is_none() {
            let next = self.iterator.next();
            if let Some(posting) = next {
                debug_assert!(
                    self.last_docid.map_or(true, |last| last < posting.docid),
                    "posting stream is not strictly increasing: {} after {:?}",
                    posting.docid,
                    self.last_docid
                );
                self.last_docid = Some(posting.docid);
            }
            self.head = Some(next);
        }
        self.head.flatten()
    }

    /// Consumes the current posting (if any)
    #[inline]
    pub fn advance(&mut self) {
        if let Some(Some(_)) = self.head {
            self.head = None;
        }
    }

    /// Returns the current posting and moves past it
    #[inline]
    pub fn take(&mut self) -> Option<Posting> {
        let posting = self.current();
        self.advance();
        posting
    }

    /// True if the stream has been pulled and found empty
    pub fn is_exhausted(&self) -> bool {
        matches!(self.head, Some(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_is_lazy() {
        let mut pulled = 0;
        let stream = [Posting::new(1, 1), Posting::new(4, 2)]
            .into_iter()
            .inspect(|_| pulled += 1);
        let mut cursor = PostingCursor::new(stream);
        assert!(!cursor.is_exhausted());

        assert_eq!(cursor.current(), Some(Posting::new(1, 1)));
        assert_eq!(cursor.current(), Some(Posting::new(1, 1)));
        assert_eq!(cursor.take(), Some(Posting::new(1, 1)));
        assert_eq!(cursor.take(), Some(Posting::new(4, 2)));
        assert_eq!(cursor.current(), None);
        assert!(cursor.is_exhausted());

        // Advancing an exhausted cursor does not pull again
        cursor.advance();
        assert_eq!(cursor.current(), None);
        drop(cursor);
        assert_eq!(pulled, 2);
    }

    #[test]
    #[cfg(debug_assertions)]
    #[should_panic(expected = "strictly increasing")]
    fn test_cursor_rejects_unordered_stream() {
        let mut cursor = PostingCursor::new(vec![Posting::new(3, 1), Posting::new(3, 1)].into_iter());
        cursor.take();
        cursor.take();
    }

    #[test]
    fn test_display() {
        assert_eq!(Posting::new(12, 3).to_string(), "(12,3)");
    }
}
