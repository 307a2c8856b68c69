//! Term to postings lookup

use std::collections::HashMap;

use crate::base::{BoxResult, Posting, PostingStream};

/// Gives access to the posting stream of a term
pub trait InvertedIndex: Send + Sync {
    /// Returns a fresh stream over the postings of a term
    ///
    /// ## Arguments
    ///
    /// * `term` The (normalized) term; unknown terms give an empty stream
    fn postings<'a>(&'a self, term: &str) -> BoxResult<PostingStream<'a>>;
}

/// An index whose posting lists are held in memory
#[derive(Default)]
pub struct InMemoryIndex {
    pub(crate) postings: HashMap<String, Vec<Posting>>,
    pub(crate) document_count: usize,
}

impl InMemoryIndex {
    /// Number of indexed documents
    pub fn document_count(&self) -> usize {
        self.document_count
    }
}

impl InvertedIndex for InMemoryIndex {
    fn postings<'a>(&'a self, term: &str) -> BoxResult<PostingStream<'a>> {
        Ok(match self.postings.get(term) {
            Some(postings) => Box::new(postings.iter().copied()),
            None => Box::new(std::iter::empty()),
        })
    }
}
