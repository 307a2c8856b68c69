use std::collections::HashMap;

use log::{debug, info};

use crate::{
    base::{DocId, Posting, TermFrequency},
    error::{Result, SearchError},
    index::InMemoryIndex,
};

/// Builds an in-memory inverted index from tokenized documents
///
/// Documents must be added by increasing document ID, which keeps every
/// posting list sorted without any further work.
#[derive(Default)]
pub struct Indexer {
    postings: HashMap<String, Vec<Posting>>,
    last_docid: Option<DocId>,
    document_count: usize,
}

impl Indexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document given its (already normalized) terms
    pub fn add<I, S>(&mut self, docid: DocId, terms: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if let Some(last) = self.last_docid {
            if docid <= last {
                return Err(SearchError::IndexBuild(format!(
                    "document {} added after document {}",
                    docid, last
                )));
            }
        }
        self.last_docid = Some(docid);
        self.document_count += 1;

        // Count term frequencies, keeping the order of first occurrence
        let mut frequencies: Vec<(String, TermFrequency)> = Vec::new();
        let mut positions = HashMap::<String, usize>::new();
        for term in terms {
            let term = term.as_ref();
            match positions.get(term) {
                Some(&ix) => frequencies[ix].1 += 1,
                None => {
                    positions.insert(term.to_string(), frequencies.len());
                    frequencies.push((term.to_string(), 1));
                }
            }
        }

        debug!("Adding document {} ({} terms)", docid, frequencies.len());
        for (term, term_frequency) in frequencies {
            self.postings
                .entry(term)
                .or_default()
                .push(Posting::new(docid, term_frequency));
        }
        Ok(())
    }

    /// Finishes the index
    pub fn build(self) -> InMemoryIndex {
        info!(
            "Built index with {} documents and {} terms",
            self.document_count,
            self.postings.len()
        );
        InMemoryIndex {
            postings: self.postings,
            document_count: self.document_count,
        }
    }
}
