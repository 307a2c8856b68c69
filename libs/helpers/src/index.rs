use std::collections::HashSet;

use log::debug;
use rand::{rngs::StdRng, SeedableRng};

use crate::documents::{create_document, term_name, TestDocument};
use postings_query::{
    base::{BoxResult, DocId, Posting, PostingStream, Score},
    builder::Indexer,
    index::{InMemoryIndex, InvertedIndex},
    ranking::Ranker,
    query::QueryTerms,
    search::{Collector, ScoredDocument, Sieve},
};

pub struct TestIndex {
    pub vocabulary_size: usize,
    pub index: InMemoryIndex,
    /// Documents, indexed by document ID
    pub documents: Vec<TestDocument>,
}

impl TestIndex {
    pub fn new(
        vocabulary_size: usize,
        document_count: usize,
        lambda_words: f64,
        max_words: usize,
        seed: Option<u64>,
    ) -> Self {
        let mut rng = if let Some(seed) = seed {
            StdRng::seed_from_u64(seed)
        } else {
            StdRng::from_entropy()
        };

        let mut indexer = Indexer::new();
        let mut documents = Vec::<TestDocument>::new();
        for ix in 0..document_count {
            let document = create_document(lambda_words, max_words, vocabulary_size, &mut rng);
            indexer
                .add(ix as DocId, document.terms.iter())
                .expect("Error while adding terms to the index");
            documents.push(document);
        }

        let index = indexer.build();
        debug!(
            "Test index: {} documents over {} terms (seed {:?})",
            index.document_count(),
            vocabulary_size,
            seed
        );
        Self {
            vocabulary_size,
            index,
            documents,
        }
    }

    /// Query made of the terms of a document
    pub fn document_query(&self, docid: usize) -> QueryTerms {
        QueryTerms::from_tokens(self.documents[docid].terms.iter())
    }

    /// Query made of a list of term indices
    pub fn query(&self, term_indices: &[usize]) -> QueryTerms {
        QueryTerms::from_tokens(term_indices.iter().map(|&ix| term_name(ix)))
    }

    /// Documents containing at least `required` of the query terms, by brute force
    pub fn matching_documents(&self, query: &QueryTerms, required: usize) -> HashSet<DocId> {
        let mut matching = HashSet::new();
        for (docid, document) in self.documents.iter().enumerate() {
            let frequencies = document.frequencies();
            let count = query
                .iter()
                .filter(|t| frequencies.contains_key(t.term.as_str()))
                .count();
            if count >= required {
                matching.insert(docid as DocId);
            }
        }
        matching
    }

    /// Expected results by brute force, using a multiplicity × frequency score
    pub fn expected_results(
        &self,
        query: &QueryTerms,
        required: usize,
        hit_count: Option<usize>,
    ) -> Vec<ScoredDocument> {
        let mut sieve = Sieve::new(hit_count);
        for docid in self.matching_documents(query, required) {
            let frequencies = self.documents[docid as usize].frequencies();
            let score: Score = query
                .iter()
                .map(|t| {
                    t.multiplicity as Score
                        * *frequencies.get(t.term.as_str()).unwrap_or(&0) as Score
                })
                .sum();
            sieve.sift(score, docid);
        }
        sieve.winners()
    }
}

/// An index whose lookups fail for one term
pub struct FailingIndex<I> {
    pub index: I,
    pub failing_term: String,
}

impl<I: InvertedIndex> InvertedIndex for FailingIndex<I> {
    fn postings<'a>(&'a self, term: &str) -> BoxResult<PostingStream<'a>> {
        if term == self.failing_term {
            return Err(format!("cannot read postings of {}", term).into());
        }
        self.index.postings(term)
    }
}

/// An index counting the lookups
pub struct CountingIndex<I> {
    pub index: I,
    pub lookups: std::sync::atomic::AtomicUsize,
}

impl<I> CountingIndex<I> {
    pub fn new(index: I) -> Self {
        Self {
            index,
            lookups: Default::default(),
        }
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(std::sync::atomic::Ordering::SeqCst)
    }
}

impl<I: InvertedIndex> InvertedIndex for CountingIndex<I> {
    fn postings<'a>(&'a self, term: &str) -> BoxResult<PostingStream<'a>> {
        self.lookups
            .fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.index.postings(term)
    }
}

/// Records every ranker call, scoring documents by their number of matching terms
#[derive(Default)]
pub struct RecordingRanker {
    pub resets: Vec<DocId>,
    pub updates: Vec<(String, usize, Posting)>,
    matched: usize,
    /// Fails when evaluating this document
    pub failing_document: Option<DocId>,
    current: Option<DocId>,
}

impl RecordingRanker {
    /// A ranker failing when evaluating the given document
    pub fn failing_on(docid: DocId) -> Self {
        Self {
            failing_document: Some(docid),
            ..Default::default()
        }
    }
}

impl Ranker for RecordingRanker {
    fn reset(&mut self, docid: DocId) {
        self.resets.push(docid);
        self.current = Some(docid);
        self.matched = 0;
    }

    fn update(&mut self, term: &str, multiplicity: usize, posting: &Posting) -> BoxResult<()> {
        self.updates.push((term.to_string(), multiplicity, *posting));
        self.matched += 1;
        Ok(())
    }

    fn evaluate(&mut self) -> BoxResult<Score> {
        if self.current.is_some() && self.current == self.failing_document {
            return Err("ranker failure".into());
        }
        Ok(self.matched as Score)
    }
}
