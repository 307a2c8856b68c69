//! N-of-M threshold retrieval
//!
//! For a query with M unique terms, a document matches if it contains at
//! least N of them, where N is derived from the client-supplied ratio
//! `match_threshold`. 1-of-M is a disjunction of all the terms, M-of-M a
//! conjunction, and everything in between a "soft AND".
//!
//! The evaluation is a document-at-a-time k-way merge: at each step, the
//! smallest current document ID over the M posting streams is selected,
//! the streams positioned on it form the candidate group, and the document is
//! scored if the group is large enough. Every stream of the group is then
//! advanced, so each document is considered exactly once.

use derivative::Derivative;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};

use crate::{
    base::{DocId, Posting, PostingCursor, PostingStream},
    error::{Result, SearchError},
    index::InvertedIndex,
    query::{QueryTerm, QueryTerms},
    ranking::Ranker,
    search::{Collector, ScoredDocument, Sieve},
};

pub const DEFAULT_MATCH_THRESHOLD: f64 = 0.75;

/// Options of a threshold search, as supplied by the client
#[derive(Derivative, Serialize, Deserialize, Clone, Debug)]
#[derivative(Default)]
#[serde(default)]
pub struct SearchOptions {
    /// Fraction of the unique query terms a document must contain
    /// (clamped to [0, 1])
    #[derivative(Default(value = "DEFAULT_MATCH_THRESHOLD"))]
    pub match_threshold: f64,

    /// Maximum number of returned documents (none means no limit)
    pub hit_count: Option<i64>,
}

/// Validated search options
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ThresholdSettings {
    /// Match threshold, within [0, 1]
    pub match_threshold: f64,
    pub hit_count: Option<usize>,
}

impl SearchOptions {
    /// Parses options from a JSON object (missing keys take default values)
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Checks the options before any posting is read
    pub fn validate(&self) -> Result<ThresholdSettings> {
        let match_threshold = if self.match_threshold.is_nan() {
            warn!(
                "Match threshold is NaN, using {}",
                DEFAULT_MATCH_THRESHOLD
            );
            DEFAULT_MATCH_THRESHOLD
        } else {
            let clamped = self.match_threshold.clamp(0., 1.);
            if clamped != self.match_threshold {
                warn!(
                    "Match threshold {} clamped to {}",
                    self.match_threshold, clamped
                );
            }
            clamped
        };

        let hit_count = match self.hit_count {
            None => None,
            Some(count) => Some(usize::try_from(count).map_err(|_| {
                SearchError::InvalidOptions(format!(
                    "hit_count should be a non-negative integer (got {})",
                    count
                ))
            })?),
        };

        Ok(ThresholdSettings {
            match_threshold,
            hit_count,
        })
    }
}

impl ThresholdSettings {
    /// Minimum number of matching terms (N) for a query with `term_count`
    /// unique terms (M > 0)
    pub fn required_matches(&self, term_count: usize) -> usize {
        let n = (self.match_threshold * term_count as f64).floor() as usize;
        n.min(term_count).max(1)
    }
}

/// A posting stream together with its query term
struct TermCursor<'a> {
    term: &'a QueryTerm,
    cursor: PostingCursor<PostingStream<'a>>,
}

/// Searches with N-of-M matching, keeping the `hit_count` best documents
///
/// Returns the documents by decreasing score (ties are broken by increasing
/// document ID). If the index or the ranker fails, the error is returned and
/// partial results are discarded.
pub fn search_threshold<'a, I, R>(
    index: &'a I,
    query: &'a QueryTerms,
    options: &SearchOptions,
    ranker: R,
) -> Result<Vec<ScoredDocument>>
where
    I: InvertedIndex + ?Sized,
    R: Ranker,
{
    let settings = options.validate()?;
    search_threshold_with(index, query, &settings, ranker, Sieve::new(settings.hit_count))
}

/// Searches with N-of-M matching, feeding matches to a custom collector
///
/// Only `settings.match_threshold` is used here: the number of returned
/// documents is bounded by the collector alone, and `settings.hit_count` is
/// ignored.
pub fn search_threshold_with<'a, I, R, C>(
    index: &'a I,
    query: &'a QueryTerms,
    settings: &ThresholdSettings,
    mut ranker: R,
    mut collector: C,
) -> Result<Vec<ScoredDocument>>
where
    I: InvertedIndex + ?Sized,
    R: Ranker,
    C: Collector,
{
    let term_count = query.len();
    if term_count == 0 {
        debug!("Empty query, nothing to search");
        return Ok(Vec::new());
    }
    let required = settings.required_matches(term_count);
    debug!(
        "Searching with {}-of-{} matching (threshold {})",
        required, term_count, settings.match_threshold
    );

    // --- Initialize the cursors

    let mut cursors = Vec::with_capacity(term_count);
    for term in query.iter() {
        let stream = index
            .postings(&term.term)
            .map_err(|source| SearchError::IndexLookup {
                term: term.term.clone(),
                source,
            })?;
        cursors.push(TermCursor {
            term,
            cursor: PostingCursor::new(stream),
        });
    }

    let mut group: Vec<(usize, Posting)> = Vec::with_capacity(term_count);
    let mut previous: Option<DocId> = None;
    let mut candidates = 0usize;
    let mut matches = 0usize;

    loop {
        // Candidate group: cursors positioned on the smallest document ID
        group.clear();
        for (ix, term_cursor) in cursors.iter_mut().enumerate() {
            let Some(posting) = term_cursor.cursor.current() else {
                continue;
            };
            match group.first().map(|(_, first)| first.docid) {
                Some(docid) if docid < posting.docid => {}
                Some(docid) if docid == posting.docid => group.push((ix, posting)),
                _ => {
                    group.clear();
                    group.push((ix, posting));
                }
            }
        }

        let Some(&(_, first)) = group.first() else {
            break;
        };
        let candidate = first.docid;
        debug_assert!(
            previous.map_or(true, |previous| previous < candidate),
            "candidate {} does not follow {:?}",
            candidate,
            previous
        );
        previous = Some(candidate);
        candidates += 1;

        if group.len() >= required {
            matches += 1;
            ranker.reset(candidate);
            for (ix, posting) in group.iter() {
                let term = cursors[*ix].term;
                ranker
                    .update(&term.term, term.multiplicity, posting)
                    .map_err(|source| SearchError::Ranker {
                        docid: candidate,
                        source,
                    })?;
            }
            let score = ranker.evaluate().map_err(|source| SearchError::Ranker {
                docid: candidate,
                source,
            })?;
            debug!(
                "Document {} matches {} terms, score {}",
                candidate,
                group.len(),
                score
            );
            collector.sift(score, candidate);
        }

        for (ix, _) in group.iter() {
            cursors[*ix].cursor.advance();
        }
    }

    let results = collector.winners();
    info!(
        "{}-of-{} search: {} candidates, {} matches, {} results",
        required,
        term_count,
        candidates,
        matches,
        results.len()
    );
    Ok(results)
}

/// Query evaluator bound to an index
pub struct SearchEngine<'a, I: ?Sized> {
    index: &'a I,
}

impl<'a, I: InvertedIndex + ?Sized> SearchEngine<'a, I> {
    pub fn new(index: &'a I) -> Self {
        Self { index }
    }

    /// Evaluates the query with N-of-M matching (see [`search_threshold`])
    pub fn evaluate<R: Ranker>(
        &self,
        query: &QueryTerms,
        options: &SearchOptions,
        ranker: R,
    ) -> Result<Vec<ScoredDocument>> {
        search_threshold(self.index, query, options, ranker)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{builder::Indexer, ranking::SimpleRanker};

    fn settings(match_threshold: f64) -> ThresholdSettings {
        SearchOptions {
            match_threshold,
            hit_count: None,
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn test_required_matches() {
        assert_eq!(settings(0.67).required_matches(3), 2);
        assert_eq!(settings(0.75).required_matches(4), 3);
        assert_eq!(settings(0.7).required_matches(4), 2);
        assert_eq!(settings(1.).required_matches(3), 3);
        assert_eq!(settings(0.).required_matches(3), 1);
        assert_eq!(settings(0.1).required_matches(3), 1);
        assert_eq!(settings(5.).required_matches(3), 3);
        assert_eq!(settings(-2.).required_matches(3), 1);
    }

    #[test]
    fn test_validate() {
        let options = SearchOptions::default();
        assert_eq!(options.match_threshold, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(options.hit_count, None);

        assert_eq!(settings(1.5).match_threshold, 1.);
        assert_eq!(settings(-0.5).match_threshold, 0.);
        assert_eq!(settings(f64::NAN).match_threshold, DEFAULT_MATCH_THRESHOLD);

        let err = SearchOptions {
            match_threshold: 0.5,
            hit_count: Some(-1),
        }
        .validate()
        .unwrap_err();
        assert!(matches!(err, SearchError::InvalidOptions(_)));

        let ok = SearchOptions {
            match_threshold: 0.5,
            hit_count: Some(0),
        }
        .validate()
        .unwrap();
        assert_eq!(ok.hit_count, Some(0));
    }

    #[test]
    fn test_options_from_json() {
        let options = SearchOptions::from_json(r#"{"hit_count": 10}"#).unwrap();
        assert_eq!(options.match_threshold, DEFAULT_MATCH_THRESHOLD);
        assert_eq!(options.hit_count, Some(10));

        let options = SearchOptions::from_json(r#"{"match_threshold": 0.5}"#).unwrap();
        assert_eq!(options.match_threshold, 0.5);
        assert_eq!(options.hit_count, None);

        assert!(matches!(
            SearchOptions::from_json(r#"{"hit_count": "ten"}"#),
            Err(SearchError::Options(_))
        ));
    }

    #[test]
    fn test_collector_bounds_results() {
        let mut indexer = Indexer::new();
        indexer.add(1, ["a", "b"]).unwrap();
        indexer.add(2, ["a"]).unwrap();
        indexer.add(3, ["a", "b", "b"]).unwrap();
        let index = indexer.build();
        let query = QueryTerms::from_tokens(["a", "b"]);

        let settings = SearchOptions {
            match_threshold: 0.,
            hit_count: Some(1),
        }
        .validate()
        .unwrap();

        // An unbounded collector keeps every match despite the hit count
        let results =
            search_threshold_with(&index, &query, &settings, SimpleRanker::new(), Sieve::new(None))
                .unwrap();
        let docids: Vec<DocId> = results.iter().map(|d| d.docid).collect();
        assert_eq!(docids, vec![3, 1, 2]);

        let results =
            search_threshold_with(&index, &query, &settings, SimpleRanker::new(), Sieve::new(Some(2)))
                .unwrap();
        assert_eq!(results.len(), 2);
    }
}
