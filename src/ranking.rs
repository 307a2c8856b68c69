//! Per-document score accumulation

use crate::base::{BoxResult, DocId, Posting, Score};

/// Accumulates the score of one document at a time
///
/// A ranker is reused sequentially for every matching document of an
/// evaluation: `reset` starts a new document, `update` is called once per
/// matching query term (in no particular order), and `evaluate` returns the
/// final score (higher is better). A NaN score is ranked below every other
/// score.
pub trait Ranker {
    fn reset(&mut self, docid: DocId);

    fn update(&mut self, term: &str, multiplicity: usize, posting: &Posting) -> BoxResult<()>;

    fn evaluate(&mut self) -> BoxResult<Score>;
}

impl<R: Ranker + ?Sized> Ranker for &mut R {
    fn reset(&mut self, docid: DocId) {
        (**self).reset(docid)
    }

    fn update(&mut self, term: &str, multiplicity: usize, posting: &Posting) -> BoxResult<()> {
        (**self).update(term, multiplicity, posting)
    }

    fn evaluate(&mut self) -> BoxResult<Score> {
        (**self).evaluate()
    }
}

/// Scores a document by summing, over matching terms, the query multiplicity
/// times the term frequency
#[derive(Default)]
pub struct SimpleRanker {
    score: Score,
    docid: Option<DocId>,
}

impl SimpleRanker {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Ranker for SimpleRanker {
    fn reset(&mut self, docid: DocId) {
        self.docid = Some(docid);
        self.score = 0.;
    }

    fn update(&mut self, _term: &str, multiplicity: usize, posting: &Posting) -> BoxResult<()> {
        if self.docid != Some(posting.docid) {
            return Err(format!(
                "posting for document {} while scoring {:?}",
                posting.docid, self.docid
            )
            .into());
        }
        self.score += multiplicity as Score * posting.term_frequency as Score;
        Ok(())
    }

    fn evaluate(&mut self) -> BoxResult<Score> {
        Ok(self.score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_ranker() {
        let mut ranker = SimpleRanker::new();
        ranker.reset(4);
        ranker.update("a", 2, &Posting::new(4, 3)).unwrap();
        ranker.update("b", 1, &Posting::new(4, 1)).unwrap();
        assert_eq!(ranker.evaluate().unwrap(), 7.);

        ranker.reset(5);
        assert_eq!(ranker.evaluate().unwrap(), 0.);
        assert!(ranker.update("a", 1, &Posting::new(4, 1)).is_err());
    }
}
