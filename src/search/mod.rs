pub mod boolean;
pub mod threshold;

use std::{cmp::Ordering, collections::BinaryHeap};

use serde::{Deserialize, Serialize};

use crate::base::{DocId, Score};

#[derive(Serialize, Deserialize, Clone, Copy, Debug)]
pub struct ScoredDocument {
    pub docid: DocId,
    pub score: Score,
}

impl std::fmt::Display for ScoredDocument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{})", self.docid, self.score)
    }
}

impl PartialEq for ScoredDocument {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for ScoredDocument {}

impl PartialOrd for ScoredDocument {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

// Best documents come first: decreasing score, then increasing document ID
impl Ord for ScoredDocument {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .score
            .total_cmp(&self.score)
            .then_with(|| self.docid.cmp(&other.docid))
    }
}

/// Receives the scored documents of an evaluation
pub trait Collector {
    /// Proposes a candidate
    fn sift(&mut self, score: Score, docid: DocId);

    /// Returns the retained documents, best first
    fn winners(self) -> Vec<ScoredDocument>;
}

/// Keeps the best scored documents, up to an optional capacity
///
/// The heap top is the worst retained document, so that it can be evicted
/// when a better candidate comes in.
pub struct Sieve {
    heap: BinaryHeap<ScoredDocument>,
    capacity: Option<usize>,
}

impl Sieve {
    /// Creates a sieve (`None` means no limit)
    pub fn new(capacity: Option<usize>) -> Self {
        Self {
            heap: BinaryHeap::new(),
            capacity,
        }
    }

    /// Lowest retained score once the sieve is full (-infinity otherwise)
    fn lower_bound(&self) -> Score {
        match (self.capacity, self.heap.peek()) {
            (Some(capacity), Some(worst)) if self.heap.len() >= capacity => worst.score,
            _ => Score::NEG_INFINITY,
        }
    }

    pub fn into_sorted_vec(self) -> Vec<ScoredDocument> {
        self.heap.into_sorted_vec()
    }
}

impl Collector for Sieve {
    /// NaN scores rank below every other score, and -0 is treated as 0
    fn sift(&mut self, score: Score, docid: DocId) {
        let score = if score.is_nan() { Score::NEG_INFINITY } else { score + 0. };
        if score < self.lower_bound() {
            return;
        }
        let candidate = ScoredDocument { docid, score };
        match self.capacity {
            Some(capacity) if self.heap.len() >= capacity => {
                if let Some(mut worst) = self.heap.peek_mut() {
                    if candidate < *worst {
                        *worst = candidate;
                    }
                }
            }
            _ => self.heap.push(candidate),
        }
    }

    fn winners(self) -> Vec<ScoredDocument> {
        self.into_sorted_vec()
    }
}
