use rand::{Rng, RngCore};
use rand_distr::{Distribution, Poisson};
use std::{cmp::min, collections::HashMap};

/// A tokenized test document
pub struct TestDocument {
    pub terms: Vec<String>,
}

impl TestDocument {
    /// Term frequencies of the document
    pub fn frequencies(&self) -> HashMap<&str, u32> {
        let mut frequencies = HashMap::new();
        for term in self.terms.iter() {
            *frequencies.entry(term.as_str()).or_insert(0) += 1;
        }
        frequencies
    }
}

pub fn term_name(term_ix: usize) -> String {
    format!("t{}", term_ix)
}

pub fn create_document(
    lambda_words: f64,
    max_words: usize,
    vocabulary_size: usize,
    rng: &mut dyn RngCore,
) -> TestDocument {
    let poi = Poisson::new(lambda_words).unwrap();
    let num_words = 1 + poi.sample(rng) as usize;

    let mut terms = Vec::new();
    for _ in 0..min(num_words, max_words) {
        terms.push(term_name(rng.gen_range(0..vocabulary_size)));
    }

    TestDocument { terms }
}
