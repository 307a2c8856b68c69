//! Boolean queries over an inverted index
//!
//! A query tree is turned into a single lazy posting stream by composing the
//! two-way merges of [`crate::merge`].

use log::debug;

use crate::{
    base::PostingStream,
    error::{Result, SearchError},
    index::InvertedIndex,
    merge::{difference, intersect, union},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BooleanQuery {
    Term(String),
    /// Documents matching both sub-queries
    And(Box<BooleanQuery>, Box<BooleanQuery>),
    /// Documents matching at least one sub-query
    Or(Box<BooleanQuery>, Box<BooleanQuery>),
    /// Documents matching the first sub-query but not the second
    AndNot(Box<BooleanQuery>, Box<BooleanQuery>),
}

impl BooleanQuery {
    pub fn term(term: impl Into<String>) -> Self {
        BooleanQuery::Term(term.into())
    }

    pub fn and(self, other: BooleanQuery) -> Self {
        BooleanQuery::And(Box::new(self), Box::new(other))
    }

    pub fn or(self, other: BooleanQuery) -> Self {
        BooleanQuery::Or(Box::new(self), Box::new(other))
    }

    pub fn and_not(self, other: BooleanQuery) -> Self {
        BooleanQuery::AndNot(Box::new(self), Box::new(other))
    }

    /// Conjunction of all the terms (None if there are no terms)
    pub fn all<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        terms.into_iter().map(Self::term).reduce(Self::and)
    }

    /// Disjunction of all the terms (None if there are no terms)
    pub fn any<I, S>(terms: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        terms.into_iter().map(Self::term).reduce(Self::or)
    }

    /// Returns the matching postings, by increasing document ID
    ///
    /// When a document matches on both sides of an `And` or `Or`, the
    /// posting of the left side is kept.
    pub fn evaluate<'a, I>(&self, index: &'a I) -> Result<PostingStream<'a>>
    where
        I: InvertedIndex + ?Sized,
    {
        let stream: PostingStream<'a> = match self {
            BooleanQuery::Term(term) => {
                debug!("Looking up postings for {:?}", term);
                index
                    .postings(term)
                    .map_err(|source| SearchError::IndexLookup {
                        term: term.clone(),
                        source,
                    })?
            }
            BooleanQuery::And(a, b) => Box::new(intersect(a.evaluate(index)?, b.evaluate(index)?)),
            BooleanQuery::Or(a, b) => Box::new(union(a.evaluate(index)?, b.evaluate(index)?)),
            BooleanQuery::AndNot(a, b) => {
                Box::new(difference(a.evaluate(index)?, b.evaluate(index)?))
            }
        };
        Ok(stream)
    }
}

impl std::fmt::Display for BooleanQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BooleanQuery::Term(term) => write!(f, "{}", term),
            BooleanQuery::And(a, b) => write!(f, "AND({}, {})", a, b),
            BooleanQuery::Or(a, b) => write!(f, "OR({}, {})", a, b),
            BooleanQuery::AndNot(a, b) => write!(f, "ANDNOT({}, {})", a, b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builders() {
        let query = BooleanQuery::all(["a", "b", "c"]).unwrap();
        assert_eq!(query.to_string(), "AND(AND(a, b), c)");

        let query = BooleanQuery::term("a").or(BooleanQuery::term("b")).and_not(BooleanQuery::term("c"));
        assert_eq!(query.to_string(), "ANDNOT(OR(a, b), c)");

        assert!(BooleanQuery::any(Vec::<String>::new()).is_none());
    }
}
