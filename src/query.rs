use std::collections::HashMap;

/// A unique query term with the number of times it appears in the query
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryTerm {
    pub term: String,
    pub multiplicity: usize,
}

/// The deduplicated terms of a query, in order of first occurrence
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QueryTerms {
    terms: Vec<QueryTerm>,
}

impl QueryTerms {
    /// Builds the query terms from a sequence of (normalized) tokens
    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut terms: Vec<QueryTerm> = Vec::new();
        let mut positions = HashMap::<String, usize>::new();
        for token in tokens {
            let token = token.as_ref();
            if let Some(&ix) = positions.get(token) {
                terms[ix].multiplicity += 1;
            } else {
                positions.insert(token.to_string(), terms.len());
                terms.push(QueryTerm {
                    term: token.to_string(),
                    multiplicity: 1,
                });
            }
        }
        Self { terms }
    }

    /// Number of unique terms (M)
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, QueryTerm> {
        self.terms.iter()
    }
}

impl<'a> IntoIterator for &'a QueryTerms {
    type Item = &'a QueryTerm;
    type IntoIter = std::slice::Iter<'a, QueryTerm>;

    fn into_iter(self) -> Self::IntoIter {
        self.terms.iter()
    }
}

impl<S: AsRef<str>> FromIterator<S> for QueryTerms {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        Self::from_tokens(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_multiplicity() {
        let query = QueryTerms::from_tokens("orange apple orange banana orange".split(' '));
        assert_eq!(query.len(), 3);
        let terms: Vec<_> = query
            .iter()
            .map(|t| (t.term.as_str(), t.multiplicity))
            .collect();
        assert_eq!(terms, vec![("orange", 3), ("apple", 1), ("banana", 1)]);
    }

    #[test]
    fn test_empty() {
        let query: QueryTerms = Vec::<String>::new().into_iter().collect();
        assert!(query.is_empty());
    }
}
