use thiserror::Error;

use crate::base::DocId;

type Source = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised while evaluating a query
#[derive(Error, Debug)]
pub enum SearchError {
    #[error("Invalid search options: {0}")]
    InvalidOptions(String),

    #[error("Could not parse search options: {0}")]
    Options(#[from] serde_json::Error),

    #[error("Index lookup failed for term {term:?}: {source}")]
    IndexLookup {
        term: String,
        #[source]
        source: Source,
    },

    #[error("Ranker failed on document {docid}: {source}")]
    Ranker {
        docid: DocId,
        #[source]
        source: Source,
    },

    #[error("Index build error: {0}")]
    IndexBuild(String),
}

pub type Result<T> = std::result::Result<T, SearchError>;

impl SearchError {
    /// True if the error comes from an external collaborator (index or ranker)
    pub fn is_collaborator_failure(&self) -> bool {
        matches!(
            self,
            SearchError::IndexLookup { .. } | SearchError::Ranker { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::InvalidOptions("hit_count must be non-negative".into());
        assert_eq!(
            err.to_string(),
            "Invalid search options: hit_count must be non-negative"
        );
        assert!(!err.is_collaborator_failure());

        let err = SearchError::Ranker {
            docid: 7,
            source: "boom".into(),
        };
        assert_eq!(err.to_string(), "Ranker failed on document 7: boom");
        assert!(err.is_collaborator_failure());
    }
}
