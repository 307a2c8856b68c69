//! Query evaluation over an inverted index
//!
//! - [`merge`]: AND / OR / ANDNOT of two sorted posting streams
//! - [`search::threshold`]: N-of-M ranked retrieval over M posting streams
//! - [`search::boolean`]: boolean query trees built on the two-way merges

pub mod base;
pub mod builder;
pub mod error;
pub mod index;
pub mod merge;
pub mod query;
pub mod ranking;
pub mod search;

pub use base::{DocId, Posting, PostingStream, Score};
pub use error::{Result, SearchError};
pub use search::ScoredDocument;
