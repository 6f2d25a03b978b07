//! Retrieval over the ingested document corpus
//!
//! The vector index itself is an external collaborator behind the core
//! `VectorSearch` trait. This crate supplies the retrieval front-end the
//! pipeline calls: delegate to the index when it has content, fall back
//! to a small built-in agricultural knowledge set ranked by keyword
//! overlap when it is empty or failing. Retrieval never fails; a degraded
//! result beats no result.

pub mod fallback;
pub mod retriever;

pub use fallback::{keyword_search, FALLBACK_KNOWLEDGE};
pub use retriever::{Retriever, RetrieverConfig};
