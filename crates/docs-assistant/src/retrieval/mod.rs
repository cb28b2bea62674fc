//! Similarity retrieval over the documentation index

pub mod retriever;

pub use retriever::{Retriever, VectorRetriever};
