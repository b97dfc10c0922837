//! Retrieval subsystem: embedder, flat vector index, retriever, and the
//! prompt composer that feeds retrieved context to the model.

pub mod corpus;
pub mod embedder;
pub mod index;
pub mod prompt;
pub mod retriever;

pub use embedder::{OnnxEmbedder, TextEmbedder, EMBEDDING_DIM};
pub use index::{FlatIndex, Hit, IndexError};
pub use retriever::{Document, Retriever};
