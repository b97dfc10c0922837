use std::sync::Arc;

use thiserror::Error;

use super::embedder::TextEmbedder;
use super::index::{FlatIndex, IndexError};
use crate::core::errors::ApiError;

#[derive(Debug, Error)]
pub enum BuildError {
    #[error("failed to embed corpus: {0}")]
    Embed(#[source] ApiError),
    #[error(transparent)]
    Index(#[from] IndexError),
}

/// A document held by the retriever: immutable text plus its embedding,
/// computed once at build time.
#[derive(Debug, Clone)]
pub struct Document {
    pub text: String,
    pub embedding: Vec<f32>,
}

/// Embeds queries and maps index hits back to document text in rank order.
pub struct Retriever {
    embedder: Arc<dyn TextEmbedder>,
    documents: Vec<Document>,
    index: FlatIndex,
}

impl std::fmt::Debug for Retriever {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Retriever")
            .field("model", &self.embedder.name())
            .field("documents", &self.documents.len())
            .finish_non_exhaustive()
    }
}

impl Retriever {
    /// Embeds `texts` and builds the search index over them.
    pub async fn build(
        embedder: Arc<dyn TextEmbedder>,
        texts: &[String],
    ) -> Result<Self, BuildError> {
        let embeddings = embedder
            .embed_many(texts)
            .await
            .map_err(BuildError::Embed)?;
        let index = FlatIndex::build(embedder.dimension(), &embeddings)?;

        let documents = texts
            .iter()
            .zip(embeddings)
            .map(|(text, embedding)| Document {
                text: text.clone(),
                embedding,
            })
            .collect();

        Ok(Self {
            embedder,
            documents,
            index,
        })
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn dimension(&self) -> usize {
        self.index.dimension()
    }

    /// Embeds `query` and returns the `top_k` nearest document texts, best
    /// first. The query is re-embedded on every call; nothing is cached.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Result<Vec<String>, ApiError> {
        if top_k == 0 {
            return Err(ApiError::BadRequest("top_k must be at least 1".to_string()));
        }

        let embedding = self.embedder.embed(query).await?;
        let hits = self
            .index
            .search(&embedding, top_k)
            .map_err(ApiError::internal)?;

        Ok(hits
            .into_iter()
            .map(|hit| self.documents[hit.index].text.clone())
            .collect())
    }
}
