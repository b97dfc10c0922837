use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to load configuration: {0}")]
    Config(#[source] anyhow::Error),

    #[error("Failed to load the embedding model: {0}")]
    ModelUnavailable(#[source] anyhow::Error),

    #[error("Failed to embed the document corpus: {0}")]
    Corpus(#[source] anyhow::Error),

    #[error("Failed to build the vector index: {0}")]
    DimensionMismatch(#[source] anyhow::Error),

    #[error("Failed to initialize the completion service: {0}")]
    Completion(#[source] anyhow::Error),
}
