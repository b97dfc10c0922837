use std::sync::Arc;

use tokio::sync::Mutex;

use crate::chat::{ChatEngine, SessionState};
use crate::core::config::{AppConfig, AppPaths};
use crate::llm::{CompletionProvider, GroqProvider};
use crate::rag::retriever::BuildError;
use crate::rag::{corpus, OnnxEmbedder, Retriever, TextEmbedder};

pub mod error;

use error::InitializationError;

/// Global application state shared across all routes.
///
/// Contains references to:
/// - Configuration and paths
/// - The embedding model and the retriever built over the corpus
/// - The chat engine and the single browser session
#[derive(Clone)]
pub struct AppState {
    pub paths: Arc<AppPaths>,
    pub config: AppConfig,
    pub embedder: Arc<dyn TextEmbedder>,
    pub retriever: Arc<Retriever>,
    pub engine: Arc<ChatEngine>,
    pub session: Arc<Mutex<SessionState>>,
}

impl AppState {
    /// Initializes the application state.
    ///
    /// This process includes:
    /// 1. Resolving paths and loading configuration (the API key must be set)
    /// 2. Loading the embedding model and running its validation inference
    /// 3. Embedding the built-in corpus and building the vector index
    /// 4. Wiring the completion client and the chat engine
    pub async fn initialize() -> Result<Arc<Self>, InitializationError> {
        let paths = Arc::new(AppPaths::new());

        let config = AppConfig::load(&paths).map_err(InitializationError::Config)?;

        let embedder: Arc<dyn TextEmbedder> = Arc::new(
            OnnxEmbedder::load(&config.model_dir).map_err(InitializationError::ModelUnavailable)?,
        );
        tracing::info!(
            model = embedder.name(),
            dimension = embedder.dimension(),
            "embedding model ready"
        );

        let retriever = Arc::new(
            Retriever::build(embedder.clone(), &corpus::documents())
                .await
                .map_err(|e| match e {
                    e @ BuildError::Index(_) => InitializationError::DimensionMismatch(e.into()),
                    e @ BuildError::Embed(_) => InitializationError::Corpus(e.into()),
                })?,
        );
        tracing::info!(documents = retriever.len(), "vector index built");

        let provider: Arc<dyn CompletionProvider> = Arc::new(
            GroqProvider::new(&config.completion, &config.groq_api_key)
                .map_err(InitializationError::Completion)?,
        );

        let engine = Arc::new(ChatEngine::new(
            provider,
            retriever.clone(),
            config.retrieval.top_k,
        ));

        Ok(Arc::new(AppState {
            paths,
            config,
            embedder,
            retriever,
            engine,
            session: Arc::new(Mutex::new(SessionState::new())),
        }))
    }

    /// Wires a state from pre-built parts (for testing).
    pub fn with_parts(
        config: AppConfig,
        embedder: Arc<dyn TextEmbedder>,
        retriever: Arc<Retriever>,
        provider: Arc<dyn CompletionProvider>,
    ) -> Arc<Self> {
        let engine = Arc::new(ChatEngine::new(
            provider,
            retriever.clone(),
            config.retrieval.top_k,
        ));

        Arc::new(AppState {
            paths: Arc::new(AppPaths::new()),
            config,
            embedder,
            retriever,
            engine,
            session: Arc::new(Mutex::new(SessionState::new())),
        })
    }
}
