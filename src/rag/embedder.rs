//! Text embedding behind a trait seam so tests can substitute stubs.

use std::path::Path;
use std::sync::Mutex;

use anyhow::{anyhow, bail, Context, Result};
use async_trait::async_trait;
use ndarray::{Array2, Axis};
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use tokenizers::Tokenizer;

use crate::core::errors::ApiError;

/// Output dimension of the bundled sentence-transformer model.
pub const EMBEDDING_DIM: usize = 384;

/// Maps text to fixed-dimension dense vectors.
///
/// Implementations must be deterministic: embedding the same text twice
/// yields the same vector.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    /// Short model identifier for logs and the health endpoint.
    fn name(&self) -> &str;

    fn dimension(&self) -> usize;

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError>;

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ApiError>;
}

/// all-MiniLM-L6-v2 running on ONNX Runtime.
///
/// Token-level model outputs are mean-pooled with the attention mask,
/// matching the sentence-transformers pipeline for this model. Padding
/// positions carry zero weight, so a text embeds to the same vector no
/// matter which batch it rides in.
pub struct OnnxEmbedder {
    session: Mutex<Session>,
    tokenizer: Tokenizer,
    model_name: String,
}

impl std::fmt::Debug for OnnxEmbedder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxEmbedder")
            .field("model_name", &self.model_name)
            .field("dimension", &EMBEDDING_DIM)
            .finish_non_exhaustive()
    }
}

impl OnnxEmbedder {
    /// Loads the model from `model_dir`, which must contain `model.onnx`
    /// and `tokenizer.json`. Runs one probe inference so a wrong or broken
    /// model fails here instead of on the first chat turn.
    pub fn load(model_dir: &Path) -> Result<Self> {
        let model_path = model_dir.join("model.onnx");
        let tokenizer_path = model_dir.join("tokenizer.json");

        if !model_path.exists() {
            bail!("model file not found: {}", model_path.display());
        }
        if !tokenizer_path.exists() {
            bail!("tokenizer file not found: {}", tokenizer_path.display());
        }

        let session = Session::builder()
            .context("Failed to create session builder")?
            .with_execution_providers([CPUExecutionProvider::default().build()])
            .context("Failed to set CPU execution provider")?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .context("Failed to set optimization level")?
            .with_intra_threads(4)
            .context("Failed to set intra threads")?
            .commit_from_file(&model_path)
            .with_context(|| format!("Failed to load ONNX model from {}", model_path.display()))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| anyhow!("Failed to load tokenizer: {e}"))?;

        let embedder = Self {
            session: Mutex::new(session),
            tokenizer,
            model_name: "all-MiniLM-L6-v2".to_string(),
        };

        embedder
            .infer_batch(&["startup probe"])
            .context("Model validation inference failed")?;

        Ok(embedder)
    }

    fn infer_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let encodings = texts
            .iter()
            .map(|text| {
                self.tokenizer
                    .encode(*text, true)
                    .map_err(|e| anyhow!("Tokenization failed: {e}"))
            })
            .collect::<Result<Vec<_>>>()?;

        let batch = texts.len();
        let max_len = encodings
            .iter()
            .map(|enc| enc.get_ids().len())
            .max()
            .unwrap_or(0);

        let mut input_ids = Vec::with_capacity(batch * max_len);
        let mut attention_mask = Vec::with_capacity(batch * max_len);
        let mut token_type_ids = Vec::with_capacity(batch * max_len);

        for encoding in &encodings {
            let ids = encoding.get_ids();
            let mask = encoding.get_attention_mask();

            input_ids.extend(ids.iter().map(|&id| id as i64));
            attention_mask.extend(mask.iter().map(|&m| m as i64));
            token_type_ids.extend(std::iter::repeat(0i64).take(ids.len()));

            let padding = max_len - ids.len();
            input_ids.extend(std::iter::repeat(0i64).take(padding));
            attention_mask.extend(std::iter::repeat(0i64).take(padding));
            token_type_ids.extend(std::iter::repeat(0i64).take(padding));
        }

        let mask_for_pooling = attention_mask.clone();

        let input_ids = Array2::from_shape_vec((batch, max_len), input_ids)
            .context("Failed to shape input_ids")?;
        let attention_mask = Array2::from_shape_vec((batch, max_len), attention_mask)
            .context("Failed to shape attention_mask")?;
        let token_type_ids = Array2::from_shape_vec((batch, max_len), token_type_ids)
            .context("Failed to shape token_type_ids")?;

        let input_ids_value = Value::from_array(input_ids).context("input_ids tensor")?;
        let attention_value = Value::from_array(attention_mask).context("attention_mask tensor")?;
        let token_type_value = Value::from_array(token_type_ids).context("token_type_ids tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("embedding session lock poisoned"))?;
        let outputs = session.run(ort::inputs![
            "input_ids" => input_ids_value,
            "attention_mask" => attention_value,
            "token_type_ids" => token_type_value
        ])?;

        let token_embeddings = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        let shape = token_embeddings.shape();
        if shape.len() != 3 || shape[2] != EMBEDDING_DIM {
            bail!(
                "model output has shape {:?}, expected [batch, seq, {}]",
                shape,
                EMBEDDING_DIM
            );
        }

        let mut embeddings = Vec::with_capacity(batch);
        for item in 0..batch {
            let rows = token_embeddings.index_axis(Axis(0), item);
            let mask = &mask_for_pooling[item * max_len..(item + 1) * max_len];

            let mut pooled = vec![0.0f32; EMBEDDING_DIM];
            let mut mask_total = 0.0f32;
            for (pos, row) in rows.axis_iter(Axis(0)).enumerate() {
                let weight = mask[pos] as f32;
                mask_total += weight;
                for (value, slot) in row.iter().zip(pooled.iter_mut()) {
                    *slot += value * weight;
                }
            }
            for slot in &mut pooled {
                *slot /= mask_total.max(1e-9);
            }

            embeddings.push(pooled);
        }

        Ok(embeddings)
    }
}

#[async_trait]
impl TextEmbedder for OnnxEmbedder {
    fn name(&self) -> &str {
        &self.model_name
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, ApiError> {
        let mut batch = self.infer_batch(&[text]).map_err(ApiError::internal)?;
        batch
            .pop()
            .ok_or_else(|| ApiError::Internal("embedding batch came back empty".to_string()))
    }

    async fn embed_many(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, ApiError> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.infer_batch(&refs).map_err(ApiError::internal)
    }
}
