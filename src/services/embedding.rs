use std::sync::Mutex;

use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};

use crate::error::{AppError, AppResult};

/// Text embedding abstraction
///
/// Embedding computation is a pure function of text, so implementations are
/// shared read-only across concurrent callers. The trait keeps the scoring
/// engine testable without loading a model.
#[cfg_attr(test, mockall::automock)]
pub trait TextEmbedder: Send + Sync {
    /// Embeds each input text into a dense vector. Output order matches
    /// input order.
    fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;
}

/// Sentence embedder backed by fastembed's all-MiniLM-L6-v2
///
/// The model is loaded once at process start and held behind a shared
/// handle for the process lifetime.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedder {
    pub fn new() -> AppResult<Self> {
        let model = TextEmbedding::try_new(InitOptions::new(EmbeddingModel::AllMiniLML6V2))
            .map_err(|e| AppError::Embedding(format!("Failed to load embedding model: {}", e)))?;

        tracing::info!(model = "all-MiniLM-L6-v2", "Embedding model loaded");

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl TextEmbedder for FastEmbedder {
    fn embed(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        let mut model = self
            .model
            .lock()
            .map_err(|_| AppError::Internal("Embedding model lock poisoned".to_string()))?;

        model
            .embed(texts.to_vec(), None)
            .map_err(|e| AppError::Embedding(e.to_string()))
    }
}

/// Cosine similarity between two dense vectors; 0 when either norm is 0
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| (*x as f64) * (*y as f64)).sum();
    let norm_a: f64 = a.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = b.iter().map(|x| (*x as f64).powi(2)).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}
