use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use fastembed::{InitOptions, TextEmbedding};
use thiserror::Error;

use crate::models::config::EmbeddingModelKind;

#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to initialize embedding model: {0}")]
    Init(String),
    #[error("failed to generate embedding: {0}")]
    Inference(String),
    #[error("embedding model returned no vector")]
    Empty,
    #[error("embedding dimension {found} does not match catalog dimension {expected}")]
    DimensionMismatch { expected: usize, found: usize },
}

/// Turns text into a dense vector.
pub trait Embedder: Send + Sync {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError>;
}

/// [`Embedder`] backed by a local `fastembed` ONNX model.
///
/// The model session needs exclusive access per call, so it sits behind a
/// mutex and concurrent requests take turns.
pub struct FastEmbedder {
    model: Mutex<TextEmbedding>,
}

impl FastEmbedder {
    /// Load (downloading on first use) the given model.
    pub fn try_new(
        kind: EmbeddingModelKind,
        cache_dir: Option<&Path>,
    ) -> Result<Self, EmbeddingError> {
        let mut options = InitOptions::new(kind.model());
        if let Some(dir) = cache_dir {
            options = options.with_cache_dir(dir.to_path_buf());
        }

        let model = TextEmbedding::try_new(options)
            .map_err(|error| EmbeddingError::Init(format!("{error:?}")))?;

        Ok(Self {
            model: Mutex::new(model),
        })
    }
}

impl Embedder for FastEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>, EmbeddingError> {
        let mut model = lock_model(&self.model);

        model
            .embed(vec![text], None)
            .map_err(|error| EmbeddingError::Inference(format!("{error:?}")))?
            .into_iter()
            .next()
            .ok_or(EmbeddingError::Empty)
    }
}

/// Take the model lock even if an earlier call panicked while holding it.
///
/// The session holds no state between calls, so a poisoned lock is still
/// safe to use.
fn lock_model<T>(model: &Mutex<T>) -> MutexGuard<'_, T> {
    model.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Normalize a vector to unit length.
///
/// Returns the original vector when the norm is zero.
pub(crate) fn normalize_embedding(vec: &[f32]) -> Vec<f32> {
    let norm = vec.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm == 0.0 {
        vec.to_vec()
    } else {
        vec.iter().map(|x| x / norm).collect()
    }
}

/// Find the row with the highest cosine similarity to `query`.
///
/// Both the query and the rows must already be unit length, so the dot
/// product is the cosine. Ties go to the earliest row. Returns `None` when
/// there are no rows.
pub(crate) fn most_similar<'a, I>(query: &[f32], rows: I) -> Option<(usize, f32)>
where
    I: IntoIterator<Item = &'a [f32]>,
{
    rows.into_iter()
        .map(|row| row.iter().zip(query).map(|(a, b)| a * b).sum::<f32>())
        .enumerate()
        .fold(None, |best, (index, similarity)| match best {
            Some((_, top)) if similarity <= top => best,
            _ => Some((index, similarity)),
        })
}
