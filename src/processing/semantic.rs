use crate::domain::catalog::EmbeddedCatalog;
use crate::domain::reply::SemanticReply;
use crate::models::config::MatchThresholds;
use crate::processing::embedding::{Embedder, EmbeddingError, normalize_embedding};
use crate::processing::fuzzy::ratio;

/// Text embedded at startup to check the model against the catalog rows.
const PROBE_TEXT: &str = "ping";

/// Embedding-similarity matcher with a fuzzy-ratio rescue.
pub struct SemanticMatcher {
    catalog: EmbeddedCatalog,
    embedder: Box<dyn Embedder>,
    thresholds: MatchThresholds,
}

impl SemanticMatcher {
    /// Fails when the model's output dimension differs from the catalog's.
    pub fn new(
        catalog: EmbeddedCatalog,
        embedder: Box<dyn Embedder>,
        thresholds: MatchThresholds,
    ) -> Result<Self, EmbeddingError> {
        let probe = embedder.embed(PROBE_TEXT)?;
        if probe.len() != catalog.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: catalog.dimension(),
                found: probe.len(),
            });
        }

        Ok(Self {
            catalog,
            embedder,
            thresholds,
        })
    }

    /// Answer already-normalized input.
    pub fn reply(&self, normalized: &str) -> Result<SemanticReply, EmbeddingError> {
        let query = normalize_embedding(&self.embedder.embed(normalized)?);
        if query.len() != self.catalog.dimension() {
            return Err(EmbeddingError::DimensionMismatch {
                expected: self.catalog.dimension(),
                found: query.len(),
            });
        }

        let (entry, similarity) = self.catalog.most_similar(&query);
        let fuzz_score = ratio(normalized, &entry.normalized);

        if is_confident(similarity, fuzz_score, &self.thresholds) {
            Ok(SemanticReply::matched(
                &entry.variant,
                similarity,
                fuzz_score,
                &entry.response,
            ))
        } else {
            log::debug!(
                "Low confidence for {normalized:?}: closest={:?}, similarity={similarity:.3}, fuzz_score={fuzz_score:.2}",
                entry.variant
            );
            Ok(SemanticReply::fallback())
        }
    }
}

/// Either score clearing its threshold is enough; both comparisons are strict.
pub(crate) fn is_confident(similarity: f32, fuzz_score: f64, thresholds: &MatchThresholds) -> bool {
    similarity > thresholds.similarity || fuzz_score > thresholds.fuzz
}
