use crate::domain::catalog::Catalog;
use crate::domain::reply::FuzzyReply;
use crate::processing::fuzzy::token_set_ratio;

/// Token-set-ratio matcher over the catalog variants.
pub struct FuzzyMatcher {
    catalog: Catalog,
    threshold: f64,
}

impl FuzzyMatcher {
    /// `threshold` is inclusive: a best score equal to it is a match.
    pub fn new(catalog: Catalog, threshold: f64) -> Self {
        Self { catalog, threshold }
    }

    /// Answer already-normalized input.
    pub fn reply(&self, normalized: &str) -> FuzzyReply {
        let (entry, score) = self
            .catalog
            .best_by(|entry| token_set_ratio(normalized, &entry.normalized));

        if score >= self.threshold {
            FuzzyReply::matched(&entry.variant, score, &entry.response)
        } else {
            log::debug!(
                "Low confidence for {normalized:?}: suggesting {:?} at {score:.2}",
                entry.variant
            );
            FuzzyReply::fallback(&entry.variant, score)
        }
    }
}
