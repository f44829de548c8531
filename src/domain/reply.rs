//! Reply bodies returned by the matchers.

use serde::Serialize;

/// Text returned when the semantic matcher is not confident.
pub const SEMANTIC_FALLBACK: &str =
    "I’m not sure how to answer that. Could you rephrase or ask something else?";

/// Outcome of the embedding-based matcher, serialized flat.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SemanticReply {
    Matched {
        query_matched: String,
        similarity: f64,
        fuzz_score: f64,
        response: String,
    },
    Fallback {
        response: String,
    },
}

impl SemanticReply {
    pub fn matched(variant: &str, similarity: f32, fuzz_score: f64, response: &str) -> Self {
        SemanticReply::Matched {
            query_matched: variant.to_string(),
            similarity: round_to(f64::from(similarity), 3),
            fuzz_score,
            response: response.to_string(),
        }
    }

    pub fn fallback() -> Self {
        SemanticReply::Fallback {
            response: SEMANTIC_FALLBACK.to_string(),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_match(&self) -> bool {
        matches!(self, SemanticReply::Matched { .. })
    }

    #[cfg(test)]
    pub(crate) fn response(&self) -> &str {
        match self {
            SemanticReply::Matched { response, .. } | SemanticReply::Fallback { response } => {
                response
            }
        }
    }
}

/// Outcome of the token-set matcher. The fallback still names the closest
/// variant so the user can rephrase toward it.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FuzzyReply {
    Matched {
        matched: String,
        fuzzy_score: f64,
        response: String,
    },
    Fallback {
        suggestion: String,
        fuzzy_score: f64,
        response: String,
    },
}

impl FuzzyReply {
    pub fn matched(variant: &str, score: f64, response: &str) -> Self {
        FuzzyReply::Matched {
            matched: variant.to_string(),
            fuzzy_score: round_to(score, 2),
            response: response.to_string(),
        }
    }

    pub fn fallback(suggestion: &str, score: f64) -> Self {
        FuzzyReply::Fallback {
            suggestion: suggestion.to_string(),
            fuzzy_score: round_to(score, 2),
            response: format!(
                "Sorry, I couldn't find a confident answer. Did you mean \"{suggestion}\"?"
            ),
        }
    }

    #[cfg(test)]
    pub(crate) fn is_match(&self) -> bool {
        matches!(self, FuzzyReply::Matched { .. })
    }

    #[cfg(test)]
    pub(crate) fn response(&self) -> &str {
        match self {
            FuzzyReply::Matched { response, .. } | FuzzyReply::Fallback { response, .. } => {
                response
            }
        }
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
