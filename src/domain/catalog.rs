//! In-memory catalog of known question variants.

use std::collections::HashMap;

use thiserror::Error;

use crate::processing::embedding::{most_similar, normalize_embedding};
use crate::processing::normalize::normalize;

#[derive(Debug, Error, PartialEq)]
pub enum CatalogError {
    #[error("catalog has no entries")]
    Empty,
    #[error("variant {0:?} has no mapped response")]
    MissingResponse(String),
    #[error("catalog has {entries} entries but {rows} embedding rows")]
    RowCountMismatch { entries: usize, rows: usize },
    #[error("embedding row {row} has dimension {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// One recognized phrasing of a question and the answer it maps to.
#[derive(Clone, Debug, PartialEq)]
pub struct CatalogEntry {
    pub variant: String,
    /// `variant` run through the input normalizer, used for lexical scoring.
    pub normalized: String,
    pub response: String,
}

impl CatalogEntry {
    pub fn new(variant: impl Into<String>, response: impl Into<String>) -> Self {
        let variant = variant.into();
        Self {
            normalized: normalize(&variant),
            variant,
            response: response.into(),
        }
    }
}

/// Ordered, non-empty list of catalog entries.
///
/// Entry order is the tie-break order for every best-match search.
#[derive(Clone, Debug)]
pub struct Catalog {
    entries: Vec<CatalogEntry>,
}

impl Catalog {
    pub fn new(entries: Vec<CatalogEntry>) -> Result<Self, CatalogError> {
        if entries.is_empty() {
            return Err(CatalogError::Empty);
        }
        Ok(Self { entries })
    }

    /// Pair each variant with its response, keeping variant order.
    pub fn from_variants<I, S>(
        variants: I,
        responses: &HashMap<String, String>,
    ) -> Result<Self, CatalogError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries = variants
            .into_iter()
            .map(|variant| {
                let variant = variant.into();
                match responses.get(&variant) {
                    Some(response) => Ok(CatalogEntry::new(variant.clone(), response.clone())),
                    None => Err(CatalogError::MissingResponse(variant)),
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        Self::new(entries)
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Highest-scoring entry; the earliest one wins ties.
    pub fn best_by<F>(&self, mut score: F) -> (&CatalogEntry, f64)
    where
        F: FnMut(&CatalogEntry) -> f64,
    {
        let (first, rest) = self
            .entries
            .split_first()
            .expect("catalog is never empty");

        let initial = (first, score(first));
        rest.iter()
            .fold(initial, |best, entry| {
                let value = score(entry);
                if value > best.1 { (entry, value) } else { best }
            })
    }
}

/// Catalog with one unit-length embedding row per entry.
#[derive(Clone, Debug)]
pub struct EmbeddedCatalog {
    catalog: Catalog,
    embeddings: Vec<Vec<f32>>,
    dimension: usize,
}

impl EmbeddedCatalog {
    pub fn new(catalog: Catalog, embeddings: Vec<Vec<f32>>) -> Result<Self, CatalogError> {
        if embeddings.len() != catalog.len() {
            return Err(CatalogError::RowCountMismatch {
                entries: catalog.len(),
                rows: embeddings.len(),
            });
        }

        let dimension = embeddings.first().map(Vec::len).unwrap_or_default();
        if let Some((row, found)) = embeddings
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|(_, len)| *len != dimension || *len == 0)
        {
            return Err(CatalogError::RaggedRow {
                row,
                found,
                expected: dimension,
            });
        }

        let embeddings = embeddings
            .iter()
            .map(|row| normalize_embedding(row))
            .collect();

        Ok(Self {
            catalog,
            embeddings,
            dimension,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Entry whose row has the highest cosine similarity to a unit-length
    /// `query`; the earliest one wins ties.
    pub fn most_similar(&self, query: &[f32]) -> (&CatalogEntry, f32) {
        let (index, similarity) =
            most_similar(query, self.embeddings.iter().map(Vec::as_slice))
                .expect("catalog is never empty");
        (&self.catalog.entries[index], similarity)
    }
}
