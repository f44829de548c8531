use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::catalog::{Catalog, CatalogError, EmbeddedCatalog};

pub mod catalog;

/// Variant strings for the semantic catalog, in embedding row order.
pub const QUERY_LIST_FILE: &str = "query_list.json";
/// Variant -> response map for the semantic catalog.
pub const VARIANT_RESPONSES_FILE: &str = "variant_to_response.json";
/// Raw native-endian `f32` rows aligned with [`QUERY_LIST_FILE`].
pub const EMBEDDINGS_FILE: &str = "field_embeddings.bin";
/// Variant strings for the fuzzy catalog.
pub const FIELD_VARIANTS_FILE: &str = "field_variants.json";
/// Variant -> response map for the fuzzy catalog.
pub const FIELD_MAP_FILE: &str = "field_map.json";

pub type RepositoryResult<T> = Result<T, RepositoryError>;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse {}: {source}", .path.display())]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("{} holds {bytes} bytes, not a whole number of f32 values", .path.display())]
    TruncatedEmbeddings { path: PathBuf, bytes: usize },
    #[error("{} holds {values} values, which do not split into {rows} rows", .path.display())]
    RaggedEmbeddings {
        path: PathBuf,
        values: usize,
        rows: usize,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
}

pub trait SemanticCatalogReader {
    fn load_embedded_catalog(&self) -> RepositoryResult<EmbeddedCatalog>;
}

pub trait FuzzyCatalogReader {
    fn load_fuzzy_catalog(&self) -> RepositoryResult<Catalog>;
}

/// Reads catalog tables from a data directory.
pub struct FileRepository {
    data_dir: PathBuf,
}

impl FileRepository {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    fn path(&self, file_name: &str) -> PathBuf {
        self.data_dir.join(file_name)
    }
}
