use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::domain::catalog::{Catalog, CatalogError, EmbeddedCatalog};
use crate::repository::{
    EMBEDDINGS_FILE, FIELD_MAP_FILE, FIELD_VARIANTS_FILE, FileRepository, FuzzyCatalogReader,
    QUERY_LIST_FILE, RepositoryError, RepositoryResult, SemanticCatalogReader,
    VARIANT_RESPONSES_FILE,
};

impl SemanticCatalogReader for FileRepository {
    fn load_embedded_catalog(&self) -> RepositoryResult<EmbeddedCatalog> {
        let variants: Vec<String> = read_json(&self.path(QUERY_LIST_FILE))?;
        let responses: HashMap<String, String> = read_json(&self.path(VARIANT_RESPONSES_FILE))?;

        // Rows stay aligned with the list, duplicates included.
        let catalog = Catalog::from_variants(variants, &responses)?;
        let embeddings = read_embeddings(&self.path(EMBEDDINGS_FILE), catalog.len())?;

        Ok(EmbeddedCatalog::new(catalog, embeddings)?)
    }
}

impl FuzzyCatalogReader for FileRepository {
    fn load_fuzzy_catalog(&self) -> RepositoryResult<Catalog> {
        let variants: Vec<String> = read_json(&self.path(FIELD_VARIANTS_FILE))?;
        let responses: HashMap<String, String> = read_json(&self.path(FIELD_MAP_FILE))?;

        let mut seen = HashSet::new();
        let variants = variants
            .into_iter()
            .filter(|variant| seen.insert(variant.clone()));

        Ok(Catalog::from_variants(variants, &responses)?)
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> RepositoryResult<T> {
    let bytes = fs::read(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_slice(&bytes).map_err(|source| RepositoryError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Split a raw `f32` blob into `rows` equally sized vectors.
fn read_embeddings(path: &Path, rows: usize) -> RepositoryResult<Vec<Vec<f32>>> {
    let blob = fs::read(path).map_err(|source| RepositoryError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    if blob.len() % size_of::<f32>() != 0 {
        return Err(RepositoryError::TruncatedEmbeddings {
            path: path.to_path_buf(),
            bytes: blob.len(),
        });
    }

    // Copy into an f32 buffer; the byte buffer carries no alignment guarantee.
    let mut values = vec![0.0_f32; blob.len() / size_of::<f32>()];
    bytemuck::cast_slice_mut::<f32, u8>(&mut values).copy_from_slice(&blob);

    if rows == 0 {
        return Err(CatalogError::Empty.into());
    }
    if values.is_empty() || values.len() % rows != 0 {
        return Err(RepositoryError::RaggedEmbeddings {
            path: path.to_path_buf(),
            values: values.len(),
            rows,
        });
    }

    let dimension = values.len() / rows;
    Ok(values.chunks_exact(dimension).map(<[f32]>::to_vec).collect())
}
