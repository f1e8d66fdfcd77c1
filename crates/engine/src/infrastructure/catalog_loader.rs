//! Catalog file loading.

use std::path::Path;

use serde::Deserialize;
use skillquest_domain::{Catalog, Course};

/// On-disk catalog format: `{ "courses": [ ... ] }`.
#[derive(Debug, Deserialize)]
pub struct CatalogFile {
    pub courses: Vec<Course>,
}

#[derive(Debug, thiserror::Error)]
pub enum CatalogLoadError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] skillquest_domain::DomainError),
}

pub struct CatalogLoader;

impl CatalogLoader {
    pub async fn load_file(path: &Path) -> Result<Catalog, CatalogLoadError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|source| CatalogLoadError::Io {
                    path: path.display().to_string(),
                    source,
                })?;
        let catalog = Self::from_json(&contents)?;
        tracing::info!(
            path = %path.display(),
            courses = catalog.courses().len(),
            levels = catalog.level_count(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    pub fn from_json(json: &str) -> Result<Catalog, CatalogLoadError> {
        let file: CatalogFile = serde_json::from_str(json)?;
        Ok(Catalog::new(file.courses)?)
    }
}
