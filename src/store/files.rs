use crate::domain::{Varietal, Wine, Winery};
use crate::error::{CellarError, Result};
use crate::store::integrity;
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const VARIETALS_FILE: &str = "varietals.json";
pub const WINERIES_FILE: &str = "wineries.json";
pub const WINES_FILE: &str = "wines.json";

/// The three collections, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub varietals: Vec<Varietal>,
    pub wineries: Vec<Winery>,
    pub wines: Vec<Wine>,
}

/// Location of the flat data files, one JSON array per entity type.
#[derive(Debug, Clone)]
pub struct DataFiles {
    dir: PathBuf,
}

impl DataFiles {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn varietals_path(&self) -> PathBuf {
        self.dir.join(VARIETALS_FILE)
    }

    pub fn wineries_path(&self) -> PathBuf {
        self.dir.join(WINERIES_FILE)
    }

    pub fn wines_path(&self) -> PathBuf {
        self.dir.join(WINES_FILE)
    }

    /// Read all three files and check referential integrity.
    pub fn load(&self) -> Result<Dataset> {
        let dataset = Dataset {
            varietals: read_collection(&self.varietals_path())?,
            wineries: read_collection(&self.wineries_path())?,
            wines: read_collection(&self.wines_path())?,
        };
        integrity::validate(&dataset)?;

        info!(
            dir = %self.dir.display(),
            varietals = dataset.varietals.len(),
            wineries = dataset.wineries.len(),
            wines = dataset.wines.len(),
            "Loaded dataset"
        );
        Ok(dataset)
    }

    /// Rewrite `wines.json` in place. Not atomic: a crash mid-write can truncate the file.
    pub async fn write_wines(&self, wines: &[Wine]) -> Result<()> {
        let path = self.wines_path();
        let body = serde_json::to_string_pretty(wines)?;
        tokio::fs::write(&path, body).await?;
        debug!("Wrote {} wines to {}", wines.len(), path.display());
        Ok(())
    }

    /// Write a whole dataset out, creating the directory when needed.
    pub fn write_dataset(&self, dataset: &Dataset) -> Result<()> {
        fs::create_dir_all(&self.dir)?;
        fs::write(
            self.varietals_path(),
            serde_json::to_string_pretty(&dataset.varietals)?,
        )?;
        fs::write(
            self.wineries_path(),
            serde_json::to_string_pretty(&dataset.wineries)?,
        )?;
        fs::write(
            self.wines_path(),
            serde_json::to_string_pretty(&dataset.wines)?,
        )?;
        Ok(())
    }
}

fn read_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let content = fs::read_to_string(path).map_err(|e| CellarError::DataFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    serde_json::from_str(&content).map_err(|e| CellarError::DataFile {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::fixtures::sample_dataset;
    use tempfile::tempdir;

    #[test]
    fn test_load_preserves_file_order() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path());
        let dataset = sample_dataset();
        files.write_dataset(&dataset).unwrap();

        let loaded = files.load().unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_missing_file_names_the_path() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path());

        let err = files.load().unwrap_err();
        match err {
            CellarError::DataFile { path, .. } => {
                assert!(path.ends_with(VARIETALS_FILE));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_malformed_json_is_reported() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path());
        files.write_dataset(&sample_dataset()).unwrap();
        fs::write(files.wineries_path(), "[{\"id\": 1").unwrap();

        let err = files.load().unwrap_err();
        assert!(err.to_string().contains(WINERIES_FILE));
    }

    #[tokio::test]
    async fn test_write_wines_round_trips() {
        let dir = tempdir().unwrap();
        let files = DataFiles::new(dir.path());
        let mut dataset = sample_dataset();
        files.write_dataset(&dataset).unwrap();

        dataset.wines.truncate(1);
        files.write_wines(&dataset.wines).await.unwrap();

        let loaded = files.load().unwrap();
        assert_eq!(loaded.wines.len(), 1);
    }
}
