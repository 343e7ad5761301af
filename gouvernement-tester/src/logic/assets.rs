use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use gouvernement_game::{BundledData, DataLoader, Datasets};
use thiserror::Error;

const DATASET_FILES: [&str; 4] = ["kpis.json", "cards.json", "objectives.json", "difficulty.json"];

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid dataset in {dir}: {source}")]
    Json {
        dir: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the four datasets from a directory laid out like `assets/data`.
#[derive(Debug, Clone)]
pub struct DirectoryData {
    dir: PathBuf,
}

impl DirectoryData {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn read(&self, name: &str) -> Result<String, AssetError> {
        let path = self.dir.join(name);
        fs::read_to_string(&path).map_err(|source| AssetError::Io { path, source })
    }
}

impl DataLoader for DirectoryData {
    type Error = AssetError;

    fn load_datasets(&self) -> Result<Datasets, Self::Error> {
        let [kpis, cards, objectives, difficulty] = DATASET_FILES.map(|name| self.read(name));
        Datasets::from_json_parts(&kpis?, &cards?, &objectives?, &difficulty?).map_err(|source| {
            AssetError::Json {
                dir: self.dir.clone(),
                source,
            }
        })
    }
}

/// Reference data shared by every simulated run.
#[derive(Debug, Clone)]
pub struct TesterAssets {
    pub datasets: Arc<Datasets>,
}

impl TesterAssets {
    /// Datasets from `dir`, or the engine's bundled copy when `dir` is `None`.
    pub fn load(dir: Option<&Path>) -> anyhow::Result<Self> {
        let datasets = match dir {
            Some(dir) => DirectoryData::new(dir).load_datasets()?,
            None => BundledData.load_datasets()?,
        };
        log::debug!(
            "loaded {} kpis, {} cards, {} objectives",
            datasets.kpis.kpis.len(),
            datasets.cards.cards.len(),
            datasets.objectives.objectives.len()
        );
        Ok(Self {
            datasets: Arc::new(datasets),
        })
    }
}
