use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::{Question, Stage};

use super::mapping::decode_pool;
use crate::repository::{PoolLoader, StageResources, StorageError};

/// Loads stage pools from JSON files in a local directory.
#[derive(Debug, Clone)]
pub struct JsonDirLoader {
    dir: PathBuf,
    resources: StageResources,
}

impl JsonDirLoader {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            resources: StageResources::default(),
        }
    }

    #[must_use]
    pub fn with_resources(mut self, resources: StageResources) -> Self {
        self.resources = resources;
        self
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    #[must_use]
    pub fn path_for(&self, stage: Stage) -> PathBuf {
        self.dir.join(self.resources.resource_for(stage))
    }
}

#[async_trait]
impl PoolLoader for JsonDirLoader {
    async fn load_pool(&self, stage: Stage) -> Result<Vec<Question>, StorageError> {
        let path = self.path_for(stage);
        tracing::debug!(path = %path.display(), %stage, "reading question pool");
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StorageError::NotFound {
                    resource: path.display().to_string(),
                });
            }
            Err(err) => return Err(err.into()),
        };
        decode_pool(&bytes)
    }
}
