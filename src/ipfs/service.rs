//! File registry over the pinning service.

use std::sync::Arc;
use thiserror::Error;
use uuid::Uuid;

use crate::ipfs::pinata::{FileContent, PinningError, PinningProvider};
use crate::storage::{FileRegistry, StorageError};

#[derive(Debug, Error)]
pub enum FileError {
    #[error("No data provided")]
    NoData,

    #[error("No file hash to lookup")]
    MissingHash,

    #[error("No file matching provided hash")]
    NotFound,

    #[error("pinning service unavailable: {0}")]
    PinningUnavailable(#[from] PinningError),

    #[error("storage unavailable: {0}")]
    StorageUnavailable(#[from] StorageError),
}

#[derive(Clone)]
pub struct FileService {
    pinning: Arc<dyn PinningProvider>,
    registry: Arc<dyn FileRegistry>,
}

impl FileService {
    pub fn new(pinning: Arc<dyn PinningProvider>, registry: Arc<dyn FileRegistry>) -> Self {
        Self { pinning, registry }
    }

    /// Pin `data` as a uniquely named text file and register its CID.
    pub async fn add_file(&self, data: Option<&str>) -> Result<String, FileError> {
        let data = data.filter(|d| !d.is_empty()).ok_or(FileError::NoData)?;

        let name = Uuid::new_v4().to_string();
        let hash = self.pinning.pin_text(&name, data.to_string()).await?;
        self.registry.register_file(&hash).await?;

        tracing::info!(hash = %hash, bytes = data.len(), "File pinned");
        Ok(hash)
    }

    /// Content of a CID previously pinned through this gateway.
    pub async fn get_file(&self, hash: &str) -> Result<FileContent, FileError> {
        if hash.trim().is_empty() {
            return Err(FileError::MissingHash);
        }
        if self.registry.find_file(hash).await?.is_none() {
            return Err(FileError::NotFound);
        }

        match self.pinning.fetch(hash).await? {
            Some(content) => Ok(content),
            None => {
                tracing::error!(hash = %hash, "File exists in db but not found in IPFS storage");
                Err(FileError::NotFound)
            }
        }
    }
}
