// src/integrations/storage.rs

use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tokio::{fs, io::AsyncWriteExt};

use crate::common::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bucket {
    Receipts,
    TimeClockPhotos,
    Documents,
}

impl Bucket {
    pub fn as_str(&self) -> &'static str {
        match self {
            Bucket::Receipts => "receipts",
            Bucket::TimeClockPhotos => "time-clock-photos",
            Bucket::Documents => "documents",
        }
    }
}

#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Sem `upsert`, um caminho já existente é erro.
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), AppError>;

    fn public_url(&self, bucket: Bucket, path: &str) -> String;
}

/// Storage em disco, servido pelo próprio servidor em /storage.
#[derive(Debug, Clone)]
pub struct LocalObjectStorage {
    root: PathBuf,
    public_base_url: String,
}

impl LocalObjectStorage {
    pub fn new(root: impl Into<PathBuf>, public_base_url: &str) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    fn resolve(&self, bucket: Bucket, path: &str) -> Result<PathBuf, AppError> {
        let relative = Path::new(path);
        let only_normal = relative.components().all(|c| matches!(c, Component::Normal(_)));
        if path.is_empty() || !only_normal {
            return Err(AppError::Storage(format!("caminho inválido: {path}")));
        }
        Ok(self.root.join(bucket.as_str()).join(relative))
    }
}

#[async_trait]
impl ObjectStorage for LocalObjectStorage {
    async fn upload(
        &self,
        bucket: Bucket,
        path: &str,
        bytes: Vec<u8>,
        content_type: &str,
        upsert: bool,
    ) -> Result<(), AppError> {
        let target = self.resolve(bucket, path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| AppError::Storage(e.to_string()))?;
        }

        let mut options = fs::OpenOptions::new();
        options.write(true);
        if upsert {
            options.create(true).truncate(true);
        } else {
            options.create_new(true);
        }

        let mut file = options.open(&target).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => AppError::Storage(format!("o arquivo já existe: {path}")),
            _ => AppError::Storage(e.to_string()),
        })?;
        file.write_all(&bytes)
            .await
            .map_err(|e| AppError::Storage(e.to_string()))?;
        file.flush().await.map_err(|e| AppError::Storage(e.to_string()))?;

        tracing::debug!(bucket = bucket.as_str(), path, content_type, size = bytes.len(), "Arquivo salvo");
        Ok(())
    }

    fn public_url(&self, bucket: Bucket, path: &str) -> String {
        format!("{}/{}/{}", self.public_base_url, bucket.as_str(), path)
    }
}
