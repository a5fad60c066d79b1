// src/storage/filesystem.rs

use std::path::PathBuf;

use async_trait::async_trait;
use tokio::fs;

use super::{validate_object_path, ObjectStorage, StorageError};

/// Bucket em disco: cada objeto vira `{base_path}/{caminho}`.
pub struct FilesystemStorage {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemStorage {
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        fs::create_dir_all(base_path.join(".tmp")).await?;
        Ok(Self { base_path, max_size })
    }

    fn object_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_object_path(path)?;
        Ok(self.base_path.join(path))
    }

    fn temp_path(&self) -> PathBuf {
        self.base_path
            .join(".tmp")
            .join(uuid::Uuid::new_v4().to_string())
    }
}

#[async_trait]
impl ObjectStorage for FilesystemStorage {
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        let target = self.object_path(path)?;
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent).await?;
        }

        // Escreve num temporário e renomeia, para nunca expor um arquivo pela metade
        let temp = self.temp_path();
        if let Err(e) = fs::write(&temp, data).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }
        if let Err(e) = fs::rename(&temp, &target).await {
            let _ = fs::remove_file(&temp).await;
            return Err(e.into());
        }

        Ok(())
    }

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let target = self.object_path(path)?;
        match fs::read(&target).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(StorageError::NotFound(path.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.object_path(path)?;
        match fs::remove_file(&target).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    async fn exists(&self, path: &str) -> Result<bool, StorageError> {
        let target = self.object_path(path)?;
        Ok(fs::try_exists(&target).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn temp_storage() -> (FilesystemStorage, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FilesystemStorage::new(dir.path().join("bucket"), 1024)
            .await
            .unwrap();
        (storage, dir)
    }

    #[tokio::test]
    async fn put_then_get_returns_the_bytes() {
        let (storage, _dir) = temp_storage().await;
        storage.put("general/u1/a.txt", b"helm").await.unwrap();
        assert_eq!(storage.get("general/u1/a.txt").await.unwrap(), b"helm");
        assert!(storage.exists("general/u1/a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn put_overwrites_the_same_path() {
        let (storage, _dir) = temp_storage().await;
        storage.put("x/a.txt", b"one").await.unwrap();
        storage.put("x/a.txt", b"two").await.unwrap();
        assert_eq!(storage.get("x/a.txt").await.unwrap(), b"two");
    }

    #[tokio::test]
    async fn delete_reports_whether_something_was_removed() {
        let (storage, _dir) = temp_storage().await;
        storage.put("x/a.txt", b"one").await.unwrap();
        assert!(storage.delete("x/a.txt").await.unwrap());
        assert!(!storage.delete("x/a.txt").await.unwrap());
        assert!(!storage.exists("x/a.txt").await.unwrap());
    }

    #[tokio::test]
    async fn missing_object_is_not_found() {
        let (storage, _dir) = temp_storage().await;
        assert!(matches!(
            storage.get("nope.txt").await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn oversized_objects_are_rejected() {
        let (storage, _dir) = temp_storage().await;
        let big = vec![0u8; 2048];
        assert!(matches!(
            storage.put("big.bin", &big).await,
            Err(StorageError::SizeLimitExceeded { actual: 2048, limit: 1024 })
        ));
        assert!(!storage.exists("big.bin").await.unwrap());
    }

    #[tokio::test]
    async fn staging_area_is_not_addressable() {
        let (storage, dir) = temp_storage().await;
        tokio::fs::write(dir.path().join("bucket/.tmp/pending"), b"half")
            .await
            .unwrap();
        assert!(matches!(
            storage.get(".tmp/pending").await,
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[tokio::test]
    async fn traversal_is_refused() {
        let (storage, _dir) = temp_storage().await;
        assert!(matches!(
            storage.put("../escape.txt", b"x").await,
            Err(StorageError::InvalidPath(_))
        ));
    }
}
