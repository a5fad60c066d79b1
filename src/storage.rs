// src/storage.rs

use async_trait::async_trait;
use thiserror::Error;

pub mod filesystem;

pub use filesystem::FilesystemStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("objeto não encontrado: {0}")]
    NotFound(String),

    #[error("caminho inválido: {0}")]
    InvalidPath(String),

    #[error("objeto excede o limite ({actual} > {limit} bytes)")]
    SizeLimitExceeded { actual: u64, limit: u64 },

    #[error("erro de IO no storage: {0}")]
    Io(#[from] std::io::Error),
}

/// O "bucket" de documentos. Os objetos são endereçados por caminho relativo
/// (`employee_photo/<user>/<uuid>-foto.jpg`).
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn put(&self, path: &str, data: &[u8]) -> Result<(), StorageError>;

    async fn get(&self, path: &str) -> Result<Vec<u8>, StorageError>;

    /// `true` se o objeto existia e foi removido.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;

    async fn exists(&self, path: &str) -> Result<bool, StorageError>;
}

/// Valida um caminho relativo de objeto: sem barra inicial, sem segmentos vazios e nenhum
/// segmento começando com `.` (cobre `..` e a área de staging `.tmp`).
pub fn validate_object_path(path: &str) -> Result<(), StorageError> {
    let invalid = || StorageError::InvalidPath(path.to_string());

    if path.is_empty() || path.starts_with('/') || path.contains('\\') {
        return Err(invalid());
    }
    if path.chars().any(|c| c.is_control()) {
        return Err(invalid());
    }
    for segment in path.split('/') {
        if segment.is_empty() || segment.starts_with('.') {
            return Err(invalid());
        }
    }
    Ok(())
}
