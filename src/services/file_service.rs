// src/services/file_service.rs

use std::sync::Arc;

use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{file_repo::NewFileRecord, FileRepository},
    models::file::{FileKind, FileRecord},
    storage::ObjectStorage,
};

const MAX_FILENAME_LEN: usize = 100;

/// Reduz o nome enviado pelo navegador a um nome plano e seguro para o caminho do objeto.
pub fn sanitize_filename(raw: &str) -> Result<String, AppError> {
    // Alguns navegadores mandam o caminho completo ("C:\fakepath\foto.jpg")
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw).trim();

    let mut cleaned: String = base
        .chars()
        .map(|c| if c.is_whitespace() { '-' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_'))
        .collect();

    // Sem arquivos ocultos nem ".."
    cleaned = cleaned.trim_start_matches('.').to_string();

    if cleaned.is_empty() {
        return Err(AppError::InvalidUpload(format!("nome de arquivo '{}'", raw)));
    }

    if cleaned.len() > MAX_FILENAME_LEN {
        // Preserva a extensão ao truncar
        let ext = cleaned
            .rsplit_once('.')
            .map(|(_, e)| format!(".{}", e))
            .filter(|e| e.len() < 16)
            .unwrap_or_default();
        cleaned.truncate(MAX_FILENAME_LEN - ext.len());
        cleaned.push_str(&ext);
    }

    Ok(cleaned)
}

/// Caminho do objeto no bucket: `{tipo}/{dono}/{uuid}-{nome}`.
pub fn object_path(kind: FileKind, owner_id: Uuid, file_id: Uuid, filename: &str) -> String {
    format!("{}/{}/{}-{}", kind, owner_id, file_id, filename)
}

pub struct Upload {
    pub kind: FileKind,
    pub original_name: String,
    pub content_type: Option<String>,
    pub data: Vec<u8>,
}

#[derive(Clone)]
pub struct FileService {
    repo: FileRepository,
    storage: Arc<dyn ObjectStorage>,
    public_base_url: String,
}

impl FileService {
    pub fn new(repo: FileRepository, storage: Arc<dyn ObjectStorage>, public_base_url: String) -> Self {
        Self {
            repo,
            storage,
            public_base_url: public_base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn public_url(&self, storage_path: &str) -> String {
        format!("{}/files/{}", self.public_base_url, storage_path)
    }

    /// Grava o objeto e depois o registro. Se o registro falhar, o objeto é removido.
    pub async fn upload<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        upload: Upload,
    ) -> Result<FileRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let filename = sanitize_filename(&upload.original_name)?;
        let path = object_path(upload.kind, owner_id, Uuid::new_v4(), &filename);

        let content_type = upload.content_type.or_else(|| {
            mime_guess::from_path(&filename).first().map(|m| m.to_string())
        });

        self.storage.put(&path, &upload.data).await?;

        let public_url = self.public_url(&path);
        let record = NewFileRecord {
            public_url: &public_url,
            storage_path: &path,
            kind: upload.kind,
            original_name: &upload.original_name,
            content_type: content_type.as_deref(),
            size_bytes: upload.data.len() as i64,
            owner_id,
        };

        match self.repo.insert(executor, &record).await {
            Ok(saved) => {
                tracing::info!(path = %path, size = saved.size_bytes, "📎 Arquivo enviado");
                Ok(saved)
            }
            Err(e) => {
                // Não deixa objeto órfão no bucket
                if let Err(cleanup) = self.storage.delete(&path).await {
                    tracing::error!("Falha ao remover objeto órfão {}: {}", path, cleanup);
                }
                Err(e)
            }
        }
    }

    /// Apaga registro e objeto. O registro só é confirmado depois que o objeto saiu do bucket.
    pub async fn delete<'e, E>(&self, executor: E, requester: Uuid, file_id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let record = self.repo.find(&mut *tx, file_id).await?;
        if record.owner_id != requester {
            return Err(AppError::Forbidden);
        }

        self.repo.delete(&mut *tx, file_id).await?;

        let removed = self.storage.delete(&record.storage_path).await?;
        if !removed {
            tracing::warn!("Objeto {} já não existia no storage", record.storage_path);
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        kind: Option<FileKind>,
    ) -> Result<Vec<FileRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.repo.list_by_owner(executor, owner_id, kind).await
    }

    /// Bytes e content-type de um objeto, para o download público.
    pub async fn download(&self, storage_path: &str) -> Result<(Vec<u8>, String), AppError> {
        let bytes = self.storage.get(storage_path).await?;
        let content_type = mime_guess::from_path(storage_path)
            .first_or_octet_stream()
            .to_string();
        Ok((bytes, content_type))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    use crate::{db::UserRepository, storage::FilesystemStorage};

    #[test]
    fn keeps_simple_names() {
        assert_eq!(sanitize_filename("foto_ktp.jpg").unwrap(), "foto_ktp.jpg");
    }

    #[test]
    fn strips_directories_and_spaces() {
        assert_eq!(sanitize_filename("C:\\fakepath\\Surat Tugas.pdf").unwrap(), "Surat-Tugas.pdf");
        assert_eq!(sanitize_filename("../../etc/passwd").unwrap(), "passwd");
    }

    #[test]
    fn drops_hidden_prefix_and_odd_characters() {
        assert_eq!(sanitize_filename(".env").unwrap(), "env");
        assert_eq!(sanitize_filename("laporan#1?.xlsx").unwrap(), "laporan1.xlsx");
    }

    #[test]
    fn rejects_names_that_become_empty() {
        assert!(matches!(sanitize_filename("..."), Err(AppError::InvalidUpload(_))));
        assert!(matches!(sanitize_filename("   "), Err(AppError::InvalidUpload(_))));
    }

    #[test]
    fn long_names_are_truncated_keeping_the_extension() {
        let name = format!("{}.pdf", "a".repeat(300));
        let cleaned = sanitize_filename(&name).unwrap();
        assert_eq!(cleaned.len(), MAX_FILENAME_LEN);
        assert!(cleaned.ends_with(".pdf"));
    }

    #[test]
    fn object_path_follows_the_convention() {
        let owner = Uuid::nil();
        let file = Uuid::nil();
        assert_eq!(
            object_path(FileKind::EmployeePhoto, owner, file, "a.jpg"),
            format!("employee_photo/{}/{}-a.jpg", owner, file)
        );
        assert!(crate::storage::validate_object_path(&object_path(
            FileKind::General,
            Uuid::new_v4(),
            Uuid::new_v4(),
            "x.pdf"
        ))
        .is_ok());
    }

    async fn setup() -> (FileService, Arc<FilesystemStorage>, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let storage = Arc::new(FilesystemStorage::new(dir.path().join("bucket"), 1024).await.unwrap());
        let service = FileService::new(FileRepository::new(), storage.clone(), "http://localhost:3000/".into());
        (service, storage, dir)
    }

    async fn user(pool: &PgPool, email: &str) -> Uuid {
        UserRepository::new(pool.clone())
            .create_user(pool, email, "hash", None)
            .await
            .unwrap()
            .id
    }

    fn upload(name: &str) -> Upload {
        Upload {
            kind: FileKind::General,
            original_name: name.to_string(),
            content_type: None,
            data: b"%PDF-1.4".to_vec(),
        }
    }

    async fn registry_rows(pool: &PgPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM file_records")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn upload_then_delete_leaves_nothing_behind(pool: PgPool) {
        let (service, storage, _dir) = setup().await;
        let owner = user(&pool, "dewi@apd.local").await;

        let record = service.upload(&pool, owner, upload("Surat Tugas.pdf")).await.unwrap();
        assert!(storage.exists(&record.storage_path).await.unwrap());
        assert_eq!(record.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(record.public_url, format!("http://localhost:3000/files/{}", record.storage_path));
        assert_eq!(registry_rows(&pool).await, 1);

        service.delete(&pool, owner, record.id).await.unwrap();

        assert!(!storage.exists(&record.storage_path).await.unwrap());
        assert_eq!(registry_rows(&pool).await, 0);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn only_the_owner_can_delete(pool: PgPool) {
        let (service, storage, _dir) = setup().await;
        let owner = user(&pool, "dewi@apd.local").await;
        let other = user(&pool, "agus@apd.local").await;

        let record = service.upload(&pool, owner, upload("ktp.jpg")).await.unwrap();

        assert!(matches!(
            service.delete(&pool, other, record.id).await,
            Err(AppError::Forbidden)
        ));
        assert!(storage.exists(&record.storage_path).await.unwrap());
        assert_eq!(registry_rows(&pool).await, 1);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn failed_registry_insert_removes_the_object(pool: PgPool) {
        let (service, _storage, dir) = setup().await;
        // Dono inexistente: a FK do registro falha depois do objeto gravado
        let ghost = Uuid::new_v4();

        let result = service.upload(&pool, ghost, upload("laporan.pdf")).await;

        assert!(matches!(result, Err(AppError::ReferenceNotFound(_))));
        let owner_dir = dir.path().join("bucket").join("general").join(ghost.to_string());
        let leftovers = std::fs::read_dir(&owner_dir).map(|d| d.count()).unwrap_or(0);
        assert_eq!(leftovers, 0);
        assert_eq!(registry_rows(&pool).await, 0);
    }
}
