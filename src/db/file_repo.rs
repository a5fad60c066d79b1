// src/db/file_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::{map_db_error, AppError},
    models::file::{FileKind, FileRecord},
};

pub struct NewFileRecord<'a> {
    pub public_url: &'a str,
    pub storage_path: &'a str,
    pub kind: FileKind,
    pub original_name: &'a str,
    pub content_type: Option<&'a str>,
    pub size_bytes: i64,
    pub owner_id: Uuid,
}

#[derive(Clone, Default)]
pub struct FileRepository;

impl FileRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn insert<'e, E>(&self, executor: E, record: &NewFileRecord<'_>) -> Result<FileRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, FileRecord>(
            r#"
            INSERT INTO file_records (public_url, storage_path, kind, original_name, content_type, size_bytes, owner_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(record.public_url)
        .bind(record.storage_path)
        .bind(record.kind.as_str())
        .bind(record.original_name)
        .bind(record.content_type)
        .bind(record.size_bytes)
        .bind(record.owner_id)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))?;
        Ok(row)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<FileRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, FileRecord>("SELECT * FROM file_records WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("File {}", id)))
    }

    pub async fn list_by_owner<'e, E>(
        &self,
        executor: E,
        owner_id: Uuid,
        kind: Option<FileKind>,
    ) -> Result<Vec<FileRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, FileRecord>(
            r#"
            SELECT * FROM file_records
            WHERE owner_id = $1 AND ($2::text IS NULL OR kind = $2)
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .bind(kind.map(|k| k.as_str()))
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM file_records WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("File {}", id)));
        }
        Ok(())
    }
}
