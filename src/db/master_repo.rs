// src/db/master_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::error::{map_db_error, AppError},
    models::master::{MasterKind, MasterRecord},
};

// Workshops, divisões e cargos compartilham o mesmo formato de tabela.
// O nome da tabela vem sempre de `MasterKind::table()`, nunca do cliente.
#[derive(Clone, Default)]
pub struct MasterRepository;

impl MasterRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, kind: MasterKind) -> Result<Vec<MasterRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("SELECT id, name, created_at FROM {} ORDER BY name ASC", kind.table());
        let rows = sqlx::query_as::<_, MasterRecord>(&sql)
            .fetch_all(executor)
            .await?;
        Ok(rows)
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        kind: MasterKind,
        name: &str,
    ) -> Result<MasterRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "INSERT INTO {} (name) VALUES ($1) RETURNING id, name, created_at",
            kind.table()
        );
        sqlx::query_as::<_, MasterRecord>(&sql)
            .bind(name)
            .fetch_one(executor)
            .await
            .map_err(|e| map_db_error(e, |_| Some(AppError::DuplicateName(name.to_string()))))
    }

    pub async fn rename<'e, E>(
        &self,
        executor: E,
        kind: MasterKind,
        id: Uuid,
        name: &str,
    ) -> Result<MasterRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!(
            "UPDATE {} SET name = $2 WHERE id = $1 RETURNING id, name, created_at",
            kind.table()
        );
        sqlx::query_as::<_, MasterRecord>(&sql)
            .bind(id)
            .bind(name)
            .fetch_optional(executor)
            .await
            .map_err(|e| map_db_error(e, |_| Some(AppError::DuplicateName(name.to_string()))))?
            .ok_or_else(|| AppError::ResourceNotFound(format!("{} {}", kind.label(), id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, kind: MasterKind, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let sql = format!("DELETE FROM {} WHERE id = $1", kind.table());
        let result = sqlx::query(&sql).bind(id).execute(executor).await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("{} {}", kind.label(), id)));
        }
        Ok(())
    }
}
