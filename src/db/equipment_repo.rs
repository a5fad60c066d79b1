// src/db/equipment_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{
        db_utils::like_pattern,
        error::{map_db_error, AppError},
    },
    models::equipment::EquipmentItem,
};

#[derive(Clone, Default)]
pub struct EquipmentRepository;

impl EquipmentRepository {
    pub fn new() -> Self {
        Self
    }

    // ---
    // Leitura
    // ---

    /// Lista os itens, filtrando por nome quando `search` vem preenchido.
    pub async fn list<'e, E>(&self, executor: E, search: Option<&str>) -> Result<Vec<EquipmentItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, EquipmentItem>(
            r#"
            SELECT * FROM equipment_items
            WHERE ($1::text IS NULL OR name ILIKE $1)
            ORDER BY name ASC
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<EquipmentItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EquipmentItem>("SELECT * FROM equipment_items WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("APD {}", id)))
    }

    // ---
    // Escrita
    // ---

    pub async fn create<'e, E>(
        &self,
        executor: E,
        name: &str,
        unit: &str,
        quantity: i32,
    ) -> Result<EquipmentItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EquipmentItem>(
            r#"
            INSERT INTO equipment_items (name, unit, quantity)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(name)
        .bind(unit)
        .bind(quantity)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, |_| Some(AppError::DuplicateName(name.to_string()))))
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        unit: &str,
    ) -> Result<EquipmentItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EquipmentItem>(
            r#"
            UPDATE equipment_items
            SET name = $2, unit = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(unit)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, |_| Some(AppError::DuplicateName(name.to_string()))))?
        .ok_or_else(|| AppError::ResourceNotFound(format!("APD {}", id)))
    }

    /// Stock opname: a contagem física substitui o saldo atual.
    pub async fn set_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: i32,
    ) -> Result<EquipmentItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, EquipmentItem>(
            r#"
            UPDATE equipment_items
            SET quantity = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(quantity)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(format!("APD {}", id)))
    }

    // Distribuições e linhas de rekap do item caem junto (ON DELETE CASCADE)
    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM equipment_items WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("APD {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::PgPool;

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn search_treats_wildcards_literally(pool: PgPool) {
        let repo = EquipmentRepository::new();
        repo.create(&pool, "Masker 100% Katun", "box", 5).await.unwrap();
        repo.create(&pool, "Masker N95", "box", 5).await.unwrap();
        repo.create(&pool, "Kacamata_Las", "pcs", 2).await.unwrap();
        repo.create(&pool, "KacamataXLas", "pcs", 2).await.unwrap();

        let names = |items: Vec<EquipmentItem>| items.into_iter().map(|i| i.name).collect::<Vec<_>>();

        assert_eq!(names(repo.list(&pool, Some("100%")).await.unwrap()), ["Masker 100% Katun"]);
        assert_eq!(names(repo.list(&pool, Some("%")).await.unwrap()), ["Masker 100% Katun"]);
        assert_eq!(names(repo.list(&pool, Some("a_l")).await.unwrap()), ["Kacamata_Las"]);
        assert_eq!(names(repo.list(&pool, Some("masker")).await.unwrap()).len(), 2);
    }
}
