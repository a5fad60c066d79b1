// src/db/procurement_repo.rs

use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{
        db_utils::like_pattern,
        error::{map_db_error, AppError},
    },
    models::procurement::{ProcurementInput, ProcurementRequest},
};

#[derive(Clone, Default)]
pub struct ProcurementRepository;

impl ProcurementRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list<'e, E>(&self, executor: E, search: Option<&str>) -> Result<Vec<ProcurementRequest>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, ProcurementRequest>(
            r#"
            SELECT * FROM procurement_requests
            WHERE ($1::text IS NULL OR project_name ILIKE $1 OR item_name ILIKE $1)
            ORDER BY requested_on DESC, created_at DESC
            "#,
        )
        .bind(search.map(like_pattern))
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<ProcurementRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProcurementRequest>("SELECT * FROM procurement_requests WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Pengadaan {}", id)))
    }

    // `total` não entra no INSERT: é GENERATED ALWAYS no banco
    pub async fn create<'e, E>(&self, executor: E, input: &ProcurementInput) -> Result<ProcurementRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, ProcurementRequest>(
            r#"
            INSERT INTO procurement_requests (
                project_name, project_location, requested_by, item_name, unit,
                quantity, unit_price, requested_on
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, COALESCE($8, CURRENT_DATE))
            RETURNING *
            "#,
        )
        .bind(&input.project_name)
        .bind(&input.project_location)
        .bind(&input.requested_by)
        .bind(&input.item_name)
        .bind(&input.unit)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.requested_on)
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))?;
        Ok(row)
    }

    pub async fn update<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        input: &ProcurementInput,
    ) -> Result<ProcurementRequest, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, ProcurementRequest>(
            r#"
            UPDATE procurement_requests SET
                project_name = $2, project_location = $3, requested_by = $4,
                item_name = $5, unit = $6, quantity = $7, unit_price = $8,
                requested_on = COALESCE($9, requested_on), updated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&input.project_name)
        .bind(&input.project_location)
        .bind(&input.requested_by)
        .bind(&input.item_name)
        .bind(&input.unit)
        .bind(input.quantity)
        .bind(input.unit_price)
        .bind(input.requested_on)
        .fetch_optional(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Pengadaan {}", id)))
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM procurement_requests WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Pengadaan {}", id)));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use sqlx::PgPool;
    use std::str::FromStr;

    fn input(quantity: i32, unit_price: &str) -> ProcurementInput {
        ProcurementInput {
            project_name: "Gedung A".into(),
            project_location: None,
            requested_by: None,
            item_name: "Sarung Tangan Kulit".into(),
            unit: "pasang".into(),
            quantity,
            unit_price: Decimal::from_str(unit_price).unwrap(),
            requested_on: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn total_follows_quantity_and_price(pool: PgPool) {
        let repo = ProcurementRepository::new();

        let created = repo.create(&pool, &input(50, "35000")).await.unwrap();
        assert_eq!(created.total, Decimal::from(1_750_000));

        let updated = repo.update(&pool, created.id, &input(3, "10.50")).await.unwrap();
        assert_eq!(updated.total, Decimal::from_str("31.50").unwrap());
        assert_eq!(updated.requested_on, created.requested_on);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres em DATABASE_URL"]
    async fn total_overflow_is_not_an_internal_error(pool: PgPool) {
        let repo = ProcurementRepository::new();

        let result = repo.create(&pool, &input(1_000_000, "1000000000")).await;

        assert!(matches!(result, Err(AppError::QuantityOverflow)));
    }
}
