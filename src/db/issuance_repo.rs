// src/db/issuance_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, Postgres};
use uuid::Uuid;
use crate::{
    common::{error::{map_db_error, AppError}, period::Period},
    models::issuance::{DailyIssuance, IssuanceListEntry, PeriodDistribution},
};

#[derive(Clone, Default)]
pub struct IssuanceRepository;

impl IssuanceRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        item_id: Uuid,
        issued_on: NaiveDate,
        recipient_name: &str,
        workshop_id: Option<Uuid>,
        quantity: i32,
    ) -> Result<DailyIssuance, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        // O período é sempre derivado da data, nunca informado pelo cliente
        let period = Period::of(issued_on);

        sqlx::query_as::<_, DailyIssuance>(
            r#"
            INSERT INTO daily_issuances (item_id, issued_on, recipient_name, workshop_id, quantity, period)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(item_id)
        .bind(issued_on)
        .bind(recipient_name)
        .bind(workshop_id)
        .bind(quantity)
        .bind(period.first_day())
        .fetch_one(executor)
        .await
        .map_err(|e| map_db_error(e, |_| None))
    }

    pub async fn list<'e, E>(
        &self,
        executor: E,
        period: Option<Period>,
        item_id: Option<Uuid>,
    ) -> Result<Vec<IssuanceListEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, IssuanceListEntry>(
            r#"
            SELECT di.id, di.item_id, ei.name AS item_name, ei.unit AS item_unit,
                   di.issued_on, di.recipient_name,
                   di.workshop_id, w.name AS workshop_name,
                   di.quantity, di.period
            FROM daily_issuances di
            JOIN equipment_items ei ON ei.id = di.item_id
            LEFT JOIN workshops w ON w.id = di.workshop_id
            WHERE ($1::date IS NULL OR di.period = $1)
              AND ($2::uuid IS NULL OR di.item_id = $2)
            ORDER BY di.issued_on DESC, di.created_at DESC
            "#,
        )
        .bind(period.map(|p| p.first_day()))
        .bind(item_id)
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    pub async fn delete<'e, E>(&self, executor: E, id: Uuid) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM daily_issuances WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ResourceNotFound(format!("Distribusi {}", id)));
        }
        Ok(())
    }

    /// Total distribuído por item no período (a "distribusi" do rekap).
    pub async fn distribution_by_period<'e, E>(
        &self,
        executor: E,
        period: Period,
    ) -> Result<Vec<PeriodDistribution>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, PeriodDistribution>(
            r#"
            SELECT item_id, COALESCE(SUM(quantity), 0)::BIGINT AS total
            FROM daily_issuances
            WHERE period = $1
            GROUP BY item_id
            "#,
        )
        .bind(period.first_day())
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }
}
