// src/db/dashboard_repo.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use crate::{
    common::{error::AppError, period::Period},
    models::dashboard::DashboardSummary,
};

#[derive(Clone, Default)]
pub struct DashboardRepository;

impl DashboardRepository {
    pub fn new() -> Self {
        Self
    }

    // Resumo Geral
    pub async fn get_summary<'e, E>(&self, executor: E, period: Period) -> Result<DashboardSummary, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        // Transação para ler todos os números do mesmo snapshot
        let mut tx = executor.begin().await?;

        let total_employees: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM employees")
            .fetch_one(&mut *tx)
            .await?;

        let (total_equipment_items, total_stock): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(quantity), 0)::BIGINT FROM equipment_items",
        )
        .fetch_one(&mut *tx)
        .await?;

        let active_loans: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM loans WHERE returned_on IS NULL")
            .fetch_one(&mut *tx)
            .await?;

        let issued_this_period: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT FROM daily_issuances WHERE issued_on >= $1 AND issued_on < $2",
        )
        .bind(period.first_day())
        .bind(period.next().first_day())
        .fetch_one(&mut *tx)
        .await?;

        let procurement_total: Decimal = sqlx::query_scalar(
            "SELECT COALESCE(SUM(total), 0)::NUMERIC FROM procurement_requests",
        )
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(DashboardSummary {
            total_employees,
            total_equipment_items,
            total_stock,
            active_loans,
            issued_this_period,
            procurement_total,
        })
    }
}
