// src/db/rekap_repo.rs

use sqlx::{Executor, FromRow, Postgres};
use uuid::Uuid;
use crate::{
    common::{error::AppError, period::Period},
    models::rekap::{RekapEntry, RekapLine, RekapRow},
};

#[derive(Debug, Clone, FromRow)]
pub struct StoredRealisasi {
    pub item_id: Uuid,
    pub realisasi: i32,
}

#[derive(Clone, Default)]
pub struct RekapRepository;

impl RekapRepository {
    pub fn new() -> Self {
        Self
    }

    pub async fn list_period<'e, E>(&self, executor: E, period: Period) -> Result<Vec<RekapEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, RekapEntry>(
            r#"
            SELECT r.id, r.item_id, ei.name AS item_name, ei.unit AS item_unit, r.period,
                   r.stock_awal, r.realisasi, r.distribusi, r.saldo_akhir
            FROM monthly_rekap r
            JOIN equipment_items ei ON ei.id = r.item_id
            WHERE r.period = $1
            ORDER BY ei.name ASC
            "#,
        )
        .bind(period.first_day())
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// Realisasi já digitada para o período (preservada ao regerar).
    pub async fn stored_realisasi<'e, E>(
        &self,
        executor: E,
        period: Period,
    ) -> Result<Vec<StoredRealisasi>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let rows = sqlx::query_as::<_, StoredRealisasi>(
            "SELECT item_id, realisasi FROM monthly_rekap WHERE period = $1",
        )
        .bind(period.first_day())
        .fetch_all(executor)
        .await?;
        Ok(rows)
    }

    /// UPSERT pela chave (item_id, period): regerar sobrescreve, nunca duplica.
    pub async fn upsert_line<'e, E>(
        &self,
        executor: E,
        period: Period,
        line: &RekapLine,
    ) -> Result<RekapRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let row = sqlx::query_as::<_, RekapRow>(
            r#"
            INSERT INTO monthly_rekap (item_id, period, stock_awal, realisasi, distribusi, saldo_akhir)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (item_id, period)
            DO UPDATE SET
                stock_awal = EXCLUDED.stock_awal,
                realisasi = EXCLUDED.realisasi,
                distribusi = EXCLUDED.distribusi,
                saldo_akhir = EXCLUDED.saldo_akhir,
                generated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(line.item_id)
        .bind(period.first_day())
        .bind(line.stock_awal)
        .bind(line.realisasi)
        .bind(line.distribusi)
        .bind(line.saldo_akhir)
        .fetch_one(executor)
        .await?;
        Ok(row)
    }

    pub async fn find<'e, E>(&self, executor: E, id: Uuid) -> Result<RekapRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RekapRow>("SELECT * FROM monthly_rekap WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?
            .ok_or_else(|| AppError::ResourceNotFound(format!("Rekap {}", id)))
    }

    /// Grava os valores já recalculados de uma linha.
    pub async fn update_line<'e, E>(&self, executor: E, id: Uuid, line: &RekapLine) -> Result<RekapRow, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, RekapRow>(
            r#"
            UPDATE monthly_rekap
            SET realisasi = $2, saldo_akhir = $3, generated_at = NOW()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(line.realisasi)
        .bind(line.saldo_akhir)
        .fetch_optional(executor)
        .await?
        .ok_or_else(|| AppError::ResourceNotFound(format!("Rekap {}", id)))
    }

    pub async fn delete_period<'e, E>(&self, executor: E, period: Period) -> Result<u64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM monthly_rekap WHERE period = $1")
            .bind(period.first_day())
            .execute(executor)
            .await?;
        Ok(result.rows_affected())
    }
}
