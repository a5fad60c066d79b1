// src/models/rekap.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Linha do rekap mensal. Invariante (também CHECK no banco):
// saldo_akhir = stock_awal + realisasi - distribusi
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RekapRow {
    pub id: Uuid,
    pub item_id: Uuid,
    pub period: NaiveDate,
    pub stock_awal: i32,
    pub realisasi: i32,
    pub distribusi: i32,
    pub saldo_akhir: i32,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RekapEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    #[schema(example = "Helm Safety")]
    pub item_name: String,
    pub item_unit: String,
    pub period: NaiveDate,
    #[schema(example = 100)]
    pub stock_awal: i32,
    #[schema(example = 0)]
    pub realisasi: i32,
    #[schema(example = 12)]
    pub distribusi: i32,
    #[schema(example = 88)]
    pub saldo_akhir: i32,
}

/// Uma linha calculada, antes de ir para o banco.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RekapLine {
    pub item_id: Uuid,
    pub stock_awal: i32,
    pub realisasi: i32,
    pub distribusi: i32,
    pub saldo_akhir: i32,
}
