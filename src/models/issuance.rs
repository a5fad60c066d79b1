// src/models/issuance.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Distribuição diária de consumíveis (append-only)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DailyIssuance {
    pub id: Uuid,
    pub item_id: Uuid,
    pub issued_on: NaiveDate,
    #[schema(example = "Agus")]
    pub recipient_name: String,
    pub workshop_id: Option<Uuid>,
    #[schema(example = 2)]
    pub quantity: i32,
    /// Primeiro dia do mês de `issued_on`
    pub period: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IssuanceListEntry {
    pub id: Uuid,
    pub item_id: Uuid,
    pub item_name: String,
    pub item_unit: String,
    pub issued_on: NaiveDate,
    pub recipient_name: String,
    pub workshop_id: Option<Uuid>,
    pub workshop_name: Option<String>,
    pub quantity: i32,
    pub period: NaiveDate,
}

// Soma do período por item, insumo do rekap
#[derive(Debug, Clone, FromRow)]
pub struct PeriodDistribution {
    pub item_id: Uuid,
    pub total: i64,
}
