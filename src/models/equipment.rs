// src/models/equipment.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

// Item de APD. `quantity` é o saldo atual, alterado só pelo stock opname.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentItem {
    pub id: Uuid,
    #[schema(example = "Helm Safety")]
    pub name: String,
    #[schema(example = "pcs")]
    pub unit: String,
    #[schema(example = 100)]
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
