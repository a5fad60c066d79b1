// src/models/master.rs
//
// Cadastros de referência: workshops, divisões e cargos.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// As três tabelas têm o mesmo formato (id, name); o repositório é um só.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MasterKind {
    Workshop,
    Division,
    Position,
}

impl MasterKind {
    pub fn table(&self) -> &'static str {
        match self {
            MasterKind::Workshop => "workshops",
            MasterKind::Division => "divisions",
            MasterKind::Position => "positions",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            MasterKind::Workshop => "Workshop",
            MasterKind::Division => "Divisi",
            MasterKind::Position => "Jabatan",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MasterRecord {
    pub id: Uuid,
    #[schema(example = "Workshop Fabrikasi")]
    pub name: String,
    pub created_at: DateTime<Utc>,
}
