// src/models/file.rs

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileKind {
    EmployeePhoto,
    EmployeeDocument,
    LoanDocument,
    ProcurementDocument,
    General,
}

impl FileKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FileKind::EmployeePhoto => "employee_photo",
            FileKind::EmployeeDocument => "employee_document",
            FileKind::LoanDocument => "loan_document",
            FileKind::ProcurementDocument => "procurement_document",
            FileKind::General => "general",
        }
    }
}

impl fmt::Display for FileKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FileKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "employee_photo" => Ok(FileKind::EmployeePhoto),
            "employee_document" => Ok(FileKind::EmployeeDocument),
            "loan_document" => Ok(FileKind::LoanDocument),
            "procurement_document" => Ok(FileKind::ProcurementDocument),
            "general" => Ok(FileKind::General),
            other => Err(format!("tipo de arquivo desconhecido '{}'", other)),
        }
    }
}

// Registro de um arquivo enviado ao bucket
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub id: Uuid,
    pub public_url: String,
    pub storage_path: String,
    #[schema(example = "employee_photo")]
    pub kind: String,
    pub original_name: String,
    pub content_type: Option<String>,
    pub size_bytes: i64,
    pub owner_id: Uuid,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_parses_its_own_names() {
        for kind in [
            FileKind::EmployeePhoto,
            FileKind::EmployeeDocument,
            FileKind::LoanDocument,
            FileKind::ProcurementDocument,
            FileKind::General,
        ] {
            assert_eq!(kind.as_str().parse::<FileKind>().unwrap(), kind);
        }
        assert!("avatar".parse::<FileKind>().is_err());
    }
}
