// src/models/employee.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Employee {
    pub id: Uuid,
    #[schema(example = "Siti Rahayu")]
    pub name: String,
    #[schema(example = "19870412")]
    pub employee_number: String,
    pub division_id: Option<Uuid>,
    pub position_id: Option<Uuid>,
    #[schema(example = "42")]
    pub shoe_size: Option<String>,
    #[schema(example = "Kuning")]
    pub helmet_color: Option<String>,
    #[schema(example = "L")]
    pub coverall_size: Option<String>,
    pub photo_url: Option<String>,
    pub document_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Linha da listagem, já com os nomes de divisão e cargo
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeListEntry {
    pub id: Uuid,
    pub name: String,
    pub employee_number: String,
    pub division_id: Option<Uuid>,
    pub division_name: Option<String>,
    pub position_id: Option<Uuid>,
    pub position_name: Option<String>,
    pub shoe_size: Option<String>,
    pub helmet_color: Option<String>,
    pub coverall_size: Option<String>,
    pub photo_url: Option<String>,
    pub document_url: Option<String>,
}

// Payload de criação/edição (PUT substitui todos os campos)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInput {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Siti Rahayu")]
    pub name: String,

    #[validate(length(min = 1, max = 40, message = "required"))]
    #[schema(example = "19870412")]
    pub employee_number: String,

    pub division_id: Option<Uuid>,
    pub position_id: Option<Uuid>,

    #[validate(length(max = 10, message = "too_long"))]
    pub shoe_size: Option<String>,
    #[validate(length(max = 30, message = "too_long"))]
    pub helmet_color: Option<String>,
    #[validate(length(max = 10, message = "too_long"))]
    pub coverall_size: Option<String>,

    pub photo_url: Option<String>,
    pub document_url: Option<String>,
}

impl EmployeeInput {
    // Campos de texto opcionais chegam do formulário como "" quando vazios
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.name = self.name.trim().to_string();
        self.employee_number = self.employee_number.trim().to_string();
        self.shoe_size = blank_to_none(self.shoe_size);
        self.helmet_color = blank_to_none(self.helmet_color);
        self.coverall_size = blank_to_none(self.coverall_size);
        self.photo_url = blank_to_none(self.photo_url);
        self.document_url = blank_to_none(self.document_url);
        self
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct EmployeeFilter {
    /// Busca por nome ou NIP
    pub q: Option<String>,
    #[serde(alias = "division_id")]
    pub division_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn input() -> EmployeeInput {
        EmployeeInput {
            name: "  Siti  ".into(),
            employee_number: " 001 ".into(),
            division_id: None,
            position_id: None,
            shoe_size: Some("".into()),
            helmet_color: Some(" Kuning ".into()),
            coverall_size: None,
            photo_url: Some("   ".into()),
            document_url: None,
        }
    }

    #[test]
    fn normalized_trims_and_drops_blanks() {
        let n = input().normalized();
        assert_eq!(n.name, "Siti");
        assert_eq!(n.employee_number, "001");
        assert_eq!(n.shoe_size, None);
        assert_eq!(n.helmet_color.as_deref(), Some("Kuning"));
        assert_eq!(n.photo_url, None);
    }

    #[test]
    fn blank_name_fails_validation() {
        let mut i = input().normalized();
        i.name = String::new();
        let errors = i.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }
}
