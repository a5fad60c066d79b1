// src/models/loan.rs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Loan {
    pub id: Uuid,
    #[schema(example = "Dewi")]
    pub borrower_name: String,
    pub division_id: Option<Uuid>,
    #[schema(example = "Full Body Harness")]
    pub item_name: String,
    pub quantity: i32,
    pub borrowed_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanListEntry {
    pub id: Uuid,
    pub borrower_name: String,
    pub division_id: Option<Uuid>,
    pub division_name: Option<String>,
    pub item_name: String,
    pub quantity: i32,
    pub borrowed_on: NaiveDate,
    pub returned_on: Option<NaiveDate>,
    pub notes: Option<String>,
}

impl LoanListEntry {
    pub fn status(&self) -> LoanStatus {
        LoanStatus::of(self.returned_on)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LoanStatus {
    #[default]
    All,
    Active,
    Returned,
}

impl LoanStatus {
    pub fn of(returned_on: Option<NaiveDate>) -> Self {
        match returned_on {
            Some(_) => LoanStatus::Returned,
            None => LoanStatus::Active,
        }
    }

    // Rótulo usado na planilha
    pub fn label(&self) -> &'static str {
        match self {
            LoanStatus::All => "Semua",
            LoanStatus::Active => "Dipinjam",
            LoanStatus::Returned => "Dikembalikan",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoanInput {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub borrower_name: String,

    pub division_id: Option<Uuid>,

    #[validate(length(min = 1, max = 120, message = "required"))]
    pub item_name: String,

    #[validate(range(min = 1, message = "must_be_positive"))]
    #[serde(default = "default_quantity")]
    pub quantity: i32,

    pub borrowed_on: NaiveDate,

    pub returned_on: Option<NaiveDate>,

    #[validate(length(max = 500, message = "too_long"))]
    pub notes: Option<String>,
}

fn default_quantity() -> i32 {
    1
}

impl LoanInput {
    pub fn normalized(mut self) -> Self {
        self.borrower_name = self.borrower_name.trim().to_string();
        self.item_name = self.item_name.trim().to_string();
        self.notes = self.notes.map(|n| n.trim().to_string()).filter(|n| !n.is_empty());
        self
    }

    pub fn check_dates(&self) -> Result<(), crate::common::error::AppError> {
        match self.returned_on {
            Some(ret) if ret < self.borrowed_on => Err(crate::common::error::AppError::ReturnBeforeBorrow),
            _ => Ok(()),
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LoanFilter {
    #[serde(default)]
    pub status: LoanStatus,
    pub q: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn status_follows_the_return_date() {
        assert_eq!(LoanStatus::of(None), LoanStatus::Active);
        assert_eq!(LoanStatus::of(Some(d(2025, 1, 2))), LoanStatus::Returned);
    }

    #[test]
    fn return_cannot_precede_borrow() {
        let loan: LoanInput = serde_json::from_value(serde_json::json!({
            "borrowerName": "Dewi",
            "itemName": "Harness",
            "borrowedOn": "2025-01-10",
            "returnedOn": "2025-01-09"
        }))
        .unwrap();
        assert_eq!(loan.quantity, 1);
        assert!(loan.check_dates().is_err());
    }

    #[test]
    fn blank_names_fail_after_normalizing() {
        let loan: LoanInput = serde_json::from_value(serde_json::json!({
            "borrowerName": "  ",
            "itemName": " Harness ",
            "borrowedOn": "2025-01-10",
            "notes": "   "
        }))
        .unwrap();
        let loan = loan.normalized();
        assert_eq!(loan.item_name, "Harness");
        assert!(loan.notes.is_none());
        assert!(loan.validate().unwrap_err().field_errors().contains_key("borrower_name"));
    }

    #[test]
    fn filter_defaults_to_all() {
        let f: LoanFilter = serde_json::from_str("{}").unwrap();
        assert_eq!(f.status, LoanStatus::All);
        let f: LoanFilter = serde_json::from_str(r#"{"status":"active"}"#).unwrap();
        assert_eq!(f.status, LoanStatus::Active);
    }
}
