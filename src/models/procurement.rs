// src/models/procurement.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

// Pedido de compra. `total` é coluna GENERATED (quantity * unit_price) no banco.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementRequest {
    pub id: Uuid,
    #[schema(example = "Proyek Jembatan Kali Brantas")]
    pub project_name: String,
    pub project_location: Option<String>,
    pub requested_by: Option<String>,
    #[schema(example = "Sarung Tangan Kulit")]
    pub item_name: String,
    #[schema(example = "pasang")]
    pub unit: String,
    #[schema(example = 50)]
    pub quantity: i32,
    #[schema(example = 35000.0)]
    pub unit_price: Decimal,
    #[schema(example = 1750000.0)]
    pub total: Decimal,
    pub requested_on: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProcurementList {
    pub items: Vec<ProcurementRequest>,
    pub grand_total: Decimal,
}

impl ProcurementList {
    pub fn new(items: Vec<ProcurementRequest>) -> Self {
        let grand_total = items.iter().map(|p| p.total).sum();
        Self { items, grand_total }
    }
}

// Limites das colunas: unit_price NUMERIC(14, 2) e total NUMERIC(16, 2)
const MAX_UNIT_PRICE: i64 = 1_000_000_000_000;
const MAX_TOTAL: i64 = 100_000_000_000_000;

fn validate_unit_price(val: &Decimal) -> Result<(), ValidationError> {
    if val.is_sign_negative() && !val.is_zero() {
        let mut err = ValidationError::new("range");
        err.message = Some("not_negative".into());
        return Err(err);
    }
    if val.round_dp(2) >= Decimal::from(MAX_UNIT_PRICE) {
        let mut err = ValidationError::new("range");
        err.message = Some("too_large".into());
        return Err(err);
    }
    Ok(())
}

fn validate_total_fits(input: &ProcurementInput) -> Result<(), ValidationError> {
    let fits = Decimal::from(input.quantity)
        .checked_mul(input.unit_price.round_dp(2))
        .is_some_and(|total| total.abs() < Decimal::from(MAX_TOTAL));
    if !fits {
        let mut err = ValidationError::new("total");
        err.message = Some("total_too_large".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_total_fits"))]
pub struct ProcurementInput {
    #[validate(length(min = 1, max = 200, message = "required"))]
    pub project_name: String,
    pub project_location: Option<String>,
    pub requested_by: Option<String>,

    #[validate(length(min = 1, max = 200, message = "required"))]
    pub item_name: String,

    #[validate(length(min = 1, max = 20, message = "required"))]
    pub unit: String,

    #[validate(range(min = 1, message = "must_be_positive"))]
    pub quantity: i32,

    #[validate(custom(function = "validate_unit_price"))]
    pub unit_price: Decimal,

    /// Se omitido, o banco usa a data de hoje
    pub requested_on: Option<NaiveDate>,
}

impl ProcurementInput {
    pub fn normalized(mut self) -> Self {
        fn blank_to_none(v: Option<String>) -> Option<String> {
            v.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
        }
        self.project_name = self.project_name.trim().to_string();
        self.item_name = self.item_name.trim().to_string();
        self.unit = self.unit.trim().to_string();
        self.project_location = blank_to_none(self.project_location);
        self.requested_by = blank_to_none(self.requested_by);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn request(quantity: i32, unit_price: &str) -> ProcurementRequest {
        let price = Decimal::from_str(unit_price).unwrap();
        ProcurementRequest {
            id: Uuid::new_v4(),
            project_name: "P".into(),
            project_location: None,
            requested_by: None,
            item_name: "Masker".into(),
            unit: "box".into(),
            quantity,
            unit_price: price,
            total: price * Decimal::from(quantity),
            requested_on: NaiveDate::from_ymd_opt(2025, 1, 1).unwrap(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn grand_total_sums_every_request() {
        let list = ProcurementList::new(vec![request(2, "10.50"), request(3, "100")]);
        assert_eq!(list.grand_total, Decimal::from_str("321.00").unwrap());
    }

    #[test]
    fn empty_list_totals_zero() {
        assert_eq!(ProcurementList::new(Vec::new()).grand_total, Decimal::ZERO);
    }

    #[test]
    fn negative_price_is_rejected() {
        let input: ProcurementInput = serde_json::from_value(serde_json::json!({
            "projectName": "Gedung A",
            "itemName": "Sepatu Safety",
            "unit": "pasang",
            "quantity": 0,
            "unitPrice": -1.0
        }))
        .unwrap();
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("quantity"));
        assert!(fields.contains_key("unit_price"));
    }

    fn input(quantity: i32, unit_price: &str) -> ProcurementInput {
        serde_json::from_value(serde_json::json!({
            "projectName": " Gedung A ",
            "itemName": "Sepatu Safety",
            "unit": "pasang",
            "quantity": quantity,
            "unitPrice": unit_price.parse::<f64>().unwrap()
        }))
        .unwrap()
    }

    #[test]
    fn price_beyond_the_column_is_rejected() {
        let errors = input(1, "1000000000000").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("unit_price"));
        assert!(input(1, "999999999999.99").validate().is_ok());
    }

    #[test]
    fn total_beyond_the_column_is_rejected() {
        // 1.000.000 x 1.000.000.000 = 10^15, não cabe em NUMERIC(16, 2)
        let errors = input(1_000_000, "1000000000").validate().unwrap_err();
        assert!(errors.field_errors().contains_key("__all__"));
        assert!(input(1_000, "1000000000").validate().is_ok());
    }

    #[test]
    fn blank_names_fail_after_normalizing() {
        let mut raw = input(1, "10");
        raw.item_name = "   ".into();
        raw.requested_by = Some(" ".into());
        let normalized = raw.normalized();
        assert_eq!(normalized.project_name, "Gedung A");
        assert!(normalized.requested_by.is_none());
        assert!(normalized.validate().unwrap_err().field_errors().contains_key("item_name"));
    }
}
