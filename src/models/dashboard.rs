// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;
use utoipa::ToSchema;

// Os cards do topo do painel
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_employees: i64,
    pub total_equipment_items: i64,
    pub total_stock: i64,         // Soma das quantidades atuais
    pub active_loans: i64,        // Empréstimos sem data de devolução
    pub issued_this_period: i64,  // Distribuído no mês corrente
    pub procurement_total: Decimal,
}
