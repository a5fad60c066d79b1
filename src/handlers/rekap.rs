// src/handlers/rekap.rs

use std::collections::HashMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::{
    common::{
        error::{ApiError, AppError},
        period::Period,
    },
    config::AppState,
    handlers::PeriodQuery,
    middleware::i18n::Locale,
    models::rekap::{RekapEntry, RekapRow},
};

fn validate_realisasi_map(values: &HashMap<Uuid, i32>) -> Result<(), ValidationError> {
    if values.values().any(|v| *v < 0) {
        let mut err = ValidationError::new("range");
        err.message = Some("not_negative".into());
        return Err(err);
    }
    Ok(())
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRekapPayload {
    /// `YYYY-MM`; sem valor, o mês corrente
    #[schema(example = "2025-01")]
    pub period: Option<String>,

    /// Realisasi por item (`itemId -> quantidade`). Itens ausentes mantêm o valor já gravado.
    #[validate(custom(function = "validate_realisasi_map"))]
    #[serde(default)]
    pub realisasi: HashMap<Uuid, i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateRealisasiPayload {
    #[validate(range(min = 0, message = "not_negative"))]
    #[schema(example = 24)]
    pub realisasi: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DeletedRekap {
    pub period: String,
    pub removed: u64,
}

#[utoipa::path(
    get,
    path = "/api/rekap",
    tag = "Rekap",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Linhas do período, por nome do item", body = Vec<RekapEntry>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_rekap(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let rows = app_state.rekap_service
        .list(&app_state.db_pool, period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/rekap/generate",
    tag = "Rekap",
    request_body = GenerateRekapPayload,
    responses(
        (status = 200, description = "Rekap (re)gerado", body = Vec<RekapEntry>),
        (status = 400, description = "Período ou realisasi inválidos"),
        (status = 422, description = "Item inexistente na realisasi ou quantidade fora do intervalo")
    ),
    security(("api_jwt" = []))
)]
pub async fn generate_rekap(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<GenerateRekapPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let period = PeriodQuery { period: payload.period }
        .resolve()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let rows = app_state.rekap_service
        .generate(&app_state.db_pool, period, &payload.realisasi)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    put,
    path = "/api/rekap/{id}/realisasi",
    tag = "Rekap",
    params(("id" = Uuid, Path, description = "ID da linha do rekap")),
    request_body = UpdateRealisasiPayload,
    responses(
        (status = 200, description = "Linha com saldo recalculado", body = RekapRow),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_realisasi(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateRealisasiPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let row = app_state.rekap_service
        .update_realisasi(&app_state.db_pool, id, payload.realisasi)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(row)))
}

#[utoipa::path(
    delete,
    path = "/api/rekap",
    tag = "Rekap",
    params(PeriodQuery),
    responses(
        (status = 200, description = "Linhas removidas", body = DeletedRekap),
        (status = 400, description = "Período ausente ou inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_rekap(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Apagar exige o período explícito
    let raw = query.period.as_deref().unwrap_or_default();
    let period = Period::parse(raw)
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let removed = app_state.rekap_service
        .delete_period(&app_state.db_pool, period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(DeletedRekap { period: period.label(), removed })))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negative_realisasi_in_generate_is_rejected() {
        let mut realisasi = serde_json::Map::new();
        realisasi.insert(Uuid::nil().to_string(), serde_json::json!(-5));
        let payload: GenerateRekapPayload = serde_json::from_value(serde_json::json!({
            "period": "2025-01",
            "realisasi": realisasi
        }))
        .unwrap();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("realisasi"));
    }

    #[test]
    fn realisasi_map_is_optional() {
        let payload: GenerateRekapPayload =
            serde_json::from_value(serde_json::json!({ "period": "2025-01" })).unwrap();
        assert!(payload.realisasi.is_empty());
        assert!(payload.validate().is_ok());
    }
}
