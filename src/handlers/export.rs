// src/handlers/export.rs

use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
};

use crate::{
    common::error::ApiError,
    config::AppState,
    handlers::PeriodQuery,
    middleware::i18n::Locale,
    models::loan::LoanFilter,
    services::export_service::Export,
};

// Planilha como anexo, para o navegador baixar
fn attachment(export: Export) -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, Export::CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export.filename),
            ),
        ],
        export.bytes,
    )
}

#[utoipa::path(
    get,
    path = "/api/export/rekap",
    tag = "Export",
    params(PeriodQuery),
    responses((status = 200, description = "rekap-YYYY-MM.csv", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_rekap(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let export = app_state.export_service
        .rekap(&app_state.db_pool, period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(attachment(export))
}

#[utoipa::path(
    get,
    path = "/api/export/issuances",
    tag = "Export",
    params(PeriodQuery),
    responses((status = 200, description = "distribusi-YYYY-MM.csv", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_issuances(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<PeriodQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.resolve()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let export = app_state.export_service
        .issuances(&app_state.db_pool, period)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(attachment(export))
}

#[utoipa::path(
    get,
    path = "/api/export/employees",
    tag = "Export",
    responses((status = 200, description = "karyawan.csv", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_employees(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let export = app_state.export_service
        .employees(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(attachment(export))
}

#[utoipa::path(
    get,
    path = "/api/export/loans",
    tag = "Export",
    params(LoanFilter),
    responses((status = 200, description = "peminjaman.csv", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_loans(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<LoanFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let export = app_state.export_service
        .loans(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(attachment(export))
}

#[utoipa::path(
    get,
    path = "/api/export/procurements",
    tag = "Export",
    responses((status = 200, description = "pengadaan.csv", content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_procurements(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let export = app_state.export_service
        .procurements(&app_state.db_pool)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(attachment(export))
}
