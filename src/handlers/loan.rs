// src/handlers/loan.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::loan::{Loan, LoanFilter, LoanInput, LoanListEntry},
};

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReturnLoanPayload {
    /// Sem valor, a data de hoje
    pub returned_on: Option<NaiveDate>,
}

#[utoipa::path(
    get,
    path = "/api/loans",
    tag = "Loans",
    params(LoanFilter),
    responses((status = 200, description = "Empréstimos", body = Vec<LoanListEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_loans(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<LoanFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let loans = app_state.loan_repo
        .list(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(loans)))
}

#[utoipa::path(
    post,
    path = "/api/loans",
    tag = "Loans",
    request_body = LoanInput,
    responses(
        (status = 201, description = "Empréstimo registrado", body = Loan),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_loan(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    payload.check_dates()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let loan = app_state.loan_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(borrower = %loan.borrower_name, item = %loan.item_name, "🤝 Empréstimo registrado");
    Ok((StatusCode::CREATED, Json(loan)))
}

#[utoipa::path(
    get,
    path = "/api/loans/{id}",
    tag = "Loans",
    params(("id" = Uuid, Path, description = "ID do empréstimo")),
    responses(
        (status = 200, description = "Empréstimo", body = Loan),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_loan(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let loan = app_state.loan_repo
        .find(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(loan)))
}

#[utoipa::path(
    put,
    path = "/api/loans/{id}",
    tag = "Loans",
    params(("id" = Uuid, Path, description = "ID do empréstimo")),
    request_body = LoanInput,
    responses(
        (status = 200, description = "Empréstimo atualizado", body = Loan),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_loan(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<LoanInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;
    payload.check_dates()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let loan = app_state.loan_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(loan)))
}

#[utoipa::path(
    post,
    path = "/api/loans/{id}/return",
    tag = "Loans",
    params(("id" = Uuid, Path, description = "ID do empréstimo")),
    request_body = ReturnLoanPayload,
    responses(
        (status = 200, description = "Devolução registrada", body = Loan),
        (status = 400, description = "Devolução antes do empréstimo"),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Já devolvido")
    ),
    security(("api_jwt" = []))
)]
pub async fn return_loan(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReturnLoanPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let returned_on = payload.returned_on
        .unwrap_or_else(|| chrono::Local::now().date_naive());

    let loan = app_state.loan_service
        .return_item(&app_state.db_pool, id, returned_on)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(loan)))
}

#[utoipa::path(
    delete,
    path = "/api/loans/{id}",
    tag = "Loans",
    params(("id" = Uuid, Path, description = "ID do empréstimo")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_loan(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.loan_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(loan = %id, "🗑️ Empréstimo removido");
    Ok(StatusCode::NO_CONTENT)
}
