// src/handlers/employee.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::employee::{Employee, EmployeeFilter, EmployeeInput, EmployeeListEntry},
};

#[utoipa::path(
    get,
    path = "/api/employees",
    tag = "Employees",
    params(EmployeeFilter),
    responses((status = 200, description = "Karyawan com divisão e cargo", body = Vec<EmployeeListEntry>)),
    security(("api_jwt" = []))
)]
pub async fn list_employees(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<EmployeeFilter>,
) -> Result<impl IntoResponse, ApiError> {
    let employees = app_state.employee_repo
        .list(&app_state.db_pool, &filter)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employees)))
}

#[utoipa::path(
    post,
    path = "/api/employees",
    tag = "Employees",
    request_body = EmployeeInput,
    responses(
        (status = 201, description = "Karyawan cadastrado", body = Employee),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "NIP já cadastrado"),
        (status = 422, description = "Divisão ou cargo inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<EmployeeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state.employee_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(nip = %employee.employee_number, "👷 Karyawan cadastrado");
    Ok((StatusCode::CREATED, Json(employee)))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do karyawan")),
    responses(
        (status = 200, description = "Karyawan", body = Employee),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let employee = app_state.employee_repo
        .find(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do karyawan")),
    request_body = EmployeeInput,
    responses(
        (status = 200, description = "Karyawan atualizado", body = Employee),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "NIP já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<EmployeeInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let employee = app_state.employee_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(employee)))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    tag = "Employees",
    params(("id" = Uuid, Path, description = "ID do karyawan")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_employee(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.employee_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(employee = %id, "🗑️ Karyawan removido");
    Ok(StatusCode::NO_CONTENT)
}
