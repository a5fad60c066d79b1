// src/handlers/procurement.rs

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
    handlers::SearchQuery,
    middleware::i18n::Locale,
    models::procurement::{ProcurementInput, ProcurementList, ProcurementRequest},
};

#[utoipa::path(
    get,
    path = "/api/procurements",
    tag = "Procurement",
    params(SearchQuery),
    responses((status = 200, description = "Pedidos de compra com o total geral", body = ProcurementList)),
    security(("api_jwt" = []))
)]
pub async fn list_procurements(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state.procurement_repo
        .list(&app_state.db_pool, query.term())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(ProcurementList::new(items))))
}

#[utoipa::path(
    post,
    path = "/api/procurements",
    tag = "Procurement",
    request_body = ProcurementInput,
    responses(
        (status = 201, description = "Pedido registrado; total calculado pelo banco", body = ProcurementRequest),
        (status = 400, description = "Dados inválidos")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_procurement(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ProcurementInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state.procurement_repo
        .create(&app_state.db_pool, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(project = %request.project_name, total = %request.total, "🛒 Pedido de compra registrado");
    Ok((StatusCode::CREATED, Json(request)))
}

#[utoipa::path(
    get,
    path = "/api/procurements/{id}",
    tag = "Procurement",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 200, description = "Pedido", body = ProcurementRequest),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_procurement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let request = app_state.procurement_repo
        .find(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(request)))
}

#[utoipa::path(
    put,
    path = "/api/procurements/{id}",
    tag = "Procurement",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    request_body = ProcurementInput,
    responses(
        (status = 200, description = "Pedido atualizado", body = ProcurementRequest),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_procurement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<ProcurementInput>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let request = app_state.procurement_repo
        .update(&app_state.db_pool, id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(request)))
}

#[utoipa::path(
    delete,
    path = "/api/procurements/{id}",
    tag = "Procurement",
    params(("id" = Uuid, Path, description = "ID do pedido")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_procurement(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.procurement_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(procurement = %id, "🗑️ Pedido de compra removido");
    Ok(StatusCode::NO_CONTENT)
}
