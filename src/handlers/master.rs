// src/handlers/master.rs
//
// Cadastros auxiliares: workshops, divisões e cargos. As três tabelas têm o
// mesmo formato, então os handlers públicos só escolhem o `MasterKind`.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::master::{MasterKind, MasterRecord},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct MasterPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Workshop Fabrikasi")]
    pub name: String,
}

impl MasterPayload {
    // "   " vira "" e cai no `length(min = 1)`
    fn normalized(self) -> Self {
        Self { name: self.name.trim().to_string() }
    }
}

async fn list(app_state: AppState, locale: Locale, kind: MasterKind) -> Result<impl IntoResponse, ApiError> {
    let records = app_state.master_repo
        .list(&app_state.db_pool, kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(records)))
}

async fn create(
    app_state: AppState,
    locale: Locale,
    kind: MasterKind,
    payload: MasterPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state.master_repo
        .create(&app_state.db_pool, kind, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("➕ {} '{}' cadastrado", kind.label(), record.name);
    Ok((StatusCode::CREATED, Json(record)))
}

async fn rename(
    app_state: AppState,
    locale: Locale,
    kind: MasterKind,
    id: Uuid,
    payload: MasterPayload,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state.master_repo
        .rename(&app_state.db_pool, kind, id, &payload.name)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(record)))
}

async fn delete(
    app_state: AppState,
    locale: Locale,
    kind: MasterKind,
    id: Uuid,
) -> Result<impl IntoResponse, ApiError> {
    app_state.master_repo
        .delete(&app_state.db_pool, kind, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!("🗑️ {} {} removido", kind.label(), id);
    Ok(StatusCode::NO_CONTENT)
}

// --- Workshops ---

#[utoipa::path(
    get,
    path = "/api/workshops",
    tag = "Master Data",
    responses((status = 200, description = "Workshops em ordem alfabética", body = Vec<MasterRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_workshops(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    list(app_state, locale, MasterKind::Workshop).await
}

#[utoipa::path(
    post,
    path = "/api/workshops",
    tag = "Master Data",
    request_body = MasterPayload,
    responses(
        (status = 201, description = "Criado", body = MasterRecord),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_workshop(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(app_state, locale, MasterKind::Workshop, payload).await
}

#[utoipa::path(
    put,
    path = "/api/workshops/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = MasterPayload,
    responses(
        (status = 200, description = "Renomeado", body = MasterRecord),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_workshop(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    rename(app_state, locale, MasterKind::Workshop, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/workshops/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_workshop(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete(app_state, locale, MasterKind::Workshop, id).await
}

// --- Divisões ---

#[utoipa::path(
    get,
    path = "/api/divisions",
    tag = "Master Data",
    responses((status = 200, description = "Divisões em ordem alfabética", body = Vec<MasterRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_divisions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    list(app_state, locale, MasterKind::Division).await
}

#[utoipa::path(
    post,
    path = "/api/divisions",
    tag = "Master Data",
    request_body = MasterPayload,
    responses(
        (status = 201, description = "Criado", body = MasterRecord),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_division(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(app_state, locale, MasterKind::Division, payload).await
}

#[utoipa::path(
    put,
    path = "/api/divisions/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = MasterPayload,
    responses(
        (status = 200, description = "Renomeado", body = MasterRecord),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_division(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    rename(app_state, locale, MasterKind::Division, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/divisions/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_division(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete(app_state, locale, MasterKind::Division, id).await
}

// --- Cargos ---

#[utoipa::path(
    get,
    path = "/api/positions",
    tag = "Master Data",
    responses((status = 200, description = "Cargos em ordem alfabética", body = Vec<MasterRecord>)),
    security(("api_jwt" = []))
)]
pub async fn list_positions(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    list(app_state, locale, MasterKind::Position).await
}

#[utoipa::path(
    post,
    path = "/api/positions",
    tag = "Master Data",
    request_body = MasterPayload,
    responses(
        (status = 201, description = "Criado", body = MasterRecord),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_position(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    create(app_state, locale, MasterKind::Position, payload).await
}

#[utoipa::path(
    put,
    path = "/api/positions/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    request_body = MasterPayload,
    responses(
        (status = 200, description = "Renomeado", body = MasterRecord),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn rename_position(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<MasterPayload>,
) -> Result<impl IntoResponse, ApiError> {
    rename(app_state, locale, MasterKind::Position, id, payload).await
}

#[utoipa::path(
    delete,
    path = "/api/positions/{id}",
    tag = "Master Data",
    params(("id" = Uuid, Path, description = "ID do registro")),
    responses(
        (status = 204, description = "Removido"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_position(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    delete(app_state, locale, MasterKind::Position, id).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected_after_trimming() {
        let payload = MasterPayload { name: "   ".into() }.normalized();
        let errors = payload.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("name"));
    }

    #[test]
    fn surrounding_spaces_are_dropped() {
        let payload = MasterPayload { name: "  Workshop Las ".into() }.normalized();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.name, "Workshop Las");
    }
}
