// src/handlers/equipment.rs

use axum::{
    extract::{Path, Query, State},
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
    handlers::SearchQuery,
    middleware::i18n::Locale,
    models::equipment::EquipmentItem,
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipmentPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Helm Safety")]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "required"))]
    #[schema(example = "pcs")]
    pub unit: String,

    // Estoque inicial; sem valor, começa zerado
    #[validate(range(min = 0, message = "not_negative"))]
    #[serde(default)]
    pub quantity: i32,
}

impl CreateEquipmentPayload {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.unit = self.unit.trim().to_string();
        self
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipmentPayload {
    #[validate(length(min = 1, max = 120, message = "required"))]
    pub name: String,

    #[validate(length(min = 1, max = 20, message = "required"))]
    pub unit: String,
}

impl UpdateEquipmentPayload {
    fn normalized(mut self) -> Self {
        self.name = self.name.trim().to_string();
        self.unit = self.unit.trim().to_string();
        self
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StockOpnamePayload {
    /// Quantidade contada fisicamente
    #[validate(range(min = 0, message = "not_negative"))]
    #[schema(example = 96)]
    pub quantity: i32,
}

#[utoipa::path(
    get,
    path = "/api/equipment",
    tag = "Equipment",
    params(SearchQuery),
    responses((status = 200, description = "Itens de APD", body = Vec<EquipmentItem>)),
    security(("api_jwt" = []))
)]
pub async fn list_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<SearchQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let items = app_state.equipment_repo
        .list(&app_state.db_pool, query.term())
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(items)))
}

#[utoipa::path(
    post,
    path = "/api/equipment",
    tag = "Equipment",
    request_body = CreateEquipmentPayload,
    responses(
        (status = 201, description = "Item criado", body = EquipmentItem),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateEquipmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state.equipment_repo
        .create(&app_state.db_pool, &payload.name, &payload.unit, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(item = %item.name, quantity = item.quantity, "🦺 Item de APD cadastrado");
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 200, description = "Item", body = EquipmentItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let item = app_state.equipment_repo
        .find(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    put,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = UpdateEquipmentPayload,
    responses(
        (status = 200, description = "Item atualizado", body = EquipmentItem),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Nome já cadastrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateEquipmentPayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state.equipment_repo
        .update(&app_state.db_pool, id, &payload.name, &payload.unit)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[utoipa::path(
    delete,
    path = "/api/equipment/{id}",
    tag = "Equipment",
    params(("id" = Uuid, Path, description = "ID do item")),
    responses(
        (status = 204, description = "Item removido (junto com suas distribuições e rekap)"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_equipment(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.equipment_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(item = %id, "🗑️ Item de APD removido");
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/api/equipment/{id}/stock-opname",
    tag = "Equipment",
    params(("id" = Uuid, Path, description = "ID do item")),
    request_body = StockOpnamePayload,
    responses(
        (status = 200, description = "Saldo substituído pela contagem", body = EquipmentItem),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn stock_opname(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
    Json(payload): Json<StockOpnamePayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let item = app_state.equipment_service
        .stock_opname(&app_state.db_pool, id, payload.quantity)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(item)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_or_unit_is_rejected() {
        let payload: CreateEquipmentPayload =
            serde_json::from_value(serde_json::json!({ "name": "  ", "unit": "\t" })).unwrap();
        let errors = payload.normalized().validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("unit"));

        let update = UpdateEquipmentPayload { name: " ".into(), unit: "pcs".into() }.normalized();
        assert!(update.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn names_are_stored_trimmed() {
        let payload: CreateEquipmentPayload =
            serde_json::from_value(serde_json::json!({ "name": " Helm Safety ", "unit": " pcs" })).unwrap();
        let payload = payload.normalized();
        assert!(payload.validate().is_ok());
        assert_eq!(payload.name, "Helm Safety");
        assert_eq!(payload.unit, "pcs");
        assert_eq!(payload.quantity, 0);
    }
}
