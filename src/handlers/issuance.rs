// src/handlers/issuance.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::{
        error::{ApiError, AppError},
        period::Period,
    },
    config::AppState,
    middleware::i18n::Locale,
    models::issuance::{DailyIssuance, IssuanceListEntry},
};

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssuancePayload {
    pub item_id: Uuid,

    /// Sem valor, a data de hoje
    pub issued_on: Option<NaiveDate>,

    #[validate(length(min = 1, max = 120, message = "required"))]
    #[schema(example = "Agus")]
    pub recipient_name: String,

    pub workshop_id: Option<Uuid>,

    #[validate(range(min = 1, message = "must_be_positive"))]
    #[schema(example = 2)]
    pub quantity: i32,
}

impl CreateIssuancePayload {
    fn normalized(mut self) -> Self {
        self.recipient_name = self.recipient_name.trim().to_string();
        self
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct IssuanceQuery {
    /// `YYYY-MM`; sem valor, todos os períodos
    pub period: Option<String>,
    #[serde(alias = "item_id")]
    pub item_id: Option<Uuid>,
}

#[utoipa::path(
    get,
    path = "/api/issuances",
    tag = "Issuances",
    params(IssuanceQuery),
    responses(
        (status = 200, description = "Distribuições, mais recentes primeiro", body = Vec<IssuanceListEntry>),
        (status = 400, description = "Período inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_issuances(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<IssuanceQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let period = query.period
        .as_deref()
        .filter(|p| !p.trim().is_empty())
        .map(Period::parse)
        .transpose()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let rows = app_state.issuance_repo
        .list(&app_state.db_pool, period, query.item_id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(rows)))
}

#[utoipa::path(
    post,
    path = "/api/issuances",
    tag = "Issuances",
    request_body = CreateIssuancePayload,
    responses(
        (status = 201, description = "Distribuição registrada", body = DailyIssuance),
        (status = 400, description = "Dados inválidos"),
        (status = 422, description = "Item ou workshop inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_issuance(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<CreateIssuancePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let payload = payload.normalized();
    payload.validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale, &app_state.i18n_store))?;

    let issued_on = payload.issued_on.unwrap_or_else(|| chrono::Local::now().date_naive());

    let issuance = app_state.issuance_repo
        .create(
            &app_state.db_pool,
            payload.item_id,
            issued_on,
            &payload.recipient_name,
            payload.workshop_id,
            payload.quantity,
        )
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(
        item = %issuance.item_id,
        quantity = issuance.quantity,
        period = %issuance.period,
        "📤 Distribuição registrada"
    );
    Ok((StatusCode::CREATED, Json(issuance)))
}

#[utoipa::path(
    delete,
    path = "/api/issuances/{id}",
    tag = "Issuances",
    params(("id" = Uuid, Path, description = "ID da distribuição")),
    responses(
        (status = 204, description = "Removida; deixa de contar na distribusi do período"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_issuance(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.issuance_repo
        .delete(&app_state.db_pool, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(issuance = %id, "🗑️ Distribuição removida");
    Ok(StatusCode::NO_CONTENT)
}
