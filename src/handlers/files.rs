// src/handlers/files.rs

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::file::{FileKind, FileRecord},
    services::file_service::Upload,
};

/// Formulário do upload (documentação apenas; o corpo é lido como multipart).
#[derive(ToSchema)]
#[allow(dead_code)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
    #[schema(example = "employee_photo")]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct FileQuery {
    /// Filtra pelo tipo (`employee_photo`, `loan_document`...)
    pub kind: Option<String>,
}

fn multipart_error(e: MultipartError, limit: u64) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge { limit }
    } else {
        AppError::InvalidUpload(e.body_text())
    }
}

fn parse_kind(raw: &str) -> Result<FileKind, AppError> {
    raw.parse::<FileKind>().map_err(AppError::InvalidUpload)
}

/// Lê os campos `file` e `kind` do formulário.
async fn read_upload(multipart: &mut Multipart, limit: u64) -> Result<Upload, AppError> {
    let mut kind = FileKind::General;
    let mut file: Option<(String, Option<String>, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| multipart_error(e, limit))? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let original_name = field.file_name().unwrap_or("arquivo").to_string();
                let content_type = field.content_type().map(str::to_string);
                let data = field.bytes().await.map_err(|e| multipart_error(e, limit))?;
                if data.len() as u64 > limit {
                    return Err(AppError::PayloadTooLarge { limit });
                }
                file = Some((original_name, content_type, data.to_vec()));
            }
            Some("kind") => {
                let raw = field.text().await.map_err(|e| multipart_error(e, limit))?;
                kind = parse_kind(&raw)?;
            }
            // Campos desconhecidos são ignorados
            _ => {}
        }
    }

    let (original_name, content_type, data) =
        file.ok_or_else(|| AppError::InvalidUpload("campo 'file' ausente".to_string()))?;
    if data.is_empty() {
        return Err(AppError::InvalidUpload("arquivo vazio".to_string()));
    }

    Ok(Upload { kind, original_name, content_type, data })
}

#[utoipa::path(
    post,
    path = "/api/files",
    tag = "Files",
    request_body(content = UploadForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Arquivo gravado e registrado", body = FileRecord),
        (status = 400, description = "Upload inválido"),
        (status = 413, description = "Arquivo grande demais")
    ),
    security(("api_jwt" = []))
)]
pub async fn upload_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let upload = read_upload(&mut multipart, app_state.config.max_upload_bytes)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let record = app_state.file_service
        .upload(&app_state.db_pool, user.id, upload)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/files",
    tag = "Files",
    params(FileQuery),
    responses(
        (status = 200, description = "Arquivos do usuário", body = Vec<FileRecord>),
        (status = 400, description = "Tipo desconhecido")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_files(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(query): Query<FileQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let kind = query.kind
        .as_deref()
        .filter(|k| !k.trim().is_empty())
        .map(parse_kind)
        .transpose()
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    let files = app_state.file_service
        .list(&app_state.db_pool, user.id, kind)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok((StatusCode::OK, Json(files)))
}

#[utoipa::path(
    delete,
    path = "/api/files/{id}",
    tag = "Files",
    params(("id" = Uuid, Path, description = "ID do registro do arquivo")),
    responses(
        (status = 204, description = "Registro e objeto removidos"),
        (status = 403, description = "Arquivo de outro usuário"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_file(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    app_state.file_service
        .delete(&app_state.db_pool, user.id, id)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    tracing::info!(file = %id, "🗑️ Arquivo removido");
    Ok(StatusCode::NO_CONTENT)
}

// GET /files/{*path} (público, fora de /api)
#[utoipa::path(
    get,
    path = "/files/{path}",
    tag = "Files",
    params(("path" = String, Path, description = "Caminho do objeto no storage")),
    responses(
        (status = 200, description = "Conteúdo do arquivo"),
        (status = 404, description = "Objeto inexistente")
    )
)]
pub async fn download_file(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(path): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let (bytes, content_type) = app_state.file_service
        .download(&path)
        .await
        .map_err(|e| e.to_api_error(&locale, &app_state.i18n_store))?;

    Ok(([(header::CONTENT_TYPE, content_type)], bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_kind_is_an_invalid_upload() {
        assert!(matches!(parse_kind("avatar"), Err(AppError::InvalidUpload(_))));
        assert_eq!(parse_kind("loan_document").unwrap(), FileKind::LoanDocument);
    }
}
