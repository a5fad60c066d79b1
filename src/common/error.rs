// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale, storage::StorageError};

// O erro de domínio. Repositórios e serviços só conhecem este tipo;
// a tradução para HTTP acontece no handler via `to_api_error`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Recurso não encontrado: {0}")]
    ResourceNotFound(String),

    #[error("Nome já cadastrado: {0}")]
    DuplicateName(String),

    #[error("NIP já cadastrado: {0}")]
    EmployeeNumberTaken(String),

    #[error("Referência inexistente: {0}")]
    ReferenceNotFound(String),

    #[error("Período inválido: {0}")]
    InvalidPeriod(String),

    #[error("Quantidade fora do intervalo permitido")]
    QuantityOverflow,

    #[error("Empréstimo já devolvido")]
    LoanAlreadyReturned,

    #[error("Data de devolução anterior ao empréstimo")]
    ReturnBeforeBorrow,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Upload inválido: {0}")]
    InvalidUpload(String),

    #[error("Arquivo excede o limite de {limit} bytes")]
    PayloadTooLarge { limit: u64 },

    #[error("Erro de storage: {0}")]
    StorageError(#[from] StorageError),

    #[error("Erro ao gerar planilha: {0}")]
    ExportError(#[from] csv::Error),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O corpo de erro que chega ao cliente.
#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl ApiError {
    pub fn new(status: StatusCode, error: impl Into<String>) -> Self {
        Self { status, error: error.into(), details: None }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status;
        (status, Json(self)).into_response()
    }
}

impl AppError {
    /// Status HTTP e chave de tradução de cada variante.
    fn status_and_key(&self) -> (StatusCode, &'static str) {
        match self {
            AppError::ValidationError(_) => (StatusCode::BAD_REQUEST, "errors.validation"),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "errors.email_taken"),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "errors.invalid_credentials"),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "errors.invalid_token"),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "errors.user_not_found"),
            AppError::ResourceNotFound(_) => (StatusCode::NOT_FOUND, "errors.not_found"),
            AppError::DuplicateName(_) => (StatusCode::CONFLICT, "errors.duplicate_name"),
            AppError::EmployeeNumberTaken(_) => (StatusCode::CONFLICT, "errors.employee_number_taken"),
            AppError::ReferenceNotFound(_) => (StatusCode::UNPROCESSABLE_ENTITY, "errors.reference_not_found"),
            AppError::InvalidPeriod(_) => (StatusCode::BAD_REQUEST, "errors.invalid_period"),
            AppError::QuantityOverflow => (StatusCode::UNPROCESSABLE_ENTITY, "errors.quantity_overflow"),
            AppError::LoanAlreadyReturned => (StatusCode::CONFLICT, "errors.loan_already_returned"),
            AppError::ReturnBeforeBorrow => (StatusCode::BAD_REQUEST, "errors.return_before_borrow"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "errors.forbidden"),
            AppError::InvalidUpload(_) => (StatusCode::BAD_REQUEST, "errors.invalid_upload"),
            AppError::PayloadTooLarge { .. } => (StatusCode::PAYLOAD_TOO_LARGE, "errors.payload_too_large"),
            AppError::StorageError(StorageError::NotFound(_))
            | AppError::StorageError(StorageError::InvalidPath(_)) => (StatusCode::NOT_FOUND, "errors.not_found"),
            AppError::StorageError(StorageError::SizeLimitExceeded { .. }) => {
                (StatusCode::PAYLOAD_TOO_LARGE, "errors.payload_too_large")
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "errors.internal"),
        }
    }

    // Argumentos interpolados na mensagem traduzida.
    fn message_args(&self) -> Vec<(&'static str, String)> {
        match self {
            AppError::ResourceNotFound(what)
            | AppError::ReferenceNotFound(what) => vec![("resource", what.clone())],
            AppError::DuplicateName(name) => vec![("name", name.clone())],
            AppError::EmployeeNumberTaken(number) => vec![("number", number.clone())],
            AppError::InvalidPeriod(raw) => vec![("value", raw.clone())],
            AppError::InvalidUpload(reason) => vec![("reason", reason.clone())],
            AppError::PayloadTooLarge { limit }
            | AppError::StorageError(StorageError::SizeLimitExceeded { limit, .. }) => {
                vec![("limit", limit.to_string())]
            }
            AppError::StorageError(StorageError::NotFound(path))
            | AppError::StorageError(StorageError::InvalidPath(path)) => vec![("resource", path.clone())],
            _ => Vec::new(),
        }
    }

    /// Converte o erro de domínio na resposta HTTP, já traduzida para o idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let (status, key) = self.status_and_key();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe fica só no log
            tracing::error!("Erro Interno do Servidor: {}", self);
        }

        let args = self.message_args();
        let args_ref: Vec<(&str, &str)> = args.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let message = store.translate_with(&locale.0, key, &args_ref);

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut details = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            let code = e.message.as_deref().unwrap_or(e.code.as_ref());
                            store.translate(&locale.0, &format!("validation.{}", code))
                        })
                        .collect();
                    details.insert(field.to_string(), json!(messages));
                }
                Some(Value::Object(details))
            }
            _ => None,
        };

        ApiError { status, error: message, details }
    }
}

/// Converte violações de constraint do Postgres no erro de domínio correspondente.
/// `unique` é chamado com o nome da constraint violada.
pub fn map_db_error(
    e: sqlx::Error,
    unique: impl FnOnce(&str) -> Option<AppError>,
) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_unique_violation() {
            if let Some(err) = unique(db_err.constraint().unwrap_or_default()) {
                return err;
            }
        }
        if db_err.is_foreign_key_violation() {
            let constraint = db_err.constraint().unwrap_or_default().to_string();
            return AppError::ReferenceNotFound(constraint);
        }
        if db_err.is_check_violation() {
            return match db_err.constraint() {
                Some("loans_return_after_borrow") => AppError::ReturnBeforeBorrow,
                // As demais CHECKs são todas de faixa de quantidade/preço
                _ => AppError::QuantityOverflow,
            };
        }
        // numeric_value_out_of_range
        if db_err.code().as_deref() == Some("22003") {
            return AppError::QuantityOverflow;
        }
    }
    e.into()
}
