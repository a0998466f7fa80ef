use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para a ergonomia do `?`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Error de validación")]
    ValidationError(#[from] validator::ValidationErrors),

    // Corpo JSON ou query string que nem chega a ser desserializado
    #[error("Solicitud inválida: {0}")]
    InvalidPayload(String),

    #[error("Argumento inválido: {0}")]
    InvalidArgument(String),

    // Chave estrangeira apontando para um registro inexistente
    #[error("{label} {value} no encontrado")]
    ReferenceNotFound { label: &'static str, value: String },

    #[error("{0} no encontrado")]
    NotFound(String),

    #[error("Error de base de datos: {0}")]
    DatabaseError(#[from] sqlx::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidPayload(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Devolve todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Uno o más campos son inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::DatabaseError(e) => {
                tracing::error!("Erro de banco de dados: {}", e);
                let body = Json(json!({
                    "error": "Ocurrió un error inesperado en la base de datos.",
                    "details": e.to_string(),
                }));
                return (StatusCode::INTERNAL_SERVER_ERROR, body).into_response();
            }
            ref e @ (AppError::InvalidPayload(_) | AppError::InvalidArgument(_)) => {
                (StatusCode::BAD_REQUEST, e.to_string())
            }
            ref e @ (AppError::ReferenceNotFound { .. } | AppError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, e.to_string())
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
