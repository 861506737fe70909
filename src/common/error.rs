// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde_json::json;
use thiserror::Error;

use crate::models::project::ProjectStatus;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Erros de validação voltam estruturados para o caller poder exibir
// mensagem por campo; falhas de persistência viram 500 genérico.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // --- Transferências de estoque ---
    #[error("A quantidade deve ser um número positivo")]
    InvalidQuantity,

    #[error("Estoque insuficiente no almoxarifado: disponível {available}, solicitado {requested}")]
    InsufficientMainStock {
        available: Decimal,
        requested: Decimal,
    },

    #[error("Estoque insuficiente na obra: disponível {current}, solicitado {requested}")]
    InsufficientProjectStock { current: Decimal, requested: Decimal },

    #[error("Produto não encontrado")]
    ProductNotFound,

    // --- Obras ---
    #[error("Obra não encontrada")]
    ProjectNotFound,

    #[error("A obra não está ativa para receber transferências")]
    ProjectNotActive,

    #[error("Transição de status inválida: {from:?} -> {to:?}")]
    InvalidStatusTransition {
        from: ProjectStatus,
        to: ProjectStatus,
    },

    #[error("Entrada da linha do tempo não encontrada")]
    TimelineEntryNotFound,

    // --- Pagamentos ---
    #[error("O valor do pagamento deve ser positivo")]
    InvalidAmount,

    // --- Notificações ---
    #[error("Notificação não encontrada")]
    NotificationNotFound,

    // --- Autenticação / autorização ---
    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Código de verificação inválido ou expirado")]
    InvalidOtp,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Permissão negada: {0}")]
    Forbidden(String),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::InvalidQuantity => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "A quantidade deve ser um número positivo.".to_string(),
            ),
            AppError::InsufficientMainStock {
                available,
                requested,
            } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Estoque insuficiente no almoxarifado (disponível: {available}, solicitado: {requested})."
                ),
            ),
            AppError::InsufficientProjectStock { current, requested } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                format!(
                    "Estoque insuficiente na obra (disponível: {current}, solicitado: {requested})."
                ),
            ),
            AppError::InvalidAmount => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "O valor do pagamento deve ser positivo.".to_string(),
            ),
            AppError::ProductNotFound => (
                StatusCode::NOT_FOUND,
                "Produto não encontrado.".to_string(),
            ),
            AppError::ProjectNotFound => {
                (StatusCode::NOT_FOUND, "Obra não encontrada.".to_string())
            }
            AppError::TimelineEntryNotFound => (
                StatusCode::NOT_FOUND,
                "Entrada da linha do tempo não encontrada.".to_string(),
            ),
            AppError::NotificationNotFound => (
                StatusCode::NOT_FOUND,
                "Notificação não encontrada.".to_string(),
            ),
            AppError::ProjectNotActive => (
                StatusCode::CONFLICT,
                "A obra não está ativa para receber transferências.".to_string(),
            ),
            AppError::InvalidStatusTransition { from, to } => (
                StatusCode::CONFLICT,
                format!("Transição de status inválida: {from:?} -> {to:?}."),
            ),
            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                "Este e-mail já está em uso.".to_string(),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                "E-mail ou senha inválidos.".to_string(),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Token de autenticação inválido ou ausente.".to_string(),
            ),
            AppError::InvalidOtp => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "Código de verificação inválido ou expirado.".to_string(),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                "Usuário não encontrado.".to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que o `thiserror` montou.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Ocorreu um erro inesperado.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
