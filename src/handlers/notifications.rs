// src/handlers/notifications.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError, config::AppState, middleware::auth::AuthenticatedUser,
    models::notification::Notification,
};

#[utoipa::path(
    get,
    path = "/api/notifications",
    tag = "Notifications",
    responses((status = 200, description = "Notificações do usuário", body = [Notification])),
    security(("api_jwt" = []))
)]
pub async fn list_notifications(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let notifications = app_state
        .notification_service
        .list_for_user(user.0.id)
        .await?;

    Ok((StatusCode::OK, Json(notifications)))
}

#[utoipa::path(
    post,
    path = "/api/notifications/{id}/read",
    tag = "Notifications",
    params(("id" = Uuid, Path, description = "ID da Notificação")),
    responses((status = 200, description = "Notificação marcada como lida", body = Notification)),
    security(("api_jwt" = []))
)]
pub async fn mark_notification_read(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(notification_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let notification = app_state
        .notification_service
        .mark_read(user.0.id, notification_id)
        .await?;

    Ok((StatusCode::OK, Json(notification)))
}
