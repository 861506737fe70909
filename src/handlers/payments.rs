// src/handlers/payments.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapPaymentsWrite, RequireCapability, ensure_can_view},
    },
    models::payment::{Payment, PaymentSummary, RecordPaymentPayload},
};

#[utoipa::path(
    post,
    path = "/api/projects/{id}/payments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    request_body = RecordPaymentPayload,
    responses(
        (status = 201, description = "Pagamento registrado", body = Payment),
        (status = 422, description = "Valor inválido")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_payment(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireCapability<CapPaymentsWrite>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<RecordPaymentPayload>,
) -> Result<impl IntoResponse, AppError> {
    let payment = app_state
        .payment_service
        .record_payment(
            &app_state.db_pool,
            project_id,
            payload.amount,
            payload.method,
            payload.reference_no.as_deref(),
            payload.notes.as_deref(),
            user.0.id,
            payload.paid_at,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(payment)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/payments",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Pagamentos da obra", body = [Payment])),
    security(("api_jwt" = []))
)]
pub async fn list_payments(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let payments = app_state
        .payment_service
        .list_for_project(&app_state.db_pool, project_id)
        .await?;

    Ok((StatusCode::OK, Json(payments)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/payments/summary",
    tag = "Payments",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Resumo financeiro", body = PaymentSummary)),
    security(("api_jwt" = []))
)]
pub async fn payment_summary(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let summary = app_state
        .payment_service
        .summary_for_project(&app_state.db_pool, project_id)
        .await?;

    Ok((StatusCode::OK, Json(summary)))
}
