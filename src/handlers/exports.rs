// src/handlers/exports.rs

use axum::{
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{CapReportsExport, RequireCapability},
    },
    services::export_service::{self, ExportKind},
};

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    pub kind: ExportKind,
}

// Baixa o relatório em CSV. Mesmos números da tela: o formato de moeda e
// data vem do mesmo lugar.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/inventory/export",
    tag = "Reports",
    params(
        ("id" = Uuid, Path, description = "ID da Obra"),
        ("kind" = ExportKind, Query, description = "Tipo do relatório")
    ),
    responses((status = 200, description = "Arquivo CSV", body = String, content_type = "text/csv")),
    security(("api_jwt" = []))
)]
pub async fn export_project_inventory(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapReportsExport>,
    Path(project_id): Path<Uuid>,
    Query(query): Query<ExportQuery>,
) -> Result<impl IntoResponse, AppError> {
    // Garante 404 para obra inexistente antes de gerar um CSV vazio.
    app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;

    let records = app_state
        .transfer_service
        .project_ledger(&app_state.db_pool, project_id)
        .await?;

    let snapshot = app_state
        .transfer_service
        .project_snapshot(&app_state.db_pool, project_id)
        .await?;

    let csv = export_service::export_csv(query.kind, &records, &snapshot)?;

    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", query.kind.file_name()),
        ),
    ];

    Ok((StatusCode::OK, headers, csv))
}
