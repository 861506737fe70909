// src/handlers/projects.rs

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::{
        auth::AuthenticatedUser,
        rbac::{
            CapProjectsConfirm, CapProjectsWrite, CapTimelineWrite, RequireCapability,
            ensure_can_view,
        },
    },
    models::{
        auth::UserRole,
        project::{
            CancelProjectPayload, CreateProjectPayload, CreateTimelineEntryPayload, Project,
            ProjectStatus, TimelineEntry,
        },
    },
};

// ---
// Handler: create_project
// ---
// O cliente abre o pedido de obra; ela nasce como 'pending' até a
// confirmação do escritório.
#[utoipa::path(
    post,
    path = "/api/projects",
    tag = "Projects",
    request_body = CreateProjectPayload,
    responses((status = 201, description = "Obra criada", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn create_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireCapability<CapProjectsWrite>,
    Json(payload): Json<CreateProjectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let project = app_state
        .project_service
        .create_project(
            &app_state.db_pool,
            user.0.id,
            &payload.name,
            payload.location.as_deref(),
            payload.description.as_deref(),
            payload.budget,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(project)))
}

#[utoipa::path(
    get,
    path = "/api/projects",
    tag = "Projects",
    responses((status = 200, description = "Obras visíveis para o usuário", body = [Project])),
    security(("api_jwt" = []))
)]
pub async fn list_projects(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    // Escopo de leitura: cliente vê as próprias obras, staff vê todas.
    let projects = match user.0.role {
        UserRole::Client => {
            app_state
                .project_service
                .list_for_client(&app_state.db_pool, user.0.id)
                .await?
        }
        _ => {
            app_state
                .project_service
                .list_projects(&app_state.db_pool)
                .await?
        }
    };

    Ok((StatusCode::OK, Json(projects)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Detalhe da obra", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn get_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;

    ensure_can_view(&user.0, &project)?;

    Ok((StatusCode::OK, Json(project)))
}

// ---
// Transições do ciclo de vida
// ---

#[utoipa::path(
    post,
    path = "/api/projects/{id}/confirm",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Obra confirmada", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn confirm_project(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapProjectsConfirm>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .transition(&app_state.db_pool, project_id, ProjectStatus::Confirmed, None)
        .await?;

    Ok((StatusCode::OK, Json(project)))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/start",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Obra iniciada", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn start_project(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapProjectsConfirm>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .transition(
            &app_state.db_pool,
            project_id,
            ProjectStatus::InProgress,
            None,
        )
        .await?;

    Ok((StatusCode::OK, Json(project)))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/complete",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Obra concluída", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn complete_project(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapProjectsConfirm>,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .transition(
            &app_state.db_pool,
            project_id,
            ProjectStatus::Completed,
            None,
        )
        .await?;

    Ok((StatusCode::OK, Json(project)))
}

#[utoipa::path(
    post,
    path = "/api/projects/{id}/cancel",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    request_body = CancelProjectPayload,
    responses((status = 200, description = "Obra cancelada", body = Project)),
    security(("api_jwt" = []))
)]
pub async fn cancel_project(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireCapability<CapProjectsWrite>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CancelProjectPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // Cliente cancela apenas a própria obra.
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let project = app_state
        .project_service
        .transition(
            &app_state.db_pool,
            project_id,
            ProjectStatus::Cancelled,
            Some(&payload.reason),
        )
        .await?;

    Ok((StatusCode::OK, Json(project)))
}

// ---
// Linha do tempo
// ---

#[utoipa::path(
    post,
    path = "/api/projects/{id}/timeline",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    request_body = CreateTimelineEntryPayload,
    responses((status = 201, description = "Entrada criada", body = TimelineEntry)),
    security(("api_jwt" = []))
)]
pub async fn add_timeline_entry(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireCapability<CapTimelineWrite>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<CreateTimelineEntryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entry = app_state
        .project_service
        .add_timeline_entry(
            &app_state.db_pool,
            project_id,
            &payload.caption,
            &payload.photo_urls,
            user.0.id,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/timeline",
    tag = "Projects",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Linha do tempo da obra", body = [TimelineEntry])),
    security(("api_jwt" = []))
)]
pub async fn list_timeline(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let entries = app_state
        .project_service
        .list_timeline(&app_state.db_pool, project_id)
        .await?;

    Ok((StatusCode::OK, Json(entries)))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}/timeline/{entry_id}",
    tag = "Projects",
    params(
        ("id" = Uuid, Path, description = "ID da Obra"),
        ("entry_id" = Uuid, Path, description = "ID da Entrada")
    ),
    responses((status = 204, description = "Entrada removida")),
    security(("api_jwt" = []))
)]
pub async fn delete_timeline_entry(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapTimelineWrite>,
    Path((project_id, entry_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, AppError> {
    app_state
        .project_service
        .delete_timeline_entry(&app_state.db_pool, project_id, entry_id)
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
