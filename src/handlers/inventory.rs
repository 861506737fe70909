// src/handlers/inventory.rs

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
        rbac::{CapInventoryTransfer, CapInventoryWrite, RequireCapability, ensure_can_view},
    },
    models::inventory::{
        ActionBy, CreateMainItemPayload, CurrentInventoryItem, LedgerRecord,
        MainInventoryItem, RecordTransferPayload, TransferInput,
    },
};

// ---
// Almoxarifado central
// ---

#[utoipa::path(
    post,
    path = "/api/inventory/items",
    tag = "Inventory",
    request_body = CreateMainItemPayload,
    responses((status = 201, description = "Produto cadastrado", body = MainInventoryItem)),
    security(("api_jwt" = []))
)]
pub async fn create_main_item(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
    _guard: RequireCapability<CapInventoryWrite>,
    Json(payload): Json<CreateMainItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .main_inventory_repo
        .create(
            &app_state.db_pool,
            &payload.product_name,
            &payload.category,
            &payload.unit,
            payload.supplier.as_deref(),
            payload.quantity,
            payload.sale_price,
            payload.reorder_point,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    get,
    path = "/api/inventory/items",
    tag = "Inventory",
    responses((status = 200, description = "Produtos do almoxarifado", body = [MainInventoryItem])),
    security(("api_jwt" = []))
)]
pub async fn list_main_items(
    State(app_state): State<AppState>,
    _user: AuthenticatedUser,
) -> Result<impl IntoResponse, AppError> {
    let items = app_state.main_inventory_repo.list(&app_state.db_pool).await?;
    Ok((StatusCode::OK, Json(items)))
}

// ---
// Transferências da obra
// ---

// Registra checkout/devolução/consumo. O service valida contra leitura
// fresca do almoxarifado e grava um único registro imutável no livro.
#[utoipa::path(
    post,
    path = "/api/projects/{id}/inventory/transfers",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    request_body = RecordTransferPayload,
    responses(
        (status = 201, description = "Movimentação registrada", body = LedgerRecord),
        (status = 422, description = "Quantidade inválida ou estoque insuficiente")
    ),
    security(("api_jwt" = []))
)]
pub async fn record_transfer(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    _guard: RequireCapability<CapInventoryTransfer>,
    Path(project_id): Path<Uuid>,
    Json(payload): Json<RecordTransferPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let input = TransferInput {
        project_id,
        product_id: payload.product_id,
        action: payload.action,
        quantity: payload.quantity,
        unit: payload.unit,
        notes: payload.notes,
        project_reorder_point: payload.project_reorder_point,
        action_by: ActionBy {
            user_id: user.0.id,
            name: user.0.full_name.clone(),
            role: user.0.role,
        },
    };

    let record = app_state
        .transfer_service
        .record_transfer(&app_state.db_pool, input)
        .await?;

    Ok((StatusCode::CREATED, Json(record)))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}/inventory/transactions",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Livro-razão da obra", body = [LedgerRecord])),
    security(("api_jwt" = []))
)]
pub async fn list_transactions(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let records = app_state
        .transfer_service
        .project_ledger(&app_state.db_pool, project_id)
        .await?;

    Ok((StatusCode::OK, Json(records)))
}

// O snapshot é derivado: cada leitura refaz o fold sobre o livro.
#[utoipa::path(
    get,
    path = "/api/projects/{id}/inventory/current",
    tag = "Inventory",
    params(("id" = Uuid, Path, description = "ID da Obra")),
    responses((status = 200, description = "Estoque atual da obra", body = [CurrentInventoryItem])),
    security(("api_jwt" = []))
)]
pub async fn get_current_inventory(
    State(app_state): State<AppState>,
    user: AuthenticatedUser,
    Path(project_id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    let project = app_state
        .project_service
        .get_project(&app_state.db_pool, project_id)
        .await?;
    ensure_can_view(&user.0, &project)?;

    let snapshot = app_state
        .transfer_service
        .project_snapshot(&app_state.db_pool, project_id)
        .await?;

    Ok((StatusCode::OK, Json(snapshot)))
}
