// src/models/inventory.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::auth::UserRole;

// --- Movimentações do livro-razão ---
// checked_out: saída do almoxarifado para a obra.
// returned:    devolução da obra para o almoxarifado.
// adjusted:    consumo dentro da obra (instalado/usado): baixa quantidade,
//              mas não estorna o valor já capitalizado no checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "ledger_action", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum LedgerAction {
    CheckedOut,
    Returned,
    Adjusted,
}

// Autoria imutável de cada movimentação.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ActionBy {
    pub user_id: Uuid,
    pub name: String,
    pub role: UserRole,
}

// --- Registro do livro-razão ---
// Apenas-inserção: uma vez gravado, nunca é editado ou apagado em operação
// normal. unit/supplier/sale_price são fotografados no momento da
// transferência, para que o custo histórico não mude junto com o catálogo.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRecord {
    pub id: Uuid,

    // Desempate de ordenação quando dois registros colidem no created_at.
    #[serde(skip_serializing)]
    pub seq: i64,

    pub project_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub action: LedgerAction,
    pub quantity: Decimal,
    pub unit: String,
    pub supplier: Option<String>,
    pub sale_price: Decimal,
    pub total_value: Decimal,

    // Limite de alerta por obra+produto. Uma vez definido num checkout,
    // é propagado para os checkouts seguintes até ser trocado.
    pub project_reorder_point: Option<Decimal>,

    #[sqlx(flatten)]
    pub action_by: ActionBy,

    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

// --- Estoque principal (almoxarifado) ---
// Fonte autoritativa de disponibilidade: o checkout revalida contra uma
// leitura fresca desta tabela, nunca contra cache.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MainInventoryItem {
    pub id: Uuid,
    pub product_name: String,
    pub category: String,
    pub unit: String,
    pub supplier: Option<String>,
    pub quantity: Decimal,
    pub sale_price: Decimal,
    pub reorder_point: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Snapshot derivado por (obra, produto) ---
// Nunca é persistido: é sempre recalculado pela reconciliação a partir do
// livro-razão.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CurrentInventoryItem {
    pub project_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub category: String,
    pub unit: String,
    pub supplier: Option<String>,
    pub sale_price: Decimal,

    pub current_quantity: Decimal,
    pub total_transferred_in: Decimal,
    pub total_returned_out: Decimal,
    pub total_adjusted: Decimal,

    // Acumulado por transação: soma nos checkouts, estorna nas devoluções.
    // Consumo (adjusted) não mexe aqui.
    pub total_value: Decimal,

    // Avaliação pontual do que resta: current_quantity * sale_price.
    pub total_cost: Decimal,

    // None significa "sem alerta configurado", que é diferente de zero.
    pub project_reorder_point: Option<Decimal>,
    pub is_low_stock: bool,
}

impl CurrentInventoryItem {
    /// Rótulo de status usado na tela e nos relatórios exportados.
    /// Sem reorder point o item nunca fica "Low Stock", mesmo zerado.
    pub fn stock_status(&self) -> &'static str {
        if self.current_quantity <= Decimal::ZERO {
            "Out of Stock"
        } else if self.is_low_stock {
            "Low Stock"
        } else {
            "In Stock"
        }
    }
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordTransferPayload {
    pub product_id: Uuid,
    pub action: LedgerAction,
    pub quantity: Decimal,

    // Opcional: quando omitido, a unidade vem do catálogo.
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub project_reorder_point: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMainItemPayload {
    #[validate(length(min = 1, message = "O nome do produto é obrigatório."))]
    pub product_name: String,

    #[validate(length(min = 1, message = "A categoria é obrigatória."))]
    pub category: String,

    #[validate(length(min = 1, message = "A unidade é obrigatória."))]
    pub unit: String,

    pub supplier: Option<String>,

    #[serde(default)]
    pub quantity: Decimal,

    #[serde(default)]
    pub sale_price: Decimal,

    pub reorder_point: Option<Decimal>,
}

// Entrada do comando de transferência, já com a autoria resolvida pelo
// handler a partir do usuário autenticado.
#[derive(Debug, Clone)]
pub struct TransferInput {
    pub project_id: Uuid,
    pub product_id: Uuid,
    pub action: LedgerAction,
    pub quantity: Decimal,
    pub unit: Option<String>,
    pub notes: Option<String>,
    pub project_reorder_point: Option<Decimal>,
    pub action_by: ActionBy,
}
