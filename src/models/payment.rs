// src/models/payment.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "payment_method", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Check,
    BankTransfer,
    Gcash,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    pub id: Uuid,
    pub project_id: Uuid,
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    pub recorded_by: Uuid,
    pub paid_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentPayload {
    pub amount: Decimal,
    pub method: PaymentMethod,
    pub reference_no: Option<String>,
    pub notes: Option<String>,
    // Quando omitido, assume o momento do registro.
    pub paid_at: Option<DateTime<Utc>>,
}

// Resumo financeiro exibido na tela da obra.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentSummary {
    pub project_id: Uuid,
    pub total_paid: Decimal,
    pub payment_count: i64,
}
