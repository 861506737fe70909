// src/models/notification.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{inventory::LedgerAction, payment::PaymentMethod};

// --- Eventos de notificação ---
// União etiquetada: cada variante carrega exatamente os campos que o seu
// template precisa. Nada de blobs genéricos atravessando o sistema.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NotificationEvent {
    OtpRequested {
        email: String,
        code: String,
        expires_at: DateTime<Utc>,
    },
    ProjectConfirmed {
        project_id: Uuid,
        project_name: String,
    },
    ProjectStarted {
        project_id: Uuid,
        project_name: String,
    },
    ProjectCompleted {
        project_id: Uuid,
        project_name: String,
        finished_at: DateTime<Utc>,
    },
    ProjectCancelled {
        project_id: Uuid,
        project_name: String,
        reason: String,
    },
    TransferRecorded {
        project_id: Uuid,
        project_name: String,
        product_name: String,
        action: LedgerAction,
        quantity: Decimal,
        unit: String,
    },
    LowStockAlert {
        project_id: Uuid,
        project_name: String,
        product_name: String,
        current_quantity: Decimal,
        reorder_point: Decimal,
    },
    PaymentRecorded {
        project_id: Uuid,
        project_name: String,
        amount: Decimal,
        method: PaymentMethod,
    },
}

impl NotificationEvent {
    /// Etiqueta persistida na coluna `kind` (e usada como assunto do e-mail).
    pub fn kind(&self) -> &'static str {
        match self {
            NotificationEvent::OtpRequested { .. } => "otp_requested",
            NotificationEvent::ProjectConfirmed { .. } => "project_confirmed",
            NotificationEvent::ProjectStarted { .. } => "project_started",
            NotificationEvent::ProjectCompleted { .. } => "project_completed",
            NotificationEvent::ProjectCancelled { .. } => "project_cancelled",
            NotificationEvent::TransferRecorded { .. } => "transfer_recorded",
            NotificationEvent::LowStockAlert { .. } => "low_stock_alert",
            NotificationEvent::PaymentRecorded { .. } => "payment_recorded",
        }
    }
}

// Linha de notificação in-app, lida pelo sino do frontend.
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: String,
    #[schema(value_type = Object)]
    pub payload: serde_json::Value,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn evento_serializa_com_etiqueta_kind() {
        let event = NotificationEvent::ProjectCancelled {
            project_id: Uuid::nil(),
            project_name: "Casa Silva".to_string(),
            reason: "cliente desistiu".to_string(),
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "project_cancelled");
        assert_eq!(json["reason"], "cliente desistiu");
        assert_eq!(event.kind(), json["kind"].as_str().unwrap());
    }
}
