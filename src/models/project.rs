// src/models/project.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Status da obra ---
// As transições válidas ficam em ProjectStatus::can_transition_to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "project_status", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    Pending,
    Confirmed,
    InProgress,
    Completed,
    Cancelled,
}

impl ProjectStatus {
    /// Máquina de estados da obra:
    /// pending -> confirmed -> in_progress -> completed,
    /// e qualquer estado não-terminal -> cancelled.
    pub fn can_transition_to(self, next: ProjectStatus) -> bool {
        use ProjectStatus::*;
        match (self, next) {
            (Pending, Confirmed) => true,
            (Confirmed, InProgress) => true,
            (InProgress, Completed) => true,
            (Pending | Confirmed | InProgress, Cancelled) => true,
            _ => false,
        }
    }

    /// Transferências de estoque só entram em obras ativas.
    pub fn accepts_transfers(self) -> bool {
        matches!(self, ProjectStatus::Confirmed | ProjectStatus::InProgress)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: Uuid,
    pub client_id: Uuid,
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub budget: Option<Decimal>,
    pub cancel_reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Linha do tempo (fotos de progresso) ---
// As URLs já apontam para o object storage; o upload em si fica fora daqui.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEntry {
    pub id: Uuid,
    pub project_id: Uuid,
    pub caption: String,
    pub photo_urls: Vec<String>,
    pub posted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

// ---
// Payloads
// ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CancelProjectPayload {
    #[validate(length(min = 1, message = "O motivo do cancelamento é obrigatório."))]
    pub reason: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimelineEntryPayload {
    #[validate(length(min = 1, message = "A legenda é obrigatória."))]
    pub caption: String,

    #[serde(default)]
    pub photo_urls: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::ProjectStatus::*;

    #[test]
    fn ciclo_de_vida_segue_a_ordem() {
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(InProgress));
        assert!(InProgress.can_transition_to(Completed));
    }

    #[test]
    fn nao_terminal_pode_ser_cancelado() {
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(InProgress.can_transition_to(Cancelled));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Cancelled));
    }

    #[test]
    fn transicoes_invalidas_sao_bloqueadas() {
        assert!(!Pending.can_transition_to(InProgress));
        assert!(!Pending.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(InProgress));
        assert!(!Cancelled.can_transition_to(Confirmed));
    }

    #[test]
    fn so_obra_ativa_recebe_transferencia() {
        assert!(Confirmed.accepts_transfers());
        assert!(InProgress.accepts_transfers());
        assert!(!Pending.accepts_transfers());
        assert!(!Completed.accepts_transfers());
        assert!(!Cancelled.accepts_transfers());
    }
}
