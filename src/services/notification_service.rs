// src/services/notification_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{NotificationRepository, UserRepository},
    models::notification::{Notification, NotificationEvent},
};

// ---
// Colaborador externo: envio de e-mail
// ---
// A entrega SMTP e os templates ficam fora deste núcleo. O trait é a
// fronteira; a implementação padrão apenas loga o que seria enviado.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, recipient: &str, event: &NotificationEvent) -> Result<(), AppError>;
}

pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, recipient: &str, event: &NotificationEvent) -> Result<(), AppError> {
        tracing::info!("📧 E-mail [{}] para {}", event.kind(), recipient);
        Ok(())
    }
}

#[derive(Clone)]
pub struct NotificationService {
    notification_repo: NotificationRepository,
    user_repo: UserRepository,
    email_sender: Arc<dyn EmailSender>,
    pool: PgPool,
}

impl NotificationService {
    pub fn new(
        notification_repo: NotificationRepository,
        user_repo: UserRepository,
        email_sender: Arc<dyn EmailSender>,
        pool: PgPool,
    ) -> Self {
        Self {
            notification_repo,
            user_repo,
            email_sender,
            pool,
        }
    }

    /// Dispara e esquece. Qualquer falha aqui dentro é logada e engolida:
    /// notificação nunca desfaz nem bloqueia a mutação que a originou.
    pub async fn notify(&self, recipient_id: Uuid, event: NotificationEvent) {
        if let Err(e) = self.dispatch(recipient_id, &event).await {
            tracing::warn!(
                "🔕 Falha ao notificar {} ({}): {}",
                recipient_id,
                event.kind(),
                e
            );
        }
    }

    async fn dispatch(&self, recipient_id: Uuid, event: &NotificationEvent) -> Result<(), AppError> {
        let payload = serde_json::to_value(event)
            .map_err(|e| AppError::InternalServerError(e.into()))?;

        self.notification_repo
            .create(&self.pool, recipient_id, event.kind(), &payload)
            .await?;

        if let Some(user) = self.user_repo.find_by_id(recipient_id).await? {
            self.email_sender.send(&user.email, event).await?;
        }

        Ok(())
    }

    pub async fn list_for_user(&self, user_id: Uuid) -> Result<Vec<Notification>, AppError> {
        self.notification_repo
            .list_for_user(&self.pool, user_id)
            .await
    }

    pub async fn mark_read(
        &self,
        user_id: Uuid,
        notification_id: Uuid,
    ) -> Result<Notification, AppError> {
        self.notification_repo
            .mark_read(&self.pool, user_id, notification_id)
            .await?
            .ok_or(AppError::NotificationNotFound)
    }
}
