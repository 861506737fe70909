// src/services/project_service.rs

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sqlx::{Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::ProjectRepository,
    models::{
        notification::NotificationEvent,
        project::{Project, ProjectStatus, TimelineEntry},
    },
    services::notification_service::NotificationService,
};

// ---
// Colaborador externo: object storage das fotos da linha do tempo
// ---
// O upload acontece direto do cliente; este núcleo só pede a limpeza dos
// blobs quando uma entrada é removida.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn delete(&self, urls: &[String]) -> Result<(), AppError>;
}

pub struct LogObjectStorage;

#[async_trait]
impl ObjectStorage for LogObjectStorage {
    async fn delete(&self, urls: &[String]) -> Result<(), AppError> {
        tracing::info!("🗑️ Limpeza de {} foto(s) no storage", urls.len());
        Ok(())
    }
}

#[derive(Clone)]
pub struct ProjectService {
    project_repo: ProjectRepository,
    notification_service: NotificationService,
    storage: Arc<dyn ObjectStorage>,
}

impl ProjectService {
    pub fn new(
        project_repo: ProjectRepository,
        notification_service: NotificationService,
        storage: Arc<dyn ObjectStorage>,
    ) -> Self {
        Self {
            project_repo,
            notification_service,
            storage,
        }
    }

    pub async fn create_project<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
        name: &str,
        location: Option<&str>,
        description: Option<&str>,
        budget: Option<Decimal>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.project_repo
            .create(executor, client_id, name, location, description, budget)
            .await
    }

    pub async fn get_project<'e, E>(&self, executor: E, id: Uuid) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.project_repo
            .find_by_id(executor, id)
            .await?
            .ok_or(AppError::ProjectNotFound)
    }

    pub async fn list_projects<'e, E>(&self, executor: E) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.project_repo.list(executor).await
    }

    pub async fn list_for_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.project_repo.list_for_client(executor, client_id).await
    }

    /// Aplica uma transição do ciclo de vida da obra e notifica o cliente.
    /// A máquina de estados mora em ProjectStatus::can_transition_to.
    pub async fn transition<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        next: ProjectStatus,
        cancel_reason: Option<&str>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        let project = self
            .project_repo
            .find_by_id(&mut *tx, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        if !project.status.can_transition_to(next) {
            return Err(AppError::InvalidStatusTransition {
                from: project.status,
                to: next,
            });
        }

        let updated = self
            .project_repo
            .update_status(&mut *tx, project_id, next, cancel_reason)
            .await?;

        tx.commit().await?;

        if let Some(event) = transition_event(&updated, cancel_reason) {
            self.notification_service
                .notify(updated.client_id, event)
                .await;
        }

        Ok(updated)
    }

    // ---
    // Linha do tempo
    // ---

    pub async fn add_timeline_entry<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        caption: &str,
        photo_urls: &[String],
        posted_by: Uuid,
    ) -> Result<TimelineEntry, AppError>
    where
        E: Executor<'e, Database = Postgres> + sqlx::Acquire<'e, Database = Postgres>,
    {
        let mut tx = executor.begin().await?;

        self.project_repo
            .find_by_id(&mut *tx, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        let entry = self
            .project_repo
            .add_timeline_entry(&mut *tx, project_id, caption, photo_urls, posted_by)
            .await?;

        tx.commit().await?;
        Ok(entry)
    }

    pub async fn list_timeline<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<TimelineEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.project_repo.list_timeline(executor, project_id).await
    }

    /// Remove a entrada e pede a limpeza das fotos no storage. A falha do
    /// storage é logada e engolida: a entrada já saiu do banco.
    pub async fn delete_timeline_entry<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        entry_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = self
            .project_repo
            .delete_timeline_entry(executor, project_id, entry_id)
            .await?
            .ok_or(AppError::TimelineEntryNotFound)?;

        if !entry.photo_urls.is_empty() {
            if let Err(e) = self.storage.delete(&entry.photo_urls).await {
                tracing::warn!("🗑️ Falha ao limpar fotos no storage: {}", e);
            }
        }

        Ok(())
    }
}

fn transition_event(project: &Project, cancel_reason: Option<&str>) -> Option<NotificationEvent> {
    match project.status {
        ProjectStatus::Confirmed => Some(NotificationEvent::ProjectConfirmed {
            project_id: project.id,
            project_name: project.name.clone(),
        }),
        ProjectStatus::InProgress => Some(NotificationEvent::ProjectStarted {
            project_id: project.id,
            project_name: project.name.clone(),
        }),
        ProjectStatus::Completed => Some(NotificationEvent::ProjectCompleted {
            project_id: project.id,
            project_name: project.name.clone(),
            finished_at: project.finished_at.unwrap_or_else(Utc::now),
        }),
        ProjectStatus::Cancelled => Some(NotificationEvent::ProjectCancelled {
            project_id: project.id,
            project_name: project.name.clone(),
            reason: cancel_reason.unwrap_or_default().to_string(),
        }),
        ProjectStatus::Pending => None,
    }
}
