// src/db/project_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::project::{Project, ProjectStatus, TimelineEntry},
};

#[derive(Clone)]
pub struct ProjectRepository {
    pool: PgPool,
}

impl ProjectRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
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
        let project = sqlx::query_as::<_, Project>(
            r#"
            INSERT INTO projects (client_id, name, location, description, budget)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(client_id)
        .bind(name)
        .bind(location)
        .bind(description)
        .bind(budget)
        .fetch_one(executor)
        .await?;
        Ok(project)
    }

    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>("SELECT * FROM projects WHERE id = $1")
            .bind(id)
            .fetch_optional(executor)
            .await?;
        Ok(project)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let projects =
            sqlx::query_as::<_, Project>("SELECT * FROM projects ORDER BY created_at DESC")
                .fetch_all(executor)
                .await?;
        Ok(projects)
    }

    pub async fn list_for_client<'e, E>(
        &self,
        executor: E,
        client_id: Uuid,
    ) -> Result<Vec<Project>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let projects = sqlx::query_as::<_, Project>(
            "SELECT * FROM projects WHERE client_id = $1 ORDER BY created_at DESC",
        )
        .bind(client_id)
        .fetch_all(executor)
        .await?;
        Ok(projects)
    }

    /// Grava a transição já decidida pelo service. Carimba started_at /
    /// finished_at conforme o status de destino.
    pub async fn update_status<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        status: ProjectStatus,
        cancel_reason: Option<&str>,
    ) -> Result<Project, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let project = sqlx::query_as::<_, Project>(
            r#"
            UPDATE projects
            SET status = $2,
                started_at = CASE WHEN $2 = 'in_progress'::project_status THEN now() ELSE started_at END,
                finished_at = CASE WHEN $2 = 'completed'::project_status THEN now() ELSE finished_at END,
                cancel_reason = COALESCE($3, cancel_reason),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(status)
        .bind(cancel_reason)
        .fetch_one(executor)
        .await?;
        Ok(project)
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
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, TimelineEntry>(
            r#"
            INSERT INTO project_timeline (project_id, caption, photo_urls, posted_by)
            VALUES ($1, $2, $3, $4)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(caption)
        .bind(photo_urls)
        .bind(posted_by)
        .fetch_one(executor)
        .await?;
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
        let entries = sqlx::query_as::<_, TimelineEntry>(
            "SELECT * FROM project_timeline WHERE project_id = $1 ORDER BY created_at DESC",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;
        Ok(entries)
    }

    /// Remove a entrada e devolve a linha apagada (o service precisa das
    /// URLs para pedir a limpeza no object storage).
    pub async fn delete_timeline_entry<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        entry_id: Uuid,
    ) -> Result<Option<TimelineEntry>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let entry = sqlx::query_as::<_, TimelineEntry>(
            "DELETE FROM project_timeline WHERE id = $1 AND project_id = $2 RETURNING *",
        )
        .bind(entry_id)
        .bind(project_id)
        .fetch_optional(executor)
        .await?;
        Ok(entry)
    }
}
