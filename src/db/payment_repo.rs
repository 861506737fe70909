// src/db/payment_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::payment::{Payment, PaymentMethod, PaymentSummary},
};

#[derive(Clone)]
pub struct PaymentRepository {
    pool: PgPool,
}

impl PaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        reference_no: Option<&str>,
        notes: Option<&str>,
        recorded_by: Uuid,
        paid_at: DateTime<Utc>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payment = sqlx::query_as::<_, Payment>(
            r#"
            INSERT INTO payments
                (project_id, amount, method, reference_no, notes, recorded_by, paid_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(amount)
        .bind(method)
        .bind(reference_no)
        .bind(notes)
        .bind(recorded_by)
        .bind(paid_at)
        .fetch_one(executor)
        .await?;
        Ok(payment)
    }

    pub async fn list_for_project<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<Payment>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let payments = sqlx::query_as::<_, Payment>(
            "SELECT * FROM payments WHERE project_id = $1 ORDER BY paid_at DESC",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;
        Ok(payments)
    }

    pub async fn summary_for_project<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<PaymentSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let (total_paid, payment_count) = sqlx::query_as::<_, (Decimal, i64)>(
            r#"
            SELECT COALESCE(SUM(amount), 0), COUNT(*)
            FROM payments
            WHERE project_id = $1
            "#,
        )
        .bind(project_id)
        .fetch_one(executor)
        .await?;

        Ok(PaymentSummary {
            project_id,
            total_paid,
            payment_count,
        })
    }
}
