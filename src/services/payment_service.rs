// src/services/payment_service.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PaymentRepository, ProjectRepository},
    models::{
        notification::NotificationEvent,
        payment::{Payment, PaymentMethod, PaymentSummary},
    },
    services::notification_service::NotificationService,
};

fn ensure_positive_amount(amount: Decimal) -> Result<(), AppError> {
    if amount <= Decimal::ZERO {
        return Err(AppError::InvalidAmount);
    }
    Ok(())
}

#[derive(Clone)]
pub struct PaymentService {
    payment_repo: PaymentRepository,
    project_repo: ProjectRepository,
    notification_service: NotificationService,
}

impl PaymentService {
    pub fn new(
        payment_repo: PaymentRepository,
        project_repo: ProjectRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            payment_repo,
            project_repo,
            notification_service,
        }
    }

    pub async fn record_payment<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        amount: Decimal,
        method: PaymentMethod,
        reference_no: Option<&str>,
        notes: Option<&str>,
        recorded_by: Uuid,
        paid_at: Option<DateTime<Utc>>,
    ) -> Result<Payment, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        ensure_positive_amount(amount)?;

        let mut tx = executor.begin().await?;

        let project = self
            .project_repo
            .find_by_id(&mut *tx, project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        let payment = self
            .payment_repo
            .create(
                &mut *tx,
                project_id,
                amount,
                method,
                reference_no,
                notes,
                recorded_by,
                paid_at.unwrap_or_else(Utc::now),
            )
            .await?;

        tx.commit().await?;

        self.notification_service
            .notify(
                project.client_id,
                NotificationEvent::PaymentRecorded {
                    project_id,
                    project_name: project.name,
                    amount,
                    method,
                },
            )
            .await;

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
        self.payment_repo.list_for_project(executor, project_id).await
    }

    pub async fn summary_for_project<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<PaymentSummary, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.payment_repo
            .summary_for_project(executor, project_id)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valor_do_pagamento_deve_ser_positivo() {
        assert!(matches!(
            ensure_positive_amount(Decimal::ZERO),
            Err(AppError::InvalidAmount)
        ));
        assert!(ensure_positive_amount(Decimal::ONE).is_ok());
    }
}
