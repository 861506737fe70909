// src/services/transfer_service.rs

use rust_decimal::Decimal;
use sqlx::{Acquire, Executor, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{LedgerRepository, MainInventoryRepository, ProjectRepository},
    models::{
        inventory::{CurrentInventoryItem, LedgerAction, LedgerRecord, TransferInput},
        notification::NotificationEvent,
        project::Project,
    },
    services::{notification_service::NotificationService, reconciliation},
};

// O comando de transferência: valida contra o estoque autoritativo do
// almoxarifado e contra o saldo reconciliado da obra, e grava exatamente
// um registro imutável no livro-razão. Registros anteriores nunca mudam.
#[derive(Clone)]
pub struct TransferService {
    ledger_repo: LedgerRepository,
    main_inventory_repo: MainInventoryRepository,
    project_repo: ProjectRepository,
    notification_service: NotificationService,
}

// ---
// Regras de validação puras (avaliadas em ordem; a primeira falha vence)
// ---

fn ensure_positive_quantity(quantity: Decimal) -> Result<(), AppError> {
    if quantity <= Decimal::ZERO {
        return Err(AppError::InvalidQuantity);
    }
    Ok(())
}

fn ensure_main_stock(available: Decimal, requested: Decimal) -> Result<(), AppError> {
    if available < requested {
        return Err(AppError::InsufficientMainStock {
            available,
            requested,
        });
    }
    Ok(())
}

fn ensure_project_stock(current: Decimal, requested: Decimal) -> Result<(), AppError> {
    if current < requested {
        return Err(AppError::InsufficientProjectStock { current, requested });
    }
    Ok(())
}

/// Propagação do reorder point: o valor do caller vence; na omissão, o
/// limite já afirmado num checkout anterior é carregado para o novo
/// registro. Omitir NUNCA apaga um limite existente.
fn resolve_reorder_point(
    supplied: Option<Decimal>,
    prior: Option<Decimal>,
) -> Option<Decimal> {
    supplied.or(prior)
}

impl TransferService {
    pub fn new(
        ledger_repo: LedgerRepository,
        main_inventory_repo: MainInventoryRepository,
        project_repo: ProjectRepository,
        notification_service: NotificationService,
    ) -> Self {
        Self {
            ledger_repo,
            main_inventory_repo,
            project_repo,
            notification_service,
        }
    }

    /// Registra uma movimentação (checkout, devolução ou consumo).
    ///
    /// Tudo roda numa única transação: validação com leitura fresca do
    /// almoxarifado, baixa condicional do saldo principal e o append no
    /// livro. As notificações saem depois do commit e nunca desfazem a
    /// escrita.
    pub async fn record_transfer<'e, E>(
        &self,
        executor: E,
        input: TransferInput,
    ) -> Result<LedgerRecord, AppError>
    where
        E: Executor<'e, Database = Postgres> + Acquire<'e, Database = Postgres>,
    {
        ensure_positive_quantity(input.quantity)?;

        let mut tx = executor.begin().await?;

        let project = self
            .project_repo
            .find_by_id(&mut *tx, input.project_id)
            .await?
            .ok_or(AppError::ProjectNotFound)?;

        if !project.status.accepts_transfers() {
            return Err(AppError::ProjectNotActive);
        }

        // Leitura fresca do produto dentro da transação, nunca cache.
        let product = self
            .main_inventory_repo
            .find_by_id(&mut *tx, input.product_id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let prior_records = self
            .ledger_repo
            .list_for_project_product(&mut *tx, input.project_id, input.product_id)
            .await?;

        match input.action {
            LedgerAction::CheckedOut => {
                ensure_main_stock(product.quantity, input.quantity)?;

                // Baixa condicional: se outro checkout passou na frente
                // entre a leitura e o UPDATE, zero linhas são afetadas e
                // ninguém vende estoque que não existe.
                let deducted = self
                    .main_inventory_repo
                    .checkout_quantity(&mut *tx, product.id, input.quantity)
                    .await?;
                if !deducted {
                    return Err(AppError::InsufficientMainStock {
                        available: product.quantity,
                        requested: input.quantity,
                    });
                }
            }
            LedgerAction::Returned | LedgerAction::Adjusted => {
                let current =
                    reconciliation::current_quantity_of(&prior_records, input.product_id);
                ensure_project_stock(current, input.quantity)?;

                if input.action == LedgerAction::Returned {
                    self.main_inventory_repo
                        .return_quantity(&mut *tx, product.id, input.quantity)
                        .await?;
                }
            }
        }

        let prior_reorder = self
            .ledger_repo
            .last_reorder_point(&mut *tx, input.project_id, input.product_id)
            .await?;
        let reorder_point = resolve_reorder_point(input.project_reorder_point, prior_reorder);

        let unit = input.unit.as_deref().unwrap_or(&product.unit);
        let total_value = input.quantity * product.sale_price;

        let record = self
            .ledger_repo
            .append(
                &mut *tx,
                input.project_id,
                &product,
                input.action,
                input.quantity,
                unit,
                total_value,
                reorder_point,
                &input.action_by,
                input.notes.as_deref(),
            )
            .await?;

        tx.commit().await?;

        // Pós-commit: o snapshot com o registro novo decide o alerta de
        // estoque baixo. Fold puro sobre o que já foi lido, sem query extra.
        let mut all_records = prior_records;
        all_records.push(record.clone());
        let snapshot = reconciliation::reconcile(&all_records)
            .into_iter()
            .find(|item| item.product_id == input.product_id);

        self.emit_notifications(&project, &record, snapshot.as_ref())
            .await;

        Ok(record)
    }

    async fn emit_notifications(
        &self,
        project: &Project,
        record: &LedgerRecord,
        snapshot: Option<&CurrentInventoryItem>,
    ) {
        self.notification_service
            .notify(
                project.client_id,
                NotificationEvent::TransferRecorded {
                    project_id: project.id,
                    project_name: project.name.clone(),
                    product_name: record.product_name.clone(),
                    action: record.action,
                    quantity: record.quantity,
                    unit: record.unit.clone(),
                },
            )
            .await;

        if let Some(item) = snapshot {
            if item.is_low_stock {
                if let Some(threshold) = item.project_reorder_point {
                    self.notification_service
                        .notify(
                            project.client_id,
                            NotificationEvent::LowStockAlert {
                                project_id: project.id,
                                project_name: project.name.clone(),
                                product_name: item.product_name.clone(),
                                current_quantity: item.current_quantity,
                                reorder_point: threshold,
                            },
                        )
                        .await;
                }
            }
        }
    }

    // ---
    // Leituras usadas pela tela da obra
    // ---

    pub async fn project_ledger<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<LedgerRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        self.ledger_repo.list_for_project(executor, project_id).await
    }

    /// Snapshot derivado: sempre recalculado do livro, nunca armazenado.
    pub async fn project_snapshot<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<CurrentInventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = self.ledger_repo.list_for_project(executor, project_id).await?;
        Ok(reconciliation::reconcile(&records))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(n: i64) -> Decimal {
        Decimal::from(n)
    }

    #[test]
    fn quantidade_deve_ser_positiva() {
        assert!(matches!(
            ensure_positive_quantity(Decimal::ZERO),
            Err(AppError::InvalidQuantity)
        ));
        assert!(matches!(
            ensure_positive_quantity(dec(-3)),
            Err(AppError::InvalidQuantity)
        ));
        assert!(ensure_positive_quantity(dec(1)).is_ok());
    }

    #[test]
    fn checkout_maior_que_o_almoxarifado_falha() {
        let err = ensure_main_stock(dec(50), dec(100)).unwrap_err();
        match err {
            AppError::InsufficientMainStock {
                available,
                requested,
            } => {
                assert_eq!(available, dec(50));
                assert_eq!(requested, dec(100));
            }
            other => panic!("erro inesperado: {other:?}"),
        }

        assert!(ensure_main_stock(dec(100), dec(100)).is_ok());
    }

    #[test]
    fn devolucao_maior_que_o_saldo_da_obra_falha() {
        assert!(matches!(
            ensure_project_stock(dec(2), dec(5)),
            Err(AppError::InsufficientProjectStock { .. })
        ));
        assert!(ensure_project_stock(dec(5), dec(5)).is_ok());
    }

    #[test]
    fn omitir_reorder_point_carrega_o_anterior() {
        assert_eq!(resolve_reorder_point(None, Some(dec(10))), Some(dec(10)));
        // O valor do caller vence o histórico.
        assert_eq!(
            resolve_reorder_point(Some(dec(3)), Some(dec(10))),
            Some(dec(3))
        );
        assert_eq!(resolve_reorder_point(None, None), None);
    }
}
