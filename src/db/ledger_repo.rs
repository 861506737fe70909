// src/db/ledger_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::inventory::{ActionBy, LedgerAction, LedgerRecord, MainInventoryItem},
};

// O livro-razão de transferências por obra. Apenas INSERT e SELECT:
// registros nunca são editados ou apagados em operação normal. A
// reconciliação é sempre um fold sobre este log.
#[derive(Clone)]
pub struct LedgerRepository {
    pool: PgPool,
}

impl LedgerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Grava exatamente um registro imutável de movimentação.
    /// unit/supplier/sale_price são a fotografia do produto no momento.
    pub async fn append<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        product: &MainInventoryItem,
        action: LedgerAction,
        quantity: Decimal,
        unit: &str,
        total_value: Decimal,
        project_reorder_point: Option<Decimal>,
        action_by: &ActionBy,
        notes: Option<&str>,
    ) -> Result<LedgerRecord, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let record = sqlx::query_as::<_, LedgerRecord>(
            r#"
            INSERT INTO project_ledger
                (project_id, product_id, product_name, category, action, quantity,
                 unit, supplier, sale_price, total_value, project_reorder_point,
                 user_id, name, role, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING *
            "#,
        )
        .bind(project_id)
        .bind(product.id)
        .bind(&product.product_name)
        .bind(&product.category)
        .bind(action)
        .bind(quantity)
        .bind(unit)
        .bind(&product.supplier)
        .bind(product.sale_price)
        .bind(total_value)
        .bind(project_reorder_point)
        .bind(action_by.user_id)
        .bind(&action_by.name)
        .bind(action_by.role)
        .bind(notes)
        .fetch_one(executor)
        .await?;
        Ok(record)
    }

    // A ordem do livro é created_at, com seq desempatando inserções no
    // mesmo instante. Toda leitura sai já ordenada para o fold.
    pub async fn list_for_project<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
    ) -> Result<Vec<LedgerRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, LedgerRecord>(
            "SELECT * FROM project_ledger WHERE project_id = $1 ORDER BY created_at ASC, seq ASC",
        )
        .bind(project_id)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }

    pub async fn list_for_project_product<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        product_id: Uuid,
    ) -> Result<Vec<LedgerRecord>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let records = sqlx::query_as::<_, LedgerRecord>(
            r#"
            SELECT * FROM project_ledger
            WHERE project_id = $1 AND product_id = $2
            ORDER BY created_at ASC, seq ASC
            "#,
        )
        .bind(project_id)
        .bind(product_id)
        .fetch_all(executor)
        .await?;
        Ok(records)
    }

    /// Último reorder point afirmado por um checkout desta obra+produto.
    /// Usado para propagar o limite quando o checkout seguinte o omite.
    pub async fn last_reorder_point<'e, E>(
        &self,
        executor: E,
        project_id: Uuid,
        product_id: Uuid,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let value = sqlx::query_scalar::<_, Decimal>(
            r#"
            SELECT project_reorder_point FROM project_ledger
            WHERE project_id = $1
              AND product_id = $2
              AND action = 'checked_out'
              AND project_reorder_point IS NOT NULL
            ORDER BY created_at DESC, seq DESC
            LIMIT 1
            "#,
        )
        .bind(project_id)
        .bind(product_id)
        .fetch_optional(executor)
        .await?;
        Ok(value)
    }
}
