// src/db/main_inventory_repo.rs

use rust_decimal::Decimal;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::inventory::MainInventoryItem};

// Estoque do almoxarifado central: a fonte autoritativa de disponibilidade.
// O handler de transferência sempre relê daqui na hora do comando, nunca
// de um valor em cache.
#[derive(Clone)]
pub struct MainInventoryRepository {
    pool: PgPool,
}

impl MainInventoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create<'e, E>(
        &self,
        executor: E,
        product_name: &str,
        category: &str,
        unit: &str,
        supplier: Option<&str>,
        quantity: Decimal,
        sale_price: Decimal,
        reorder_point: Option<Decimal>,
    ) -> Result<MainInventoryItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, MainInventoryItem>(
            r#"
            INSERT INTO main_inventory
                (product_name, category, unit, supplier, quantity, sale_price, reorder_point)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING *
            "#,
        )
        .bind(product_name)
        .bind(category)
        .bind(unit)
        .bind(supplier)
        .bind(quantity)
        .bind(sale_price)
        .bind(reorder_point)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    pub async fn list<'e, E>(&self, executor: E) -> Result<Vec<MainInventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let items = sqlx::query_as::<_, MainInventoryItem>(
            "SELECT * FROM main_inventory ORDER BY product_name ASC",
        )
        .fetch_all(executor)
        .await?;
        Ok(items)
    }

    /// Leitura fresca do produto (inclui a quantidade autoritativa).
    pub async fn find_by_id<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<MainInventoryItem>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, MainInventoryItem>(
            "SELECT * FROM main_inventory WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(item)
    }

    pub async fn get_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
    ) -> Result<Option<Decimal>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let quantity =
            sqlx::query_scalar::<_, Decimal>("SELECT quantity FROM main_inventory WHERE id = $1")
                .bind(id)
                .fetch_optional(executor)
                .await?;
        Ok(quantity)
    }

    /// Baixa condicional: só desconta se ainda houver saldo suficiente.
    /// Dois checkouts concorrentes não conseguem vender o mesmo estoque:
    /// o segundo vê zero linhas afetadas e devolve `false`.
    pub async fn checkout_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: Decimal,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            r#"
            UPDATE main_inventory
            SET quantity = quantity - $2, updated_at = now()
            WHERE id = $1 AND quantity >= $2
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Devolução da obra: credita o saldo de volta ao almoxarifado.
    pub async fn return_quantity<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        quantity: Decimal,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query(
            r#"
            UPDATE main_inventory
            SET quantity = quantity + $2, updated_at = now()
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(quantity)
        .execute(executor)
        .await?;
        Ok(())
    }
}
