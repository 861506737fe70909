// src/db/user_repo.rs

use chrono::{DateTime, Utc};
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::{OtpCode, User},
};

// O repositório de usuários, responsável pelas tabelas 'users' e 'otp_codes'.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Busca um usuário pelo seu e-mail
    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Busca um usuário pelo seu ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    // Cria um novo usuário (ainda não verificado)
    pub async fn create_user<'e, E>(
        &self,
        executor: E,
        email: &str,
        full_name: &str,
        hashed_password: &str,
    ) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, full_name, password_hash)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(email)
        .bind(full_name)
        .bind(hashed_password)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    /// Marca o usuário como verificado após a confirmação do OTP.
    pub async fn mark_verified<'e, E>(&self, executor: E, user_id: Uuid) -> Result<User, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let user = sqlx::query_as::<_, User>(
            "UPDATE users SET is_verified = TRUE, updated_at = now() WHERE id = $1 RETURNING *",
        )
        .bind(user_id)
        .fetch_one(executor)
        .await?;
        Ok(user)
    }

    // ---
    // OTP
    // ---

    pub async fn create_otp<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        code: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<OtpCode, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            INSERT INTO otp_codes (user_id, code, expires_at)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(code)
        .bind(expires_at)
        .fetch_one(executor)
        .await?;
        Ok(otp)
    }

    /// Consome o código atomicamente: só casa com OTP não usado e não
    /// expirado. Retorna None quando o código não serve.
    pub async fn consume_otp<'e, E>(
        &self,
        executor: E,
        user_id: Uuid,
        code: &str,
    ) -> Result<Option<OtpCode>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let otp = sqlx::query_as::<_, OtpCode>(
            r#"
            UPDATE otp_codes
            SET consumed_at = now()
            WHERE user_id = $1
              AND code = $2
              AND consumed_at IS NULL
              AND expires_at > now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(code)
        .fetch_optional(executor)
        .await?;
        Ok(otp)
    }
}
