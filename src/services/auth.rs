// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand::Rng;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::{Claims, User},
        notification::NotificationEvent,
    },
    services::notification_service::NotificationService,
};

// Minutos de validade do código de verificação enviado por e-mail.
const OTP_TTL_MINUTES: i64 = 15;

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    notification_service: NotificationService,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        notification_service: NotificationService,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            user_repo,
            notification_service,
            jwt_secret,
            pool,
        }
    }

    /// Cria o usuário (ainda não verificado) e dispara o OTP por e-mail.
    /// O token só sai depois da confirmação do código.
    pub async fn register_user(
        &self,
        email: &str,
        full_name: &str,
        password: &str,
    ) -> Result<User, AppError> {
        // Hashing fora da transação (não toca no banco) e fora do runtime.
        let password_clone = password.to_owned();
        let hashed_password =
            tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;

        let code = generate_otp_code();
        let expires_at = Utc::now() + chrono::Duration::minutes(OTP_TTL_MINUTES);

        // Usuário + OTP na mesma transação: ou os dois existem, ou nenhum.
        let mut tx = self.pool.begin().await?;

        let new_user = self
            .user_repo
            .create_user(&mut *tx, email, full_name, &hashed_password)
            .await?;

        self.user_repo
            .create_otp(&mut *tx, new_user.id, &code, expires_at)
            .await?;

        tx.commit().await?;

        // Pós-commit, dispara-e-esquece: falha de e-mail não desfaz o cadastro.
        self.notification_service
            .notify(
                new_user.id,
                NotificationEvent::OtpRequested {
                    email: new_user.email.clone(),
                    code,
                    expires_at,
                },
            )
            .await;

        Ok(new_user)
    }

    /// Confirma o código e devolve o primeiro token de sessão.
    pub async fn verify_otp(&self, email: &str, code: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::UserNotFound)?;

        let mut tx = self.pool.begin().await?;

        // Consumo atômico: só casa com código vivo e não usado.
        self.user_repo
            .consume_otp(&mut *tx, user.id, code)
            .await?
            .ok_or(AppError::InvalidOtp)?;

        self.user_repo.mark_verified(&mut *tx, user.id).await?;

        tx.commit().await?;

        self.create_token(user.id)
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .user_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid =
            tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
                .await
                .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        if !user.is_verified {
            return Err(AppError::Forbidden(
                "Confirme seu e-mail antes de entrar.".to_string(),
            ));
        }

        self.create_token(user.id)
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

fn generate_otp_code() -> String {
    let code: u32 = rand::thread_rng().gen_range(0..1_000_000);
    format!("{code:06}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn otp_tem_sempre_seis_digitos() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 6);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }
}
