// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::db::{
    LedgerRepository, MainInventoryRepository, NotificationRepository, PaymentRepository,
    ProjectRepository, UserRepository,
};
use crate::services::{
    auth::AuthService,
    notification_service::{LogEmailSender, NotificationService},
    payment_service::PaymentService,
    project_service::{LogObjectStorage, ProjectService},
    transfer_service::TransferService,
};

// O estado compartilhado, montado uma única vez no boot e injetado via
// State do Axum. O handle do banco é construído aqui e passado adiante;
// nada de conexão global ambiente.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub project_service: ProjectService,
    pub transfer_service: TransferService,
    pub payment_service: PaymentService,
    pub notification_service: NotificationService,
    pub main_inventory_repo: MainInventoryRepository,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o gráfico de dependências ---
        let user_repo = UserRepository::new(db_pool.clone());
        let project_repo = ProjectRepository::new(db_pool.clone());
        let ledger_repo = LedgerRepository::new(db_pool.clone());
        let main_inventory_repo = MainInventoryRepository::new(db_pool.clone());
        let payment_repo = PaymentRepository::new(db_pool.clone());
        let notification_repo = NotificationRepository::new(db_pool.clone());

        // Colaboradores externos atrás de traits: e-mail e object storage.
        // Em produção entram as implementações reais; aqui, as que logam.
        let notification_service = NotificationService::new(
            notification_repo,
            user_repo.clone(),
            Arc::new(LogEmailSender),
            db_pool.clone(),
        );

        let auth_service = AuthService::new(
            user_repo,
            notification_service.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );

        let project_service = ProjectService::new(
            project_repo.clone(),
            notification_service.clone(),
            Arc::new(LogObjectStorage),
        );

        let transfer_service = TransferService::new(
            ledger_repo,
            main_inventory_repo.clone(),
            project_repo.clone(),
            notification_service.clone(),
        );

        let payment_service =
            PaymentService::new(payment_repo, project_repo, notification_service.clone());

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            project_service,
            transfer_service,
            payment_service,
            notification_service,
            main_inventory_repo,
        })
    }
}
