// src/main.rs

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{delete, get, post},
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/verify-otp", post(handlers::auth::verify_otp))
        .route("/login", post(handlers::auth::login));

    // Rotas de usuário (protegidas pelo middleware)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Obras: ciclo de vida, linha do tempo, transferências, pagamentos e
    // exportação, tudo escopado por obra.
    let project_routes = Router::new()
        .route(
            "/",
            post(handlers::projects::create_project).get(handlers::projects::list_projects),
        )
        .route("/{id}", get(handlers::projects::get_project))
        .route("/{id}/confirm", post(handlers::projects::confirm_project))
        .route("/{id}/start", post(handlers::projects::start_project))
        .route("/{id}/complete", post(handlers::projects::complete_project))
        .route("/{id}/cancel", post(handlers::projects::cancel_project))
        .route(
            "/{id}/timeline",
            post(handlers::projects::add_timeline_entry).get(handlers::projects::list_timeline),
        )
        .route(
            "/{id}/timeline/{entry_id}",
            delete(handlers::projects::delete_timeline_entry),
        )
        .route(
            "/{id}/inventory/transfers",
            post(handlers::inventory::record_transfer),
        )
        .route(
            "/{id}/inventory/transactions",
            get(handlers::inventory::list_transactions),
        )
        .route(
            "/{id}/inventory/current",
            get(handlers::inventory::get_current_inventory),
        )
        .route(
            "/{id}/inventory/export",
            get(handlers::exports::export_project_inventory),
        )
        .route(
            "/{id}/payments",
            post(handlers::payments::record_payment).get(handlers::payments::list_payments),
        )
        .route(
            "/{id}/payments/summary",
            get(handlers::payments::payment_summary),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Almoxarifado central
    let inventory_routes = Router::new()
        .route(
            "/items",
            post(handlers::inventory::create_main_item).get(handlers::inventory::list_main_items),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let notification_routes = Router::new()
        .route("/", get(handlers::notifications::list_notifications))
        .route(
            "/{id}/read",
            post(handlers::notifications::mark_notification_read),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/projects", project_routes)
        .nest("/api/inventory", inventory_routes)
        .nest("/api/notifications", notification_routes)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app)
        .await
        .expect("Erro no servidor Axum");
}
