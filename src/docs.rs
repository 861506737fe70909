// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};

use crate::handlers;
use crate::models;
use crate::services;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::verify_otp,
        handlers::auth::login,

        // --- Users ---
        handlers::auth::get_me,

        // --- Projects ---
        handlers::projects::create_project,
        handlers::projects::list_projects,
        handlers::projects::get_project,
        handlers::projects::confirm_project,
        handlers::projects::start_project,
        handlers::projects::complete_project,
        handlers::projects::cancel_project,
        handlers::projects::add_timeline_entry,
        handlers::projects::list_timeline,
        handlers::projects::delete_timeline_entry,

        // --- Inventory ---
        handlers::inventory::create_main_item,
        handlers::inventory::list_main_items,
        handlers::inventory::record_transfer,
        handlers::inventory::list_transactions,
        handlers::inventory::get_current_inventory,

        // --- Payments ---
        handlers::payments::record_payment,
        handlers::payments::list_payments,
        handlers::payments::payment_summary,

        // --- Reports ---
        handlers::exports::export_project_inventory,

        // --- Notifications ---
        handlers::notifications::list_notifications,
        handlers::notifications::mark_notification_read,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::UserRole,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::VerifyOtpPayload,
            models::auth::AuthResponse,

            // --- Projects ---
            models::project::ProjectStatus,
            models::project::Project,
            models::project::TimelineEntry,
            models::project::CreateProjectPayload,
            models::project::CancelProjectPayload,
            models::project::CreateTimelineEntryPayload,

            // --- Inventory ---
            models::inventory::LedgerAction,
            models::inventory::ActionBy,
            models::inventory::LedgerRecord,
            models::inventory::MainInventoryItem,
            models::inventory::CurrentInventoryItem,
            models::inventory::RecordTransferPayload,
            models::inventory::CreateMainItemPayload,

            // --- Payments ---
            models::payment::PaymentMethod,
            models::payment::Payment,
            models::payment::RecordPaymentPayload,
            models::payment::PaymentSummary,

            // --- Notifications ---
            models::notification::NotificationEvent,
            models::notification::Notification,

            // --- Reports ---
            services::export_service::ExportKind,
        )
    ),
    tags(
        (name = "Auth", description = "Autenticação e Registro"),
        (name = "Users", description = "Dados do Usuário e Perfil"),
        (name = "Projects", description = "Ciclo de Vida das Obras e Linha do Tempo"),
        (name = "Inventory", description = "Almoxarifado e Transferências por Obra"),
        (name = "Payments", description = "Registros de Pagamento"),
        (name = "Reports", description = "Exportação de Relatórios (CSV)"),
        (name = "Notifications", description = "Notificações In-App")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}
