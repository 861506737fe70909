pub mod auth;
pub mod export_service;
pub mod notification_service;
pub mod payment_service;
pub mod project_service;
pub mod reconciliation;
pub mod transfer_service;
