pub mod user_repo;
pub use user_repo::UserRepository;
pub mod project_repo;
pub use project_repo::ProjectRepository;
pub mod ledger_repo;
pub use ledger_repo::LedgerRepository;
pub mod main_inventory_repo;
pub use main_inventory_repo::MainInventoryRepository;
pub mod payment_repo;
pub use payment_repo::PaymentRepository;
pub mod notification_repo;
pub use notification_repo::NotificationRepository;
