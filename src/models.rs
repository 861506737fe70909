pub mod auth;
pub mod inventory;
pub mod notification;
pub mod payment;
pub mod project;
