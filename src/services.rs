pub mod auth;
pub use auth::AuthService;
pub mod inventory_service;
pub use inventory_service::InventoryService;
pub mod dashboard_service;
pub use dashboard_service::DashboardService;
pub mod chat_service;
pub use chat_service::ChatService;
pub mod profile_service;
pub use profile_service::ProfileService;
