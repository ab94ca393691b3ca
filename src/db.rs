pub mod user_repo;
pub use user_repo::UserRepository;
pub mod inventory_repo;
pub use inventory_repo::InventoryRepository;
pub mod dashboard_repo;
pub use dashboard_repo::DashboardRepository;
pub mod chat_repo;
pub use chat_repo::ChatRepository;
pub mod settings_repo;
pub use settings_repo::SettingsRepository;
