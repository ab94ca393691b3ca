// src/docs.rs

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Products ---
        handlers::inventory::get_products,
        handlers::inventory::create_product,
        handlers::inventory::update_product,
        handlers::inventory::delete_product,
        handlers::inventory::get_categories,
        handlers::inventory::create_category,

        // --- Dashboard ---
        handlers::dashboard::get_stats,
        handlers::dashboard::get_alerts,
        handlers::dashboard::get_demand_prediction,
        handlers::dashboard::get_category_demand,
        handlers::dashboard::get_recommendations,

        // --- Chat ---
        handlers::chat::handle_chat,
        handlers::chat::get_chat_history,
        handlers::chat::delete_chat_history,
        handlers::chat::strategy_report,

        // --- Profile ---
        handlers::profile::get_profile,
        handlers::profile::update_profile,
        handlers::profile::upload_image,

        // --- Settings ---
        handlers::settings::get_settings,
        handlers::settings::update_settings,
    ),
    components(
        schemas(
            models::auth::User,
            models::auth::UserRole,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::AuthResponse,
            models::inventory::Category,
            models::inventory::Product,
            models::inventory::ProductWithCategory,
            models::inventory::ProductStatus,
            models::inventory::StockBand,
            models::inventory::StockTransaction,
            models::inventory::TransactionType,
            models::inventory::CreateProductPayload,
            models::inventory::UpdateProductPayload,
            models::inventory::CreateCategoryPayload,
            models::dashboard::DashboardStats,
            models::dashboard::AlertsResponse,
            models::dashboard::StockAlert,
            models::dashboard::AlertSeverity,
            models::dashboard::DemandPoint,
            models::dashboard::CategoryDemandEntry,
            models::dashboard::Recommendation,
            models::dashboard::Trend,
            models::chat::ChatLog,
            models::chat::ChatSender,
            models::chat::ChatTurn,
            models::chat::ChatMessagePayload,
            models::chat::ChatAction,
            models::chat::ChatResponse,
            models::chat::StrategyReport,
            models::profile::UpdateProfilePayload,
            models::profile::ProfileImageResponse,
            models::settings::AppConfig,
            models::settings::UpdateSettingsPayload,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Registro, login y sesión"),
        (name = "products", description = "CRUD de productos y categorías"),
        (name = "dashboard", description = "KPIs, alertas y proyecciones"),
        (name = "chat", description = "Asistente de inventario y reporte estratégico"),
        (name = "profile", description = "Perfil propio e imagen"),
        (name = "settings", description = "Configuración global"),
    ),
    info(
        title = "Inventory 360 API",
        description = "API de gestión de inventario con asistente de IA"
    )
)]
pub struct ApiDoc;

// El token viaja en la cabecera x-auth-token en todas las rutas protegidas
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "token",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("x-auth-token"))),
            );
        }
    }
}
