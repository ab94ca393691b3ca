// src/config.rs

use std::{env, path::PathBuf, sync::Arc, time::Duration};

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{
    db::{
        ChatRepository, DashboardRepository, InventoryRepository, SettingsRepository,
        UserRepository,
    },
    llm::gemini::GeminiClient,
    services::{AuthService, ChatService, DashboardService, InventoryService, ProfileService},
};

const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

// El estado compartido, accesible en toda la aplicación
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub auth_service: AuthService,
    pub inventory_service: InventoryService,
    pub dashboard_service: DashboardService,
    pub chat_service: ChatService,
    pub profile_service: ProfileService,
    pub settings_repo: SettingsRepository,
    pub uploads_dir: PathBuf,
    pub cors_origin: Option<String>,
    pub port: u16,
}

impl AppState {
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL debe estar definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET debe estar definido");
        let gemini_api_key =
            env::var("GEMINI_API_KEY").expect("GEMINI_API_KEY debe estar definida");
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string());
        let uploads_dir =
            PathBuf::from(env::var("UPLOADS_DIR").unwrap_or_else(|_| "uploads".to_string()));
        let cors_origin = env::var("CORS_ORIGIN").ok();
        let port: u16 = env::var("PORT").ok().and_then(|p| p.parse().ok()).unwrap_or(3000);

        // Conecta a la base de datos, propagando el error con '?'
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexión con la base de datos establecida con éxito!");

        // --- Arma el grafo de dependencias ---
        let user_repo = UserRepository::new(db_pool.clone());
        let inventory_repo = InventoryRepository::new(db_pool.clone());
        let dashboard_repo = DashboardRepository::new(db_pool.clone());
        let chat_repo = ChatRepository::new(db_pool.clone());
        let settings_repo = SettingsRepository::new(db_pool.clone());

        let auth_service = AuthService::new(user_repo.clone(), jwt_secret);
        let inventory_service = InventoryService::new(inventory_repo, db_pool.clone());
        let dashboard_service = DashboardService::new(dashboard_repo);

        // El cliente del modelo se construye una sola vez y se inyecta;
        // los tests sustituyen el trait por un fake.
        let gemini = GeminiClient::new(&gemini_api_key, &gemini_model)?;
        let chat_service = ChatService::new(
            Arc::new(gemini),
            inventory_service.clone(),
            dashboard_service.clone(),
            chat_repo,
        );

        let profile_service = ProfileService::new(user_repo, uploads_dir.clone());

        Ok(Self {
            db_pool,
            auth_service,
            inventory_service,
            dashboard_service,
            chat_service,
            profile_service,
            settings_repo,
            uploads_dir,
            cors_origin,
            port,
        })
    }
}
