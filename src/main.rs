// src/main.rs

use axum::{
    Router,
    extract::DefaultBodyLimit,
    http::HeaderValue,
    middleware as axum_middleware,
    routing::{get, post},
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod llm;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

// Las imágenes de perfil aceptan hasta 5MB; el límite del body va un poco
// por encima para dejar sitio al framing del multipart.
const UPLOAD_BODY_LIMIT: usize = 6 * 1024 * 1024;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_target(false).compact().init();

    // Si la configuración falla, la aplicación no debe arrancar.
    let app_state = AppState::new()
        .await
        .expect("Fallo al inicializar el estado de la aplicación.");

    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Fallo al ejecutar las migraciones de la base de datos.");

    tracing::info!("✅ Migraciones de la base de datos ejecutadas con éxito!");

    // Rutas de autenticación: register/login públicas, /me protegida
    let auth_public_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login));

    let auth_private_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // El rol Admin se exige dentro de los handlers de mutación
    let product_routes = Router::new()
        .route(
            "/",
            get(handlers::inventory::get_products).post(handlers::inventory::create_product),
        )
        .route(
            "/categories",
            get(handlers::inventory::get_categories).post(handlers::inventory::create_category),
        )
        .route(
            "/{id}",
            axum::routing::put(handlers::inventory::update_product)
                .delete(handlers::inventory::delete_product),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let dashboard_routes = Router::new()
        .route("/stats", get(handlers::dashboard::get_stats))
        .route("/alerts", get(handlers::dashboard::get_alerts))
        .route("/demand-prediction", get(handlers::dashboard::get_demand_prediction))
        .route("/category-demand", get(handlers::dashboard::get_category_demand))
        .route("/recommendations", get(handlers::dashboard::get_recommendations))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let chat_routes = Router::new()
        .route("/", post(handlers::chat::handle_chat))
        .route(
            "/history",
            get(handlers::chat::get_chat_history).delete(handlers::chat::delete_chat_history),
        )
        .route("/report", get(handlers::chat::strategy_report))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let profile_routes = Router::new()
        .route(
            "/",
            get(handlers::profile::get_profile).put(handlers::profile::update_profile),
        )
        .route("/image", post(handlers::profile::upload_image))
        .layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT))
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    let settings_routes = Router::new()
        .route(
            "/",
            get(handlers::settings::get_settings).put(handlers::settings::update_settings),
        )
        .layer(axum_middleware::from_fn_with_state(app_state.clone(), auth_guard));

    // CORS: el frontend de desarrollo más el origen configurado
    let mut origins: Vec<HeaderValue> = vec![
        HeaderValue::from_static("http://localhost:5173"),
        HeaderValue::from_static("http://localhost:5174"),
    ];
    if let Some(origin) = &app_state.cors_origin {
        match origin.parse() {
            Ok(value) => origins.push(value),
            Err(_) => tracing::warn!("CORS_ORIGIN inválido, se ignora: {}", origin),
        }
    }
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any);

    let port = app_state.port;
    let uploads_dir = app_state.uploads_dir.clone();

    // Combina todo en el router principal
    let app = Router::new()
        .route("/", get(|| async { "API de Inventory 360 funcionando" }))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_public_routes.merge(auth_private_routes))
        .nest("/api/products", product_routes)
        .nest("/api/dashboard", dashboard_routes)
        .nest("/api/chat", chat_routes)
        .nest("/api/profile", profile_routes)
        .nest("/api/settings", settings_routes)
        .nest_service("/uploads", ServeDir::new(uploads_dir))
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", docs::ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(app_state);

    // Inicia el servidor
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("Fallo al iniciar el listener TCP");
    tracing::info!("🚀 Servidor escuchando en {}", addr);
    axum::serve(listener, app).await.expect("Error en el servidor Axum");
}
