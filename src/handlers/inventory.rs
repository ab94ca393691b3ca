// src/handlers/inventory.rs

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::{AuthenticatedUser, RequireAdmin},
    models::inventory::{
        Category, CreateCategoryPayload, CreateProductPayload, ProductFilter,
        ProductWithCategory, UpdateProductPayload,
    },
};

// ---
// Handler: get_products (filtros opcionales: búsqueda, categoría, estado)
// ---
#[utoipa::path(
    get,
    path = "/api/products",
    params(ProductFilter),
    responses(
        (status = 200, description = "Productos ordenados por nombre, con categoría resuelta", body = [ProductWithCategory]),
        (status = 401, description = "Token ausente o inválido")
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn get_products(
    State(app_state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<impl IntoResponse, AppError> {
    let products = app_state.inventory_service.list_products(&filter).await?;
    Ok((StatusCode::OK, Json(products)))
}

// ---
// Handler: create_product (solo Admin)
// ---
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = CreateProductPayload,
    responses(
        (status = 201, description = "Producto creado con status recalculado", body = ProductWithCategory),
        (status = 400, description = "Campos inválidos o SKU duplicado"),
        (status = 403, description = "Se requiere rol de Admin")
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn create_product(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Json(payload): Json<CreateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.inventory_service.create_product(&payload).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

// ---
// Handler: update_product (solo Admin; aplica solo los campos presentes)
// ---
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "ID del producto")),
    request_body = UpdateProductPayload,
    responses(
        (status = 200, description = "Producto actualizado", body = ProductWithCategory),
        (status = 400, description = "SKU duplicado"),
        (status = 403, description = "Se requiere rol de Admin"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn update_product(
    State(app_state): State<AppState>,
    AuthenticatedUser(user): AuthenticatedUser,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateProductPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let product = app_state.inventory_service.update_product(user.id, id, &payload).await?;
    Ok((StatusCode::OK, Json(product)))
}

// ---
// Handler: delete_product (solo Admin; borrado físico)
// ---
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = Uuid, Path, description = "ID del producto")),
    responses(
        (status = 200, description = "Producto eliminado"),
        (status = 403, description = "Se requiere rol de Admin"),
        (status = 404, description = "Producto no encontrado")
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn delete_product(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, AppError> {
    app_state.inventory_service.delete_product(id).await?;
    Ok((StatusCode::OK, Json(json!({ "msg": "Producto eliminado" }))))
}

// ---
// Handler: get_categories (para los dropdowns de filtro)
// ---
#[utoipa::path(
    get,
    path = "/api/products/categories",
    responses(
        (status = 200, description = "Todas las categorías ordenadas por nombre", body = [Category])
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn get_categories(
    State(app_state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    let categories = app_state.inventory_service.list_categories().await?;
    Ok((StatusCode::OK, Json(categories)))
}

// ---
// Handler: create_category (solo Admin)
// ---
#[utoipa::path(
    post,
    path = "/api/products/categories",
    request_body = CreateCategoryPayload,
    responses(
        (status = 201, description = "Categoría creada", body = Category),
        (status = 400, description = "Nombre ausente o duplicado"),
        (status = 403, description = "Se requiere rol de Admin")
    ),
    security(("token" = [])),
    tag = "products"
)]
pub async fn create_category(
    State(app_state): State<AppState>,
    _guard: RequireAdmin,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let category = app_state.inventory_service.create_category(&payload).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
