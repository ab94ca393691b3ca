// src/services/inventory_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::InventoryRepository,
    models::inventory::{
        Category, CreateCategoryPayload, CreateProductPayload, Product, ProductFilter,
        ProductStatus, ProductWithCategory, TransactionType, UpdateProductPayload,
    },
};

#[derive(Clone)]
pub struct InventoryService {
    inventory_repo: InventoryRepository,
    pool: PgPool,
}

impl InventoryService {
    pub fn new(inventory_repo: InventoryRepository, pool: PgPool) -> Self {
        Self { inventory_repo, pool }
    }

    // ---
    // Productos
    // ---

    pub async fn list_products(
        &self,
        filter: &ProductFilter,
    ) -> Result<Vec<ProductWithCategory>, AppError> {
        self.inventory_repo.list_products(filter).await
    }

    pub async fn create_product(
        &self,
        payload: &CreateProductPayload,
    ) -> Result<ProductWithCategory, AppError> {
        let status = ProductStatus::compute(payload.stock, payload.critical_threshold);

        let product = self
            .inventory_repo
            .insert_product(
                &self.pool,
                payload.sku.trim(),
                payload.name.trim(),
                payload.description.as_deref(),
                payload.category_id.expect("validado por el payload"),
                payload.price,
                payload.stock,
                payload.critical_threshold,
                status,
                payload.image_url.as_deref(),
            )
            .await?;

        self.populated(product.id).await
    }

    // Aplica solo los campos presentes, recalcula el status y, si el stock
    // cambió, deja el movimiento en el libro mayor dentro de la misma
    // transacción.
    pub async fn update_product(
        &self,
        user_id: Uuid,
        id: Uuid,
        payload: &UpdateProductPayload,
    ) -> Result<ProductWithCategory, AppError> {
        let mut tx = self.pool.begin().await?;

        let mut product = self
            .inventory_repo
            .find_product(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let old_stock = product.stock;
        apply_partial_update(&mut product, payload);
        product.status = ProductStatus::compute(product.stock, product.critical_threshold);

        let updated = self.inventory_repo.update_product_row(&mut *tx, &product).await?;

        let delta = updated.stock - old_stock;
        if delta != 0 {
            // Bajada de stock = venta; subida = reabastecimiento
            let kind = if delta < 0 {
                TransactionType::Venta
            } else {
                TransactionType::Reabastecimiento
            };
            self.inventory_repo
                .record_transaction(&mut *tx, updated.id, user_id, delta, kind)
                .await?;
        }

        tx.commit().await?;
        self.populated(id).await
    }

    // Sobrescritura directa del stock (el camino del asistente). Registra
    // el delta firmado como Ajuste_IA en la misma transacción.
    pub async fn set_stock(
        &self,
        user_id: Uuid,
        id: Uuid,
        new_stock: i32,
    ) -> Result<(i32, Product), AppError> {
        let mut tx = self.pool.begin().await?;

        let mut product = self
            .inventory_repo
            .find_product(&mut *tx, id)
            .await?
            .ok_or(AppError::ProductNotFound)?;

        let old_stock = product.stock;
        product.stock = new_stock;
        product.status = ProductStatus::compute(product.stock, product.critical_threshold);

        let updated = self.inventory_repo.update_product_row(&mut *tx, &product).await?;

        let delta = new_stock - old_stock;
        if delta != 0 {
            self.inventory_repo
                .record_transaction(&mut *tx, updated.id, user_id, delta, TransactionType::AjusteIa)
                .await?;
        }

        tx.commit().await?;
        Ok((old_stock, updated))
    }

    pub async fn delete_product(&self, id: Uuid) -> Result<(), AppError> {
        let deleted = self.inventory_repo.delete_product(&self.pool, id).await?;
        if deleted == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    // ---
    // Resoluciones laxas que usa el asistente
    // ---

    pub async fn find_by_name_exact(&self, name: &str) -> Result<Option<Product>, AppError> {
        self.inventory_repo.find_product_by_name_exact(name).await
    }

    pub async fn find_by_name_like(
        &self,
        name: &str,
    ) -> Result<Option<ProductWithCategory>, AppError> {
        self.inventory_repo.find_product_by_name_like(name).await
    }

    pub async fn find_category_by_name_like(
        &self,
        name: &str,
    ) -> Result<Option<Category>, AppError> {
        self.inventory_repo.find_category_by_name_like(name).await
    }

    pub async fn list_products_limited(
        &self,
        category: Option<Uuid>,
        limit: i64,
    ) -> Result<Vec<ProductWithCategory>, AppError> {
        self.inventory_repo.list_products_limited(category, limit).await
    }

    pub async fn count_products(&self, category: Option<Uuid>) -> Result<i64, AppError> {
        self.inventory_repo.count_products(category).await
    }

    async fn populated(&self, id: Uuid) -> Result<ProductWithCategory, AppError> {
        self.inventory_repo
            .find_product_with_category(id)
            .await?
            .ok_or(AppError::ProductNotFound)
    }

    // ---
    // Categorías
    // ---

    pub async fn create_category(
        &self,
        payload: &CreateCategoryPayload,
    ) -> Result<Category, AppError> {
        self.inventory_repo
            .create_category(&self.pool, payload.name.trim(), payload.description.as_deref())
            .await
    }

    pub async fn list_categories(&self) -> Result<Vec<Category>, AppError> {
        self.inventory_repo.list_categories().await
    }

    // Resolución explícita en dos pasos: busca sin distinguir mayúsculas
    // y, si no existe, crea con el nombre en mayúscula inicial. Devuelve
    // si hubo creación para que el llamador lo deje en el log.
    pub async fn resolve_or_create_category(
        &self,
        name: &str,
    ) -> Result<(Category, bool), AppError> {
        if let Some(category) = self.inventory_repo.find_category_by_name_exact(name).await? {
            return Ok((category, false));
        }

        let category = self
            .inventory_repo
            .create_category(&self.pool, &title_case(name), None)
            .await?;
        Ok((category, true))
    }
}

fn apply_partial_update(product: &mut Product, payload: &UpdateProductPayload) {
    if let Some(sku) = &payload.sku {
        product.sku = sku.trim().to_string();
    }
    if let Some(name) = &payload.name {
        product.name = name.trim().to_string();
    }
    if let Some(description) = &payload.description {
        product.description = Some(description.clone());
    }
    if let Some(category_id) = payload.category_id {
        product.category_id = category_id;
    }
    if let Some(price) = payload.price {
        product.price = price;
    }
    if let Some(stock) = payload.stock {
        product.stock = stock;
    }
    if let Some(threshold) = payload.critical_threshold {
        product.critical_threshold = threshold;
    }
    if let Some(image_url) = &payload.image_url {
        product.image_url = Some(image_url.clone());
    }
}

// "bebidas" -> "Bebidas", "LÁCTEOS" -> "Lácteos"
pub fn title_case(name: &str) -> String {
    let mut chars = name.trim().chars();
    match chars.next() {
        Some(first) => {
            first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
        }
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn producto() -> Product {
        Product {
            id: Uuid::new_v4(),
            sku: "REF-001".to_string(),
            name: "Refresco".to_string(),
            description: None,
            category_id: Uuid::new_v4(),
            price: Decimal::new(1550, 2),
            stock: 25,
            critical_threshold: 10,
            status: ProductStatus::Normal,
            image_url: None,
        }
    }

    #[test]
    fn update_parcial_solo_toca_campos_presentes() {
        let mut p = producto();
        let original_sku = p.sku.clone();
        let payload = UpdateProductPayload {
            price: Some(Decimal::new(2000, 2)),
            stock: Some(5),
            ..Default::default()
        };
        apply_partial_update(&mut p, &payload);
        assert_eq!(p.sku, original_sku);
        assert_eq!(p.price, Decimal::new(2000, 2));
        assert_eq!(p.stock, 5);
        // El status lo recalcula el servicio después de aplicar
        assert_eq!(ProductStatus::compute(p.stock, p.critical_threshold), ProductStatus::Critico);
    }

    #[test]
    fn title_case_normaliza() {
        assert_eq!(title_case("bebidas"), "Bebidas");
        assert_eq!(title_case("LÁCTEOS"), "Lácteos");
        assert_eq!(title_case("  snacks "), "Snacks");
        assert_eq!(title_case(""), "");
    }
}
