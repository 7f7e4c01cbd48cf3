//! In-memory inventory store.
//!
//! Backs tests and the database-less dev mode. A single `RwLock` write
//! guard spans every check-mutate-append sequence, which gives the same
//! indivisibility the Postgres impl gets from conditional statements and
//! transactions.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StoreResult;
use crate::store::{
    AdjustOutcome, InventoryStore, RestockOutcome, SellOutcome, SEARCH_LIMIT, local_day_bounds,
};
use sb_parser::normalize;
use sb_protocol::{
    Actor, DailySales, Movement, MovementKind, MovementView, Product, SaleLine, new_sku,
};

#[derive(Default)]
struct Inner {
    products: HashMap<Uuid, Product>,
    movements: Vec<Movement>,
}

/// In-memory implementation of [`InventoryStore`].
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store pre-seeded with `(name, brand, stock)` entries.
    /// Seeding writes no movements; it models pre-existing catalog state.
    pub fn with_catalog(items: &[(&str, Option<&str>, i64)]) -> Self {
        let mut inner = Inner::default();
        for (name, brand, stock) in items {
            let product = build_product(name, *brand, *stock);
            inner.products.insert(product.id, product);
        }
        Self {
            inner: RwLock::new(inner),
        }
    }

    fn view(inner: &Inner, movement: &Movement) -> MovementView {
        let product = inner.products.get(&movement.product_id);
        MovementView {
            kind: movement.kind,
            product_name: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| "Desconocido".to_string()),
            product_brand: product.and_then(|p| p.brand.clone()),
            qty: movement.qty,
            delta: movement.delta,
            price: movement.price,
            created_at: movement.created_at,
        }
    }
}

fn build_product(name: &str, brand: Option<&str>, stock: i64) -> Product {
    let now = Utc::now();
    Product {
        id: Uuid::now_v7(),
        name: name.trim().to_string(),
        name_normalized: normalize(name),
        brand: brand.map(|b| b.trim().to_string()),
        brand_normalized: brand.map(normalize),
        sku: new_sku(),
        stock,
        last_movement_at: None,
        created_at: now,
        updated_at: now,
    }
}

fn sorted_by_name(mut products: Vec<Product>) -> Vec<Product> {
    products.sort_by(|a, b| {
        (&a.name_normalized, &a.brand_normalized).cmp(&(&b.name_normalized, &b.brand_normalized))
    });
    products
}

#[async_trait]
impl InventoryStore for MemoryStore {
    async fn find_or_create(&self, name: &str, brand: Option<&str>) -> StoreResult<Product> {
        let name_normalized = normalize(name);
        let brand_normalized = brand.map(normalize);

        let mut inner = self.inner.write().await;
        if let Some(existing) = inner.products.values().find(|p| {
            p.name_normalized == name_normalized && p.brand_normalized == brand_normalized
        }) {
            return Ok(existing.clone());
        }

        let product = build_product(name, brand, 0);
        tracing::info!(
            product = %product.name,
            brand = product.brand.as_deref().unwrap_or("sin marca"),
            sku = %product.sku,
            "product created"
        );
        inner.products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn search(&self, name: &str, brand: Option<&str>) -> StoreResult<Vec<Product>> {
        let name_query = normalize(name);
        let brand_query = brand.map(normalize);

        let inner = self.inner.read().await;
        let matches: Vec<Product> = inner
            .products
            .values()
            .filter(|p| p.name_normalized.contains(&name_query))
            .filter(|p| match &brand_query {
                Some(bq) => p
                    .brand_normalized
                    .as_deref()
                    .is_some_and(|pb| pb.contains(bq.as_str())),
                None => true,
            })
            .cloned()
            .collect();

        Ok(sorted_by_name(matches)
            .into_iter()
            .take(SEARCH_LIMIT)
            .collect())
    }

    async fn get(&self, product_id: Uuid) -> StoreResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(&product_id).cloned())
    }

    async fn sell(
        &self,
        product_id: Uuid,
        qty: i64,
        price: Option<i64>,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<SellOutcome> {
        let mut inner = self.inner.write().await;
        let Some(product) = inner.products.get_mut(&product_id) else {
            return Ok(SellOutcome::NotFound);
        };
        if product.stock < qty {
            return Ok(SellOutcome::InsufficientStock {
                available: product.stock,
            });
        }

        product.stock -= qty;
        product.last_movement_at = Some(Utc::now());
        product.updated_at = Utc::now();
        let sold = product.clone();

        inner.movements.push(Movement::new(
            MovementKind::Sale,
            product_id,
            -qty,
            price,
            raw_text,
            actor,
        ));
        Ok(SellOutcome::Sold { product: sold })
    }

    async fn restock(
        &self,
        product_id: Uuid,
        qty: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<RestockOutcome> {
        let mut inner = self.inner.write().await;
        let Some(product) = inner.products.get_mut(&product_id) else {
            return Ok(RestockOutcome::NotFound);
        };

        product.stock += qty;
        product.last_movement_at = Some(Utc::now());
        product.updated_at = Utc::now();
        let restocked = product.clone();

        inner.movements.push(Movement::new(
            MovementKind::Restock,
            product_id,
            qty,
            None,
            raw_text,
            actor,
        ));
        Ok(RestockOutcome::Restocked { product: restocked })
    }

    async fn adjust(
        &self,
        product_id: Uuid,
        new_stock: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<AdjustOutcome> {
        let mut inner = self.inner.write().await;
        let Some(product) = inner.products.get_mut(&product_id) else {
            return Ok(AdjustOutcome::NotFound);
        };

        let old_stock = product.stock;
        product.stock = new_stock;
        product.last_movement_at = Some(Utc::now());
        product.updated_at = Utc::now();
        let adjusted = product.clone();

        inner.movements.push(Movement::new(
            MovementKind::Adjust,
            product_id,
            new_stock - old_stock,
            None,
            raw_text,
            actor,
        ));
        Ok(AdjustOutcome::Adjusted {
            product: adjusted,
            old_stock,
        })
    }

    async fn list_inventory(&self, include_empty: bool) -> StoreResult<Vec<Product>> {
        let inner = self.inner.read().await;
        let products: Vec<Product> = inner
            .products
            .values()
            .filter(|p| include_empty || p.stock > 0)
            .cloned()
            .collect();
        Ok(sorted_by_name(products))
    }

    async fn recent_movements(&self, limit: usize) -> StoreResult<Vec<MovementView>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movements
            .iter()
            .rev()
            .take(limit)
            .map(|m| Self::view(&inner, m))
            .collect())
    }

    async fn product_movements(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<MovementView>> {
        let inner = self.inner.read().await;
        Ok(inner
            .movements
            .iter()
            .rev()
            .filter(|m| m.product_id == product_id)
            .take(limit)
            .map(|m| Self::view(&inner, m))
            .collect())
    }

    async fn daily_sales(&self) -> StoreResult<DailySales> {
        let (start, end) = local_day_bounds();
        let inner = self.inner.read().await;

        let mut report = DailySales::default();
        for movement in inner.movements.iter().rev() {
            if movement.kind != MovementKind::Sale
                || movement.created_at < start
                || movement.created_at >= end
            {
                continue;
            }
            let product = inner.products.get(&movement.product_id);
            let subtotal = movement.price.unwrap_or(0) * movement.qty;
            report.total_quantity += movement.qty;
            report.total_revenue += subtotal;
            report.sales.push(SaleLine {
                product_name: product
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| "Desconocido".to_string()),
                product_brand: product.and_then(|p| p.brand.clone()),
                qty: movement.qty,
                price: movement.price,
                subtotal,
                created_at: movement.created_at,
            });
        }
        Ok(report)
    }
}
