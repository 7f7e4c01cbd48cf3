//! PostgreSQL inventory store.
//!
//! Every mutation is a single conditional UPDATE plus the movement INSERT
//! inside one transaction, so the stock write and its audit record commit
//! or roll back together. `sell` folds the stock precondition into the
//! UPDATE's WHERE clause; `adjust` reads the old stock and writes the new
//! one in a single statement under `FOR UPDATE`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::{
    AdjustOutcome, InventoryStore, RestockOutcome, SellOutcome, SEARCH_LIMIT, local_day_bounds,
};
use sb_parser::normalize;
use sb_protocol::{
    Actor, DailySales, Movement, MovementKind, MovementView, Product, SaleLine, new_sku,
};

/// PostgreSQL implementation of [`InventoryStore`].
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect to PostgreSQL and run the embedded migrations.
    pub async fn connect(database_url: &str) -> StoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await?;

        tracing::info!("running database migrations");
        sqlx::raw_sql(include_str!("../migrations/001_products.sql"))
            .execute(&pool)
            .await?;
        sqlx::raw_sql(include_str!("../migrations/002_movements.sql"))
            .execute(&pool)
            .await?;
        tracing::info!("migrations complete");

        Ok(Self { pool })
    }

    /// Wrap an existing pool (tests, pool sharing).
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Product row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
struct ProductRow {
    id: Uuid,
    name: String,
    name_normalized: String,
    brand: Option<String>,
    brand_normalized: Option<String>,
    sku: String,
    stock: i64,
    last_movement_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            name: row.name,
            name_normalized: row.name_normalized,
            brand: row.brand,
            brand_normalized: row.brand_normalized,
            sku: row.sku,
            stock: row.stock,
            last_movement_at: row.last_movement_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Adjust result row: updated product plus the stock read under the lock.
#[derive(Debug, sqlx::FromRow)]
struct AdjustRow {
    #[sqlx(flatten)]
    product: ProductRow,
    old_stock: i64,
}

/// Movement row joined with product display fields.
#[derive(Debug, sqlx::FromRow)]
struct MovementViewRow {
    kind: String,
    product_name: String,
    product_brand: Option<String>,
    qty: i64,
    delta: i64,
    price: Option<i64>,
    created_at: DateTime<Utc>,
}

impl MovementViewRow {
    fn into_view(self) -> StoreResult<MovementView> {
        let kind: MovementKind = self
            .kind
            .parse()
            .map_err(|e: sb_protocol::UnknownMovementKind| StoreError::Corrupt(e.to_string()))?;
        Ok(MovementView {
            kind,
            product_name: self.product_name,
            product_brand: self.product_brand,
            qty: self.qty,
            delta: self.delta,
            price: self.price,
            created_at: self.created_at,
        })
    }
}

/// Escape LIKE wildcards so user queries match literally.
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

async fn insert_movement(
    tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
    movement: &Movement,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO movements (id, kind, product_id, qty, delta, price, raw_text, chat_id, user_id, message_id, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)",
    )
    .bind(movement.id)
    .bind(movement.kind.as_str())
    .bind(movement.product_id)
    .bind(movement.qty)
    .bind(movement.delta)
    .bind(movement.price)
    .bind(&movement.raw_text)
    .bind(movement.actor.chat_id)
    .bind(movement.actor.user_id)
    .bind(movement.actor.message_id)
    .bind(movement.created_at)
    .execute(&mut **tx)
    .await?;
    Ok(())
}

#[async_trait]
impl InventoryStore for PgStore {
    async fn find_or_create(&self, name: &str, brand: Option<&str>) -> StoreResult<Product> {
        let name_normalized = normalize(name);
        let brand_normalized = brand.map(normalize);

        let existing = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products
             WHERE name_normalized = $1 AND brand_normalized IS NOT DISTINCT FROM $2",
        )
        .bind(&name_normalized)
        .bind(&brand_normalized)
        .fetch_optional(&self.pool)
        .await?;

        if let Some(row) = existing {
            return Ok(row.into());
        }

        let inserted = sqlx::query_as::<_, ProductRow>(
            "INSERT INTO products (id, name, name_normalized, brand, brand_normalized, sku, stock)
             VALUES ($1, $2, $3, $4, $5, $6, 0)
             RETURNING *",
        )
        .bind(Uuid::now_v7())
        .bind(name.trim())
        .bind(&name_normalized)
        .bind(brand.map(str::trim))
        .bind(&brand_normalized)
        .bind(new_sku())
        .fetch_one(&self.pool)
        .await;

        match inserted {
            Ok(row) => {
                tracing::info!(product = %row.name, sku = %row.sku, "product created");
                Ok(row.into())
            }
            // Lost a creation race: another request inserted the same pair.
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                let row = sqlx::query_as::<_, ProductRow>(
                    "SELECT * FROM products
                     WHERE name_normalized = $1 AND brand_normalized IS NOT DISTINCT FROM $2",
                )
                .bind(&name_normalized)
                .bind(&brand_normalized)
                .fetch_one(&self.pool)
                .await?;
                Ok(row.into())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn search(&self, name: &str, brand: Option<&str>) -> StoreResult<Vec<Product>> {
        let name_query = escape_like(&normalize(name));
        let brand_query = brand.map(|b| escape_like(&normalize(b)));

        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products
             WHERE name_normalized LIKE '%' || $1 || '%'
               AND ($2::text IS NULL OR brand_normalized LIKE '%' || $2 || '%')
             ORDER BY name_normalized, brand_normalized
             LIMIT $3",
        )
        .bind(&name_query)
        .bind(&brand_query)
        .bind(SEARCH_LIMIT as i64)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn get(&self, product_id: Uuid) -> StoreResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>("SELECT * FROM products WHERE id = $1")
            .bind(product_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Into::into))
    }

    async fn sell(
        &self,
        product_id: Uuid,
        qty: i64,
        price: Option<i64>,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<SellOutcome> {
        let mut tx = self.pool.begin().await?;

        // Precondition and decrement in one statement.
        let updated = sqlx::query_as::<_, ProductRow>(
            "UPDATE products
             SET stock = stock - $1, last_movement_at = now(), updated_at = now()
             WHERE id = $2 AND stock >= $1
             RETURNING *",
        )
        .bind(qty)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = updated else {
            drop(tx);
            let current = sqlx::query_scalar::<_, i64>("SELECT stock FROM products WHERE id = $1")
                .bind(product_id)
                .fetch_optional(&self.pool)
                .await?;
            return Ok(match current {
                Some(available) => SellOutcome::InsufficientStock { available },
                None => SellOutcome::NotFound,
            });
        };

        let movement = Movement::new(MovementKind::Sale, product_id, -qty, price, raw_text, actor);
        insert_movement(&mut tx, &movement).await?;
        tx.commit().await?;

        Ok(SellOutcome::Sold {
            product: row.into(),
        })
    }

    async fn restock(
        &self,
        product_id: Uuid,
        qty: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<RestockOutcome> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query_as::<_, ProductRow>(
            "UPDATE products
             SET stock = stock + $1, last_movement_at = now(), updated_at = now()
             WHERE id = $2
             RETURNING *",
        )
        .bind(qty)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = updated else {
            return Ok(RestockOutcome::NotFound);
        };

        let movement = Movement::new(MovementKind::Restock, product_id, qty, None, raw_text, actor);
        insert_movement(&mut tx, &movement).await?;
        tx.commit().await?;

        Ok(RestockOutcome::Restocked {
            product: row.into(),
        })
    }

    async fn adjust(
        &self,
        product_id: Uuid,
        new_stock: i64,
        actor: Actor,
        raw_text: &str,
    ) -> StoreResult<AdjustOutcome> {
        let mut tx = self.pool.begin().await?;

        // Old-stock read and new-stock write in one statement under a row
        // lock, so concurrent adjustments cannot produce a stale delta.
        let updated = sqlx::query_as::<_, AdjustRow>(
            "UPDATE products p
             SET stock = $1, last_movement_at = now(), updated_at = now()
             FROM (SELECT id, stock AS old_stock FROM products WHERE id = $2 FOR UPDATE) prev
             WHERE p.id = prev.id
             RETURNING p.*, prev.old_stock",
        )
        .bind(new_stock)
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = updated else {
            return Ok(AdjustOutcome::NotFound);
        };

        let movement = Movement::new(
            MovementKind::Adjust,
            product_id,
            new_stock - row.old_stock,
            None,
            raw_text,
            actor,
        );
        insert_movement(&mut tx, &movement).await?;
        tx.commit().await?;

        Ok(AdjustOutcome::Adjusted {
            product: row.product.into(),
            old_stock: row.old_stock,
        })
    }

    async fn list_inventory(&self, include_empty: bool) -> StoreResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT * FROM products
             WHERE $1 OR stock > 0
             ORDER BY name_normalized, brand_normalized",
        )
        .bind(include_empty)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn recent_movements(&self, limit: usize) -> StoreResult<Vec<MovementView>> {
        let rows = sqlx::query_as::<_, MovementViewRow>(
            "SELECT m.kind, COALESCE(p.name, 'Desconocido') AS product_name,
                    p.brand AS product_brand, m.qty, m.delta, m.price, m.created_at
             FROM movements m
             LEFT JOIN products p ON p.id = m.product_id
             ORDER BY m.created_at DESC
             LIMIT $1",
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(MovementViewRow::into_view).collect()
    }

    async fn product_movements(
        &self,
        product_id: Uuid,
        limit: usize,
    ) -> StoreResult<Vec<MovementView>> {
        let rows = sqlx::query_as::<_, MovementViewRow>(
            "SELECT m.kind, COALESCE(p.name, 'Desconocido') AS product_name,
                    p.brand AS product_brand, m.qty, m.delta, m.price, m.created_at
             FROM movements m
             LEFT JOIN products p ON p.id = m.product_id
             WHERE m.product_id = $1
             ORDER BY m.created_at DESC
             LIMIT $2",
        )
        .bind(product_id)
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(MovementViewRow::into_view).collect()
    }

    async fn daily_sales(&self) -> StoreResult<DailySales> {
        let (start, end) = local_day_bounds();

        let rows = sqlx::query_as::<_, MovementViewRow>(
            "SELECT m.kind, COALESCE(p.name, 'Desconocido') AS product_name,
                    p.brand AS product_brand, m.qty, m.delta, m.price, m.created_at
             FROM movements m
             LEFT JOIN products p ON p.id = m.product_id
             WHERE m.kind = 'SALE' AND m.created_at >= $1 AND m.created_at < $2
             ORDER BY m.created_at DESC",
        )
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        let mut report = DailySales::default();
        for row in rows {
            let view = row.into_view()?;
            let subtotal = view.price.unwrap_or(0) * view.qty;
            report.total_quantity += view.qty;
            report.total_revenue += subtotal;
            report.sales.push(SaleLine {
                product_name: view.product_name,
                product_brand: view.product_brand,
                qty: view.qty,
                price: view.price,
                subtotal,
                created_at: view.created_at,
            });
        }
        Ok(report)
    }
}
