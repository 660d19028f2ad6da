//! Product Repository
//!
//! Catalog reads and management writes. Stock on the order path moves only
//! through `decrement_stock`/`increment_stock`, called by the inventory
//! ledger.

use super::{BaseRepository, RepoError, RepoResult};
use crate::db::models::{Product, ProductCreate, ProductUpdate};
use crate::utils::now_millis;
use surrealdb::engine::local::Db;
use surrealdb::{RecordId, Surreal};

const PRODUCT_TABLE: &str = "product";

#[derive(Clone)]
pub struct ProductRepository {
    base: BaseRepository,
}

impl ProductRepository {
    pub fn new(db: Surreal<Db>) -> Self {
        Self {
            base: BaseRepository::new(db),
        }
    }

    /// Parse a `product:<key>` id; malformed ids are treated as not found
    pub fn parse_id(id: &str) -> Option<RecordId> {
        let record_id: RecordId = id.parse().ok()?;
        (record_id.table() == PRODUCT_TABLE).then_some(record_id)
    }

    /// Find all active products
    pub async fn find_all(&self) -> RepoResult<Vec<Product>> {
        let products: Vec<Product> = self
            .base
            .db()
            .query("SELECT * FROM product WHERE is_active = true ORDER BY name")
            .await?
            .take(0)?;
        Ok(products)
    }

    /// Find product by id
    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Product>> {
        let Some(record_id) = Self::parse_id(id) else {
            return Ok(None);
        };
        let product: Option<Product> = self.base.db().select(record_id).await?;
        Ok(product)
    }

    /// Create a new product
    pub async fn create(&self, data: ProductCreate) -> RepoResult<Product> {
        if data.price < 0 {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        let stock = data.stock.unwrap_or(0);
        if stock < 0 {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        let now = now_millis();
        let product = Product {
            id: None,
            name: data.name,
            description: data.description.unwrap_or_default(),
            image: data.image.unwrap_or_default(),
            price: data.price,
            stock,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let created: Option<Product> = self
            .base
            .db()
            .create(PRODUCT_TABLE)
            .content(product)
            .await?;

        created.ok_or_else(|| RepoError::Database("Failed to create product".to_string()))
    }

    /// Update a product (catalog management)
    pub async fn update(&self, id: &str, data: ProductUpdate) -> RepoResult<Product> {
        let record_id = Self::parse_id(id)
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))?;

        if matches!(data.price, Some(p) if p < 0) {
            return Err(RepoError::Validation("price cannot be negative".into()));
        }
        if matches!(data.stock, Some(s) if s < 0) {
            return Err(RepoError::Validation("stock cannot be negative".into()));
        }

        // Build dynamic SET clauses with proper type bindings
        let mut set_parts: Vec<&str> = vec!["updated_at = $updated_at"];
        if data.name.is_some() {
            set_parts.push("name = $name");
        }
        if data.description.is_some() {
            set_parts.push("description = $description");
        }
        if data.image.is_some() {
            set_parts.push("image = $image");
        }
        if data.price.is_some() {
            set_parts.push("price = $price");
        }
        if data.stock.is_some() {
            set_parts.push("stock = $stock");
        }
        if data.is_active.is_some() {
            set_parts.push("is_active = $is_active");
        }

        let query_str = format!("UPDATE $product SET {} RETURN AFTER", set_parts.join(", "));

        let mut query = self
            .base
            .db()
            .query(&query_str)
            .bind(("product", record_id))
            .bind(("updated_at", now_millis()));
        if let Some(v) = data.name {
            query = query.bind(("name", v));
        }
        if let Some(v) = data.description {
            query = query.bind(("description", v));
        }
        if let Some(v) = data.image {
            query = query.bind(("image", v));
        }
        if let Some(v) = data.price {
            query = query.bind(("price", v));
        }
        if let Some(v) = data.stock {
            query = query.bind(("stock", v));
        }
        if let Some(v) = data.is_active {
            query = query.bind(("is_active", v));
        }

        let mut result = query.await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", id)))
    }

    /// Conditionally decrement stock.
    ///
    /// The check and the decrement are one statement; when available stock
    /// is below `quantity` no row is updated and `None` is returned.
    pub async fn decrement_stock(
        &self,
        record_id: &RecordId,
        quantity: i64,
    ) -> RepoResult<Option<Product>> {
        let mut result = self
            .base
            .db()
            .query(
                "UPDATE $product SET stock = stock - $qty, updated_at = $now \
                 WHERE stock >= $qty RETURN AFTER",
            )
            .bind(("product", record_id.clone()))
            .bind(("qty", quantity))
            .bind(("now", now_millis()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        Ok(products.into_iter().next())
    }

    /// Return previously reserved stock to the pool
    pub async fn increment_stock(
        &self,
        record_id: &RecordId,
        quantity: i64,
    ) -> RepoResult<Product> {
        let mut result = self
            .base
            .db()
            .query("UPDATE $product SET stock = stock + $qty, updated_at = $now RETURN AFTER")
            .bind(("product", record_id.clone()))
            .bind(("qty", quantity))
            .bind(("now", now_millis()))
            .await?;
        let products: Vec<Product> = result.take(0)?;
        products
            .into_iter()
            .next()
            .ok_or_else(|| RepoError::NotFound(format!("Product {} not found", record_id)))
    }
}
