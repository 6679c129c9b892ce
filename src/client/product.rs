//! `products/*` endpoints.

use super::{ApiClient, iso_query};
use crate::error::Result;
use crate::models::{BestSellingProduct, PriceHistory, Product, Stock};
use chrono::{DateTime, Utc};
use reqwest::Method;

impl ApiClient {
    pub async fn products(&self) -> Result<Vec<Product>> {
        self.get_list("products/all").await
    }

    /// Create a product; returns the new product ID.
    pub async fn add_product(&self, product: &Product) -> Result<String> {
        let id = self.send_json(Method::POST, "products/add", product).await?;
        Ok(id.trim().to_string())
    }

    /// Create a product together with its initial stock record.
    pub async fn add_product_with_stock(&self, product: &Product, quantity: i32) -> Result<String> {
        let product_id = self.add_product(product).await?;
        self.add_stock(&Stock::initial(product_id.clone(), quantity)).await?;
        tracing::info!("Created product {product_id} with stock {quantity}");
        Ok(product_id)
    }

    pub async fn update_product(&self, product: &Product) -> Result<()> {
        self.send_json(Method::PUT, "products/update", product).await?;
        Ok(())
    }

    pub async fn delete_product(&self, product_id: &str) -> Result<()> {
        self.send_empty_at(Method::DELETE, &["products", "delete", product_id]).await?;
        Ok(())
    }

    pub async fn price_history(&self, product_id: &str) -> Result<Vec<PriceHistory>> {
        Ok(self
            .get_optional_at(&["products", "price-history", product_id])
            .await?
            .unwrap_or_default())
    }

    /// Product with the given EAN, `None` when no product matches.
    pub async fn product_by_ean(&self, ean: &str) -> Result<Option<Product>> {
        self.get_optional_at(&["products", "cache", "product", "ean", ean]).await
    }

    /// Best seller in `[start, end]`, `None` when nothing was sold.
    pub async fn best_selling(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Option<BestSellingProduct>> {
        let query = [("start", iso_query(start)), ("end", iso_query(end))];
        self.get_optional_with_query("products/best-selling", &query).await
    }
}
