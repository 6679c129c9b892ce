//! `stock/*` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::Stock;
use reqwest::Method;

impl ApiClient {
    pub async fn stock(&self, product_id: &str) -> Result<Option<Stock>> {
        self.get_optional_at(&["stock", product_id]).await
    }

    pub async fn stocks(&self) -> Result<Vec<Stock>> {
        self.get_list("stock/all").await
    }

    pub async fn add_stock(&self, stock: &Stock) -> Result<()> {
        self.send_json(Method::POST, "stock/add", stock).await?;
        Ok(())
    }

    pub async fn update_stock(&self, stock: &Stock) -> Result<()> {
        self.send_json(Method::PUT, "stock/update", stock).await?;
        Ok(())
    }

    pub async fn delete_stock(&self, product_id: &str) -> Result<()> {
        self.send_empty_at(Method::DELETE, &["stock", "delete", product_id]).await?;
        Ok(())
    }
}
