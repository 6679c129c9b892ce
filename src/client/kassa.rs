//! Point-of-sale checkout and payment session endpoints.

use super::ApiClient;
use crate::error::{AppError, Result};
use crate::models::{CheckoutSession, Order};
use reqwest::Method;

impl ApiClient {
    /// Record a completed sale.
    pub async fn kassa_checkout(&self, order: &Order) -> Result<()> {
        self.send_json(Method::POST, "kassa/checkout", order).await?;
        tracing::info!(
            "Recorded sale of {} items, total {:.2}",
            order.product_names.len(),
            order.total_price
        );
        Ok(())
    }

    /// Create a payment checkout session and return its client secret.
    pub async fn create_checkout_session(&self, session: &CheckoutSession) -> Result<String> {
        let secret = self
            .send_json(Method::POST, "checkout/create-checkout-session", session)
            .await?;
        let secret = secret.trim().trim_matches('"').to_string();
        if secret.is_empty() {
            return Err(AppError::parse("Empty checkout session secret"));
        }
        Ok(secret)
    }
}
