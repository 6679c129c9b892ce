//! `coupon/*` endpoints.

use super::ApiClient;
use crate::error::Result;
use crate::models::{Coupon, NewCoupon};
use reqwest::Method;

impl ApiClient {
    pub async fn coupons(&self) -> Result<Vec<Coupon>> {
        self.get_list("coupon/all").await
    }

    pub async fn coupon(&self, name: &str) -> Result<Option<Coupon>> {
        self.get_optional_at(&["coupon", name]).await
    }

    pub async fn add_coupon(&self, coupon: &NewCoupon) -> Result<()> {
        self.send_json(Method::POST, "coupon/add", coupon).await?;
        Ok(())
    }

    pub async fn delete_coupon(&self, name: &str) -> Result<()> {
        self.send_empty_at(Method::DELETE, &["coupon", name, "delete"]).await?;
        Ok(())
    }
}
