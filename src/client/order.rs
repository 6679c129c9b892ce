//! `order/*` endpoints.

use super::{ApiClient, iso_query};
use crate::error::Result;
use crate::models::Order;
use chrono::{DateTime, Utc};

impl ApiClient {
    /// Orders placed in `[start, end]`, optionally for one employee.
    pub async fn orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        employee_id: Option<i32>,
    ) -> Result<Vec<Order>> {
        let mut query = vec![("start", iso_query(start)), ("end", iso_query(end))];
        if let Some(id) = employee_id {
            query.push(("employeeId", id.to_string()));
        }
        Ok(self
            .get_optional_with_query("order/between", &query)
            .await?
            .unwrap_or_default())
    }
}
