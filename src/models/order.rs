//! Order DTO.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Completed sale, also used as the kassa checkout payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    /// Assigned by the server; absent in checkout payloads.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    /// One entry per cart line.
    pub product_names: Vec<String>,
    pub total_price: f64,
    #[serde(with = "timestamp")]
    pub date: DateTime<Utc>,
    #[serde(default)]
    pub employee_id: Option<i32>,
}

impl Order {
    pub fn item_count(&self) -> usize {
        self.product_names.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_order_json() {
        let order = Order {
            order_id: None,
            product_names: vec!["Kaffee".into(), "Kaffee".into()],
            total_price: 16.0,
            date: Utc.with_ymd_and_hms(2025, 5, 2, 8, 30, 0).unwrap(),
            employee_id: Some(1001),
        };
        let v = serde_json::to_value(&order).unwrap();
        assert_eq!(v["totalPrice"], 16.0);
        assert_eq!(v["employeeId"], 1001);
        assert_eq!(v["date"], "2025-05-02T08:30:00+00:00");
        assert!(v.get("orderId").is_none());
        assert_eq!(order.item_count(), 2);
    }
}
