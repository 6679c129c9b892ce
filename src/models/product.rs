//! Product, price history and best-seller DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::timestamp;

/// Catalogue product.
///
/// `product_id` and `price_id` are assigned by the payment provider when the
/// product is created; new products are sent with empty strings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_name: String,
    #[serde(default)]
    pub product_id: String,
    pub product_description: String,
    pub list_price: f64,
    pub cost_price: f64,
    /// EAN barcode.
    pub upc_code: String,
    #[serde(default)]
    pub created: i64,
    #[serde(default)]
    pub updated: i64,
    #[serde(default)]
    pub active: bool,
    pub currency: String,
    #[serde(default)]
    pub tax_included_in_price: bool,
    #[serde(default)]
    pub price_id: String,
}

impl Product {
    /// Gross margin per unit.
    pub fn margin(&self) -> f64 {
        self.list_price - self.cost_price
    }

    /// Margin as percentage of the list price; 0 for free products.
    pub fn margin_percent(&self) -> f64 {
        if self.list_price <= 0.0 {
            0.0
        } else {
            self.margin() / self.list_price * 100.0
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.active { "Aktiv" } else { "Inaktiv" }
    }

    /// Creation time from the epoch-seconds field.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.created, 0)
    }
}

/// One entry of a product's price history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceHistory {
    pub list_price: f64,
    pub cost_price: f64,
    #[serde(with = "timestamp")]
    pub changed_date: DateTime<Utc>,
    pub active: bool,
    pub currency: String,
}

/// Aggregated sales of one product over a time window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BestSellingProduct {
    pub product_name: String,
    pub product_id: String,
    /// One entry per sale.
    #[serde(with = "timestamp::list", default)]
    pub dates: Vec<DateTime<Utc>>,
    pub total_quantity: i32,
}

/// Format an amount with two decimals and the currency code.
pub fn format_money(amount: f64, currency: &str) -> String {
    format!("{amount:.2} {}", currency.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Product {
        Product {
            product_name: "Kaffee".to_string(),
            product_id: "prod_1".to_string(),
            product_description: "Bohnen 500g".to_string(),
            list_price: 8.0,
            cost_price: 5.0,
            upc_code: "4006381333931".to_string(),
            created: 1_735_689_600,
            updated: 1_735_689_600,
            active: true,
            currency: "eur".to_string(),
            tax_included_in_price: true,
            price_id: "price_1".to_string(),
        }
    }

    #[test]
    fn test_margin() {
        let p = sample();
        assert_eq!(p.margin(), 3.0);
        assert!((p.margin_percent() - 37.5).abs() < 1e-9);

        let free = Product { list_price: 0.0, ..sample() };
        assert_eq!(free.margin_percent(), 0.0);
    }

    #[test]
    fn test_json_shape() {
        let v = serde_json::to_value(sample()).unwrap();
        assert_eq!(v["productName"], "Kaffee");
        assert_eq!(v["upcCode"], "4006381333931");
        assert_eq!(v["taxIncludedInPrice"], true);
        assert_eq!(v["priceId"], "price_1");
    }

    #[test]
    fn test_best_selling_parses_dates() {
        let json = r#"{"productName":"Tee","productId":"prod_2","dates":["2025-01-01T10:00:00.000+00:00"],"totalQuantity":4}"#;
        let b: BestSellingProduct = serde_json::from_str(json).unwrap();
        assert_eq!(b.dates.len(), 1);
        assert_eq!(b.total_quantity, 4);
    }

    #[test]
    fn test_format_money() {
        assert_eq!(format_money(12.5, "eur"), "12.50 EUR");
        assert_eq!(sample().created_at().map(|d| d.to_rfc3339()).as_deref(), Some("2025-01-01T00:00:00+00:00"));
    }
}
