//! Point-of-sale cart.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::models::{CheckoutProduct, Order, Product};

/// User-facing cart errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CartError {
    #[error("Nur Zahlen erlaubt!")]
    InvalidEan,

    #[error("Ungültige Menge: nur ganze Zahlen ab 0")]
    InvalidQuantity,

    #[error("Rabatt muss zwischen 0 und 100 liegen")]
    InvalidDiscount,

    #[error("Ungültiger Preis")]
    InvalidPrice,

    #[error("Position {0} existiert nicht")]
    NoSuchLine(usize),

    #[error("Der Warenkorb ist leer")]
    Empty,

    #[error("Bitte warten, die Zahlung wird bearbeitet")]
    CheckoutPending,
}

/// One cart line.
#[derive(Debug, Clone, PartialEq)]
pub struct CartItem {
    pub ean: String,
    pub product_id: String,
    pub price_id: String,
    pub name: String,
    pub quantity: u32,
    /// "Statt-Preis": catalogue price at scan time.
    pub list_price: f64,
    /// "Ist-Preis": price actually charged per unit.
    pub price: f64,
    pub discount_percent: f64,
}

impl CartItem {
    pub fn from_product(product: &Product) -> Self {
        Self {
            ean: product.upc_code.clone(),
            product_id: product.product_id.clone(),
            price_id: product.price_id.clone(),
            name: product.product_name.clone(),
            quantity: 1,
            list_price: product.list_price,
            price: product.list_price,
            discount_percent: 0.0,
        }
    }

    pub fn line_total(&self) -> f64 {
        self.price * f64::from(self.quantity) * (1.0 - self.discount_percent / 100.0)
    }

    /// Charged price differs from the catalogue price or a discount applies.
    pub fn is_reduced(&self) -> bool {
        self.discount_percent > 0.0 || self.price < self.list_price
    }
}

/// Result of scanning an EAN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// Quantity of the existing line at this index was increased.
    Grouped(usize),
    /// Product has to be fetched by EAN and added with `add_product`.
    NeedsLookup(String),
}

#[derive(Debug, Clone)]
pub struct Cart {
    items: Vec<CartItem>,
    group_items: bool,
}

impl Default for Cart {
    fn default() -> Self {
        Self::new(true)
    }
}

impl Cart {
    pub fn new(group_items: bool) -> Self {
        Self {
            items: Vec::new(),
            group_items,
        }
    }

    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn group_items(&self) -> bool {
        self.group_items
    }

    pub fn toggle_grouping(&mut self) {
        self.group_items = !self.group_items;
    }

    /// Handle a scanned or typed EAN.
    pub fn scan(&mut self, ean: &str) -> Result<ScanOutcome, CartError> {
        let ean = ean.trim();
        if ean.is_empty() || !ean.chars().all(|c| c.is_ascii_digit()) {
            return Err(CartError::InvalidEan);
        }

        if self.group_items
            && let Some(index) = self.items.iter().position(|item| item.ean == ean)
        {
            self.items[index].quantity = self.items[index].quantity.saturating_add(1);
            return Ok(ScanOutcome::Grouped(index));
        }

        Ok(ScanOutcome::NeedsLookup(ean.to_string()))
    }

    /// Append a fresh line for a looked-up product.
    pub fn add_product(&mut self, product: &Product) -> usize {
        self.items.push(CartItem::from_product(product));
        self.items.len() - 1
    }

    fn item_mut(&mut self, index: usize) -> Result<&mut CartItem, CartError> {
        self.items.get_mut(index).ok_or(CartError::NoSuchLine(index))
    }

    pub fn set_quantity(&mut self, index: usize, text: &str) -> Result<(), CartError> {
        let value = parse_amount(text).ok_or(CartError::InvalidQuantity)?;
        if value.fract() != 0.0 || value > f64::from(u32::MAX) {
            return Err(CartError::InvalidQuantity);
        }
        self.item_mut(index)?.quantity = value as u32;
        Ok(())
    }

    pub fn set_discount(&mut self, index: usize, text: &str) -> Result<(), CartError> {
        let value = parse_amount(text).ok_or(CartError::InvalidDiscount)?;
        if value > 100.0 {
            return Err(CartError::InvalidDiscount);
        }
        self.item_mut(index)?.discount_percent = value;
        Ok(())
    }

    pub fn set_price(&mut self, index: usize, text: &str) -> Result<(), CartError> {
        let value = parse_amount(text).ok_or(CartError::InvalidPrice)?;
        self.item_mut(index)?.price = value;
        Ok(())
    }

    pub fn remove(&mut self, index: usize) -> Result<CartItem, CartError> {
        if index >= self.items.len() {
            return Err(CartError::NoSuchLine(index));
        }
        Ok(self.items.remove(index))
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Sum of all line totals.
    pub fn total(&self) -> f64 {
        self.items.iter().map(CartItem::line_total).sum()
    }

    /// Savings against catalogue prices.
    pub fn savings(&self) -> f64 {
        let full: f64 = self
            .items
            .iter()
            .map(|item| item.list_price * f64::from(item.quantity))
            .sum();
        full - self.total()
    }

    /// Total number of units.
    pub fn unit_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    fn billable(&self) -> impl Iterator<Item = &CartItem> {
        self.items.iter().filter(|item| item.quantity > 0)
    }

    /// Products for the payment checkout session.
    ///
    /// Lines with quantity 0 are left out.
    pub fn checkout_products(&self) -> Vec<CheckoutProduct> {
        self.billable()
            .map(|item| CheckoutProduct {
                product_id: item.product_id.clone(),
                quantity: item.quantity,
                price: item.price_id.clone(),
            })
            .collect()
    }

    /// Sale record for `kassa/checkout`.
    pub fn order(&self, employee_id: Option<i32>, now: DateTime<Utc>) -> Order {
        Order {
            order_id: None,
            product_names: self.billable().map(|item| item.name.clone()).collect(),
            total_price: round_cents(self.total()),
            date: now,
            employee_id,
        }
    }
}

/// Parse a non-negative decimal; accepts `,` as decimal separator.
pub fn parse_amount(text: &str) -> Option<f64> {
    let value: f64 = text.trim().replace(',', ".").parse().ok()?;
    (value.is_finite() && value >= 0.0).then_some(value)
}

pub fn round_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use chrono::TimeZone;

    pub(crate) fn product(ean: &str, name: &str, price: f64) -> Product {
        Product {
            product_name: name.to_string(),
            product_id: format!("prod_{name}"),
            product_description: String::new(),
            list_price: price,
            cost_price: price / 2.0,
            upc_code: ean.to_string(),
            active: true,
            currency: "eur".to_string(),
            price_id: format!("price_{name}"),
            ..Default::default()
        }
    }

    #[test]
    fn test_scan_rejects_non_digits() {
        let mut cart = Cart::default();
        assert_eq!(cart.scan(""), Err(CartError::InvalidEan));
        assert_eq!(cart.scan("   "), Err(CartError::InvalidEan));
        assert_eq!(cart.scan("12a4"), Err(CartError::InvalidEan));
        assert_eq!(cart.scan("12.4"), Err(CartError::InvalidEan));
        assert_eq!(CartError::InvalidEan.to_string(), "Nur Zahlen erlaubt!");
    }

    #[test]
    fn test_scan_groups_duplicates() {
        let mut cart = Cart::new(true);
        assert_eq!(cart.scan(" 400 "), Ok(ScanOutcome::NeedsLookup("400".into())));
        cart.add_product(&product("400", "Kaffee", 8.0));

        assert_eq!(cart.scan("400"), Ok(ScanOutcome::Grouped(0)));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 2);
    }

    #[test]
    fn test_scan_without_grouping_adds_lines() {
        let mut cart = Cart::new(false);
        cart.add_product(&product("400", "Kaffee", 8.0));
        assert_eq!(cart.scan("400"), Ok(ScanOutcome::NeedsLookup("400".into())));

        cart.toggle_grouping();
        assert!(cart.group_items());
        assert_eq!(cart.scan("400"), Ok(ScanOutcome::Grouped(0)));
    }

    #[test]
    fn test_add_product_defaults() {
        let mut cart = Cart::default();
        let idx = cart.add_product(&product("1", "Tee", 3.5));
        let item = &cart.items()[idx];
        assert_eq!(item.quantity, 1);
        assert_eq!(item.price, 3.5);
        assert_eq!(item.list_price, 3.5);
        assert_eq!(item.discount_percent, 0.0);
        assert!(!item.is_reduced());
    }

    #[test]
    fn test_edits() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Tee", 4.0));

        cart.set_quantity(0, "3").unwrap();
        cart.set_discount(0, "25").unwrap();
        cart.set_price(0, "3,50").unwrap();

        let item = &cart.items()[0];
        assert_eq!(item.quantity, 3);
        assert_eq!(item.discount_percent, 25.0);
        assert_eq!(item.price, 3.5);
        assert!(item.is_reduced());
    }

    #[test]
    fn test_invalid_edits_leave_item_unchanged() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Tee", 4.0));
        let before = cart.items()[0].clone();

        assert_eq!(cart.set_quantity(0, "-1"), Err(CartError::InvalidQuantity));
        assert_eq!(cart.set_quantity(0, "1.5"), Err(CartError::InvalidQuantity));
        assert_eq!(cart.set_quantity(0, ""), Err(CartError::InvalidQuantity));
        assert_eq!(cart.set_discount(0, "101"), Err(CartError::InvalidDiscount));
        assert_eq!(cart.set_discount(0, "abc"), Err(CartError::InvalidDiscount));
        assert_eq!(cart.set_price(0, "-0.5"), Err(CartError::InvalidPrice));
        assert_eq!(cart.set_price(0, "NaN"), Err(CartError::InvalidPrice));
        assert_eq!(cart.set_price(3, "1"), Err(CartError::NoSuchLine(3)));

        assert_eq!(cart.items()[0], before);
    }

    #[test]
    fn test_remove_and_clear() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Tee", 4.0));
        cart.add_product(&product("2", "Milch", 1.0));

        let removed = cart.remove(0).unwrap();
        assert_eq!(removed.name, "Tee");
        assert_eq!(cart.items()[0].name, "Milch");
        assert_eq!(cart.remove(5), Err(CartError::NoSuchLine(5)));

        cart.clear();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_totals() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Tee", 4.0));
        cart.add_product(&product("2", "Milch", 1.2));
        cart.set_quantity(0, "2").unwrap();
        cart.set_discount(0, "50").unwrap();
        cart.set_quantity(1, "3").unwrap();

        assert!((cart.total() - 7.6).abs() < 1e-9);
        assert!((cart.savings() - 4.0).abs() < 1e-9);
        assert_eq!(cart.unit_count(), 5);
    }

    #[test]
    fn test_checkout_payloads() {
        let mut cart = Cart::default();
        cart.add_product(&product("1", "Tee", 4.0));
        cart.add_product(&product("2", "Milch", 1.0));
        cart.set_quantity(0, "2").unwrap();
        cart.set_quantity(1, "0").unwrap();

        let products = cart.checkout_products();
        assert_eq!(products.len(), 1);
        assert_eq!(products[0].product_id, "prod_Tee");
        assert_eq!(products[0].quantity, 2);
        assert_eq!(products[0].price, "price_Tee");

        let now = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let order = cart.order(Some(1001), now);
        assert_eq!(order.product_names, vec!["Tee".to_string()]);
        assert_eq!(order.total_price, 8.0);
        assert_eq!(order.employee_id, Some(1001));
        assert_eq!(order.date, now);
    }

    #[test]
    fn test_round_cents() {
        assert_eq!(round_cents(0.1 + 0.2), 0.3);
        assert_eq!(round_cents(2.675_1), 2.68);
    }
}
