//! Payment checkout session DTOs.

use serde::{Deserialize, Serialize};

/// One product line of a checkout session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutProduct {
    pub product_id: String,
    pub quantity: u32,
    /// Price ID of the product, not an amount.
    pub price: String,
}

/// Body of `checkout/create-checkout-session`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    pub products: Vec<CheckoutProduct>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_json() {
        let session = CheckoutSession {
            products: vec![CheckoutProduct {
                product_id: "prod_1".into(),
                quantity: 3,
                price: "price_1".into(),
            }],
        };
        let v = serde_json::to_value(&session).unwrap();
        assert_eq!(v["products"][0]["productId"], "prod_1");
        assert_eq!(v["products"][0]["price"], "price_1");
        assert_eq!(v["products"][0]["quantity"], 3);
    }
}
