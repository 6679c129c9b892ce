//! Coupon DTOs.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How long a coupon applies to a subscription or customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CouponDuration {
    #[default]
    Once,
    Repeating,
    Forever,
}

impl CouponDuration {
    pub const ALL: [CouponDuration; 3] = [Self::Once, Self::Repeating, Self::Forever];

    pub fn label(self) -> &'static str {
        match self {
            Self::Once => "Einmalig",
            Self::Repeating => "Wiederkehrend",
            Self::Forever => "Dauerhaft",
        }
    }
}

impl fmt::Display for CouponDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Existing coupon as listed by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    pub id: String,
    pub name: String,
    /// Fixed discount in the smallest currency unit (cents).
    #[serde(default)]
    pub amount_off: Option<i32>,
    #[serde(default)]
    pub currency: Option<String>,
    pub duration: CouponDuration,
    #[serde(default)]
    pub percent_off: Option<f32>,
}

impl Coupon {
    /// "10%" or "5.00 EUR".
    pub fn discount_label(&self) -> String {
        match (self.percent_off, self.amount_off) {
            (Some(p), _) if p > 0.0 => format!("{p}%"),
            (_, Some(a)) => format!(
                "{:.2} {}",
                f64::from(a) / 100.0,
                self.currency.as_deref().unwrap_or("").to_uppercase()
            ),
            _ => "-".to_string(),
        }
    }
}

/// Coupon creation payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCoupon {
    pub name: String,
    pub amount_off: Option<i32>,
    pub currency: String,
    pub duration: CouponDuration,
    pub percent_off: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_wire_format() {
        assert_eq!(serde_json::to_string(&CouponDuration::Repeating).unwrap(), "\"repeating\"");
        let d: CouponDuration = serde_json::from_str("\"forever\"").unwrap();
        assert_eq!(d, CouponDuration::Forever);
    }

    #[test]
    fn test_discount_label() {
        let json = r#"{"id":"c1","name":"SOMMER","amountOff":null,"currency":null,"duration":"once","percentOff":15.0}"#;
        let c: Coupon = serde_json::from_str(json).unwrap();
        assert_eq!(c.discount_label(), "15%");

        let fixed = Coupon {
            amount_off: Some(500),
            currency: Some("eur".to_string()),
            percent_off: None,
            ..c
        };
        assert_eq!(fixed.discount_label(), "5.00 EUR");
    }
}
