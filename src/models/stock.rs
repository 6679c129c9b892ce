//! Stock DTO.

use serde::{Deserialize, Serialize};

/// Stock level of one product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stock {
    pub product_id: String,
    pub quantity: i32,
    pub repurchased: bool,
    pub should_be_repurchased: bool,
}

impl Stock {
    /// Initial record written together with a new product.
    pub fn initial(product_id: impl Into<String>, quantity: i32) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            repurchased: false,
            should_be_repurchased: true,
        }
    }

    /// Needs reordering and has not been reordered yet.
    pub fn needs_reorder(&self) -> bool {
        self.should_be_repurchased && !self.repurchased
    }
}
