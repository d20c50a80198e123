//! Product record as consumed by the checkout core
//!
//! The catalog owns price and stock mutation; the checkout layer only reads
//! products and requests stock adjustments through [`crate::core::service::ProductCatalog`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Unit price, non-negative
    pub price: Decimal,
    /// Available-to-sell quantity
    pub stock: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Product {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        stock: u32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            description: description.into(),
            price,
            stock,
            category: None,
            image_url: None,
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh the update timestamp after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}
