//! Order and order-line records
//!
//! An order has an immutable header (order number, owner, total) and a
//! mutable status. Order lines are price/quantity snapshots frozen at
//! creation; later catalog changes never alter them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Cash-on-delivery, the default payment method
pub const PAYMENT_METHOD_COD: &str = "COD";

/// Order status. `Cancelled` is terminal and only reachable through the
/// cancellation path; the remaining states are freely reachable via admin
/// status updates (permissive by design, matching storefront operations
/// where an order can move backwards after a mis-click).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Processing => "Processing",
            OrderStatus::Shipped => "Shipped",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown order status: {0}")]
pub struct ParseOrderStatusError(String);

impl FromStr for OrderStatus {
    type Err = ParseOrderStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Processing" => Ok(OrderStatus::Processing),
            "Shipped" => Ok(OrderStatus::Shipped),
            "Delivered" => Ok(OrderStatus::Delivered),
            "Cancelled" => Ok(OrderStatus::Cancelled),
            other => Err(ParseOrderStatusError(other.to_string())),
        }
    }
}

/// Payment state of an order. No gateway is wired up; COD orders stay
/// `Pending` until settled offline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum PaymentStatus {
    #[default]
    Pending,
    Paid,
    Refunded,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    pub id: Uuid,
    /// Human-readable number, e.g. `ORD20260827143015-a3f29c`. Immutable.
    pub order_number: String,
    /// Owning user. Immutable.
    pub user_id: Uuid,
    /// Fixed at creation time; never recomputed.
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    pub payment_method: String,
    pub payment_status: PaymentStatus,
    pub is_cancelled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancellation_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancelled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Generate an order number from the creation timestamp.
    ///
    /// Second-granularity timestamps alone collide under concurrent
    /// placements, so a short random suffix from a v4 uuid is appended.
    pub fn generate_number(created_at: DateTime<Utc>) -> String {
        let suffix = Uuid::new_v4().simple().to_string();
        format!(
            "ORD{}-{}",
            created_at.format("%Y%m%d%H%M%S"),
            &suffix[..6]
        )
    }

    /// Mark the order cancelled. Keeps `is_cancelled` and `status` in step.
    pub fn cancel(&mut self, reason: impl Into<String>) {
        let now = Utc::now();
        self.status = OrderStatus::Cancelled;
        self.is_cancelled = true;
        self.cancellation_reason = Some(reason.into());
        self.cancelled_at = Some(now);
        self.updated_at = now;
    }

    /// Refresh the update timestamp after a mutation
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Snapshot of one product within an order, frozen at creation time
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    /// Unit price at order time
    pub price: Decimal,
    pub quantity: u32,
    /// price * quantity, fixed at order time
    pub line_total: Decimal,
}

impl OrderLine {
    pub fn snapshot(order_id: Uuid, product: &super::Product, quantity: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            order_id,
            product_id: product.id,
            product_name: product.name.clone(),
            price: product.price,
            quantity,
            line_total: product.price * Decimal::from(quantity),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Product;
    use rust_decimal_macros::dec;

    #[test]
    fn test_status_round_trip() {
        for s in [
            OrderStatus::Pending,
            OrderStatus::Processing,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
            OrderStatus::Cancelled,
        ] {
            assert_eq!(s.to_string().parse::<OrderStatus>().unwrap(), s);
        }
        assert!("Returned".parse::<OrderStatus>().is_err());
    }

    #[test]
    fn test_order_number_format() {
        let number = Order::generate_number(Utc::now());
        assert!(number.starts_with("ORD"));
        // ORD + 14 timestamp digits + '-' + 6 hex chars
        assert_eq!(number.len(), 3 + 14 + 1 + 6);
    }

    #[test]
    fn test_order_numbers_unique_within_a_second() {
        let now = Utc::now();
        let a = Order::generate_number(now);
        let b = Order::generate_number(now);
        assert_ne!(a, b);
    }

    #[test]
    fn test_line_snapshot_total() {
        let product = Product::new("Rose Water", "toner", dec!(12.50), 10);
        let line = OrderLine::snapshot(Uuid::new_v4(), &product, 3);
        assert_eq!(line.line_total, dec!(37.50));
        assert_eq!(line.product_name, "Rose Water");
    }

    #[test]
    fn test_cancel_keeps_flag_and_status_in_step() {
        let now = Utc::now();
        let mut order = Order {
            id: Uuid::new_v4(),
            order_number: Order::generate_number(now),
            user_id: Uuid::new_v4(),
            total_amount: dec!(99.00),
            status: OrderStatus::Pending,
            shipping_address: "12 Hill Rd".into(),
            city: "Pune".into(),
            postal_code: "411001".into(),
            phone_number: "9999999999".into(),
            payment_method: PAYMENT_METHOD_COD.into(),
            payment_status: PaymentStatus::Pending,
            is_cancelled: false,
            cancellation_reason: None,
            cancelled_at: None,
            created_at: now,
            updated_at: now,
        };
        order.cancel("changed my mind");
        assert!(order.is_cancelled);
        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.cancelled_at.is_some());
    }
}
