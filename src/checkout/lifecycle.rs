//! Post-placement order transitions: cancellation and status updates
//!
//! Cancellation is owner-only and restores every line's quantity to its
//! product's stock. Status updates are admin-only and deliberately
//! permissive between the non-cancelled states; `Cancelled` is terminal and
//! reachable only through [`OrderLifecycle::cancel_order`].

use crate::core::service::{OrderStore, ProductCatalog, UserDirectory};
use crate::core::{ShopError, ShopResult};
use crate::model::order::PAYMENT_METHOD_COD;
use crate::model::{OrderStatus, User};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Result of a successful cancellation
#[derive(Debug, Clone, Serialize)]
pub struct CancellationOutcome {
    pub order_id: Uuid,
    /// Informational only; no refund is actually executed
    pub refund_guidance: String,
}

pub struct OrderLifecycle {
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn ProductCatalog>,
    orders: Arc<dyn OrderStore>,
}

impl OrderLifecycle {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn ProductCatalog>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            users,
            catalog,
            orders,
        }
    }

    /// Cancel an order on behalf of its owner.
    ///
    /// Fails for non-owners, already-cancelled orders and orders that are
    /// `Delivered` or `Shipped`. On success the order is marked cancelled
    /// and every line's quantity is added back to its product's stock.
    pub async fn cancel_order(
        &self,
        order_id: Uuid,
        email: &str,
        reason: &str,
    ) -> ShopResult<CancellationOutcome> {
        if reason.trim().is_empty() {
            return Err(ShopError::invalid_state("Cancellation reason is required"));
        }

        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ShopError::NotFound {
                resource: "user",
                id: email.to_string(),
            })?;

        let mut order = self
            .orders
            .get(&order_id)
            .await?
            .ok_or_else(|| ShopError::not_found("order", order_id))?;

        if order.user_id != user.id {
            return Err(ShopError::unauthorized(
                "You are not authorized to cancel this order",
            ));
        }
        if order.is_cancelled {
            return Err(ShopError::invalid_state("Order is already cancelled"));
        }
        match order.status {
            OrderStatus::Delivered => {
                return Err(ShopError::invalid_state("Cannot cancel delivered order"));
            }
            OrderStatus::Shipped => {
                return Err(ShopError::invalid_state(
                    "Order has already been shipped. Please contact customer support.",
                ));
            }
            _ => {}
        }

        order.cancel(reason);
        let order = self.orders.update(order).await?;

        // Restore stock for every snapshot line; a product that has since
        // disappeared is logged and skipped.
        let lines = self.orders.lines_for_order(&order_id).await?;
        for line in &lines {
            let restored = self
                .catalog
                .release_stock(&line.product_id, line.quantity)
                .await?;
            if !restored {
                warn!(
                    order_id = %order_id,
                    product_id = %line.product_id,
                    "product missing during stock restoration"
                );
            }
        }

        info!(order_id = %order_id, user_id = %user.id, "order cancelled");

        let refund_guidance = if order.payment_method == PAYMENT_METHOD_COD {
            "No refund required".to_string()
        } else {
            "Refund will be processed in 5-7 business days".to_string()
        };

        Ok(CancellationOutcome {
            order_id,
            refund_guidance,
        })
    }

    /// Overwrite an order's status (admin only).
    ///
    /// Transitions between the non-cancelled states are unrestricted;
    /// cancelled orders are frozen and `Cancelled` itself is rejected here
    /// because cancellation must restore stock.
    pub async fn update_status(
        &self,
        order_id: Uuid,
        new_status: OrderStatus,
        requester: &User,
    ) -> ShopResult<()> {
        if !requester.is_admin() {
            return Err(ShopError::unauthorized("Admin access required"));
        }

        let mut order = self
            .orders
            .get(&order_id)
            .await?
            .ok_or_else(|| ShopError::not_found("order", order_id))?;

        if order.is_cancelled {
            return Err(ShopError::invalid_state(
                "Cannot update status of cancelled order",
            ));
        }
        if new_status == OrderStatus::Cancelled {
            return Err(ShopError::invalid_state(
                "Use the cancellation endpoint to cancel an order",
            ));
        }

        order.status = new_status;
        order.touch();
        self.orders.update(order).await?;

        info!(order_id = %order_id, status = %new_status, "order status updated");
        Ok(())
    }
}
