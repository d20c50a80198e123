//! Order placement: the transition of a cart into a persisted order
//!
//! Placement is validate-first: every check that can fail the order runs
//! before any write. Stock is then reserved through the catalog's atomic
//! conditional decrement; if a reservation fails mid-sequence (a concurrent
//! checkout drained the stock between the snapshot check and the reserve),
//! the already-reserved lines are released again so no partial writes
//! survive a failed placement.

use crate::core::service::{CartStore, OrderStore, ProductCatalog, UserDirectory};
use crate::core::{ShopError, ShopResult};
use crate::model::order::PAYMENT_METHOD_COD;
use crate::model::{CartLine, Order, OrderLine, OrderStatus, PaymentStatus, Product};
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

/// Shipping details supplied at checkout
#[derive(Debug, Clone, Deserialize)]
pub struct ShippingDetails {
    pub shipping_address: String,
    pub city: String,
    pub postal_code: String,
    pub phone_number: String,
    /// Defaults to `"COD"` when unspecified
    pub payment_method: Option<String>,
}

/// Result of a successful placement
#[derive(Debug, Clone, serde::Serialize)]
pub struct PlacedOrder {
    pub order_id: Uuid,
    pub order_number: String,
    pub total_amount: Decimal,
    pub items: Vec<OrderLine>,
}

/// The order assembler: validates the cart against live stock, computes the
/// total, persists the order with its line snapshots, decrements stock and
/// clears the cart.
pub struct OrderAssembler {
    users: Arc<dyn UserDirectory>,
    catalog: Arc<dyn ProductCatalog>,
    carts: Arc<dyn CartStore>,
    orders: Arc<dyn OrderStore>,
}

impl OrderAssembler {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartStore>,
        orders: Arc<dyn OrderStore>,
    ) -> Self {
        Self {
            users,
            catalog,
            carts,
            orders,
        }
    }

    /// Place an order from the user's current cart.
    ///
    /// Cart lines whose product no longer exists (or was deactivated) are
    /// skipped rather than blocking checkout; a stale cart degrades
    /// gracefully. A line whose quantity exceeds available stock fails the
    /// whole placement with `InsufficientStock` and leaves stock, orders and
    /// cart untouched.
    pub async fn place_order(
        &self,
        email: &str,
        details: ShippingDetails,
    ) -> ShopResult<PlacedOrder> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(ShopError::NotFound {
                resource: "user",
                id: email.to_string(),
            })?;

        let cart_lines = self.carts.lines_for_user(&user.id).await?;
        if cart_lines.is_empty() {
            return Err(ShopError::invalid_state("Cart is empty"));
        }

        let resolved = self.resolve_lines(&cart_lines).await?;
        if resolved.is_empty() {
            return Err(ShopError::invalid_state(
                "Cart contains no purchasable products",
            ));
        }

        // Snapshot stock check before any write
        for (line, product) in &resolved {
            if line.quantity > product.stock {
                return Err(ShopError::InsufficientStock {
                    product_name: product.name.clone(),
                    requested: line.quantity,
                    available: product.stock,
                });
            }
        }

        let created_at = Utc::now();
        let order_id = Uuid::new_v4();
        let snapshots: Vec<OrderLine> = resolved
            .iter()
            .map(|(line, product)| OrderLine::snapshot(order_id, product, line.quantity))
            .collect();
        let total_amount: Decimal = snapshots.iter().map(|s| s.line_total).sum();

        self.reserve_all(&resolved).await?;

        let order = Order {
            id: order_id,
            order_number: Order::generate_number(created_at),
            user_id: user.id,
            total_amount,
            status: OrderStatus::Pending,
            shipping_address: details.shipping_address,
            city: details.city,
            postal_code: details.postal_code,
            phone_number: details.phone_number,
            payment_method: details
                .payment_method
                .unwrap_or_else(|| PAYMENT_METHOD_COD.to_string()),
            payment_status: PaymentStatus::Pending,
            is_cancelled: false,
            cancellation_reason: None,
            cancelled_at: None,
            created_at,
            updated_at: created_at,
        };

        let order = match self.orders.create_order(order, snapshots.clone()).await {
            Ok(order) => order,
            Err(e) => {
                // Give the reserved stock back before surfacing the failure
                self.release_all(&resolved).await;
                return Err(e.into());
            }
        };

        self.carts.clear(&user.id).await?;

        info!(
            order_id = %order.id,
            order_number = %order.order_number,
            user_id = %user.id,
            total = %order.total_amount,
            lines = snapshots.len(),
            "order placed"
        );

        Ok(PlacedOrder {
            order_id: order.id,
            order_number: order.order_number,
            total_amount: order.total_amount,
            items: snapshots,
        })
    }

    /// Resolve cart lines against the catalog, dropping stale references
    async fn resolve_lines(&self, lines: &[CartLine]) -> ShopResult<Vec<(CartLine, Product)>> {
        let mut resolved = Vec::with_capacity(lines.len());
        for line in lines {
            match self.catalog.get(&line.product_id).await? {
                Some(product) if product.is_active => resolved.push((line.clone(), product)),
                _ => {
                    warn!(product_id = %line.product_id, "skipping stale cart line");
                }
            }
        }
        Ok(resolved)
    }

    /// Reserve stock for every line, releasing already-reserved lines if one
    /// reservation fails
    async fn reserve_all(&self, resolved: &[(CartLine, Product)]) -> ShopResult<()> {
        let mut reserved: Vec<(Uuid, u32)> = Vec::with_capacity(resolved.len());
        for (line, product) in resolved {
            let outcome = match self.catalog.reserve_stock(&product.id, line.quantity).await {
                Ok(outcome) => outcome,
                Err(e) => {
                    self.rollback_reservations(&reserved).await;
                    return Err(e.into());
                }
            };
            match outcome {
                Some(_) => reserved.push((product.id, line.quantity)),
                None => {
                    self.rollback_reservations(&reserved).await;
                    let available = self
                        .catalog
                        .get(&product.id)
                        .await?
                        .map(|p| p.stock)
                        .unwrap_or(0);
                    return Err(ShopError::InsufficientStock {
                        product_name: product.name.clone(),
                        requested: line.quantity,
                        available,
                    });
                }
            }
        }
        Ok(())
    }

    async fn rollback_reservations(&self, reserved: &[(Uuid, u32)]) {
        for (product_id, quantity) in reserved {
            if let Err(e) = self.catalog.release_stock(product_id, *quantity).await {
                warn!(product_id = %product_id, quantity, error = %e, "failed to roll back stock reservation");
            }
        }
    }

    async fn release_all(&self, resolved: &[(CartLine, Product)]) {
        let reserved: Vec<(Uuid, u32)> = resolved
            .iter()
            .map(|(line, product)| (product.id, line.quantity))
            .collect();
        self.rollback_reservations(&reserved).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::service::UserDirectory;
    use crate::model::{Role, User};
    use crate::storage::InMemoryStore;
    use rust_decimal_macros::dec;

    fn shipping() -> ShippingDetails {
        ShippingDetails {
            shipping_address: "12 Hill Rd".into(),
            city: "Pune".into(),
            postal_code: "411001".into(),
            phone_number: "9999999999".into(),
            payment_method: None,
        }
    }

    fn assembler(store: &InMemoryStore) -> OrderAssembler {
        let shared = Arc::new(store.clone());
        OrderAssembler::new(
            shared.clone(),
            shared.clone(),
            shared.clone(),
            shared,
        )
    }

    async fn seed_user(store: &InMemoryStore) -> User {
        let user = User::new("meera", "meera@example.com", Role::Customer);
        UserDirectory::create(store, user.clone()).await.unwrap();
        user
    }

    #[tokio::test]
    async fn test_unknown_user_is_not_found() {
        let store = InMemoryStore::new();
        let result = assembler(&store)
            .place_order("ghost@example.com", shipping())
            .await;
        assert!(matches!(result, Err(ShopError::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_empty_cart_is_invalid_state() {
        let store = InMemoryStore::new();
        seed_user(&store).await;
        let result = assembler(&store)
            .place_order("meera@example.com", shipping())
            .await;
        assert!(matches!(result, Err(ShopError::InvalidState { .. })));
    }

    #[tokio::test]
    async fn test_stale_cart_line_is_skipped() {
        let store = InMemoryStore::new();
        let user = seed_user(&store).await;
        let product = Product::new("Shampoo", "herbal", dec!(8.00), 5);
        ProductCatalog::create(&store, product.clone()).await.unwrap();
        store
            .add_line(CartLine::new(user.id, product.id, 2))
            .await
            .unwrap();
        // Line pointing at a product that no longer exists
        store
            .add_line(CartLine::new(user.id, Uuid::new_v4(), 1))
            .await
            .unwrap();

        let placed = assembler(&store)
            .place_order("meera@example.com", shipping())
            .await
            .unwrap();
        assert_eq!(placed.items.len(), 1);
        assert_eq!(placed.total_amount, dec!(16.00));
    }

    #[tokio::test]
    async fn test_default_payment_method_is_cod() {
        let store = InMemoryStore::new();
        let user = seed_user(&store).await;
        let product = Product::new("Shampoo", "herbal", dec!(8.00), 5);
        ProductCatalog::create(&store, product.clone()).await.unwrap();
        store
            .add_line(CartLine::new(user.id, product.id, 1))
            .await
            .unwrap();

        let placed = assembler(&store)
            .place_order("meera@example.com", shipping())
            .await
            .unwrap();
        let order = OrderStore::get(&store, &placed.order_id).await.unwrap().unwrap();
        assert_eq!(order.payment_method, "COD");
        assert_eq!(order.status, OrderStatus::Pending);
    }
}
