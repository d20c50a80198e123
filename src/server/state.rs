//! Application state shared across handlers

use crate::checkout::{CouponEngine, OrderAssembler, OrderLifecycle};
use crate::core::service::{CartStore, CouponStore, OrderStore, ProductCatalog, UserDirectory};
use crate::core::{ShopError, ShopResult};
use crate::model::User;
use crate::storage::InMemoryStore;
use std::sync::Arc;

/// Shared handles to the storage seams. Cloning is cheap.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserDirectory>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub carts: Arc<dyn CartStore>,
    pub orders: Arc<dyn OrderStore>,
    pub coupons: Arc<dyn CouponStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserDirectory>,
        catalog: Arc<dyn ProductCatalog>,
        carts: Arc<dyn CartStore>,
        orders: Arc<dyn OrderStore>,
        coupons: Arc<dyn CouponStore>,
    ) -> Self {
        Self {
            users,
            catalog,
            carts,
            orders,
            coupons,
        }
    }

    /// State backed entirely by one in-memory store, for tests and
    /// development
    pub fn in_memory() -> Self {
        let store = Arc::new(InMemoryStore::new());
        Self {
            users: store.clone(),
            catalog: store.clone(),
            carts: store.clone(),
            orders: store.clone(),
            coupons: store,
        }
    }

    pub fn assembler(&self) -> OrderAssembler {
        OrderAssembler::new(
            self.users.clone(),
            self.catalog.clone(),
            self.carts.clone(),
            self.orders.clone(),
        )
    }

    pub fn lifecycle(&self) -> OrderLifecycle {
        OrderLifecycle::new(self.users.clone(), self.catalog.clone(), self.orders.clone())
    }

    pub fn coupon_engine(&self) -> CouponEngine {
        CouponEngine::new(self.coupons.clone())
    }

    /// Resolve a user by email or fail with `NotFound`
    pub async fn resolve_user(&self, email: &str) -> ShopResult<User> {
        self.users
            .find_by_email(email)
            .await?
            .ok_or(ShopError::NotFound {
                resource: "user",
                id: email.to_string(),
            })
    }

    /// Resolve a user and require the admin role
    pub async fn require_admin(&self, email: &str) -> ShopResult<User> {
        let user = self.resolve_user(email).await?;
        if !user.is_admin() {
            return Err(ShopError::unauthorized("Admin access required"));
        }
        Ok(user)
    }
}
