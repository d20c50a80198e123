//! Service traits for the storage seams
//!
//! Implementations provide persistence for one slice of the domain each.
//! The checkout core is agnostic to the underlying storage mechanism; seams
//! return `anyhow::Result` and the checkout layer attaches business meaning
//! (`ShopError`) on top.

use crate::model::{CartLine, Coupon, Order, OrderLine, Product, User};
use anyhow::Result;
use async_trait::async_trait;
use rust_decimal::Decimal;
use uuid::Uuid;

/// Lookup of authenticated user identities
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>>;

    async fn create(&self, user: User) -> Result<User>;
}

/// Read/write access to product price, stock and active flag.
///
/// The catalog exclusively owns stock mutation. Stock changes go through
/// [`reserve_stock`](ProductCatalog::reserve_stock) and
/// [`release_stock`](ProductCatalog::release_stock), which implementations
/// must serialize per product so concurrent checkouts cannot oversell.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn get(&self, id: &Uuid) -> Result<Option<Product>>;

    async fn list_active(&self) -> Result<Vec<Product>>;

    async fn create(&self, product: Product) -> Result<Product>;

    async fn set_price(&self, id: &Uuid, price: Decimal) -> Result<bool>;

    /// Decrement stock by `quantity` only if at least that much is
    /// available. Returns the remaining stock on success, `None` when the
    /// product is unknown or stock is insufficient. The check and the
    /// decrement are a single atomic step.
    async fn reserve_stock(&self, id: &Uuid, quantity: u32) -> Result<Option<u32>>;

    /// Add `quantity` back to stock (cancellation path). Returns false when
    /// the product no longer exists.
    async fn release_stock(&self, id: &Uuid, quantity: u32) -> Result<bool>;
}

/// Per-user collection of (product, quantity) lines
#[async_trait]
pub trait CartStore: Send + Sync {
    async fn lines_for_user(&self, user_id: &Uuid) -> Result<Vec<CartLine>>;

    async fn find_line(&self, user_id: &Uuid, product_id: &Uuid) -> Result<Option<CartLine>>;

    async fn get_line(&self, line_id: &Uuid) -> Result<Option<CartLine>>;

    async fn add_line(&self, line: CartLine) -> Result<CartLine>;

    async fn set_quantity(&self, line_id: &Uuid, quantity: u32) -> Result<bool>;

    async fn remove_line(&self, line_id: &Uuid) -> Result<bool>;

    async fn clear(&self, user_id: &Uuid) -> Result<()>;
}

/// Persistence for orders and their line snapshots
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist an order header together with its line snapshots as one
    /// atomic unit.
    async fn create_order(&self, order: Order, lines: Vec<OrderLine>) -> Result<Order>;

    async fn get(&self, id: &Uuid) -> Result<Option<Order>>;

    async fn lines_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderLine>>;

    /// Orders for a user, newest first
    async fn orders_for_user(&self, user_id: &Uuid) -> Result<Vec<Order>>;

    /// All orders, newest first
    async fn list_all(&self) -> Result<Vec<Order>>;

    /// Overwrite a stored order (status transitions, cancellation)
    async fn update(&self, order: Order) -> Result<Order>;
}

/// Persistence for coupon records
#[async_trait]
pub trait CouponStore: Send + Sync {
    async fn create(&self, coupon: Coupon) -> Result<Coupon>;

    /// Case-insensitive lookup among active coupons only
    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>>;

    /// All coupons, newest first
    async fn list_all(&self) -> Result<Vec<Coupon>>;

    /// Bump `used_count` by one. Returns false when the coupon is unknown.
    async fn increment_usage(&self, id: &Uuid) -> Result<bool>;

    async fn deactivate(&self, id: &Uuid) -> Result<bool>;
}
