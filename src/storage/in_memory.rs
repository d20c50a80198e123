//! In-memory implementations of the storage seams for testing and development
//!
//! Each collection lives behind an `Arc<RwLock<HashMap>>`. Stock mutation is
//! a check-and-adjust under the catalog write lock, so two concurrent
//! checkouts against the same product cannot both pass the stock check.

use crate::core::service::{CartStore, CouponStore, OrderStore, ProductCatalog, UserDirectory};
use crate::model::{CartLine, Coupon, Order, OrderLine, Product, User};
use anyhow::{Result, anyhow};
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

/// In-memory backend bundling all five storage seams.
///
/// Cloning is cheap; clones share the same underlying maps.
#[derive(Clone)]
pub struct InMemoryStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
    products: Arc<RwLock<HashMap<Uuid, Product>>>,
    cart_lines: Arc<RwLock<HashMap<Uuid, CartLine>>>,
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
    order_lines: Arc<RwLock<HashMap<Uuid, OrderLine>>>,
    coupons: Arc<RwLock<HashMap<Uuid, Coupon>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            users: Arc::new(RwLock::new(HashMap::new())),
            products: Arc::new(RwLock::new(HashMap::new())),
            cart_lines: Arc::new(RwLock::new(HashMap::new())),
            orders: Arc::new(RwLock::new(HashMap::new())),
            order_lines: Arc::new(RwLock::new(HashMap::new())),
            coupons: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock_err<T>(e: std::sync::PoisonError<T>) -> anyhow::Error {
    anyhow!("failed to acquire lock: {}", e)
}

#[async_trait]
impl UserDirectory for InMemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users
            .values()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn find_by_id(&self, id: &Uuid) -> Result<Option<User>> {
        let users = self.users.read().map_err(lock_err)?;
        Ok(users.get(id).cloned())
    }

    async fn create(&self, user: User) -> Result<User> {
        let mut users = self.users.write().map_err(lock_err)?;
        users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn get(&self, id: &Uuid) -> Result<Option<Product>> {
        let products = self.products.read().map_err(lock_err)?;
        Ok(products.get(id).cloned())
    }

    async fn list_active(&self) -> Result<Vec<Product>> {
        let products = self.products.read().map_err(lock_err)?;
        Ok(products.values().filter(|p| p.is_active).cloned().collect())
    }

    async fn create(&self, product: Product) -> Result<Product> {
        let mut products = self.products.write().map_err(lock_err)?;
        products.insert(product.id, product.clone());
        Ok(product)
    }

    async fn set_price(&self, id: &Uuid, price: Decimal) -> Result<bool> {
        let mut products = self.products.write().map_err(lock_err)?;
        match products.get_mut(id) {
            Some(product) => {
                product.price = price;
                product.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn reserve_stock(&self, id: &Uuid, quantity: u32) -> Result<Option<u32>> {
        // Check and decrement under one write lock
        let mut products = self.products.write().map_err(lock_err)?;
        let Some(product) = products.get_mut(id) else {
            return Ok(None);
        };
        if product.stock < quantity {
            return Ok(None);
        }
        product.stock -= quantity;
        product.touch();
        Ok(Some(product.stock))
    }

    async fn release_stock(&self, id: &Uuid, quantity: u32) -> Result<bool> {
        let mut products = self.products.write().map_err(lock_err)?;
        match products.get_mut(id) {
            Some(product) => {
                product.stock = product.stock.saturating_add(quantity);
                product.touch();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl CartStore for InMemoryStore {
    async fn lines_for_user(&self, user_id: &Uuid) -> Result<Vec<CartLine>> {
        let lines = self.cart_lines.read().map_err(lock_err)?;
        let mut result: Vec<CartLine> = lines
            .values()
            .filter(|l| &l.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by_key(|l| l.created_at);
        Ok(result)
    }

    async fn find_line(&self, user_id: &Uuid, product_id: &Uuid) -> Result<Option<CartLine>> {
        let lines = self.cart_lines.read().map_err(lock_err)?;
        Ok(lines
            .values()
            .find(|l| &l.user_id == user_id && &l.product_id == product_id)
            .cloned())
    }

    async fn get_line(&self, line_id: &Uuid) -> Result<Option<CartLine>> {
        let lines = self.cart_lines.read().map_err(lock_err)?;
        Ok(lines.get(line_id).cloned())
    }

    async fn add_line(&self, line: CartLine) -> Result<CartLine> {
        let mut lines = self.cart_lines.write().map_err(lock_err)?;
        lines.insert(line.id, line.clone());
        Ok(line)
    }

    async fn set_quantity(&self, line_id: &Uuid, quantity: u32) -> Result<bool> {
        let mut lines = self.cart_lines.write().map_err(lock_err)?;
        match lines.get_mut(line_id) {
            Some(line) => {
                line.quantity = quantity;
                line.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn remove_line(&self, line_id: &Uuid) -> Result<bool> {
        let mut lines = self.cart_lines.write().map_err(lock_err)?;
        Ok(lines.remove(line_id).is_some())
    }

    async fn clear(&self, user_id: &Uuid) -> Result<()> {
        let mut lines = self.cart_lines.write().map_err(lock_err)?;
        lines.retain(|_, l| &l.user_id != user_id);
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryStore {
    async fn create_order(&self, order: Order, lines: Vec<OrderLine>) -> Result<Order> {
        // Header and lines land under one lock pair so readers never see a
        // header without its snapshots.
        let mut orders = self.orders.write().map_err(lock_err)?;
        let mut order_lines = self.order_lines.write().map_err(lock_err)?;
        orders.insert(order.id, order.clone());
        for line in lines {
            order_lines.insert(line.id, line);
        }
        Ok(order)
    }

    async fn get(&self, id: &Uuid) -> Result<Option<Order>> {
        let orders = self.orders.read().map_err(lock_err)?;
        Ok(orders.get(id).cloned())
    }

    async fn lines_for_order(&self, order_id: &Uuid) -> Result<Vec<OrderLine>> {
        let lines = self.order_lines.read().map_err(lock_err)?;
        Ok(lines
            .values()
            .filter(|l| &l.order_id == order_id)
            .cloned()
            .collect())
    }

    async fn orders_for_user(&self, user_id: &Uuid) -> Result<Vec<Order>> {
        let orders = self.orders.read().map_err(lock_err)?;
        let mut result: Vec<Order> = orders
            .values()
            .filter(|o| &o.user_id == user_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn list_all(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().map_err(lock_err)?;
        let mut result: Vec<Order> = orders.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn update(&self, order: Order) -> Result<Order> {
        let mut orders = self.orders.write().map_err(lock_err)?;
        orders
            .get_mut(&order.id)
            .ok_or_else(|| anyhow!("order not found"))?;
        orders.insert(order.id, order.clone());
        Ok(order)
    }
}

#[async_trait]
impl CouponStore for InMemoryStore {
    async fn create(&self, coupon: Coupon) -> Result<Coupon> {
        let mut coupons = self.coupons.write().map_err(lock_err)?;
        coupons.insert(coupon.id, coupon.clone());
        Ok(coupon)
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<Coupon>> {
        let coupons = self.coupons.read().map_err(lock_err)?;
        Ok(coupons
            .values()
            .find(|c| c.is_active && c.code.eq_ignore_ascii_case(code))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Coupon>> {
        let coupons = self.coupons.read().map_err(lock_err)?;
        let mut result: Vec<Coupon> = coupons.values().cloned().collect();
        result.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(result)
    }

    async fn increment_usage(&self, id: &Uuid) -> Result<bool> {
        let mut coupons = self.coupons.write().map_err(lock_err)?;
        match coupons.get_mut(id) {
            Some(coupon) => {
                coupon.used_count += 1;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn deactivate(&self, id: &Uuid) -> Result<bool> {
        let mut coupons = self.coupons.write().map_err(lock_err)?;
        match coupons.get_mut(id) {
            Some(coupon) => {
                coupon.is_active = false;
                Ok(true)
            }
            None => Ok(false),
        }
    }
}
