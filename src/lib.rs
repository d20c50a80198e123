//! # Shopfront
//!
//! A retail storefront backend centered on the order placement and
//! inventory consistency workflow: cart → order with atomic stock
//! reservation, coupon discounts at checkout, and a cancellation path that
//! restores stock.
//!
//! ## Architecture
//!
//! - [`model`]: domain records (User, Product, CartLine, Order + OrderLine
//!   snapshots, Coupon) with `Decimal` money and uuid identities
//! - [`core`]: the `ShopError` taxonomy and the storage trait seams the
//!   checkout workflow operates through
//! - [`storage`]: in-memory backend implementing every seam, with
//!   check-and-decrement stock reservation
//! - [`checkout`]: the core state machines — `OrderAssembler` (placement),
//!   `OrderLifecycle` (cancellation and status updates) and the coupon
//!   evaluator
//! - [`server`]: thin axum layer mapping `ShopError` kinds to HTTP statuses
//! - [`config`]: YAML configuration and tracing setup
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use shopfront::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = AppConfig::default();
//!     config.init_tracing();
//!
//!     let state = AppState::in_memory();
//!     shopfront::server::serve(state, &config.bind_addr).await
//! }
//! ```

pub mod checkout;
pub mod config;
pub mod core;
pub mod model;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{ErrorResponse, ShopError, ShopResult},
        service::{CartStore, CouponStore, OrderStore, ProductCatalog, UserDirectory},
    };

    // === Domain ===
    pub use crate::model::{
        CartLine, Coupon, DiscountType, Order, OrderLine, OrderStatus, PaymentStatus, Product,
        Role, User,
    };

    // === Checkout ===
    pub use crate::checkout::{
        CancellationOutcome, CouponEngine, DiscountResult, NewCoupon, OrderAssembler,
        OrderLifecycle, PlacedOrder, ShippingDetails,
    };

    // === Storage ===
    pub use crate::storage::InMemoryStore;

    // === Server & Config ===
    pub use crate::config::AppConfig;
    pub use crate::server::{AppState, build_router, serve};

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use rust_decimal::Decimal;
    pub use serde::{Deserialize, Serialize};
    pub use uuid::Uuid;
}
