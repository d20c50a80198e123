//! Core abstractions: error taxonomy and the trait seams the checkout
//! workflow operates through.

pub mod error;
pub mod service;

pub use error::{ErrorResponse, ShopError, ShopResult};
pub use service::{CartStore, CouponStore, OrderStore, ProductCatalog, UserDirectory};
