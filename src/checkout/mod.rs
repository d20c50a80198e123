//! The checkout core: order placement, order lifecycle and coupon
//! evaluation.
//!
//! Everything in this module works through the trait seams in
//! [`crate::core::service`] and returns [`crate::core::ShopResult`], so the
//! same logic runs against any storage backend.

pub mod coupon;
pub mod lifecycle;
pub mod placement;

pub use coupon::{CouponEngine, DiscountResult, NewCoupon};
pub use lifecycle::{CancellationOutcome, OrderLifecycle};
pub use placement::{OrderAssembler, PlacedOrder, ShippingDetails};
