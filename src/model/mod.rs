//! Domain records for the storefront
//!
//! All money fields are `rust_decimal::Decimal`, ids are uuids and
//! timestamps are `chrono::DateTime<Utc>`.

pub mod cart;
pub mod coupon;
pub mod order;
pub mod product;
pub mod user;

pub use cart::CartLine;
pub use coupon::{Coupon, DiscountType};
pub use order::{Order, OrderLine, OrderStatus, PaymentStatus};
pub use product::Product;
pub use user::{Role, User};
