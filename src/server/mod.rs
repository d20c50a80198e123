//! Thin HTTP layer over the checkout core
//!
//! Handlers translate request DTOs into core calls and let
//! [`crate::core::ShopError`]'s `IntoResponse` impl do the status mapping.
//! Authentication is assumed to have happened upstream; requests carry an
//! already-resolved user identity (email).

pub mod handlers;
pub mod router;
pub mod state;

pub use router::{build_router, serve};
pub use state::AppState;
