//! HTTP handlers, grouped by resource

pub mod cart;
pub mod coupons;
pub mod orders;

use crate::core::{ShopError, ShopResult};
use validator::Validate;

/// Run `validator` checks on a request DTO, mapping failures to
/// `InvalidState`
pub(crate) fn validated<T: Validate>(body: T) -> ShopResult<T> {
    body.validate()
        .map_err(|e| ShopError::invalid_state(e.to_string()))?;
    Ok(body)
}
