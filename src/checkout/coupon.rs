//! Coupon evaluation and administration
//!
//! Evaluation is a pure function over a loaded coupon record; it never
//! touches `used_count`. Redeeming (the usage increment) is a separate,
//! explicit step so callers decide when a preview becomes a consumption.

use crate::core::service::CouponStore;
use crate::core::{ShopError, ShopResult};
use crate::model::{Coupon, DiscountType};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

/// Outcome of applying a coupon to an order amount. All amounts are rounded
/// to 2 decimal places.
#[derive(Debug, Clone, Serialize)]
pub struct DiscountResult {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub order_amount: Decimal,
    pub discount_amount: Decimal,
    pub final_amount: Decimal,
}

/// Input for creating a coupon
#[derive(Debug, Clone)]
pub struct NewCoupon {
    pub code: String,
    pub discount_type: DiscountType,
    pub discount_value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    pub usage_limit: Option<u32>,
    pub expires_at: DateTime<Utc>,
}

/// Evaluate a coupon against an order amount.
///
/// Eligibility checks run in order: active flag, expiry, usage limit,
/// minimum order amount. A fixed discount is clamped to the order amount so
/// the final amount never goes negative; a percentage discount is clamped to
/// `max_discount_amount` when set.
pub fn evaluate(
    coupon: &Coupon,
    order_amount: Decimal,
    now: DateTime<Utc>,
) -> ShopResult<DiscountResult> {
    if !coupon.is_active {
        return Err(ShopError::invalid_state("Coupon is no longer active"));
    }
    if coupon.is_expired(now) {
        return Err(ShopError::invalid_state("Coupon has expired"));
    }
    if coupon.usage_exhausted() {
        return Err(ShopError::invalid_state("Coupon usage limit reached"));
    }
    if let Some(min) = coupon.min_order_amount {
        if order_amount < min {
            return Err(ShopError::invalid_state(format!(
                "Minimum order amount of {} required",
                min
            )));
        }
    }

    let raw_discount = match coupon.discount_type {
        DiscountType::Percentage => {
            let discount = order_amount * coupon.discount_value / Decimal::ONE_HUNDRED;
            match coupon.max_discount_amount {
                Some(cap) if discount > cap => cap,
                _ => discount,
            }
        }
        DiscountType::Fixed => coupon.discount_value.min(order_amount),
    };

    let discount_amount = raw_discount.round_dp(2);
    let final_amount = (order_amount - discount_amount).round_dp(2);

    Ok(DiscountResult {
        code: coupon.code.clone(),
        discount_type: coupon.discount_type,
        discount_value: coupon.discount_value,
        order_amount,
        discount_amount,
        final_amount,
    })
}

/// Store-backed coupon operations: create with validation, apply (preview),
/// redeem (usage increment), list and deactivate.
pub struct CouponEngine {
    coupons: Arc<dyn CouponStore>,
}

impl CouponEngine {
    pub fn new(coupons: Arc<dyn CouponStore>) -> Self {
        Self { coupons }
    }

    /// Create a coupon. Percentage values must be within 0..=100 and codes
    /// must be unique (case-insensitive); the stored code is uppercased.
    pub async fn create(&self, input: NewCoupon) -> ShopResult<Coupon> {
        if input.discount_value < Decimal::ZERO {
            return Err(ShopError::invalid_state("Discount value must not be negative"));
        }
        if input.discount_type == DiscountType::Percentage
            && input.discount_value > Decimal::ONE_HUNDRED
        {
            return Err(ShopError::invalid_state(
                "Percentage discount must be between 0 and 100",
            ));
        }
        if self.coupons.find_by_code(&input.code).await?.is_some() {
            return Err(ShopError::invalid_state("Coupon code already exists"));
        }

        let mut coupon = Coupon::new(
            input.code,
            input.discount_type,
            input.discount_value,
            input.expires_at,
        );
        coupon.min_order_amount = input.min_order_amount;
        coupon.max_discount_amount = input.max_discount_amount;
        coupon.usage_limit = input.usage_limit;

        let coupon = self.coupons.create(coupon).await?;
        info!(code = %coupon.code, "coupon created");
        Ok(coupon)
    }

    /// Load a coupon by code and evaluate it against the order amount. Does
    /// not consume a use.
    pub async fn apply(&self, code: &str, order_amount: Decimal) -> ShopResult<DiscountResult> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or(ShopError::NotFound {
                resource: "coupon",
                id: code.to_string(),
            })?;
        evaluate(&coupon, order_amount, Utc::now())
    }

    /// Consume one use of a coupon. Called by the checkout flow after the
    /// discount has actually been committed to an order.
    pub async fn redeem(&self, code: &str) -> ShopResult<()> {
        let coupon = self
            .coupons
            .find_by_code(code)
            .await?
            .ok_or(ShopError::NotFound {
                resource: "coupon",
                id: code.to_string(),
            })?;
        if coupon.usage_exhausted() {
            return Err(ShopError::invalid_state("Coupon usage limit reached"));
        }
        self.coupons.increment_usage(&coupon.id).await?;
        Ok(())
    }

    pub async fn list(&self) -> ShopResult<Vec<Coupon>> {
        Ok(self.coupons.list_all().await?)
    }

    pub async fn deactivate(&self, id: Uuid) -> ShopResult<()> {
        if !self.coupons.deactivate(&id).await? {
            return Err(ShopError::not_found("coupon", id));
        }
        Ok(())
    }
}
