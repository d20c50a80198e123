//! Coupon endpoints: create (admin), apply (preview), list (admin),
//! deactivate (admin)

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::checkout::coupon::{DiscountResult, NewCoupon};
use crate::core::{ShopError, ShopResult};
use crate::model::{Coupon, DiscountType};
use crate::server::handlers::orders::{MessageResponse, UserQuery};
use crate::server::handlers::validated;
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct CreateCouponBody {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1, max = 32))]
    pub code: String,
    pub discount_type: String,
    pub discount_value: Decimal,
    pub min_order_amount: Option<Decimal>,
    pub max_discount_amount: Option<Decimal>,
    pub usage_limit: Option<u32>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct CreateCouponResponse {
    pub success: bool,
    pub message: String,
    pub coupon: Coupon,
}

/// POST /v1/coupons (admin)
pub async fn create_coupon(
    State(state): State<AppState>,
    Json(body): Json<CreateCouponBody>,
) -> ShopResult<Json<CreateCouponResponse>> {
    let body = validated(body)?;
    state.require_admin(&body.email).await?;
    let discount_type: DiscountType = body
        .discount_type
        .parse()
        .map_err(|e: crate::model::coupon::ParseDiscountTypeError| {
            ShopError::invalid_state(e.to_string())
        })?;

    let coupon = state
        .coupon_engine()
        .create(NewCoupon {
            code: body.code,
            discount_type,
            discount_value: body.discount_value,
            min_order_amount: body.min_order_amount,
            max_discount_amount: body.max_discount_amount,
            usage_limit: body.usage_limit,
            expires_at: body.expires_at,
        })
        .await?;

    Ok(Json(CreateCouponResponse {
        success: true,
        message: "Coupon created successfully".to_string(),
        coupon,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct ApplyCouponBody {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub coupon_code: String,
    pub order_amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct ApplyCouponResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub result: DiscountResult,
}

/// POST /v1/coupons/apply
///
/// Preview only: the coupon's usage count is not consumed here.
pub async fn apply_coupon(
    State(state): State<AppState>,
    Json(body): Json<ApplyCouponBody>,
) -> ShopResult<Json<ApplyCouponResponse>> {
    let body = validated(body)?;
    state.resolve_user(&body.email).await?;
    if body.order_amount < Decimal::ZERO {
        return Err(ShopError::invalid_state("Order amount must not be negative"));
    }

    let result = state
        .coupon_engine()
        .apply(&body.coupon_code, body.order_amount)
        .await?;
    Ok(Json(ApplyCouponResponse {
        success: true,
        message: "Coupon applied successfully".to_string(),
        result,
    }))
}

#[derive(Debug, Serialize)]
pub struct CouponListResponse {
    pub success: bool,
    pub count: usize,
    pub coupons: Vec<Coupon>,
}

/// GET /v1/coupons?email=... (admin)
pub async fn list_coupons(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<CouponListResponse>> {
    state.require_admin(&query.email).await?;
    let coupons = state.coupon_engine().list().await?;
    Ok(Json(CouponListResponse {
        success: true,
        count: coupons.len(),
        coupons,
    }))
}

/// PUT /v1/coupons/{coupon_id}/deactivate (admin)
pub async fn deactivate_coupon(
    State(state): State<AppState>,
    Path(coupon_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<MessageResponse>> {
    state.require_admin(&query.email).await?;
    state.coupon_engine().deactivate(coupon_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Coupon deactivated successfully".to_string(),
    }))
}
