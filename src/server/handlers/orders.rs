//! Order endpoints: place, cancel, query, admin status update

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::checkout::{CancellationOutcome, PlacedOrder, ShippingDetails};
use crate::core::{ShopError, ShopResult};
use crate::model::{Order, OrderLine, OrderStatus};
use crate::server::handlers::validated;
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct PlaceOrderBody {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub shipping_address: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub postal_code: String,
    #[validate(length(min = 1))]
    pub phone_number: String,
    pub payment_method: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PlaceOrderResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub order: PlacedOrder,
}

/// POST /v1/orders
pub async fn place_order(
    State(state): State<AppState>,
    Json(body): Json<PlaceOrderBody>,
) -> ShopResult<Json<PlaceOrderResponse>> {
    let body = validated(body)?;
    let placed = state
        .assembler()
        .place_order(
            &body.email,
            ShippingDetails {
                shipping_address: body.shipping_address,
                city: body.city,
                postal_code: body.postal_code,
                phone_number: body.phone_number,
                payment_method: body.payment_method,
            },
        )
        .await?;
    Ok(Json(PlaceOrderResponse {
        success: true,
        message: "Order placed successfully".to_string(),
        order: placed,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct CancelOrderBody {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub cancellation_reason: String,
}

#[derive(Debug, Serialize)]
pub struct CancelOrderResponse {
    pub success: bool,
    pub message: String,
    #[serde(flatten)]
    pub outcome: CancellationOutcome,
}

/// POST /v1/orders/{order_id}/cancel
pub async fn cancel_order(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<CancelOrderBody>,
) -> ShopResult<Json<CancelOrderResponse>> {
    let body = validated(body)?;
    let outcome = state
        .lifecycle()
        .cancel_order(order_id, &body.email, &body.cancellation_reason)
        .await?;
    Ok(Json(CancelOrderResponse {
        success: true,
        message: "Order cancelled successfully".to_string(),
        outcome,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UserQuery {
    pub email: String,
}

/// Summary row for order listings
#[derive(Debug, Serialize)]
pub struct OrderSummary {
    pub order_id: Uuid,
    pub order_number: String,
    pub user_id: Uuid,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub is_cancelled: bool,
    pub payment_method: String,
    pub city: String,
    pub order_date: DateTime<Utc>,
    pub item_count: usize,
}

impl OrderSummary {
    fn from_order(order: &Order, item_count: usize) -> Self {
        Self {
            order_id: order.id,
            order_number: order.order_number.clone(),
            user_id: order.user_id,
            total_amount: order.total_amount,
            status: order.status,
            is_cancelled: order.is_cancelled,
            payment_method: order.payment_method.clone(),
            city: order.city.clone(),
            order_date: order.created_at,
            item_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct OrderListResponse {
    pub success: bool,
    pub order_count: usize,
    pub orders: Vec<OrderSummary>,
}

/// GET /v1/orders?email=...
pub async fn my_orders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<OrderListResponse>> {
    let user = state.resolve_user(&query.email).await?;
    let orders = state.orders.orders_for_user(&user.id).await?;
    let summaries = summarize(&state, &orders).await?;
    Ok(Json(OrderListResponse {
        success: true,
        order_count: summaries.len(),
        orders: summaries,
    }))
}

/// GET /v1/orders/all?email=... (admin)
pub async fn all_orders(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<OrderListResponse>> {
    state.require_admin(&query.email).await?;
    let orders = state.orders.list_all().await?;
    let summaries = summarize(&state, &orders).await?;
    Ok(Json(OrderListResponse {
        success: true,
        order_count: summaries.len(),
        orders: summaries,
    }))
}

async fn summarize(state: &AppState, orders: &[Order]) -> ShopResult<Vec<OrderSummary>> {
    let mut summaries = Vec::with_capacity(orders.len());
    for order in orders {
        let items = state.orders.lines_for_order(&order.id).await?;
        summaries.push(OrderSummary::from_order(order, items.len()));
    }
    Ok(summaries)
}

#[derive(Debug, Serialize)]
pub struct OrderDetailsResponse {
    pub success: bool,
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// GET /v1/orders/{order_id}
pub async fn order_details(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
) -> ShopResult<Json<OrderDetailsResponse>> {
    let order = state
        .orders
        .get(&order_id)
        .await?
        .ok_or_else(|| ShopError::not_found("order", order_id))?;
    let items = state.orders.lines_for_order(&order_id).await?;
    Ok(Json(OrderDetailsResponse {
        success: true,
        order,
        items,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateStatusBody {
    #[validate(email)]
    pub email: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub success: bool,
    pub message: String,
}

/// PUT /v1/orders/{order_id}/status (admin)
pub async fn update_status(
    State(state): State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<UpdateStatusBody>,
) -> ShopResult<Json<MessageResponse>> {
    let body = validated(body)?;
    let requester = state.resolve_user(&body.email).await?;
    let new_status: OrderStatus = body
        .status
        .parse()
        .map_err(|e: crate::model::order::ParseOrderStatusError| {
            ShopError::invalid_state(e.to_string())
        })?;
    state
        .lifecycle()
        .update_status(order_id, new_status, &requester)
        .await?;
    Ok(Json(MessageResponse {
        success: true,
        message: format!("Order status updated to {}", new_status),
    }))
}
