//! Cart endpoints: add, view, update quantity, remove, clear
//!
//! Adding to the cart pre-checks stock so obviously doomed checkouts are
//! caught early; the authoritative check still happens at placement.

use axum::Json;
use axum::extract::{Path, Query, State};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::core::{ShopError, ShopResult};
use crate::model::CartLine;
use crate::server::handlers::orders::{MessageResponse, UserQuery};
use crate::server::handlers::validated;
use crate::server::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartBody {
    #[validate(email)]
    pub email: String,
    pub product_id: Uuid,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

#[derive(Debug, Serialize)]
pub struct AddToCartResponse {
    pub success: bool,
    pub message: String,
    pub line_id: Uuid,
    pub quantity: u32,
}

/// POST /v1/cart
pub async fn add_to_cart(
    State(state): State<AppState>,
    Json(body): Json<AddToCartBody>,
) -> ShopResult<Json<AddToCartResponse>> {
    let body = validated(body)?;
    let user = state.resolve_user(&body.email).await?;
    let product = state
        .catalog
        .get(&body.product_id)
        .await?
        .filter(|p| p.is_active)
        .ok_or_else(|| ShopError::not_found("product", body.product_id))?;

    if product.stock < body.quantity {
        return Err(ShopError::InsufficientStock {
            product_name: product.name,
            requested: body.quantity,
            available: product.stock,
        });
    }

    // Repeat add merges into the existing line
    if let Some(existing) = state.carts.find_line(&user.id, &product.id).await? {
        let merged = existing.quantity + body.quantity;
        if merged > product.stock {
            return Err(ShopError::InsufficientStock {
                product_name: product.name,
                requested: merged,
                available: product.stock,
            });
        }
        state.carts.set_quantity(&existing.id, merged).await?;
        return Ok(Json(AddToCartResponse {
            success: true,
            message: "Cart updated successfully".to_string(),
            line_id: existing.id,
            quantity: merged,
        }));
    }

    let line = state
        .carts
        .add_line(CartLine::new(user.id, product.id, body.quantity))
        .await?;
    Ok(Json(AddToCartResponse {
        success: true,
        message: "Product added to cart successfully".to_string(),
        quantity: line.quantity,
        line_id: line.id,
    }))
}

/// A cart line joined with live catalog data
#[derive(Debug, Serialize)]
pub struct CartLineView {
    pub line_id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: u32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub success: bool,
    pub items: Vec<CartLineView>,
    pub cart_total: Decimal,
}

/// GET /v1/cart?email=...
pub async fn view_cart(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<CartView>> {
    let user = state.resolve_user(&query.email).await?;
    let lines = state.carts.lines_for_user(&user.id).await?;

    let mut items = Vec::with_capacity(lines.len());
    let mut cart_total = Decimal::ZERO;
    for line in lines {
        // Stale lines are shown skipped, same policy as checkout
        let Some(product) = state.catalog.get(&line.product_id).await?.filter(|p| p.is_active)
        else {
            continue;
        };
        let line_total = product.price * Decimal::from(line.quantity);
        cart_total += line_total;
        items.push(CartLineView {
            line_id: line.id,
            product_id: product.id,
            product_name: product.name,
            price: product.price,
            quantity: line.quantity,
            line_total,
        });
    }

    Ok(Json(CartView {
        success: true,
        items,
        cart_total,
    }))
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateQuantityBody {
    #[validate(email)]
    pub email: String,
    #[validate(range(min = 1))]
    pub quantity: u32,
}

/// PUT /v1/cart/{line_id}
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
    Json(body): Json<UpdateQuantityBody>,
) -> ShopResult<Json<MessageResponse>> {
    let body = validated(body)?;
    let user = state.resolve_user(&body.email).await?;
    let line = state
        .carts
        .get_line(&line_id)
        .await?
        .ok_or_else(|| ShopError::not_found("cart line", line_id))?;
    if line.user_id != user.id {
        return Err(ShopError::unauthorized("Cart line belongs to another user"));
    }

    let product = state
        .catalog
        .get(&line.product_id)
        .await?
        .ok_or_else(|| ShopError::not_found("product", line.product_id))?;
    if product.stock < body.quantity {
        return Err(ShopError::InsufficientStock {
            product_name: product.name,
            requested: body.quantity,
            available: product.stock,
        });
    }

    state.carts.set_quantity(&line_id, body.quantity).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Cart updated successfully".to_string(),
    }))
}

/// DELETE /v1/cart/{line_id}?email=...
pub async fn remove_line(
    State(state): State<AppState>,
    Path(line_id): Path<Uuid>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<MessageResponse>> {
    let user = state.resolve_user(&query.email).await?;
    let line = state
        .carts
        .get_line(&line_id)
        .await?
        .ok_or_else(|| ShopError::not_found("cart line", line_id))?;
    if line.user_id != user.id {
        return Err(ShopError::unauthorized("Cart line belongs to another user"));
    }

    state.carts.remove_line(&line_id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Item removed from cart".to_string(),
    }))
}

/// DELETE /v1/cart?email=...
pub async fn clear_cart(
    State(state): State<AppState>,
    Query(query): Query<UserQuery>,
) -> ShopResult<Json<MessageResponse>> {
    let user = state.resolve_user(&query.email).await?;
    state.carts.clear(&user.id).await?;
    Ok(Json(MessageResponse {
        success: true,
        message: "Cart cleared".to_string(),
    }))
}
