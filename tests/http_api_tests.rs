//! HTTP round-trips through the v1 router, checking the status mapping of
//! each failure kind

use axum_test::TestServer;
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use shopfront::prelude::*;

struct Api {
    server: TestServer,
    state: AppState,
}

async fn api() -> Api {
    let state = AppState::in_memory();
    let server = TestServer::new(build_router(state.clone()));

    let customer = User::new("meera", "meera@example.com", Role::Customer);
    let admin = User::new("ops", "ops@example.com", Role::Admin);
    state.users.create(customer).await.unwrap();
    state.users.create(admin).await.unwrap();

    Api { server, state }
}

impl Api {
    async fn seed_product(&self, name: &str, price: Decimal, stock: u32) -> Product {
        let product = Product::new(name, "test product", price, stock);
        self.state.catalog.create(product.clone()).await.unwrap();
        product
    }

    async fn seed_cart(&self, email: &str, product: &Product, quantity: u32) {
        let user = self.state.users.find_by_email(email).await.unwrap().unwrap();
        self.state
            .carts
            .add_line(CartLine::new(user.id, product.id, quantity))
            .await
            .unwrap();
    }

    async fn place(&self, email: &str) -> Value {
        let response = self
            .server
            .post("/v1/orders")
            .json(&json!({
                "email": email,
                "shipping_address": "12 Hill Rd",
                "city": "Pune",
                "postal_code": "411001",
                "phone_number": "9999999999",
            }))
            .await;
        response.assert_status_ok();
        response.json::<Value>()
    }
}

#[tokio::test]
async fn place_order_happy_path() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 20).await;
    api.seed_cart("meera@example.com", &soap, 4).await;

    let body = api.place("meera@example.com").await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total_amount"], "14.00");
    assert!(body["order_number"].as_str().unwrap().starts_with("ORD"));
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let stored = api.state.catalog.get(&soap.id).await.unwrap().unwrap();
    assert_eq!(stored.stock, 16);
}

#[tokio::test]
async fn empty_cart_maps_to_400() {
    let api = api().await;
    let response = api
        .server
        .post("/v1/orders")
        .json(&json!({
            "email": "meera@example.com",
            "shipping_address": "12 Hill Rd",
            "city": "Pune",
            "postal_code": "411001",
            "phone_number": "9999999999",
        }))
        .await;
    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["code"], "INVALID_STATE");
}

#[tokio::test]
async fn unknown_user_maps_to_404() {
    let api = api().await;
    let response = api
        .server
        .post("/v1/orders")
        .json(&json!({
            "email": "ghost@example.com",
            "shipping_address": "12 Hill Rd",
            "city": "Pune",
            "postal_code": "411001",
            "phone_number": "9999999999",
        }))
        .await;
    response.assert_status_not_found();
    assert_eq!(response.json::<Value>()["code"], "NOT_FOUND");
}

#[tokio::test]
async fn insufficient_stock_maps_to_400_with_details() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 2).await;
    api.seed_cart("meera@example.com", &soap, 5).await;

    let response = api
        .server
        .post("/v1/orders")
        .json(&json!({
            "email": "meera@example.com",
            "shipping_address": "12 Hill Rd",
            "city": "Pune",
            "postal_code": "411001",
            "phone_number": "9999999999",
        }))
        .await;
    response.assert_status_bad_request();
    let body = response.json::<Value>();
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["details"]["availableStock"], 2);
}

#[tokio::test]
async fn cancel_and_refetch() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 20).await;
    api.seed_cart("meera@example.com", &soap, 4).await;
    let placed = api.place("meera@example.com").await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let response = api
        .server
        .post(&format!("/v1/orders/{}/cancel", order_id))
        .json(&json!({
            "email": "meera@example.com",
            "cancellation_reason": "ordered twice",
        }))
        .await;
    response.assert_status_ok();
    let body = response.json::<Value>();
    assert_eq!(body["refund_guidance"], "No refund required");

    // Second cancel is rejected
    let again = api
        .server
        .post(&format!("/v1/orders/{}/cancel", order_id))
        .json(&json!({
            "email": "meera@example.com",
            "cancellation_reason": "still twice",
        }))
        .await;
    again.assert_status_bad_request();

    // Details reflect the cancellation
    let details = api.server.get(&format!("/v1/orders/{}", order_id)).await;
    details.assert_status_ok();
    let details = details.json::<Value>();
    assert_eq!(details["order"]["status"], "Cancelled");
    assert_eq!(details["order"]["is_cancelled"], true);
}

#[tokio::test]
async fn cancel_by_non_owner_maps_to_403() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 20).await;
    api.seed_cart("meera@example.com", &soap, 1).await;
    let placed = api.place("meera@example.com").await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let response = api
        .server
        .post(&format!("/v1/orders/{}/cancel", order_id))
        .json(&json!({
            "email": "ops@example.com",
            "cancellation_reason": "not mine",
        }))
        .await;
    response.assert_status_forbidden();
    assert_eq!(response.json::<Value>()["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn status_update_requires_admin() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 20).await;
    api.seed_cart("meera@example.com", &soap, 1).await;
    let placed = api.place("meera@example.com").await;
    let order_id = placed["order_id"].as_str().unwrap().to_string();

    let forbidden = api
        .server
        .put(&format!("/v1/orders/{}/status", order_id))
        .json(&json!({ "email": "meera@example.com", "status": "Shipped" }))
        .await;
    forbidden.assert_status_forbidden();

    let ok = api
        .server
        .put(&format!("/v1/orders/{}/status", order_id))
        .json(&json!({ "email": "ops@example.com", "status": "Shipped" }))
        .await;
    ok.assert_status_ok();

    let details = api.server.get(&format!("/v1/orders/{}", order_id)).await;
    assert_eq!(details.json::<Value>()["order"]["status"], "Shipped");
}

#[tokio::test]
async fn cart_add_view_and_clear() {
    let api = api().await;
    let soap = api.seed_product("Soap", dec!(3.50), 10).await;

    let add = api
        .server
        .post("/v1/cart")
        .json(&json!({
            "email": "meera@example.com",
            "product_id": soap.id,
            "quantity": 2,
        }))
        .await;
    add.assert_status_ok();

    // Repeat add merges quantities
    let merge = api
        .server
        .post("/v1/cart")
        .json(&json!({
            "email": "meera@example.com",
            "product_id": soap.id,
            "quantity": 3,
        }))
        .await;
    merge.assert_status_ok();
    assert_eq!(merge.json::<Value>()["quantity"], 5);

    let view = api
        .server
        .get("/v1/cart")
        .add_query_param("email", "meera@example.com")
        .await;
    view.assert_status_ok();
    let body = view.json::<Value>();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);
    assert_eq!(body["items"][0]["quantity"], 5);

    let clear = api
        .server
        .delete("/v1/cart")
        .add_query_param("email", "meera@example.com")
        .await;
    clear.assert_status_ok();

    let view = api
        .server
        .get("/v1/cart")
        .add_query_param("email", "meera@example.com")
        .await;
    assert!(view.json::<Value>()["items"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn coupon_create_and_apply_via_api() {
    let api = api().await;

    // Non-admin cannot create
    let forbidden = api
        .server
        .post("/v1/coupons")
        .json(&json!({
            "email": "meera@example.com",
            "code": "WELCOME10",
            "discount_type": "Percentage",
            "discount_value": "10",
            "expires_at": (Utc::now() + chrono::Duration::days(7)),
        }))
        .await;
    forbidden.assert_status_forbidden();

    let created = api
        .server
        .post("/v1/coupons")
        .json(&json!({
            "email": "ops@example.com",
            "code": "welcome10",
            "discount_type": "Percentage",
            "discount_value": "10",
            "expires_at": (Utc::now() + chrono::Duration::days(7)),
        }))
        .await;
    created.assert_status_ok();
    assert_eq!(created.json::<Value>()["coupon"]["code"], "WELCOME10");

    let applied = api
        .server
        .post("/v1/coupons/apply")
        .json(&json!({
            "email": "meera@example.com",
            "coupon_code": "WELCOME10",
            "order_amount": "250.00",
        }))
        .await;
    applied.assert_status_ok();
    let body = applied.json::<Value>();
    assert_eq!(body["discount_amount"], "25.00");
    assert_eq!(body["final_amount"], "225.00");

    let unknown = api
        .server
        .post("/v1/coupons/apply")
        .json(&json!({
            "email": "meera@example.com",
            "coupon_code": "NOPE",
            "order_amount": "250.00",
        }))
        .await;
    unknown.assert_status_not_found();
}
