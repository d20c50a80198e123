//! Router assembly for the v1 API

use anyhow::Result;
use axum::Router;
use axum::routing::{get, post, put};
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::server::handlers::{cart, coupons, orders};
use crate::server::state::AppState;

/// Build the full v1 router.
///
/// - `POST /v1/orders` — place an order from the user's cart
/// - `GET /v1/orders?email=` — the user's orders, newest first
/// - `GET /v1/orders/all?email=` — all orders (admin)
/// - `GET /v1/orders/{order_id}` — order details with line snapshots
/// - `POST /v1/orders/{order_id}/cancel` — owner-only cancellation
/// - `PUT /v1/orders/{order_id}/status` — admin status update
/// - `POST /v1/cart`, `GET /v1/cart?email=`, `DELETE /v1/cart?email=`
/// - `PUT /v1/cart/{line_id}`, `DELETE /v1/cart/{line_id}?email=`
/// - `POST /v1/coupons` (admin), `POST /v1/coupons/apply`,
///   `GET /v1/coupons?email=` (admin),
///   `PUT /v1/coupons/{coupon_id}/deactivate` (admin)
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/v1/orders", post(orders::place_order).get(orders::my_orders))
        .route("/v1/orders/all", get(orders::all_orders))
        .route("/v1/orders/{order_id}", get(orders::order_details))
        .route("/v1/orders/{order_id}/cancel", post(orders::cancel_order))
        .route("/v1/orders/{order_id}/status", put(orders::update_status))
        .route(
            "/v1/cart",
            post(cart::add_to_cart)
                .get(cart::view_cart)
                .delete(cart::clear_cart),
        )
        .route(
            "/v1/cart/{line_id}",
            put(cart::update_quantity).delete(cart::remove_line),
        )
        .route(
            "/v1/coupons",
            post(coupons::create_coupon).get(coupons::list_coupons),
        )
        .route("/v1/coupons/apply", post(coupons::apply_coupon))
        .route(
            "/v1/coupons/{coupon_id}/deactivate",
            put(coupons::deactivate_coupon),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve the API with graceful shutdown on SIGTERM / Ctrl+C.
pub async fn serve(state: AppState, addr: &str) -> Result<()> {
    let app = build_router(state);
    let listener = TcpListener::bind(addr).await?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        },
    }
}
