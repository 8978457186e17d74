//! API Routes
//!
//! Configures the Axum router with all catalog endpoints.

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    create_product_handler, delete_product_handler, filters_handler, get_product_handler,
    health_handler, list_products_handler, stats_handler, update_product_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/products` - Paginated, filtered listing
/// - `POST /api/products` - Create a product
/// - `PUT /api/products` - Update a product
/// - `GET /api/products/filters` - Distinct brands and types
/// - `GET /api/products/:id` - Single product
/// - `DELETE /api/products/:id` - Delete a product
/// - `GET /stats` - Cache statistics
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: Allows any origin (configurable for production)
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    // Configure CORS middleware
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route(
            "/api/products",
            get(list_products_handler)
                .post(create_product_handler)
                .put(update_product_handler),
        )
        .route("/api/products/filters", get(filters_handler))
        .route(
            "/api/products/:id",
            get(get_product_handler).delete(delete_product_handler),
        )
        .route("/stats", get(stats_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
