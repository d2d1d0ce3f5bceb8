//! HTTP adapter for the inventory and order system.
//!
//! Provides REST endpoints for the catalog, customer orders and
//! administrator order management, with header-based access control,
//! structured logging (tracing) and Prometheus metrics.

pub mod auth;
pub mod config;
pub mod error;
pub mod extract;
pub mod routes;
pub mod seed;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use coordinator::OrderCoordinator;
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use auth::AccessControl;
use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState {
    pub coordinator: OrderCoordinator,
    pub access_control: Box<dyn AccessControl>,
}

impl AppState {
    pub fn new(coordinator: OrderCoordinator, access_control: impl AccessControl + 'static) -> Self {
        Self {
            coordinator,
            access_control: Box::new(access_control),
        }
    }
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    use routes::{admin, orders, products, system};

    let metrics_router = Router::new()
        .route("/metrics", get(system::metrics))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(system::health))
        .route("/products", get(products::list).post(products::create))
        .route("/products/low-stock", get(products::low_stock))
        .route(
            "/products/{sku}",
            get(products::get)
                .patch(products::update)
                .delete(products::remove),
        )
        .route("/products/{sku}/restock", post(products::restock))
        .route("/orders", get(orders::list_mine).post(orders::place))
        .route("/orders/{id}", get(orders::get))
        .route("/orders/{id}/cancel", post(orders::cancel))
        .route("/admin/orders", get(admin::list_all))
        .route("/admin/orders/{id}/status", post(admin::update_status))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the application state with the demo users, seeding the demo
/// catalog when the configuration asks for it.
pub fn create_default_state(config: &Config) -> domain::Result<Arc<AppState>> {
    let coordinator = OrderCoordinator::new();
    if config.seed_demo_data {
        seed::seed_catalog(&coordinator)?;
    }
    Ok(Arc::new(AppState::new(
        coordinator,
        seed::demo_access_control(),
    )))
}
