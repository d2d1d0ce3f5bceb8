//! Administrator order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use common::OrderId;
use domain::{Order, OrderStatus};
use serde::Deserialize;

use crate::AppState;
use crate::auth::Admin;
use crate::error::ApiError;
use crate::extract::JsonBody;

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// Status name, case-insensitive (`"PAID"`, `"shipped"`).
    pub status: String,
}

/// GET /admin/orders: every order, ascending by id.
pub async fn list_all(_admin: Admin, State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    Json(state.coordinator.list_all_orders())
}

/// POST /admin/orders/{id}/status
#[tracing::instrument(skip(state, _admin))]
pub async fn update_status(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
    JsonBody(req): JsonBody<StatusUpdateRequest>,
) -> Result<Json<Order>, ApiError> {
    let status: OrderStatus = req.status.parse()?;
    let order = state
        .coordinator
        .update_order_status_as_admin(OrderId::new(id), status)?;
    Ok(Json(order))
}
