//! Customer order endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use common::OrderId;
use domain::{DomainError, Order, OrderRequest, Product};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::auth::{Customer, Principal};
use crate::error::ApiError;
use crate::extract::JsonBody;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct PlaceOrderRequest {
    pub items: Vec<OrderLineRequest>,
}

#[derive(Debug, Deserialize)]
pub struct OrderLineRequest {
    pub sku: String,
    pub quantity: u32,
}

impl PlaceOrderRequest {
    /// Repeated SKUs are summed into one line.
    fn to_order_request(&self) -> OrderRequest {
        self.items
            .iter()
            .map(|line| (line.sku.as_str(), line.quantity))
            .collect()
    }
}

// -- Response types --

#[derive(Serialize)]
pub struct PlacedOrderResponse {
    pub order: Order,
    /// Products at or below their threshold right after this order.
    pub low_stock: Vec<Product>,
}

// -- Handlers --

/// POST /orders: place an order as the calling customer.
#[tracing::instrument(skip(state, customer, body), fields(customer = %customer.0.username))]
pub async fn place(
    customer: Customer,
    State(state): State<Arc<AppState>>,
    JsonBody(body): JsonBody<PlaceOrderRequest>,
) -> Result<(StatusCode, Json<PlacedOrderResponse>), ApiError> {
    let order = state
        .coordinator
        .place_order(&customer.0.username, &body.to_order_request())?;
    let low_stock = state.coordinator.low_stock_products();
    Ok((
        StatusCode::CREATED,
        Json(PlacedOrderResponse { order, low_stock }),
    ))
}

/// GET /orders: the calling customer's orders.
pub async fn list_mine(customer: Customer, State(state): State<Arc<AppState>>) -> Json<Vec<Order>> {
    Json(state.coordinator.list_orders_for_user(&customer.0.username))
}

/// GET /orders/{id}: admins see any order, customers only their own.
pub async fn get(
    caller: Principal,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ApiError> {
    let order_id = OrderId::new(id);
    let order = if caller.is_admin() {
        state
            .coordinator
            .find_order(order_id)
            .ok_or(DomainError::OrderNotFound { order_id })?
    } else {
        state
            .coordinator
            .find_order_for_customer(&caller.username, order_id)?
    };
    Ok(Json(order))
}

/// POST /orders/{id}/cancel
#[tracing::instrument(skip(state, customer), fields(customer = %customer.0.username))]
pub async fn cancel(
    customer: Customer,
    State(state): State<Arc<AppState>>,
    Path(id): Path<u64>,
) -> Result<Json<Order>, ApiError> {
    let order = state
        .coordinator
        .cancel_order_as_customer(&customer.0.username, OrderId::new(id))?;
    Ok(Json(order))
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Sku;

    #[test]
    fn test_repeated_lines_are_summed() {
        let req: PlaceOrderRequest = serde_json::from_value(serde_json::json!({
            "items": [
                { "sku": "SKU-100", "quantity": 2 },
                { "sku": "SKU-200", "quantity": 1 },
                { "sku": "SKU-100", "quantity": 3 },
            ]
        }))
        .unwrap();

        let request = req.to_order_request();
        assert_eq!(request.len(), 2);
        assert_eq!(request.quantity_of(&Sku::new("SKU-100")), Some(5));
    }
}
