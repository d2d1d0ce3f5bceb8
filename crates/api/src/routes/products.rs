//! Catalog endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{DomainError, Money, Product, ProductUpdate};
use serde::Deserialize;

use crate::AppState;
use crate::auth::{Admin, Principal};
use crate::error::ApiError;
use crate::extract::JsonBody;

// -- Request types --

#[derive(Debug, Deserialize)]
pub struct AddProductRequest {
    pub sku: String,
    pub name: String,
    /// Decimal amount such as `"3.49"`.
    pub price: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub low_stock_threshold: u32,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: u32,
}

// -- Handlers --

/// GET /products
pub async fn list(_caller: Principal, State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.coordinator.list_products())
}

/// GET /products/low-stock
pub async fn low_stock(_admin: Admin, State(state): State<Arc<AppState>>) -> Json<Vec<Product>> {
    Json(state.coordinator.low_stock_products())
}

/// GET /products/{sku}
pub async fn get(
    _caller: Principal,
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
) -> Result<Json<Product>, ApiError> {
    let product = state
        .coordinator
        .find_product(&sku)
        .ok_or_else(|| DomainError::product_not_found(sku.as_str()))?;
    Ok(Json(product))
}

/// POST /products
#[tracing::instrument(skip(state, admin), fields(admin = %admin.0.username))]
pub async fn create(
    admin: Admin,
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<AddProductRequest>,
) -> Result<(StatusCode, Json<Product>), ApiError> {
    let price: Money = req.price.parse()?;
    let product = state.coordinator.add_product(
        &req.sku,
        &req.name,
        price,
        req.stock,
        req.low_stock_threshold,
    )?;
    Ok((StatusCode::CREATED, Json(product)))
}

/// PATCH /products/{sku}
#[tracing::instrument(skip(state, _admin))]
pub async fn update(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
    JsonBody(update): JsonBody<ProductUpdate>,
) -> Result<Json<Product>, ApiError> {
    if update.is_empty() {
        return Err(ApiError::BadRequest(
            "Provide at least one of name, price, low_stock_threshold".to_string(),
        ));
    }
    Ok(Json(state.coordinator.update_product(&sku, &update)?))
}

/// DELETE /products/{sku}
#[tracing::instrument(skip(state, _admin))]
pub async fn remove(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
) -> Result<StatusCode, ApiError> {
    state.coordinator.remove_product(&sku)?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /products/{sku}/restock
#[tracing::instrument(skip(state, _admin))]
pub async fn restock(
    _admin: Admin,
    State(state): State<Arc<AppState>>,
    Path(sku): Path<String>,
    JsonBody(req): JsonBody<RestockRequest>,
) -> Result<Json<Product>, ApiError> {
    Ok(Json(state.coordinator.restock(&sku, req.quantity)?))
}
