//! Domain error types.

use common::{OrderId, Sku};
use serde::Serialize;
use thiserror::Error;

use crate::money::Money;
use crate::order::OrderStatus;

/// Broad class of a [`DomainError`], used by adapters to pick a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// Malformed input local to one call.
    Validation,
    /// A referenced SKU or order does not exist.
    NotFound,
    /// A uniqueness, capacity or ownership constraint was violated.
    Conflict,
    /// The requested order status transition is illegal.
    State,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "validation",
            ErrorKind::NotFound => "not_found",
            ErrorKind::Conflict => "conflict",
            ErrorKind::State => "state",
        }
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors raised by catalog, ledger and order operations.
///
/// Every failing operation leaves state untouched, so each variant is safe
/// to report and retry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// SKU is blank.
    #[error("SKU is required")]
    SkuRequired,

    /// Product name is blank.
    #[error("Product name is required")]
    NameRequired,

    /// Customer username is blank.
    #[error("Customer username is required")]
    UsernameRequired,

    /// An order request carried no lines.
    #[error("Order must contain at least one item")]
    NoItems,

    /// Quantity must be positive.
    #[error("Invalid quantity for {sku}: {quantity} (must be greater than 0)")]
    InvalidQuantity { sku: Sku, quantity: u32 },

    /// Price must not be negative.
    #[error("Invalid price: {price} (must be >= 0)")]
    NegativePrice { price: Money },

    /// A money amount could not be parsed.
    #[error("Invalid amount '{input}': {reason}")]
    InvalidAmount { input: String, reason: &'static str },

    /// A monetary total does not fit the representable range.
    #[error("Amount overflow while totalling {sku}")]
    AmountOverflow { sku: Sku },

    /// Adding stock would exceed the representable range.
    #[error("Stock overflow for {sku}: {stock} + {quantity}")]
    StockOverflow { sku: Sku, stock: u32, quantity: u32 },

    /// Referenced SKU is not in the catalog.
    #[error("SKU not found: {sku}")]
    ProductNotFound { sku: Sku },

    /// Referenced order does not exist.
    #[error("Order not found: {order_id}")]
    OrderNotFound { order_id: OrderId },

    /// A product with this SKU already exists.
    #[error("SKU already exists: {sku}")]
    DuplicateSku { sku: Sku },

    /// Requested more units than are in stock.
    #[error("Not enough stock for {sku}: requested {requested}, have {available}")]
    InsufficientStock {
        sku: Sku,
        requested: u32,
        available: u32,
    },

    /// The order belongs to another customer.
    #[error("Order {order_id} is not your order")]
    NotOrderOwner { order_id: OrderId },

    /// Shipped or delivered orders cannot be cancelled.
    #[error("Cannot cancel order in {status} status")]
    CancelAfterShipment { status: OrderStatus },

    /// Status transition not allowed by the lifecycle.
    #[error("Invalid status transition: {from} -> {to}")]
    InvalidTransition { from: OrderStatus, to: OrderStatus },
}

impl DomainError {
    /// Classifies the error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::SkuRequired
            | DomainError::NameRequired
            | DomainError::UsernameRequired
            | DomainError::NoItems
            | DomainError::InvalidQuantity { .. }
            | DomainError::NegativePrice { .. }
            | DomainError::InvalidAmount { .. }
            | DomainError::AmountOverflow { .. }
            | DomainError::StockOverflow { .. } => ErrorKind::Validation,
            DomainError::ProductNotFound { .. } | DomainError::OrderNotFound { .. } => {
                ErrorKind::NotFound
            }
            DomainError::DuplicateSku { .. }
            | DomainError::InsufficientStock { .. }
            | DomainError::NotOrderOwner { .. }
            | DomainError::CancelAfterShipment { .. } => ErrorKind::Conflict,
            DomainError::InvalidTransition { .. } => ErrorKind::State,
        }
    }

    pub fn product_not_found(sku: impl Into<Sku>) -> Self {
        DomainError::ProductNotFound { sku: sku.into() }
    }
}

/// Convenience type alias for domain results.
pub type Result<T> = std::result::Result<T, DomainError>;
