//! Domain layer for the inventory and order system.
//!
//! This crate provides the core domain model:
//! - [`Product`] with non-negative stock and a low-stock threshold
//! - [`Order`] with immutable item snapshots and a status state machine
//! - [`lifecycle`] decision functions over the status transition table
//! - [`Money`] as exact integer cents

pub mod error;
pub mod money;
pub mod order;
pub mod product;

pub use common::{OrderId, Sku};
pub use error::{DomainError, ErrorKind, Result};
pub use money::Money;
pub use order::{
    NewOrder, Order, OrderItem, OrderRequest, OrderStatus, UnknownStatus, lifecycle,
};
pub use product::{Product, ProductUpdate};
