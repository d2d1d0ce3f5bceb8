//! Identifiers shared by every layer of the inventory and order system.

mod types;

pub use types::{OrderId, Sku};
