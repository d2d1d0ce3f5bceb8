//! Orders, their items and the status lifecycle.

mod aggregate;
pub mod lifecycle;
mod state;
mod value_objects;

pub use aggregate::{NewOrder, Order};
pub use state::{OrderStatus, UnknownStatus};
pub use value_objects::{OrderItem, OrderRequest};
