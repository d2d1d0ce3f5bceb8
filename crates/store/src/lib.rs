//! In-memory repositories shared by concurrent callers.
//!
//! - [`Catalog`] owns products keyed by SKU and serializes stock changes
//!   per SKU, locking multi-SKU sets in ascending order
//! - [`Ledger`] owns orders keyed by sequentially assigned ids

pub mod catalog;
pub mod ledger;
mod sync;

pub use catalog::{Catalog, LockedProducts};
pub use ledger::{FIRST_ORDER_ID, Ledger};
