//! HTTP handlers, grouped by resource.

pub mod admin;
pub mod orders;
pub mod products;
pub mod system;
