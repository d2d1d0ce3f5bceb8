//! Order coordination over the shared catalog and ledger.
//!
//! [`OrderCoordinator`] is the single entry point for operations that touch
//! stock and orders together:
//! 1. Place an order, reserving stock for every line or none
//! 2. Cancel an order as its customer, returning stock
//! 3. Move an order through its lifecycle as an administrator
//!
//! Each operation completes fully or leaves the system unchanged.

pub mod coordinator;

pub use coordinator::OrderCoordinator;
