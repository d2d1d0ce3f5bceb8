//! Demo data loaded on startup.

use coordinator::OrderCoordinator;
use domain::Money;

use crate::auth::{InMemoryAccessControl, Role};

/// (sku, name, price in cents, stock, low-stock threshold)
const DEMO_PRODUCTS: [(&str, &str, i64, u32, u32); 3] = [
    ("SKU-100", "Notebook", 349, 40, 10),
    ("SKU-200", "Pen", 125, 75, 15),
    ("SKU-300", "Backpack", 2999, 8, 8),
];

/// Adds the demo products to the catalog.
pub fn seed_catalog(coordinator: &OrderCoordinator) -> domain::Result<()> {
    for (sku, name, cents, stock, threshold) in DEMO_PRODUCTS {
        coordinator.add_product(sku, name, Money::from_cents(cents), stock, threshold)?;
    }
    tracing::info!(products = DEMO_PRODUCTS.len(), "demo catalog seeded");
    Ok(())
}

/// The demo administrator and customer.
pub fn demo_access_control() -> InMemoryAccessControl {
    InMemoryAccessControl::new()
        .with_user("admin", "admin123", Role::Admin)
        .with_user("Omkar", "user123", Role::User)
}
