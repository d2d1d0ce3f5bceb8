//! Value objects for the order domain.

use std::collections::BTreeSet;

use common::Sku;
use serde::Serialize;

use crate::error::{DomainError, Result};
use crate::money::Money;
use crate::product::Product;

/// An item in an order.
///
/// Name and unit price are copied from the product when the order is placed,
/// so later catalog edits never change an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderItem {
    sku: Sku,
    name: String,
    unit_price: Money,
    quantity: u32,
}

impl OrderItem {
    /// Creates a new order item.
    pub fn new(
        sku: impl Into<Sku>,
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Self> {
        let sku = sku.into();
        if sku.is_blank() {
            return Err(DomainError::SkuRequired);
        }
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::NameRequired);
        }
        if unit_price.is_negative() {
            return Err(DomainError::NegativePrice { price: unit_price });
        }
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { sku, quantity });
        }
        if unit_price.checked_multiply(quantity).is_none() {
            return Err(DomainError::AmountOverflow { sku });
        }
        Ok(Self {
            sku,
            name,
            unit_price,
            quantity,
        })
    }

    /// Captures the product's current name and price.
    pub fn snapshot(product: &Product, quantity: u32) -> Result<Self> {
        Self::new(
            product.sku().clone(),
            product.name(),
            product.price(),
            quantity,
        )
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns the total price for this item (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        // Checked at construction.
        Money::from_cents(self.unit_price.cents() * i64::from(self.quantity))
    }
}

/// Requested quantities keyed by SKU.
///
/// Adding a SKU that is already present sums the quantities, so the request
/// always holds one line per SKU. Lines keep the order in which each SKU was
/// first added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderRequest {
    lines: Vec<(Sku, u32)>,
}

impl OrderRequest {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `quantity` of `sku`, merging with an existing line.
    ///
    /// The sum saturates at `u32::MAX`, which no stock level can satisfy.
    pub fn add(&mut self, sku: impl Into<Sku>, quantity: u32) -> &mut Self {
        let sku = sku.into();
        match self.lines.iter_mut().find(|(existing, _)| *existing == sku) {
            Some((_, current)) => *current = current.saturating_add(quantity),
            None => self.lines.push((sku, quantity)),
        }
        self
    }

    /// Builder-style [`OrderRequest::add`].
    pub fn with(mut self, sku: impl Into<Sku>, quantity: u32) -> Self {
        self.add(sku, quantity);
        self
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Sku, u32)> {
        self.lines.iter().map(|(sku, qty)| (sku, *qty))
    }

    pub fn quantity_of(&self, sku: &Sku) -> Option<u32> {
        self.lines
            .iter()
            .find(|(existing, _)| existing == sku)
            .map(|(_, qty)| *qty)
    }

    /// Distinct SKUs in ascending order.
    pub fn skus(&self) -> BTreeSet<Sku> {
        self.lines.iter().map(|(sku, _)| sku.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl<S: Into<Sku>> FromIterator<(S, u32)> for OrderRequest {
    fn from_iter<I: IntoIterator<Item = (S, u32)>>(iter: I) -> Self {
        let mut request = OrderRequest::new();
        request.extend(iter);
        request
    }
}

impl<S: Into<Sku>> Extend<(S, u32)> for OrderRequest {
    fn extend<I: IntoIterator<Item = (S, u32)>>(&mut self, iter: I) {
        for (sku, quantity) in iter {
            self.add(sku, quantity);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_total() {
        let item = OrderItem::new("SKU-100", "Notebook", Money::from_cents(349), 5).unwrap();
        assert_eq!(item.line_total().to_string(), "17.45");
    }

    #[test]
    fn test_item_rejects_zero_quantity() {
        let err = OrderItem::new("SKU-100", "Notebook", Money::from_cents(349), 0).unwrap_err();
        assert!(matches!(err, DomainError::InvalidQuantity { quantity: 0, .. }));
    }

    #[test]
    fn test_item_rejects_overflowing_total() {
        let err = OrderItem::new("SKU-1", "Gold", Money::from_cents(i64::MAX), 2).unwrap_err();
        assert!(matches!(err, DomainError::AmountOverflow { .. }));
    }

    #[test]
    fn test_snapshot_is_decoupled_from_product() {
        let mut product =
            Product::new("SKU-100", "Notebook", Money::from_cents(349), 40, 10).unwrap();
        let item = OrderItem::snapshot(&product, 2).unwrap();

        product
            .apply_update(&crate::product::ProductUpdate {
                name: Some("Renamed".to_string()),
                price: Some(Money::from_cents(999)),
                low_stock_threshold: None,
            })
            .unwrap();

        assert_eq!(item.name(), "Notebook");
        assert_eq!(item.unit_price().cents(), 349);
    }

    #[test]
    fn test_request_sums_duplicate_skus() {
        let request: OrderRequest = [("SKU-200", 2), ("SKU-100", 1), (" SKU-200 ", 3)]
            .into_iter()
            .collect();

        assert_eq!(request.len(), 2);
        assert_eq!(request.quantity_of(&Sku::new("SKU-200")), Some(5));
        let order: Vec<_> = request.lines().map(|(sku, _)| sku.as_str()).collect();
        assert_eq!(order, ["SKU-200", "SKU-100"]);
    }

    #[test]
    fn test_request_skus_are_sorted() {
        let request = OrderRequest::new().with("B", 1).with("C", 1).with("A", 1);
        let skus: Vec<_> = request.skus().into_iter().map(|s| s.to_string()).collect();
        assert_eq!(skus, ["A", "B", "C"]);
    }

    #[test]
    fn test_request_sum_saturates() {
        let request = OrderRequest::new().with("A", u32::MAX).with("A", 10);
        assert_eq!(request.quantity_of(&Sku::new("A")), Some(u32::MAX));
    }
}
