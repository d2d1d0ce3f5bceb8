//! Catalog products.

use common::Sku;
use serde::{Deserialize, Serialize};

use crate::error::{DomainError, Result};
use crate::money::Money;

/// A product held in the catalog.
///
/// The SKU is fixed at creation. Stock only moves through [`Product::add_stock`]
/// and [`Product::remove_stock`], which keep it non-negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    sku: Sku,
    name: String,
    price: Money,
    stock: u32,
    low_stock_threshold: u32,
}

/// A manual edit to a product. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub price: Option<Money>,
    pub low_stock_threshold: Option<u32>,
}

impl ProductUpdate {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.price.is_none() && self.low_stock_threshold.is_none()
    }
}

impl Product {
    /// Creates a product, validating SKU, name and price.
    pub fn new(
        sku: impl Into<Sku>,
        name: impl Into<String>,
        price: Money,
        stock: u32,
        low_stock_threshold: u32,
    ) -> Result<Self> {
        let sku = sku.into();
        if sku.is_blank() {
            return Err(DomainError::SkuRequired);
        }
        Ok(Self {
            sku,
            name: validate_name(name.into())?,
            price: validate_price(price)?,
            stock,
            low_stock_threshold,
        })
    }

    pub fn sku(&self) -> &Sku {
        &self.sku
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn price(&self) -> Money {
        self.price
    }

    pub fn stock(&self) -> u32 {
        self.stock
    }

    pub fn low_stock_threshold(&self) -> u32 {
        self.low_stock_threshold
    }

    /// Returns true when stock is at or below the threshold.
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.low_stock_threshold
    }

    /// Applies a manual edit. Every field is validated before any is written.
    pub fn apply_update(&mut self, update: &ProductUpdate) -> Result<()> {
        let name = update.name.clone().map(validate_name).transpose()?;
        let price = update.price.map(validate_price).transpose()?;

        if let Some(name) = name {
            self.name = name;
        }
        if let Some(price) = price {
            self.price = price;
        }
        if let Some(threshold) = update.low_stock_threshold {
            self.low_stock_threshold = threshold;
        }
        Ok(())
    }

    /// Checks that `quantity` units could be removed right now.
    pub fn ensure_available(&self, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(self.invalid_quantity(quantity));
        }
        if quantity > self.stock {
            return Err(DomainError::InsufficientStock {
                sku: self.sku.clone(),
                requested: quantity,
                available: self.stock,
            });
        }
        Ok(())
    }

    /// Checks that `quantity` units could be added without overflow.
    pub fn ensure_can_add(&self, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(self.invalid_quantity(quantity));
        }
        if self.stock.checked_add(quantity).is_none() {
            return Err(DomainError::StockOverflow {
                sku: self.sku.clone(),
                stock: self.stock,
                quantity,
            });
        }
        Ok(())
    }

    pub fn add_stock(&mut self, quantity: u32) -> Result<()> {
        self.ensure_can_add(quantity)?;
        self.stock += quantity;
        Ok(())
    }

    pub fn remove_stock(&mut self, quantity: u32) -> Result<()> {
        self.ensure_available(quantity)?;
        self.stock -= quantity;
        Ok(())
    }

    fn invalid_quantity(&self, quantity: u32) -> DomainError {
        DomainError::InvalidQuantity {
            sku: self.sku.clone(),
            quantity,
        }
    }
}

fn validate_name(name: String) -> Result<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::NameRequired);
    }
    Ok(trimmed.to_string())
}

fn validate_price(price: Money) -> Result<Money> {
    if price.is_negative() {
        return Err(DomainError::NegativePrice { price });
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notebook() -> Product {
        Product::new("SKU-100", "Notebook", Money::from_cents(349), 40, 10).unwrap()
    }

    #[test]
    fn test_new_trims_fields() {
        let product = Product::new(" SKU-1 ", "  Pen ", Money::zero(), 0, 0).unwrap();
        assert_eq!(product.sku().as_str(), "SKU-1");
        assert_eq!(product.name(), "Pen");
        assert_eq!(product.price(), Money::zero());
    }

    #[test]
    fn test_new_rejects_invalid_fields() {
        assert_eq!(
            Product::new("  ", "Pen", Money::zero(), 1, 1).unwrap_err(),
            DomainError::SkuRequired
        );
        assert_eq!(
            Product::new("SKU-1", " ", Money::zero(), 1, 1).unwrap_err(),
            DomainError::NameRequired
        );
        assert!(matches!(
            Product::new("SKU-1", "Pen", Money::from_cents(-1), 1, 1).unwrap_err(),
            DomainError::NegativePrice { .. }
        ));
    }

    #[test]
    fn test_low_stock_is_inclusive() {
        let mut product = Product::new("SKU-300", "Backpack", Money::from_cents(2999), 9, 8).unwrap();
        assert!(!product.is_low_stock());
        product.remove_stock(1).unwrap();
        assert!(product.is_low_stock());
    }

    #[test]
    fn test_remove_stock_never_goes_negative() {
        let mut product = notebook();
        let err = product.remove_stock(41).unwrap_err();
        assert_eq!(
            err,
            DomainError::InsufficientStock {
                sku: Sku::new("SKU-100"),
                requested: 41,
                available: 40,
            }
        );
        assert_eq!(product.stock(), 40);

        product.remove_stock(40).unwrap();
        assert_eq!(product.stock(), 0);
    }

    #[test]
    fn test_zero_quantity_rejected() {
        let mut product = notebook();
        assert!(matches!(
            product.add_stock(0).unwrap_err(),
            DomainError::InvalidQuantity { quantity: 0, .. }
        ));
        assert!(matches!(
            product.remove_stock(0).unwrap_err(),
            DomainError::InvalidQuantity { quantity: 0, .. }
        ));
    }

    #[test]
    fn test_add_stock_overflow() {
        let mut product = Product::new("SKU-1", "Pen", Money::zero(), u32::MAX - 1, 0).unwrap();
        product.add_stock(1).unwrap();
        assert!(matches!(
            product.add_stock(1).unwrap_err(),
            DomainError::StockOverflow { .. }
        ));
        assert_eq!(product.stock(), u32::MAX);
    }

    #[test]
    fn test_apply_update_is_all_or_nothing() {
        let mut product = notebook();
        let update = ProductUpdate {
            name: Some("Spiral notebook".to_string()),
            price: Some(Money::from_cents(-5)),
            low_stock_threshold: Some(3),
        };
        assert!(product.apply_update(&update).is_err());
        assert_eq!(product, notebook());

        let update = ProductUpdate {
            name: Some(" Spiral notebook ".to_string()),
            price: Some(Money::from_cents(399)),
            low_stock_threshold: None,
        };
        product.apply_update(&update).unwrap();
        assert_eq!(product.name(), "Spiral notebook");
        assert_eq!(product.price().cents(), 399);
        assert_eq!(product.low_stock_threshold(), 10);
        assert_eq!(product.stock(), 40);
    }
}
