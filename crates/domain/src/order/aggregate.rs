//! Order aggregate implementation.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::Serialize;

use super::{OrderItem, OrderStatus, lifecycle};
use crate::error::{DomainError, Result};
use crate::money::Money;

/// A validated order that has not been assigned an id yet.
///
/// Building one performs every check an [`Order`] needs, so turning it into
/// an order cannot fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOrder {
    customer_username: String,
    items: Vec<OrderItem>,
    total: Money,
}

impl NewOrder {
    pub fn new(customer_username: &str, items: Vec<OrderItem>) -> Result<Self> {
        let customer_username = customer_username.trim();
        if customer_username.is_empty() {
            return Err(DomainError::UsernameRequired);
        }
        if items.is_empty() {
            return Err(DomainError::NoItems);
        }

        let mut total = Money::zero();
        for item in &items {
            total = total
                .checked_add(item.line_total())
                .ok_or_else(|| DomainError::AmountOverflow {
                    sku: item.sku().clone(),
                })?;
        }

        Ok(Self {
            customer_username: customer_username.to_string(),
            items,
            total,
        })
    }

    pub fn customer_username(&self) -> &str {
        &self.customer_username
    }

    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    pub fn total(&self) -> Money {
        self.total
    }

    /// Assigns identity and creation time. The order starts out placed.
    pub fn into_order(self, id: OrderId, created_at: DateTime<Utc>) -> Order {
        Order {
            id,
            customer_username: self.customer_username,
            created_at,
            status: OrderStatus::Placed,
            items: self.items,
            total: self.total,
        }
    }
}

/// Order aggregate root.
///
/// Items, customer and creation time never change after placement. The
/// status only moves through [`Order::transition_to`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Order {
    id: OrderId,
    customer_username: String,
    created_at: DateTime<Utc>,
    status: OrderStatus,
    items: Vec<OrderItem>,
    total: Money,
}

// Query methods
impl Order {
    pub fn id(&self) -> OrderId {
        self.id
    }

    pub fn customer_username(&self) -> &str {
        &self.customer_username
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the current status.
    pub fn status(&self) -> OrderStatus {
        self.status
    }

    /// Returns all items in placement order.
    pub fn items(&self) -> &[OrderItem] {
        &self.items
    }

    /// Sum of the line totals captured at placement.
    pub fn total(&self) -> Money {
        self.total
    }

    pub fn is_owned_by(&self, username: &str) -> bool {
        self.customer_username == username.trim()
    }

    /// Returns true if the order is in a terminal state.
    pub fn is_terminal(&self) -> bool {
        self.status.is_terminal()
    }
}

// Command methods
impl Order {
    /// Moves to `next` if the lifecycle allows it, returning the previous status.
    pub fn transition_to(&mut self, next: OrderStatus) -> Result<OrderStatus> {
        lifecycle::authorize(self.status, next)?;
        let previous = self.status;
        self.status = next;
        Ok(previous)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn items() -> Vec<OrderItem> {
        vec![
            OrderItem::new("SKU-100", "Notebook", Money::from_cents(349), 5).unwrap(),
            OrderItem::new("SKU-200", "Pen", Money::from_cents(125), 2).unwrap(),
        ]
    }

    fn placed_order() -> Order {
        NewOrder::new("Omkar", items())
            .unwrap()
            .into_order(OrderId::new(1000), Utc::now())
    }

    #[test]
    fn test_new_order_requires_customer_and_items() {
        assert_eq!(
            NewOrder::new("  ", items()).unwrap_err(),
            DomainError::UsernameRequired
        );
        assert_eq!(
            NewOrder::new("Omkar", vec![]).unwrap_err(),
            DomainError::NoItems
        );
    }

    #[test]
    fn test_total_is_sum_of_line_totals() {
        let order = placed_order();
        assert_eq!(order.total().to_string(), "19.95");
        assert_eq!(order.status(), OrderStatus::Placed);
        assert_eq!(order.items()[1].quantity(), 2);
    }

    #[test]
    fn test_total_overflow_rejected() {
        let huge = Money::from_cents(i64::MAX / 2 + 1);
        let items = vec![
            OrderItem::new("A", "A", huge, 1).unwrap(),
            OrderItem::new("B", "B", huge, 1).unwrap(),
        ];
        assert!(matches!(
            NewOrder::new("u", items).unwrap_err(),
            DomainError::AmountOverflow { .. }
        ));
    }

    #[test]
    fn test_customer_username_is_trimmed() {
        let order = NewOrder::new(" Omkar ", items())
            .unwrap()
            .into_order(OrderId::new(1), Utc::now());
        assert_eq!(order.customer_username(), "Omkar");
        assert!(order.is_owned_by("Omkar"));
        assert!(!order.is_owned_by("admin"));
    }

    #[test]
    fn test_full_lifecycle() {
        let mut order = placed_order();
        for next in [
            OrderStatus::Paid,
            OrderStatus::Packed,
            OrderStatus::Shipped,
            OrderStatus::Delivered,
        ] {
            order.transition_to(next).unwrap();
        }
        assert!(order.is_terminal());
        assert!(order.transition_to(OrderStatus::Cancelled).is_err());
        assert_eq!(order.status(), OrderStatus::Delivered);
    }

    #[test]
    fn test_illegal_transition_leaves_status_unchanged() {
        let mut order = placed_order();
        let err = order.transition_to(OrderStatus::Packed).unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidTransition {
                from: OrderStatus::Placed,
                to: OrderStatus::Packed,
            }
        );
        assert_eq!(order.status(), OrderStatus::Placed);
    }

    #[test]
    fn test_transition_returns_previous_status() {
        let mut order = placed_order();
        assert_eq!(
            order.transition_to(OrderStatus::Paid).unwrap(),
            OrderStatus::Placed
        );
    }
}
