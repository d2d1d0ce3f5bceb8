//! Order ledger.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, RwLock};

use chrono::Utc;
use common::OrderId;
use domain::{DomainError, NewOrder, Order, Result};

use crate::sync::{lock, read, write};

/// The id given to the first order recorded in a fresh ledger.
pub const FIRST_ORDER_ID: u64 = 1000;

/// The set of orders keyed by id.
///
/// Ids come from a single atomic counter. The index lock is only held long
/// enough to find or insert an entry, never while waiting on another lock;
/// each order has its own mutex for status changes.
#[derive(Debug)]
pub struct Ledger {
    orders: RwLock<BTreeMap<OrderId, Arc<Mutex<Order>>>>,
    next_id: AtomicU64,
}

impl Ledger {
    /// Creates an empty ledger whose first order id is [`FIRST_ORDER_ID`].
    pub fn new() -> Self {
        Self::starting_at(FIRST_ORDER_ID)
    }

    /// Creates an empty ledger whose first order id is `first_id`.
    pub fn starting_at(first_id: u64) -> Self {
        Self {
            orders: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(first_id),
        }
    }

    /// Assigns the next id and stores the order with status placed.
    pub fn record(&self, draft: NewOrder) -> Order {
        let id = OrderId::new(self.next_id.fetch_add(1, Ordering::Relaxed));
        let order = draft.into_order(id, Utc::now());
        write(&self.orders).insert(id, Arc::new(Mutex::new(order.clone())));
        tracing::debug!(order_id = %id, customer = order.customer_username(), "order recorded");
        order
    }

    pub fn find(&self, id: OrderId) -> Option<Order> {
        let entry = read(&self.orders).get(&id).cloned()?;
        let order = lock(&entry).clone();
        Some(order)
    }

    /// Every order, ascending by id.
    pub fn list(&self) -> Vec<Order> {
        let entries: Vec<_> = read(&self.orders).values().cloned().collect();
        entries.iter().map(|entry| lock(entry).clone()).collect()
    }

    /// Orders placed by `username`, ascending by id.
    pub fn list_for_customer(&self, username: &str) -> Vec<Order> {
        self.list()
            .into_iter()
            .filter(|order| order.is_owned_by(username))
            .collect()
    }

    /// Runs `f` against an order while holding that order's lock.
    ///
    /// `f` works on a copy that replaces the stored order only if `f`
    /// succeeds, so a failed operation never leaves a partial change.
    pub fn with_order<T>(
        &self,
        id: OrderId,
        f: impl FnOnce(&mut Order) -> Result<T>,
    ) -> Result<T> {
        let entry = read(&self.orders)
            .get(&id)
            .cloned()
            .ok_or(DomainError::OrderNotFound { order_id: id })?;

        let mut stored = lock(&entry);
        let mut working = stored.clone();
        let output = f(&mut working)?;
        *stored = working;
        Ok(output)
    }

    pub fn len(&self) -> usize {
        read(&self.orders).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{Money, OrderItem, OrderStatus};

    fn draft(customer: &str) -> NewOrder {
        let items = vec![OrderItem::new("SKU-100", "Notebook", Money::from_cents(349), 1).unwrap()];
        NewOrder::new(customer, items).unwrap()
    }

    #[test]
    fn test_ids_start_at_1000_and_increase() {
        let ledger = Ledger::new();
        let first = ledger.record(draft("Omkar"));
        let second = ledger.record(draft("Omkar"));
        assert_eq!(first.id(), OrderId::new(1000));
        assert_eq!(second.id(), OrderId::new(1001));
        assert_eq!(first.status(), OrderStatus::Placed);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_find_and_list() {
        let ledger = Ledger::starting_at(1);
        let a = ledger.record(draft("alice"));
        let b = ledger.record(draft("bob"));
        let c = ledger.record(draft("alice"));

        assert_eq!(ledger.find(b.id()).unwrap(), b);
        assert!(ledger.find(OrderId::new(99)).is_none());

        let ids: Vec<_> = ledger.list().iter().map(Order::id).collect();
        assert_eq!(ids, [a.id(), b.id(), c.id()]);

        let alice: Vec<_> = ledger.list_for_customer("alice").iter().map(Order::id).collect();
        assert_eq!(alice, [a.id(), c.id()]);
        assert!(ledger.list_for_customer("carol").is_empty());
    }

    #[test]
    fn test_with_order_commits_on_success() {
        let ledger = Ledger::new();
        let order = ledger.record(draft("Omkar"));

        ledger
            .with_order(order.id(), |o| o.transition_to(OrderStatus::Paid))
            .unwrap();
        assert_eq!(ledger.find(order.id()).unwrap().status(), OrderStatus::Paid);
    }

    #[test]
    fn test_with_order_discards_on_failure() {
        let ledger = Ledger::new();
        let order = ledger.record(draft("Omkar"));

        let err = ledger
            .with_order(order.id(), |o| {
                o.transition_to(OrderStatus::Paid)?;
                o.transition_to(OrderStatus::Delivered)
            })
            .unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(ledger.find(order.id()).unwrap().status(), OrderStatus::Placed);
    }

    #[test]
    fn test_with_order_missing() {
        let ledger = Ledger::new();
        let err = ledger.with_order(OrderId::new(5), |_| Ok(())).unwrap_err();
        assert_eq!(
            err,
            DomainError::OrderNotFound {
                order_id: OrderId::new(5)
            }
        );
    }
}
