//! Facade composing the catalog, the ledger and the order lifecycle.

use std::collections::BTreeSet;
use std::time::Instant;

use common::{OrderId, Sku};
use domain::{
    DomainError, Money, NewOrder, Order, OrderItem, OrderRequest, OrderStatus, Product,
    ProductUpdate, Result, lifecycle,
};
use store::{Catalog, Ledger};

/// Owns the catalog and the ledger and runs the compound operations that
/// must keep stock and order state in step.
///
/// Every operation either applies all of its effects or none of them. Stock
/// checks and stock changes for one operation happen under a single
/// acquisition of the affected SKU locks, so concurrent callers cannot
/// oversell. Lock order is: order, then catalog SKUs ascending, then the
/// ledger index.
#[derive(Debug, Default)]
pub struct OrderCoordinator {
    catalog: Catalog,
    ledger: Ledger,
}

impl OrderCoordinator {
    /// Creates a coordinator with an empty catalog and ledger.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }
}

// Catalog operations
impl OrderCoordinator {
    pub fn list_products(&self) -> Vec<Product> {
        self.catalog.list()
    }

    pub fn find_product(&self, sku: &str) -> Option<Product> {
        self.catalog.find(sku)
    }

    pub fn low_stock_products(&self) -> Vec<Product> {
        self.catalog.low_stock_list()
    }

    /// Adds a new product to the catalog.
    #[tracing::instrument(skip(self))]
    pub fn add_product(
        &self,
        sku: &str,
        name: &str,
        price: Money,
        initial_stock: u32,
        low_stock_threshold: u32,
    ) -> Result<Product> {
        let product = Product::new(sku, name, price, initial_stock, low_stock_threshold)?;
        let product = self.catalog.add(product)?;
        tracing::info!(sku = %product.sku(), stock = product.stock(), "product added");
        Ok(product)
    }

    /// Removes a product. Existing orders keep their item snapshots.
    #[tracing::instrument(skip(self))]
    pub fn remove_product(&self, sku: &str) -> Result<()> {
        let removed = self.catalog.remove(sku)?;
        tracing::info!(sku = %removed.sku(), "product removed");
        Ok(())
    }

    /// Adds `quantity` units to a product's stock.
    #[tracing::instrument(skip(self))]
    pub fn restock(&self, sku: &str, quantity: u32) -> Result<Product> {
        let product = self.catalog.increment_stock(sku, quantity)?;
        metrics::counter!("units_restocked_total").increment(u64::from(quantity));
        tracing::info!(sku = %product.sku(), stock = product.stock(), "product restocked");
        Ok(product)
    }

    /// Edits a product's name, price or low-stock threshold.
    #[tracing::instrument(skip(self))]
    pub fn update_product(&self, sku: &str, update: &ProductUpdate) -> Result<Product> {
        let product = self.catalog.update(sku, update)?;
        tracing::info!(sku = %product.sku(), "product updated");
        Ok(product)
    }
}

// Order operations
impl OrderCoordinator {
    pub fn find_order(&self, order_id: OrderId) -> Option<Order> {
        self.ledger.find(order_id)
    }

    /// Looks up an order on behalf of a customer, who may only see their own.
    pub fn find_order_for_customer(&self, username: &str, order_id: OrderId) -> Result<Order> {
        let order = self
            .ledger
            .find(order_id)
            .ok_or(DomainError::OrderNotFound { order_id })?;
        if !order.is_owned_by(username) {
            return Err(DomainError::NotOrderOwner { order_id });
        }
        Ok(order)
    }

    pub fn list_orders_for_user(&self, username: &str) -> Vec<Order> {
        self.ledger.list_for_customer(username)
    }

    pub fn list_all_orders(&self) -> Vec<Order> {
        self.ledger.list()
    }

    /// Places an order, reserving stock for every line.
    ///
    /// All lines are validated against current stock before any stock moves;
    /// a single failing line rejects the whole order with nothing changed.
    /// Item names and prices are captured at this instant.
    #[tracing::instrument(skip(self, request), fields(lines = request.len()))]
    pub fn place_order(&self, username: &str, request: &OrderRequest) -> Result<Order> {
        let started = Instant::now();
        let result = self.try_place_order(username, request);

        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                metrics::histogram!("place_order_duration_seconds")
                    .record(started.elapsed().as_secs_f64());
                tracing::info!(
                    order_id = %order.id(),
                    customer = order.customer_username(),
                    total = %order.total(),
                    "order placed"
                );
            }
            Err(e) => {
                metrics::counter!("orders_rejected_total", "reason" => e.kind().as_str())
                    .increment(1);
                tracing::info!(error = %e, "order rejected");
            }
        }

        result
    }

    fn try_place_order(&self, username: &str, request: &OrderRequest) -> Result<Order> {
        if username.trim().is_empty() {
            return Err(DomainError::UsernameRequired);
        }
        if request.is_empty() {
            return Err(DomainError::NoItems);
        }
        for (sku, quantity) in request.lines() {
            if sku.is_blank() {
                return Err(DomainError::SkuRequired);
            }
            if quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    sku: sku.clone(),
                    quantity,
                });
            }
        }

        let skus = request.skus();
        self.catalog.with_locked(&skus, |locked| {
            // Validate every line before touching stock.
            let mut items = Vec::with_capacity(request.len());
            for (sku, quantity) in request.lines() {
                let product = locked
                    .get(sku)
                    .ok_or_else(|| DomainError::product_not_found(sku.clone()))?;
                product.ensure_available(quantity)?;
                items.push(OrderItem::snapshot(product, quantity)?);
            }
            let draft = NewOrder::new(username, items)?;

            // Cannot fail: every line was checked under the same locks.
            for item in draft.items() {
                locked.decrement_stock(item.sku(), item.quantity())?;
            }

            Ok(self.ledger.record(draft))
        })
    }

    /// Cancels a customer's own order while it is placed or paid, returning
    /// its stock.
    #[tracing::instrument(skip(self))]
    pub fn cancel_order_as_customer(&self, username: &str, order_id: OrderId) -> Result<Order> {
        let order = self
            .ledger
            .with_order(order_id, |order| {
                if !order.is_owned_by(username) {
                    return Err(DomainError::NotOrderOwner { order_id });
                }
                lifecycle::authorize_customer_cancel(order.status())?;
                self.restock_items(order)?;
                order.transition_to(OrderStatus::Cancelled)?;
                Ok(order.clone())
            })
            .inspect_err(|e| tracing::info!(error = %e, "customer cancellation rejected"))?;

        metrics::counter!("orders_cancelled_total", "actor" => "customer").increment(1);
        metrics::counter!("order_status_transitions_total", "to" => OrderStatus::Cancelled.as_str())
            .increment(1);
        tracing::info!(%order_id, "order cancelled by customer");
        Ok(order)
    }

    /// Moves an order to `new_status` on behalf of an administrator.
    ///
    /// Cancelling returns the order's stock, and is refused once the order
    /// has shipped. Every other move follows the lifecycle table.
    #[tracing::instrument(skip(self))]
    pub fn update_order_status_as_admin(
        &self,
        order_id: OrderId,
        new_status: OrderStatus,
    ) -> Result<Order> {
        let (previous, order) = self
            .ledger
            .with_order(order_id, |order| {
                let previous = order.status();
                lifecycle::authorize_admin(previous, new_status)?;
                if new_status == OrderStatus::Cancelled {
                    self.restock_items(order)?;
                }
                order.transition_to(new_status)?;
                Ok((previous, order.clone()))
            })
            .inspect_err(|e| tracing::info!(error = %e, "status update rejected"))?;

        if new_status == OrderStatus::Cancelled {
            metrics::counter!("orders_cancelled_total", "actor" => "admin").increment(1);
        }
        metrics::counter!("order_status_transitions_total", "to" => new_status.as_str())
            .increment(1);
        tracing::info!(%order_id, from = %previous, to = %new_status, "order status updated");
        Ok(order)
    }

    /// Returns every item's quantity to stock.
    ///
    /// SKUs removed from the catalog since the order was placed are skipped.
    fn restock_items(&self, order: &Order) -> Result<()> {
        let skus: BTreeSet<&Sku> = order.items().iter().map(OrderItem::sku).collect();

        self.catalog.with_locked(skus, |locked| {
            for item in order.items() {
                if let Some(product) = locked.get(item.sku()) {
                    product.ensure_can_add(item.quantity())?;
                }
            }

            let mut units = 0u64;
            for item in order.items() {
                if locked.contains(item.sku()) {
                    locked.increment_stock(item.sku(), item.quantity())?;
                    units += u64::from(item.quantity());
                } else {
                    tracing::warn!(
                        order_id = %order.id(),
                        sku = %item.sku(),
                        quantity = item.quantity(),
                        "product no longer in catalog, skipping restock"
                    );
                }
            }
            metrics::counter!("units_restocked_total").increment(units);
            Ok(())
        })
    }
}
