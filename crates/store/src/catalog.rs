//! Product catalog with per-SKU locking.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use common::Sku;
use domain::{DomainError, Product, ProductUpdate, Result};

use crate::sync::{lock, read, write};

#[derive(Debug, Default)]
struct CatalogIndex {
    products: HashMap<Sku, Arc<Mutex<Product>>>,
    /// SKUs in insertion order, for listing.
    order: Vec<Sku>,
}

impl CatalogIndex {
    /// Locks the products for `skus` in ascending SKU order.
    ///
    /// Unknown SKUs are left out; callers see them as missing.
    fn lock_sorted<'a, 's>(&'a self, skus: impl IntoIterator<Item = &'s Sku>) -> LockedProducts<'a> {
        let sorted: BTreeSet<&Sku> = skus.into_iter().collect();
        let mut guards = BTreeMap::new();
        for sku in sorted {
            if let Some(product) = self.products.get(sku) {
                guards.insert(sku.clone(), lock(product));
            }
        }
        LockedProducts { guards }
    }
}

/// Exclusive access to a set of products for the duration of one operation.
///
/// Obtained through [`Catalog::with_locked`]. Other operations touching any
/// of these SKUs wait until the closure returns.
pub struct LockedProducts<'a> {
    guards: BTreeMap<Sku, MutexGuard<'a, Product>>,
}

impl LockedProducts<'_> {
    pub fn get(&self, sku: &Sku) -> Option<&Product> {
        self.guards.get(sku).map(|guard| &**guard)
    }

    pub fn contains(&self, sku: &Sku) -> bool {
        self.guards.contains_key(sku)
    }

    pub fn decrement_stock(&mut self, sku: &Sku, quantity: u32) -> Result<()> {
        self.get_mut(sku)?.remove_stock(quantity)
    }

    pub fn increment_stock(&mut self, sku: &Sku, quantity: u32) -> Result<()> {
        self.get_mut(sku)?.add_stock(quantity)
    }

    fn get_mut(&mut self, sku: &Sku) -> Result<&mut Product> {
        self.guards
            .get_mut(sku)
            .map(|guard| &mut **guard)
            .ok_or_else(|| DomainError::product_not_found(sku.clone()))
    }
}

/// The set of products keyed by SKU.
///
/// Adding and removing products takes the index write lock. Stock changes
/// take the index read lock plus the mutex of each affected product, always
/// acquired in ascending SKU order, so operations on disjoint SKUs run in
/// parallel and overlapping ones cannot deadlock.
#[derive(Debug, Default)]
pub struct Catalog {
    index: RwLock<CatalogIndex>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a new product. Fails if the SKU is already present.
    pub fn add(&self, product: Product) -> Result<Product> {
        let mut index = write(&self.index);
        let sku = product.sku().clone();
        if index.products.contains_key(&sku) {
            return Err(DomainError::DuplicateSku { sku });
        }
        index.order.push(sku.clone());
        index
            .products
            .insert(sku.clone(), Arc::new(Mutex::new(product.clone())));
        tracing::debug!(%sku, "product added to catalog");
        Ok(product)
    }

    /// Removes a product, returning its final state.
    pub fn remove(&self, sku: &str) -> Result<Product> {
        let sku = required_sku(sku)?;
        let mut index = write(&self.index);
        let entry = index
            .products
            .remove(&sku)
            .ok_or_else(|| DomainError::product_not_found(sku.clone()))?;
        index.order.retain(|existing| *existing != sku);
        tracing::debug!(%sku, "product removed from catalog");
        let product = lock(&entry).clone();
        Ok(product)
    }

    /// Looks a product up by SKU. Surrounding whitespace is ignored.
    pub fn find(&self, sku: &str) -> Option<Product> {
        let sku = Sku::new(sku);
        let index = read(&self.index);
        index.products.get(&sku).map(|product| lock(product).clone())
    }

    /// Snapshot of every product in insertion order.
    ///
    /// All products are locked together, so the snapshot never shows part of
    /// a multi-SKU change.
    pub fn list(&self) -> Vec<Product> {
        let index = read(&self.index);
        let locked = index.lock_sorted(index.products.keys());
        index
            .order
            .iter()
            .filter_map(|sku| locked.get(sku).cloned())
            .collect()
    }

    /// Products at or below their low-stock threshold, in insertion order.
    pub fn low_stock_list(&self) -> Vec<Product> {
        self.list()
            .into_iter()
            .filter(|product| product.is_low_stock())
            .collect()
    }

    /// Removes `quantity` units of one product.
    pub fn decrement_stock(&self, sku: &str, quantity: u32) -> Result<Product> {
        let sku = required_sku(sku)?;
        self.with_locked([&sku], |locked| {
            locked.decrement_stock(&sku, quantity)?;
            locked
                .get(&sku)
                .cloned()
                .ok_or_else(|| DomainError::product_not_found(sku.clone()))
        })
    }

    /// Adds `quantity` units of one product.
    pub fn increment_stock(&self, sku: &str, quantity: u32) -> Result<Product> {
        let sku = required_sku(sku)?;
        self.with_locked([&sku], |locked| {
            locked.increment_stock(&sku, quantity)?;
            locked
                .get(&sku)
                .cloned()
                .ok_or_else(|| DomainError::product_not_found(sku.clone()))
        })
    }

    /// Applies a manual edit to one product.
    pub fn update(&self, sku: &str, update: &ProductUpdate) -> Result<Product> {
        let sku = required_sku(sku)?;
        let index = read(&self.index);
        let entry = index
            .products
            .get(&sku)
            .ok_or_else(|| DomainError::product_not_found(sku.clone()))?;
        let mut product = lock(entry);
        product.apply_update(update)?;
        Ok(product.clone())
    }

    /// Runs `f` with exclusive access to the given SKUs.
    ///
    /// The SKUs are locked in ascending order and stay locked until `f`
    /// returns, so a validate-then-mutate sequence inside `f` is atomic with
    /// respect to every other catalog operation on those SKUs. SKUs that are
    /// not in the catalog are simply absent from the [`LockedProducts`].
    pub fn with_locked<'s, T>(
        &self,
        skus: impl IntoIterator<Item = &'s Sku>,
        f: impl FnOnce(&mut LockedProducts<'_>) -> Result<T>,
    ) -> Result<T> {
        let index = read(&self.index);
        let mut locked = index.lock_sorted(skus);
        f(&mut locked)
    }

    pub fn len(&self) -> usize {
        read(&self.index).products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn required_sku(sku: &str) -> Result<Sku> {
    let sku = Sku::new(sku);
    if sku.is_blank() {
        return Err(DomainError::SkuRequired);
    }
    Ok(sku)
}
