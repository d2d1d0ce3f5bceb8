//! Concurrent access to the catalog and ledger.

use std::collections::BTreeSet;

use common::{OrderId, Sku};
use domain::{Money, NewOrder, OrderItem, Product};
use store::{Catalog, FIRST_ORDER_ID, Ledger};

fn catalog_with(stock: u32) -> Catalog {
    let catalog = Catalog::new();
    for sku in ["A", "B", "C"] {
        catalog
            .add(Product::new(sku, sku, Money::from_cents(100), stock, 0).unwrap())
            .unwrap();
    }
    catalog
}

#[test]
fn test_parallel_decrements_stop_at_zero() {
    let catalog = catalog_with(100);

    let succeeded: usize = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..10)
            .map(|_| {
                let catalog = &catalog;
                scope.spawn(move || {
                    (0..25)
                        .filter(|_| catalog.decrement_stock("A", 1).is_ok())
                        .count()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(succeeded, 100);
    assert_eq!(catalog.find("A").unwrap().stock(), 0);
}

#[test]
fn test_with_locked_in_opposite_orders_does_not_deadlock() {
    let catalog = catalog_with(10_000);
    let forward = [Sku::new("A"), Sku::new("B"), Sku::new("C")];
    let backward = [Sku::new("C"), Sku::new("B"), Sku::new("A")];

    std::thread::scope(|scope| {
        for skus in [&forward, &backward] {
            let catalog = &catalog;
            scope.spawn(move || {
                for _ in 0..500 {
                    catalog
                        .with_locked(skus.iter(), |locked| {
                            for sku in skus {
                                locked.decrement_stock(sku, 1)?;
                            }
                            Ok(())
                        })
                        .unwrap();
                }
            });
        }
    });

    for sku in ["A", "B", "C"] {
        assert_eq!(catalog.find(sku).unwrap().stock(), 9_000);
    }
}

#[test]
fn test_parallel_records_get_unique_ids() {
    let ledger = Ledger::new();

    let ids: Vec<OrderId> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let ledger = &ledger;
                scope.spawn(move || {
                    (0..50)
                        .map(|_| {
                            let item =
                                OrderItem::new("A", "A", Money::from_cents(100), 1).unwrap();
                            let draft = NewOrder::new(&format!("user-{t}"), vec![item]).unwrap();
                            ledger.record(draft).id()
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect()
    });

    let unique: BTreeSet<u64> = ids.iter().map(|id| id.as_u64()).collect();
    assert_eq!(unique.len(), 400);
    assert_eq!(unique.first().copied(), Some(FIRST_ORDER_ID));
    assert_eq!(unique.last().copied(), Some(FIRST_ORDER_ID + 399));
    assert_eq!(ledger.len(), 400);
}
